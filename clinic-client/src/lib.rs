//! # clinic-client
//!
//! Remote collaborators of the admin dashboard: the [`DirectoryService`] and
//! [`SettingsService`] traits, and [`HttpAdminClient`], their REST
//! implementation against the clinic API.

mod error;
pub mod http;
pub mod protocol;
pub mod service;

pub use error::ServiceError;
pub use http::HttpAdminClient;
pub use protocol::{Endpoint, RoleCycleResponse};
pub use service::{DirectoryService, SettingsService};
