//! Clinic admin core library: domain types, form validation, client configuration.
//!
//! - [`types`]: directory entries, role cycle, patches, CRM settings
//! - [`forms`]: editable form models for the user-detail and CRM screens
//! - [`validate`]: field rules applied before any mutation leaves the client
//! - [`config`]: `~/.clinic-admin/config.yaml` load / save
//! - [`error`]: [`ConfigError`], [`RecordError`], [`ValidationErrors`]

pub mod config;
pub mod error;
pub mod forms;
pub mod types;
pub mod validate;

pub use config::ClientConfig;
pub use error::{ConfigError, FieldError, RecordError, ValidationErrors};
pub use forms::{CrmSettingsForm, LogoField, UserForm};
pub use types::{
    AccessLevel, CrmSettingsRecord, Entry, EntryId, EntryPatch, EntryRecord, ImageKind,
    LogoUpload, SettingsUpdate,
};
