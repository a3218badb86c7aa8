//! # clinic-sync
//!
//! Client-side state synchronization for the directory screens.
//!
//! [`EntryListSynchronizer`] owns the [`Snapshot`] a list view renders and
//! routes every mutation through a [`DirectoryService`](clinic_client::DirectoryService).
//! Archiving is only reachable through [`ArchiveConfirmationFlow::confirm`].
//! [`UserDetailEditor`] and [`CrmSettingsEditor`] back the two edit forms.

pub mod archive;
pub mod editor;
pub mod error;
pub mod settings;
pub mod snapshot;
pub mod synchronizer;

pub use archive::{ArchiveConfirmationFlow, ArchiveState};
pub use editor::UserDetailEditor;
pub use error::SyncError;
pub use settings::{CrmSettingsEditor, SettingsReport};
pub use snapshot::{Reconciliation, ServerUpdate, Snapshot};
pub use synchronizer::{EntryListSynchronizer, ListScope, UpdateOutcome};
