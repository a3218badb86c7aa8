//! Error types for clinic-sync.

use thiserror::Error;

use clinic_client::ServiceError;
use clinic_core::{RecordError, ValidationErrors};

/// Why a synchronizer or editor operation left local state unchanged.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport failure, non-2xx status, or undecodable body.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The server answered with a record that cannot be shown in the list.
    #[error("malformed record in server response: {0}")]
    Record(#[from] RecordError),

    /// The form failed validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// `confirm()` called with no archive awaiting confirmation.
    #[error("no archive is awaiting confirmation")]
    NothingPending,
}
