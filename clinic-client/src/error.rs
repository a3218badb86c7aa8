use thiserror::Error;

use crate::protocol::Endpoint;

/// Failure of one remote call. Every variant leaves local state untouched;
/// callers only decide how to report it.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never completed (connection refused, timeout, reset).
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: Endpoint, message: String },

    /// Non-2xx status. `message` is the response body, trimmed, for logs only.
    #[error("{endpoint} rejected with status {status}: {message}")]
    Rejected {
        endpoint: Endpoint,
        status: u16,
        message: String,
    },

    /// 2xx with a body that does not have the expected shape.
    #[error("unexpected {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },

    #[error("client configuration error: {0}")]
    Config(#[from] clinic_core::ConfigError),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl ServiceError {
    pub(crate) fn transport(endpoint: Endpoint, err: reqwest::Error) -> Self {
        ServiceError::Transport {
            endpoint,
            message: err.to_string(),
        }
    }

    /// The endpoint that failed, when the failure came from a call.
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            ServiceError::Transport { endpoint, .. }
            | ServiceError::Rejected { endpoint, .. }
            | ServiceError::Decode { endpoint, .. } => Some(*endpoint),
            ServiceError::Config(_) | ServiceError::Client(_) => None,
        }
    }
}
