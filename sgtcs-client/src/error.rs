//! Client error types

use crate::profile::ProfileError;
use crate::storage::StorageError;
use sgtcs_cert::CertError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{operation}: {status} {}", .description.as_deref().unwrap_or("(no description)"))]
    Service {
        operation: &'static str,
        status: u16,
        description: Option<String>,
    },

    /// Endpoint URL could not be formed from the base URL or request id
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Profile selection or policy failure
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Local storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Key or request generation failure
    #[error(transparent)]
    Cert(#[from] CertError),
}

impl ClientError {
    /// Whether the failure came from talking to the service (as opposed to
    /// local input, storage or crypto).
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_)
                | ClientError::Service { .. }
                | ClientError::InvalidResponse(_)
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
