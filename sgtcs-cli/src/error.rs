//! Command error type and exit-code mapping

use sgtcs_cert::CertError;
use sgtcs_client::{CertificateProfile, ClientError, ProfileError, StorageError};
use std::path::PathBuf;
use thiserror::Error;

/// Exit code for bad input, policy refusals and local failures.
pub const EXIT_USER_ERROR: u8 = 1;

/// Exit code for failures talking to the certificate service.
pub const EXIT_SERVICE_ERROR: u8 = 2;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl From<ProfileError> for CliError {
    fn from(err: ProfileError) -> Self {
        CliError::Client(err.into())
    }
}

impl From<StorageError> for CliError {
    fn from(err: StorageError) -> Self {
        CliError::Client(err.into())
    }
}

impl From<CertError> for CliError {
    fn from(err: CertError) -> Self {
        CliError::Client(err.into())
    }
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Client(err) if err.is_service_failure() => EXIT_SERVICE_ERROR,
            _ => EXIT_USER_ERROR,
        }
    }

    /// Catalog to show the user when the requested profile was not found.
    pub fn catalog_hint(&self) -> Option<&[CertificateProfile]> {
        match self {
            CliError::Client(ClientError::Profile(ProfileError::NoMatch { catalog, .. })) => {
                Some(catalog)
            }
            _ => None,
        }
    }
}
