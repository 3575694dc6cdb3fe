//! Error types for the console.

use crate::config::ConfigError;
use crate::credentials::CredentialError;
use roster_core::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
