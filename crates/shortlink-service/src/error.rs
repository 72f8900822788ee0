use shortlink_core::{InvalidShortCode, StorageError};
use shortlink_generator::GenerationError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Why a create operation failed.
#[derive(Debug, Clone, Error)]
pub enum CreationError {
    #[error("code generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("generated short code already exists: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
}

/// Errors returned by [`UrlResolver`](crate::UrlResolver) operations.
///
/// Cache failures never appear here: they are logged and the store is used
/// instead.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("failed to create short url: {0}")]
    CreationFailed(#[from] CreationError),
    #[error("no url found for '{0}'")]
    NotFound(String),
    #[error("failed to resolve url: {0}")]
    ResolutionFailed(#[source] StorageError),
}

impl From<InvalidShortCode> for ServiceError {
    fn from(error: InvalidShortCode) -> Self {
        ServiceError::InvalidShortCode(error.to_string())
    }
}

impl ServiceError {
    /// Whether the caller sent something unusable, as opposed to a failure
    /// on our side.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidUrl(_) | ServiceError::InvalidShortCode(_)
        )
    }
}
