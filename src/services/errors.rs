use thiserror::Error;

use crate::repository::errors::RepositoryError;

/// Result alias returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the service layer to route handlers.
///
/// "No applicable price" is not an error; services return `Ok(None)` for it.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backing store could not answer.
    #[error("price lookup failed: {0}")]
    Repository(#[from] RepositoryError),
    /// Caller input was rejected before reaching the store.
    #[error("{0}")]
    Form(String),
    /// The caller's deadline expired before the lookup finished.
    #[error("price lookup timed out")]
    Timeout,
    #[error("internal error: {0}")]
    Internal(String),
}
