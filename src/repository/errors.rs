use thiserror::Error;

/// Result alias used by every repository operation.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures raised while talking to the backing store.
///
/// An empty lookup is never one of these; readers return `Ok` with no rows.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    /// The query itself failed.
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    /// A stored row could not be mapped to a domain record.
    #[error("record {id} is corrupted: {reason}")]
    Corrupted { id: i32, reason: String },
}
