use thiserror::Error;

/// Failures reported by a cache backend.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The backend could not be reached or dropped the connection.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
    /// The backend did not answer in time.
    #[error("Cache timed out: {0}")]
    Timeout(String),
    /// The backend answered but refused the command.
    #[error("Cache rejected command: {0}")]
    Rejected(String),
    /// The backend was constructed with unusable settings.
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

impl CacheError {
    /// Returns true if retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CacheError::Unavailable(_) | CacheError::Timeout(_))
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
