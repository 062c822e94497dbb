use thiserror::Error;

use crate::storage::DateRangeError;

/// Errors raised while interpreting dashboard request filters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error(transparent)]
    DateRange(#[from] DateRangeError),
    #[error("Unknown dashboard slice: {0}")]
    UnknownSlice(String),
}

/// Errors that abort a dashboard composition as a whole.
///
/// Failures of individual slices never surface here; they are reported inside
/// the composed dashboard instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Invalid filters: {0}")]
    InvalidFilters(#[from] FilterError),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DashboardError {
    /// Returns true if the caller supplied bad input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DashboardError::InvalidFilters(_))
    }
}
