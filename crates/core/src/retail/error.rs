use thiserror::Error;

/// Errors raised when validating retail records before they are stored.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetailError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),
    #[error("{field} cannot be negative: {value}")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("Amount paid ({paid}) exceeds invoice total ({total})")]
    Overpaid { paid: f64, total: f64 },
    #[error("Transfer source and destination must differ")]
    SameShopTransfer,
    #[error("Transfer quantity must be positive")]
    InvalidQuantity,
}
