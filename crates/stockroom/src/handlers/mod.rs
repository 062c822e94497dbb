pub mod admin;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod records;
pub mod shops;

pub use error::AppError;
