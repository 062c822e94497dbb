//! Functional core for stockroom.
//!
//! Pure types and functions shared by the server: cache contracts and key
//! builders, retail domain types, repository traits, time windows and the
//! dashboard aggregation logic. Nothing in this crate performs I/O.

pub mod cache;
pub mod dashboard;
pub mod retail;
pub mod serde;
pub mod storage;
