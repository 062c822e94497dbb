//! In-memory storage backend.
//!
//! Stores all records in HashMaps wrapped in `Arc<RwLock<_>>`. Useful for
//! tests and demo deployments where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::storage::InMemoryRepository;
//! use crate::mock_data::seed_store;
//!
//! let repo = InMemoryRepository::new();
//! seed_store(&repo, &generate_seed_data(today)).await?;
//! ```

mod repository;

pub use repository::InMemoryRepository;
