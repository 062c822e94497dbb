mod error;
mod keys;
mod patterns;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{
    composed_key, dashboard_pattern, namespace_of, scope_pattern, slice_key, slice_pattern,
    tracking_key, DASHBOARD_NAMESPACE, NAMESPACE_REGISTRY_KEY,
};
pub use patterns::pattern_matches;
pub use serialization::{deserialize, serialize, SerializationError};
pub use traits::Cache;
