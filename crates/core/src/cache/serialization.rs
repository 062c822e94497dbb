//! Pure functions for serializing/deserializing cached values to/from bytes.
//!
//! Cache values are stored as JSON, which keeps them human-readable and easy
//! to inspect with `redis-cli` or a debugger.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes any value to JSON bytes.
pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes into a value.
pub fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{AggregateResult, ComposedDashboard, SummaryItem, ValueFormat};

    #[test]
    fn test_roundtrip_composed_dashboard() {
        let dashboard = ComposedDashboard {
            success: true,
            summary_data: Some(vec![SummaryItem::new(
                "Outstanding Invoices",
                300.0,
                ValueFormat::Currency,
            )]),
            shop_performance: None,
            inventory_distribution: Some(vec![]),
            monthly_sales: Some(vec![]),
            recent_transfers: Some(vec![]),
            errors: vec!["shopPerformance: Query failed: boom".to_string()],
        };

        let bytes = serialize(&dashboard).expect("serialize should succeed");
        let back: ComposedDashboard = deserialize(&bytes).expect("deserialize should succeed");

        assert_eq!(dashboard, back);
    }

    #[test]
    fn test_aggregate_result_wire_shape() {
        let result: AggregateResult<Vec<u32>> = AggregateResult::failed("timed out");
        let bytes = serialize(&result).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["data"], serde_json::json!([]));
        assert_eq!(json["message"], "timed out");
    }

    #[test]
    fn test_serialize_empty_vec() {
        let items: Vec<SummaryItem> = vec![];
        let bytes = serialize(&items).unwrap();
        assert_eq!(bytes, b"[]");
    }

    #[test]
    fn test_deserialize_malformed_json() {
        let result: Result<ComposedDashboard> = deserialize(b"{ not valid json }");
        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_wrong_shape() {
        let result: Result<Vec<SummaryItem>> = deserialize(br#"{"success": true}"#);
        assert!(result.is_err());
    }
}
