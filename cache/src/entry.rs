//! Cache entry snapshots.

use chrono::{DateTime, Utc};
use ladrillo_client::ApiError;
use serde::de::DeserializeOwned;

/// What a subscriber sees for one cache key.
///
/// Values are type-erased JSON: one client caches heterogeneous
/// resources, and JSON is already the wire currency. Typed access goes
/// through [`QuerySnapshot::data_as`].
#[derive(Debug, Clone, Default)]
pub struct QuerySnapshot {
    /// The last successful fetch result, if any.
    ///
    /// Preserved across failed re-fetches: a subscriber never loses
    /// last-known-good data to a transient error.
    pub data: Option<serde_json::Value>,

    /// `true` while the *first* fetch is in flight (no data exists yet).
    pub is_loading: bool,

    /// `true` while any fetch for this key is in flight.
    pub is_fetching: bool,

    /// `true` once the entry has been invalidated and not yet re-fetched.
    pub is_stale: bool,

    /// The most recent fetch failure, cleared by the next success.
    pub error: Option<ApiError>,

    /// When `data` was last refreshed.
    pub updated_at: Option<DateTime<Utc>>,
}

impl QuerySnapshot {
    /// Deserialize the cached value, when present.
    ///
    /// # Errors
    ///
    /// [`ApiError::ParseFailed`] when the cached JSON does not match `T`.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        self.data
            .as_ref()
            .map(|value| {
                serde_json::from_value(value.clone())
                    .map_err(|e| ApiError::ParseFailed(e.to_string()))
            })
            .transpose()
    }

    /// Whether a fetch has ever succeeded for this key.
    #[must_use]
    pub const fn has_data(&self) -> bool {
        self.data.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_as_roundtrip() {
        let snapshot = QuerySnapshot {
            data: Some(json!([1, 2, 3])),
            ..QuerySnapshot::default()
        };

        let values: Option<Vec<u32>> = snapshot.data_as().unwrap();
        assert_eq!(values, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_data_as_mismatch_reports_parse_error() {
        let snapshot = QuerySnapshot {
            data: Some(json!({"not": "a list"})),
            ..QuerySnapshot::default()
        };

        let result: Result<Option<Vec<u32>>, _> = snapshot.data_as();
        assert!(matches!(result, Err(ApiError::ParseFailed(_))));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = QuerySnapshot::default();
        assert!(!snapshot.has_data());
        assert_eq!(snapshot.data_as::<Vec<u32>>().unwrap(), None);
    }
}
