//! Persisted user state: tracked ids and difficulty ratings.
//!
//! Both are stored by the host as JSON strings. Reading never fails: a
//! missing or malformed blob reads as empty.

use super::types::AchievementId;
use crate::error::Result;
use std::collections::BTreeMap;

/// Encode tracked ids as a JSON array of integers.
pub fn encode_tracked_ids(ids: &[AchievementId]) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Decode a tracked-id blob, treating missing or malformed data as empty.
pub fn decode_tracked_ids(blob: Option<&str>) -> Vec<AchievementId> {
    let Some(json) = blob.filter(|s| !s.trim().is_empty()) else {
        return Vec::new();
    };
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed tracked achievements blob, ignoring");
        Vec::new()
    })
}

/// Encode difficulty ratings as a JSON object keyed by id.
pub fn encode_difficulties(ratings: &BTreeMap<AchievementId, u8>) -> Result<String> {
    Ok(serde_json::to_string(ratings)?)
}

/// Decode a difficulty blob, treating missing or malformed data as empty.
pub fn decode_difficulties(blob: Option<&str>) -> BTreeMap<AchievementId, u8> {
    let Some(json) = blob.filter(|s| !s.trim().is_empty()) else {
        return BTreeMap::new();
    };
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "malformed difficulty ratings blob, ignoring");
        BTreeMap::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracked_ids_shape() {
        let json = encode_tracked_ids(&[2, 5, 9]).unwrap();
        assert_eq!(json, "[2,5,9]");
        assert_eq!(decode_tracked_ids(Some(&json)), vec![2, 5, 9]);
    }

    #[test]
    fn test_tracked_ids_malformed_is_empty() {
        assert!(decode_tracked_ids(None).is_empty());
        assert!(decode_tracked_ids(Some("")).is_empty());
        assert!(decode_tracked_ids(Some("not json")).is_empty());
        assert!(decode_tracked_ids(Some("{\"a\":1}")).is_empty());
        assert!(decode_tracked_ids(Some("[1,-2]")).is_empty());
    }

    #[test]
    fn test_difficulties_roundtrip_shape() {
        let mut ratings = BTreeMap::new();
        ratings.insert(3, 4);
        ratings.insert(10, 1);
        let json = encode_difficulties(&ratings).unwrap();
        assert_eq!(json, "{\"3\":4,\"10\":1}");
        assert_eq!(decode_difficulties(Some(&json)), ratings);
        assert!(decode_difficulties(Some("[1]")).is_empty());
    }
}
