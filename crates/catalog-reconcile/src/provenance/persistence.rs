use std::fmt;

use serde::{Deserialize, Serialize};

use super::tracker::ProvenanceTracker;
use super::types::{ProvenanceKey, ProvenanceRecord};

/// Failure parsing a persisted provenance document (§6: "malformed input is
/// reported as a parse error").
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceError {
    pub message: String,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provenance document parse error: {}", self.message)
    }
}

impl std::error::Error for PersistenceError {}

/// On-disk document shape: one top-level `provenance` field mapping
/// `kind:id:field` wire keys to their history (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    provenance: std::collections::BTreeMap<String, Vec<ProvenanceRecord>>,
}

/// Serializes a tracker's current contents to the §6 wire document.
///
/// File I/O is left to the caller, per §6's framing ("leaves the actual
/// file I/O to the caller"); this only handles the in-memory document.
pub fn to_value(tracker: &ProvenanceTracker) -> serde_json::Value {
    let mut provenance = std::collections::BTreeMap::new();
    for (key, records) in tracker.iter() {
        provenance.insert(key.to_wire_string(), records.clone());
    }
    let document = Document { provenance };
    serde_json::to_value(document).unwrap_or(serde_json::Value::Null)
}

/// Parses a §6 wire document into a fresh, enabled [`ProvenanceTracker`].
///
/// Returns [`PersistenceError`] on malformed input; a value of
/// `serde_json::Value::Null` is treated as "no provenance" (§6) and yields
/// an empty tracker rather than an error.
pub fn from_value(value: &serde_json::Value) -> Result<ProvenanceTracker, PersistenceError> {
    if value.is_null() {
        return Ok(ProvenanceTracker::enabled());
    }
    let document: Document = serde_json::from_value(value.clone()).map_err(|e| PersistenceError {
        message: e.to_string(),
    })?;

    let mut tracker = ProvenanceTracker::enabled();
    for (wire_key, records) in document.provenance {
        let key = ProvenanceKey::from_wire_string(&wire_key).ok_or_else(|| PersistenceError {
            message: format!("malformed provenance key: {wire_key:?}"),
        })?;
        for record in records {
            tracker.track(key.clone(), record);
        }
    }
    Ok(tracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ResourceKind, SourceId};
    use chrono::Utc;

    fn sample_record() -> ProvenanceRecord {
        ProvenanceRecord {
            source: SourceId::ModelsDevHttp,
            field: "pricing.input_per_1m".to_owned(),
            value: serde_json::json!(10.0),
            timestamp: Utc::now(),
            authority: 0.8,
            confidence: 1.0,
            reason: "selected by authority (priority: 110)".to_owned(),
            previous_value: None,
        }
    }

    #[test]
    fn round_trips_through_to_value_and_from_value() {
        let mut tracker = ProvenanceTracker::enabled();
        tracker.track(
            ProvenanceKey::new(ResourceKind::Model, "gpt-4", "pricing.input_per_1m"),
            sample_record(),
        );
        let value = to_value(&tracker);
        let restored = from_value(&value).unwrap_or_else(|_| ProvenanceTracker::enabled());
        let history = restored
            .find_by_field(ResourceKind::Model, "gpt-4", "pricing.input_per_1m")
            .unwrap_or_default();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].source, SourceId::ModelsDevHttp);
    }

    #[test]
    fn null_value_means_no_provenance() {
        let restored = from_value(&serde_json::Value::Null).unwrap_or_else(|_| ProvenanceTracker::disabled());
        assert!(restored.is_enabled());
        assert!(restored.snapshot().is_empty());
    }

    #[test]
    fn malformed_key_is_a_parse_error() {
        let value = serde_json::json!({
            "provenance": {
                "not-a-valid-key": []
            }
        });
        assert!(from_value(&value).is_err());
    }
}
