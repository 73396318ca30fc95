use std::collections::BTreeMap;

use crate::ids::ResourceKind;

use super::types::{ProvenanceKey, ProvenanceRecord};

/// A thread-unsafe (single-owner) keyed store mapping `(kind, id, field)` to
/// an ordered list of provenance records (§4.5). Owned by one reconciliation
/// and never shared across concurrent reconciliations.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceTracker {
    enabled: bool,
    history: BTreeMap<ProvenanceKey, Vec<ProvenanceRecord>>,
}

impl ProvenanceTracker {
    /// A tracker that records everything.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            history: BTreeMap::new(),
        }
    }

    /// A tracker that accepts calls but stores nothing (§4.5: "Disabled
    /// instances accept calls but store nothing").
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            history: BTreeMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Appends a provenance record for `key`. A no-op on a disabled
    /// tracker.
    pub fn track(&mut self, key: ProvenanceKey, record: ProvenanceRecord) {
        if !self.enabled {
            return;
        }
        self.history.entry(key).or_default().push(record);
    }

    /// Returns the append-ordered history for one field, if any.
    pub fn find_by_field(&self, kind: ResourceKind, id: &str, field: &str) -> Option<&[ProvenanceRecord]> {
        let key = ProvenanceKey::new(kind, id, field);
        self.history.get(&key).map(Vec::as_slice)
    }

    /// Returns every field tracked for one resource, as field path ->
    /// history.
    pub fn find_by_resource(&self, kind: ResourceKind, id: &str) -> BTreeMap<String, &[ProvenanceRecord]> {
        self.history
            .iter()
            .filter(|(key, _)| key.kind == kind && key.id == id)
            .map(|(key, records)| (key.field.clone(), records.as_slice()))
            .collect()
    }

    /// Deep-copies the current store into an independent snapshot.
    pub fn snapshot(&self) -> BTreeMap<ProvenanceKey, Vec<ProvenanceRecord>> {
        self.history.clone()
    }

    /// Removes all recorded history; the enabled/disabled flag is
    /// unaffected.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Iterates every tracked key and its history, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProvenanceKey, &Vec<ProvenanceRecord>)> {
        self.history.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SourceId;
    use chrono::Utc;

    fn record(source: SourceId, reason: &str) -> ProvenanceRecord {
        ProvenanceRecord {
            source,
            field: "pricing.input_per_1m".to_owned(),
            value: serde_json::json!(10.0),
            timestamp: Utc::now(),
            authority: 0.8,
            confidence: 1.0,
            reason: reason.to_owned(),
            previous_value: None,
        }
    }

    #[test]
    fn disabled_tracker_stores_nothing() {
        let mut tracker = ProvenanceTracker::disabled();
        let key = ProvenanceKey::new(ResourceKind::Model, "gpt-4", "pricing.input_per_1m");
        tracker.track(key.clone(), record(SourceId::ModelsDevHttp, "x"));
        assert!(tracker.find_by_field(ResourceKind::Model, "gpt-4", "pricing.input_per_1m").is_none());
    }

    #[test]
    fn enabled_tracker_preserves_append_order() {
        let mut tracker = ProvenanceTracker::enabled();
        let key = ProvenanceKey::new(ResourceKind::Model, "gpt-4", "pricing.input_per_1m");
        tracker.track(key.clone(), record(SourceId::LocalCatalog, "first"));
        tracker.track(key.clone(), record(SourceId::ModelsDevHttp, "second"));
        let history = tracker
            .find_by_field(ResourceKind::Model, "gpt-4", "pricing.input_per_1m")
            .unwrap_or_default();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reason, "first");
        assert_eq!(history[1].reason, "second");
    }

    #[test]
    fn find_by_resource_groups_all_fields() {
        let mut tracker = ProvenanceTracker::enabled();
        tracker.track(
            ProvenanceKey::new(ResourceKind::Model, "gpt-4", "pricing.input_per_1m"),
            record(SourceId::ModelsDevHttp, "a"),
        );
        tracker.track(
            ProvenanceKey::new(ResourceKind::Model, "gpt-4", "name"),
            record(SourceId::Providers, "b"),
        );
        let fields = tracker.find_by_resource(ResourceKind::Model, "gpt-4");
        assert_eq!(fields.len(), 2);
    }
}
