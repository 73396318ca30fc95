use std::collections::BTreeMap;

use crate::access::{FieldAccess, FieldValue};
use crate::error::ResourceError;
use crate::ids::{ResourceKind, SourceId};
use crate::provenance::{ProvenanceKey, ProvenanceRecord, ProvenanceTracker};
use crate::strategy::{Resolution, Strategy};

use super::complex::ComplexOverride;
use super::identified::Identified;

use chrono::{DateTime, Utc};

/// Merges one kind's records across sources, field by field, per §4.3
/// steps 2–3 (the timestamp policy of step 4 is applied separately by each
/// kind's caller, since only [`crate::model::Model`] carries timestamps in
/// this schema).
///
/// `structural_fields` lists the kind's top-level fixed field paths;
/// `complex_fields` lists the leaf paths of its nested substructures,
/// resolved through `complex_overrides` instead of `strategy` when an
/// override names that path. `seed` allocates a fresh record for an id with
/// no baseline entry, given "now" for kinds (like `Model`) that stamp
/// creation time.
///
/// Returns the merged records alongside any field-write failures hit along
/// the way (a resolved value whose type doesn't match the field it targets,
/// §7): these are non-fatal, logged, and the pre-call value is kept, but
/// also captured here so a caller can attach them to a per-record outcome
/// (§4.8 step 5/7, "errors for one provider are captured and attached to
/// the result").
#[allow(clippy::too_many_arguments)]
pub fn merge_records<T>(
    kind: ResourceKind,
    by_source: &BTreeMap<SourceId, Vec<T>>,
    baseline: Option<&BTreeMap<String, T>>,
    strategy: &dyn Strategy,
    structural_fields: &[&str],
    complex_fields: &[&str],
    complex_overrides: &[ComplexOverride],
    now: DateTime<Utc>,
    tracker: &mut ProvenanceTracker,
    seed: impl Fn(&str, DateTime<Utc>) -> T,
) -> (Vec<T>, Vec<ResourceError>)
where
    T: FieldAccess + Identified + Clone,
{
    let mut ids: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();
    for records in by_source.values() {
        for record in records {
            ids.insert(record.id());
        }
    }

    let mut out = Vec::with_capacity(ids.len());
    let mut errors = Vec::new();
    for id in ids {
        let mut merged = baseline
            .and_then(|b| b.get(id))
            .cloned()
            .unwrap_or_else(|| seed(id, now));

        for &path in structural_fields.iter().chain(complex_fields) {
            let candidates = gather_candidates(by_source, id, path);
            if candidates.is_empty() {
                continue;
            }

            let override_entry = complex_overrides.iter().find(|o| o.path == path);
            let resolution = match override_entry {
                Some(over) => resolve_by_order(&candidates, &over.source_order),
                None => strategy.resolve(path, &candidates),
            };

            if let Some(err) = apply_resolution(
                kind,
                id,
                path,
                resolution,
                &mut merged,
                tracker,
                now,
                override_entry.is_some(),
            ) {
                errors.push(err);
            }
        }
        out.push(merged);
    }
    (out, errors)
}

fn gather_candidates<T: FieldAccess + Identified>(
    by_source: &BTreeMap<SourceId, Vec<T>>,
    id: &str,
    path: &str,
) -> BTreeMap<SourceId, FieldValue> {
    let mut candidates = BTreeMap::new();
    for (source, records) in by_source {
        let Some(record) = records.iter().find(|r| r.id() == id) else {
            continue;
        };
        if let Some(value) = record.get_field(path) {
            if !value.is_empty_display() {
                candidates.insert(source.clone(), value);
            }
        }
    }
    candidates
}

fn resolve_by_order(candidates: &BTreeMap<SourceId, FieldValue>, order: &[SourceId]) -> Resolution {
    for source in order {
        if let Some(value) = candidates.get(source) {
            return Resolution {
                value: Some(value.clone()),
                source: Some(source.clone()),
                reason: "selected by complex-structure composition policy".to_owned(),
                authority: None,
            };
        }
    }
    // None of the listed sources held a candidate; rather than discard a
    // value some other source did supply, fall back to the first one in
    // key order so an override list never has to be exhaustive.
    if let Some((source, value)) = candidates.iter().next() {
        return Resolution {
            value: Some(value.clone()),
            source: Some(source.clone()),
            reason: "complex-structure composition policy fell back to remaining candidate".to_owned(),
            authority: None,
        };
    }
    Resolution {
        value: None,
        source: None,
        reason: "no value available".to_owned(),
        authority: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_resolution<T: FieldAccess>(
    kind: ResourceKind,
    id: &str,
    path: &str,
    resolution: Resolution,
    merged: &mut T,
    tracker: &mut ProvenanceTracker,
    now: DateTime<Utc>,
    is_complex_override: bool,
) -> Option<ResourceError> {
    let (Some(value), Some(source)) = (resolution.value, resolution.source) else {
        return None;
    };
    if let Err(err) = merged.set_field(path, value.clone()) {
        tracing::warn!(field = %path, error = %err, "field write skipped: type mismatch");
        return Some(ResourceError {
            operation: "merge_field".to_owned(),
            kind,
            id: id.to_owned(),
            inner: Box::new(err),
        });
    }
    let authority = resolution
        .authority
        .unwrap_or(if is_complex_override { 1.0 } else { 0.0 });
    tracker.track(
        ProvenanceKey::new(kind, id, path),
        ProvenanceRecord {
            source,
            field: path.to_owned(),
            value: field_value_to_json(&value),
            timestamp: now,
            authority,
            confidence: if value.is_empty_display() { 0.0 } else { 1.0 },
            reason: resolution.reason,
            previous_value: None,
        },
    );
    None
}

fn field_value_to_json(value: &FieldValue) -> serde_json::Value {
    match value {
        FieldValue::Str(s) => serde_json::Value::String(s.clone()),
        FieldValue::F64(v) => serde_json::json!(v),
        FieldValue::U64(v) => serde_json::json!(v),
        FieldValue::Bool(v) => serde_json::json!(v),
        FieldValue::Date(v) => serde_json::Value::String(v.to_string()),
        FieldValue::StrSeq(v) => serde_json::json!(v),
    }
}
