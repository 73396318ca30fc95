use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::ids::ResourceKind;

use super::tracker::ProvenanceTracker;
use super::types::ProvenanceRecord;

/// Maximum number of history entries shown per field in the rendered
/// report (§4.5: "history truncated after first few entries").
const HISTORY_DISPLAY_LIMIT: usize = 5;

/// A conflict detected within a single second-granularity timestamp bucket:
/// two or more distinct sources supplied a value for the same field at
/// (to the second) the same time (§4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub sources: Vec<String>,
    pub values: Vec<serde_json::Value>,
    pub chosen_source: String,
    pub chosen_reason: String,
}

/// One field's report view: its history newest-first, with the newest
/// entry flagged current, plus any detected conflicts.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldReport {
    pub field: String,
    pub history: Vec<ProvenanceRecord>,
    pub conflicts: Vec<Conflict>,
}

/// Per-resource report view: every tracked field, sorted alphabetically.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceReport {
    pub kind: ResourceKind,
    pub id: String,
    pub fields: Vec<FieldReport>,
}

/// Builds a per-resource, per-field report from a [`ProvenanceTracker`]'s
/// current contents.
pub fn build_report(tracker: &ProvenanceTracker) -> Vec<ResourceReport> {
    let mut by_resource: BTreeMap<(ResourceKind, String), Vec<(String, Vec<ProvenanceRecord>)>> =
        BTreeMap::new();

    for (key, records) in tracker.iter() {
        let mut sorted = records.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        by_resource
            .entry((key.kind, key.id.clone()))
            .or_default()
            .push((key.field.clone(), sorted));
    }

    by_resource
        .into_iter()
        .map(|((kind, id), mut fields)| {
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            let fields = fields
                .into_iter()
                .map(|(field, history)| {
                    let conflicts = detect_conflicts(&history);
                    FieldReport {
                        field,
                        history,
                        conflicts,
                    }
                })
                .collect();
            ResourceReport { kind, id, fields }
        })
        .collect()
}

/// Detects conflicts within any second-granularity timestamp bucket holding
/// two or more distinct sources (§4.5).
fn detect_conflicts(history: &[ProvenanceRecord]) -> Vec<Conflict> {
    let mut buckets: BTreeMap<i64, Vec<&ProvenanceRecord>> = BTreeMap::new();
    for record in history {
        buckets.entry(record.timestamp.timestamp()).or_default().push(record);
    }

    let mut conflicts = Vec::new();
    for records in buckets.values() {
        let distinct_sources: std::collections::BTreeSet<&str> =
            records.iter().map(|r| r.source.as_str()).collect();
        if distinct_sources.len() < 2 {
            continue;
        }
        let Some(chosen) = records
            .iter()
            .max_by(|a, b| a.authority.partial_cmp(&b.authority).unwrap_or(std::cmp::Ordering::Equal))
        else {
            continue;
        };
        conflicts.push(Conflict {
            sources: records.iter().map(|r| r.source.to_string()).collect(),
            values: records.iter().map(|r| r.value.clone()).collect(),
            chosen_source: chosen.source.to_string(),
            chosen_reason: chosen.reason.clone(),
        });
    }
    conflicts
}

/// Renders a deterministic string form suitable for auditing: resources
/// sorted by key, fields sorted alphabetically, history truncated (§4.5).
pub fn render(reports: &[ResourceReport]) -> String {
    let mut out = String::new();
    for resource in reports {
        let _ = writeln!(out, "{} {}", resource.kind, resource.id);
        for field in &resource.fields {
            let _ = writeln!(out, "  {}", field.field);
            for (i, record) in field.history.iter().enumerate() {
                if i >= HISTORY_DISPLAY_LIMIT {
                    let _ = writeln!(out, "    ... ({} more)", field.history.len() - HISTORY_DISPLAY_LIMIT);
                    break;
                }
                let marker = if i == 0 { "current" } else { "history" };
                let _ = writeln!(
                    out,
                    "    [{marker}] {} = {} ({})",
                    record.source, record.value, record.reason
                );
            }
            for conflict in &field.conflicts {
                let _ = writeln!(
                    out,
                    "    conflict: sources={:?} chosen={} ({})",
                    conflict.sources, conflict.chosen_source, conflict.chosen_reason
                );
            }
        }
    }
    out
}
