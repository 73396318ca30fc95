use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ResourceKind, SourceId};

/// Record of which source supplied a value, with time, confidence, and
/// reason (§3, "Provenance record").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    pub source: SourceId,
    pub field: String,
    pub value: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub authority: f64,
    pub confidence: f64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<serde_json::Value>,
}

/// Composite key identifying one field's provenance history: resource kind,
/// resource id, field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProvenanceKey {
    pub kind: ResourceKind,
    pub id: String,
    pub field: String,
}

impl ProvenanceKey {
    pub fn new(kind: ResourceKind, id: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            field: field.into(),
        }
    }

    /// Renders the persistence-boundary wire key `kind:id:field` (§6).
    ///
    /// `field` may itself contain dots but not colons (§6); `id` is assumed
    /// colon-free by the same constraint, left unenforced here since this
    /// crate does not validate incoming ids (Design Notes, "provenance key
    /// format").
    pub fn to_wire_string(&self) -> String {
        format!("{}:{}:{}", self.kind, self.id, self.field)
    }

    /// Parses a `kind:id:field` wire key. Returns `None` if fewer than
    /// three colon-separated segments are present or the kind segment is
    /// unrecognized.
    pub fn from_wire_string(s: &str) -> Option<Self> {
        let mut parts = s.splitn(3, ':');
        let kind = parts.next()?;
        let id = parts.next()?;
        let field = parts.next()?;
        let kind = match kind {
            "model" => ResourceKind::Model,
            "provider" => ResourceKind::Provider,
            "author" => ResourceKind::Author,
            _ => return None,
        };
        Some(ProvenanceKey::new(kind, id, field))
    }
}
