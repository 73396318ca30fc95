use std::collections::BTreeMap;

use crate::access::FieldValue;
use crate::ids::SourceId;

use super::{fallback, ApplyPolicy, Resolution, Strategy};

/// Resolves each field by walking a fixed, caller-supplied source order and
/// taking the first listed source with a non-empty candidate (§4.2,
/// "source-order strategy").
pub struct SourceOrderStrategy {
    order: Vec<SourceId>,
}

impl SourceOrderStrategy {
    pub fn new(order: Vec<SourceId>) -> Self {
        Self { order }
    }
}

impl Strategy for SourceOrderStrategy {
    fn resolve(&self, _path: &str, candidates: &BTreeMap<SourceId, FieldValue>) -> Resolution {
        for source in &self.order {
            if let Some(value) = candidates.get(source) {
                if !value.is_empty_display() {
                    return Resolution {
                        value: Some(value.clone()),
                        source: Some(source.clone()),
                        reason: "selected by source order".to_owned(),
                        authority: None,
                    };
                }
            }
        }
        fallback(candidates, "no priority source available, using first non-empty")
    }

    fn apply_policy(&self) -> ApplyPolicy {
        ApplyPolicy::ADDITIVE
    }
}
