//! Per-field conflict resolution (§4.2): given candidate values from
//! multiple sources for one field, pick a winner with a justification.
mod authority_strategy;
mod source_order_strategy;

pub use authority_strategy::AuthorityStrategy;
pub use source_order_strategy::SourceOrderStrategy;

use std::collections::BTreeMap;

use crate::access::FieldValue;
use crate::ids::{ResourceKind, SourceId};

/// The chosen value for a field, the source it came from, and why.
///
/// `authority` carries the [0,1] authority score (§4.1) when the winning
/// source was chosen via an authority-table match; strategies that pick a
/// value without consulting the authority table (fallbacks, source-order)
/// leave it `None`, and callers record `0.0` in provenance for those picks.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub value: Option<FieldValue>,
    pub source: Option<SourceId>,
    pub reason: String,
    pub authority: Option<f64>,
}

impl Resolution {
    fn empty() -> Self {
        Self {
            value: None,
            source: None,
            reason: "no value available".to_owned(),
            authority: None,
        }
    }
}

/// Whether a strategy's default apply policy permits deletions, or only
/// additions and updates (§4.2: "additive: added+updated only, no
/// deletions").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyPolicy {
    pub allow_additions: bool,
    pub allow_updates: bool,
    pub allow_removals: bool,
}

impl ApplyPolicy {
    pub const ADDITIVE: ApplyPolicy = ApplyPolicy {
        allow_additions: true,
        allow_updates: true,
        allow_removals: false,
    };
}

/// Resolves field-level conflicts across sources.
///
/// `candidates` maps source id to a non-null candidate value for one field
/// path; implementations never see `None` entries (§4.2: "non-null
/// candidates only").
pub trait Strategy {
    fn resolve(&self, path: &str, candidates: &BTreeMap<SourceId, FieldValue>) -> Resolution;

    /// The default apply policy this strategy advertises.
    fn apply_policy(&self) -> ApplyPolicy {
        ApplyPolicy::ADDITIVE
    }

    /// Resource kinds this strategy is prepared to merge. `None` means all
    /// kinds.
    fn kinds(&self) -> Option<&[ResourceKind]> {
        None
    }
}

/// Shared fallback ladder used once a strategy's own logic has no
/// authority/ordering preference to offer (§4.2, both strategies'
/// fall-back text).
fn fallback(candidates: &BTreeMap<SourceId, FieldValue>, no_preference_reason: &str) -> Resolution {
    if let Some((source, value)) = candidates.iter().find(|(_, v)| !v.is_empty_display()) {
        return Resolution {
            value: Some(value.clone()),
            source: Some(source.clone()),
            reason: no_preference_reason.to_owned(),
            authority: None,
        };
    }
    if let Some((source, value)) = candidates.iter().next() {
        return Resolution {
            value: Some(value.clone()),
            source: Some(source.clone()),
            reason: "using first available value".to_owned(),
            authority: None,
        };
    }
    Resolution::empty()
}
