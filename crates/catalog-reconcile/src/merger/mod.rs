//! Field-level merging across sources (§4.3): per-kind entry points built on
//! top of the generic [`engine::merge_records`].
mod complex;
mod engine;
mod identified;

pub use complex::ComplexOverride;
pub use engine::merge_records;
pub use identified::Identified;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::error::ResourceError;
use crate::ids::{ResourceKind, SourceId};
use crate::model::{Author, Model, Provider};
use crate::paths;
use crate::provenance::ProvenanceTracker;
use crate::strategy::Strategy;

/// Every leaf path of `pricing`, `limits`, `features`, and `metadata`,
/// resolved through the complex-structure composition policy (§4.3 step 3)
/// rather than the structural-field loop of step 2.
fn model_complex_fields() -> Vec<&'static str> {
    use paths::model as p;
    vec![
        p::PRICING_INPUT_PER_1M,
        p::PRICING_OUTPUT_PER_1M,
        p::PRICING_CACHE_READ_PER_1M,
        p::PRICING_CACHE_WRITE_PER_1M,
        p::LIMITS_CONTEXT_WINDOW,
        p::LIMITS_MAX_OUTPUT_TOKENS,
        p::FEATURES_MODALITIES_INPUT,
        p::FEATURES_MODALITIES_OUTPUT,
        p::FEATURES_TOOL_CALL,
        p::FEATURES_REASONING,
        p::FEATURES_AVAILABLE,
        p::METADATA_RELEASE_DATE,
        p::METADATA_LAST_UPDATED,
        p::METADATA_KNOWLEDGE_CUTOFF,
        p::METADATA_OPEN_WEIGHTS,
    ]
}

/// Merges one provider's models across sources and applies the timestamp
/// policy (§4.3 step 4): a model absent from the baseline gets
/// `created_at == updated_at == now`; a model present in the baseline keeps
/// its `created_at` and only bumps `updated_at` when the merged fields
/// (ignoring timestamps) differ from the baseline's.
pub fn merge_models(
    by_source: &BTreeMap<SourceId, Vec<Model>>,
    baseline: Option<&BTreeMap<String, Model>>,
    strategy: &dyn Strategy,
    now: DateTime<Utc>,
    tracker: &mut ProvenanceTracker,
) -> (Vec<Model>, Vec<ResourceError>) {
    let complex_fields = model_complex_fields();
    let overrides = complex::features_overrides();
    let (mut merged, errors) = merge_records(
        ResourceKind::Model,
        by_source,
        baseline,
        strategy,
        paths::model::STRUCTURAL_FIELDS,
        &complex_fields,
        &overrides,
        now,
        tracker,
        Model::new,
    );

    for model in &mut merged {
        if let Some(base) = baseline.and_then(|b| b.get(&model.id)) {
            if !model.eq_ignoring_timestamps(base) {
                model.updated_at = now;
            }
        }
    }
    (merged, errors)
}

/// Merges providers across sources (§4.3 steps 1–2 only: providers carry no
/// timestamps, and have no complex substructures).
pub fn merge_providers(
    by_source: &BTreeMap<SourceId, Vec<Provider>>,
    baseline: Option<&BTreeMap<String, Provider>>,
    strategy: &dyn Strategy,
    now: DateTime<Utc>,
    tracker: &mut ProvenanceTracker,
) -> (Vec<Provider>, Vec<ResourceError>) {
    merge_records(
        ResourceKind::Provider,
        by_source,
        baseline,
        strategy,
        paths::provider::STRUCTURAL_FIELDS,
        &[],
        &[],
        now,
        tracker,
        |id, _now| Provider::new(id),
    )
}

/// Merges authors across sources (§4.3 steps 1–2 only).
pub fn merge_authors(
    by_source: &BTreeMap<SourceId, Vec<Author>>,
    baseline: Option<&BTreeMap<String, Author>>,
    strategy: &dyn Strategy,
    now: DateTime<Utc>,
    tracker: &mut ProvenanceTracker,
) -> (Vec<Author>, Vec<ResourceError>) {
    merge_records(
        ResourceKind::Author,
        by_source,
        baseline,
        strategy,
        paths::author::STRUCTURAL_FIELDS,
        &[],
        &[],
        now,
        tracker,
        |id, _now| Author::new(id),
    )
}
