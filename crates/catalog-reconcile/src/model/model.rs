//! The `Model` record and its nested substructures (data-model.md §3,
//! "Model / Provider / Author").
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Per-token pricing, expressed as USD per one million tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_per_1m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_per_1m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_read_per_1m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_write_per_1m: Option<f64>,
}

impl Pricing {
    /// `true` when every field is absent (the zero value the merger treats
    /// as "no candidate", per §4.3 step 2's "non-zero value" gate).
    pub fn is_empty(&self) -> bool {
        self.input_per_1m.is_none()
            && self.output_per_1m.is_none()
            && self.cache_read_per_1m.is_none()
            && self.cache_write_per_1m.is_none()
    }
}

/// Token-count limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u64>,
}

impl Limits {
    pub fn is_empty(&self) -> bool {
        self.context_window.is_none() && self.max_output_tokens.is_none()
    }
}

/// Supported input/output modalities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modalities {
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
}

/// Capability flags and live availability.
///
/// `tool_call`, `reasoning`, and `available` are the "live capability"
/// subfields the complex-structure composition policy (§4.3 step 3) sources
/// from the `providers` source; `modalities` prefers `providers` too and
/// falls back to the community database when `providers` doesn't supply it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Features {
    #[serde(default)]
    pub modalities: Modalities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl Features {
    pub fn is_empty(&self) -> bool {
        self.modalities.input.is_empty()
            && self.modalities.output.is_empty()
            && self.tool_call.is_none()
            && self.reasoning.is_none()
            && self.available.is_none()
    }
}

/// Descriptive metadata, largely derived from the community database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_cutoff: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_weights: Option<bool>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self.release_date.is_none()
            && self.last_updated.is_none()
            && self.knowledge_cutoff.is_none()
            && self.open_weights.is_none()
    }
}

/// A single AI model, as carried inside a [`crate::model::Provider`] and in
/// the catalog's flattened all-models view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing: Pricing,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub features: Features,
    #[serde(default)]
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// Allocates a fresh model with only `id` populated; every other field
    /// is the type's default (§4.3 step 1, "allocate fresh with id set").
    pub fn new(id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            pricing: Pricing::default(),
            limits: Limits::default(),
            features: Features::default(),
            metadata: Metadata::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Structural equality ignoring `created_at`/`updated_at`, used by the
    /// merger's timestamp policy (§4.3 step 4) and by invariant 4 in §8.
    pub fn eq_ignoring_timestamps(&self, other: &Model) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.pricing == other.pricing
            && self.limits == other.limits
            && self.features == other.features
            && self.metadata == other.metadata
    }
}
