//! Canonical field-path vocabulary (Design Notes, "authority table static
//! initialization": centralizing the path strings prevents the authority
//! table and the field-access layer from drifting apart).
//!
//! Every dotted path the authority table, merger, and differ refer to is
//! declared exactly once here as a `&str` constant, grouped by the
//! [`crate::ids::ResourceKind`] it belongs to.

/// Field paths on a [`crate::model::Model`].
pub mod model {
    pub const NAME: &str = "name";
    pub const PRICING: &str = "pricing";
    pub const PRICING_STAR: &str = "pricing.*";
    pub const PRICING_INPUT_PER_1M: &str = "pricing.input_per_1m";
    pub const PRICING_OUTPUT_PER_1M: &str = "pricing.output_per_1m";
    pub const PRICING_CACHE_READ_PER_1M: &str = "pricing.cache_read_per_1m";
    pub const PRICING_CACHE_WRITE_PER_1M: &str = "pricing.cache_write_per_1m";
    pub const LIMITS: &str = "limits";
    pub const LIMITS_STAR: &str = "limits.*";
    pub const LIMITS_CONTEXT_WINDOW: &str = "limits.context_window";
    pub const LIMITS_MAX_OUTPUT_TOKENS: &str = "limits.max_output_tokens";
    pub const FEATURES: &str = "features";
    pub const FEATURES_STAR: &str = "features.*";
    pub const FEATURES_MODALITIES_INPUT: &str = "features.modalities.input";
    pub const FEATURES_MODALITIES_OUTPUT: &str = "features.modalities.output";
    pub const FEATURES_TOOL_CALL: &str = "features.tool_call";
    pub const FEATURES_REASONING: &str = "features.reasoning";
    pub const FEATURES_AVAILABLE: &str = "features.available";
    pub const METADATA: &str = "metadata";
    pub const METADATA_STAR: &str = "metadata.*";
    pub const METADATA_RELEASE_DATE: &str = "metadata.release_date";
    pub const METADATA_LAST_UPDATED: &str = "metadata.last_updated";
    pub const METADATA_KNOWLEDGE_CUTOFF: &str = "metadata.knowledge_cutoff";
    pub const METADATA_OPEN_WEIGHTS: &str = "metadata.open_weights";

    /// Top-level structural field paths the merger iterates per §4.3 step 2.
    ///
    /// Complex structures (`pricing`, `limits`, `features`, `metadata`) are
    /// handled separately by the composition policy (§4.3 step 3) and are not
    /// in this list.
    pub const STRUCTURAL_FIELDS: &[&str] = &[NAME];
}

/// Field paths on a [`crate::model::Provider`].
pub mod provider {
    pub const NAME: &str = "name";
    pub const ENV_VAR: &str = "env_var";
    pub const DOC_URL: &str = "doc_url";

    pub const STRUCTURAL_FIELDS: &[&str] = &[NAME, ENV_VAR, DOC_URL];
}

/// Field paths on a [`crate::model::Author`].
pub mod author {
    pub const NAME: &str = "name";
    pub const HOMEPAGE: &str = "homepage";

    pub const STRUCTURAL_FIELDS: &[&str] = &[NAME, HOMEPAGE];
}
