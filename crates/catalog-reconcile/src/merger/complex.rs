//! Complex-structure composition policy (§4.3 step 3, Design Notes
//! "Complex-structure composition"): per-substructure cross-source
//! overrides that aren't expressible as a single strategy pick.
use crate::ids::SourceId;
use crate::paths::model as p;

/// A fixed priority order of candidate sources for one field path, applied
/// independently of the configured [`crate::strategy::Strategy`].
#[derive(Debug, Clone)]
pub struct ComplexOverride {
    pub path: &'static str,
    pub source_order: Vec<SourceId>,
}

/// `features`'s live-capability subfields come from the provider-API
/// source; its derived subfields (modalities) prefer the provider-API
/// source too when it supplies one, falling back to the community
/// database otherwise (§4.3 step 3; §8's three-source scenario expects
/// `modalities.input` from `providers` when it's the only source that
/// supplies it).
pub fn features_overrides() -> Vec<ComplexOverride> {
    vec![
        ComplexOverride {
            path: p::FEATURES_TOOL_CALL,
            source_order: vec![SourceId::Providers],
        },
        ComplexOverride {
            path: p::FEATURES_REASONING,
            source_order: vec![SourceId::Providers],
        },
        ComplexOverride {
            path: p::FEATURES_AVAILABLE,
            source_order: vec![SourceId::Providers],
        },
        ComplexOverride {
            path: p::FEATURES_MODALITIES_INPUT,
            source_order: vec![SourceId::Providers, SourceId::ModelsDevHttp, SourceId::ModelsDevGit],
        },
        ComplexOverride {
            path: p::FEATURES_MODALITIES_OUTPUT,
            source_order: vec![SourceId::Providers, SourceId::ModelsDevHttp, SourceId::ModelsDevGit],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn features_overrides_cover_every_features_leaf_path() {
        let overrides = features_overrides();
        let paths: Vec<&str> = overrides.iter().map(|o| o.path).collect();
        assert!(paths.contains(&p::FEATURES_TOOL_CALL));
        assert!(paths.contains(&p::FEATURES_MODALITIES_INPUT));
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn modalities_overrides_put_providers_first() {
        let overrides = features_overrides();
        let modalities_input = overrides
            .iter()
            .find(|o| o.path == p::FEATURES_MODALITIES_INPUT)
            .expect("modalities.input override must exist");
        assert_eq!(modalities_input.source_order.first(), Some(&SourceId::Providers));
    }
}
