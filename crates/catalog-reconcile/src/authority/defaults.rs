//! Default authority table: pricing/limits/metadata from the community
//! database, live features/availability from provider APIs, hand-edited
//! fields from the local catalog (§4.1).
use crate::ids::{ResourceKind, SourceId};
use crate::paths::{model as m, provider as pr};

use super::table::{AuthorityEntry, AuthorityTable};

/// Builds the default authority table described in §4.1.
pub fn default_table() -> AuthorityTable {
    let mut entries = Vec::new();

    let mut push = |kind, pattern: &str, source: SourceId, priority| {
        entries.push(AuthorityEntry {
            kind,
            pattern: pattern.to_owned(),
            source,
            priority,
        });
    };

    // Pricing/limits/metadata: community database wins.
    push(ResourceKind::Model, m::PRICING_STAR, SourceId::ModelsDevHttp, 110);
    push(ResourceKind::Model, m::PRICING_STAR, SourceId::ModelsDevGit, 100);
    push(ResourceKind::Model, m::LIMITS_STAR, SourceId::ModelsDevHttp, 110);
    push(ResourceKind::Model, m::LIMITS_STAR, SourceId::ModelsDevGit, 100);
    push(ResourceKind::Model, m::METADATA_STAR, SourceId::ModelsDevHttp, 110);
    push(ResourceKind::Model, m::METADATA_STAR, SourceId::ModelsDevGit, 100);

    // Live features/availability: provider APIs win.
    push(ResourceKind::Model, m::FEATURES_TOOL_CALL, SourceId::Providers, 100);
    push(ResourceKind::Model, m::FEATURES_REASONING, SourceId::Providers, 100);
    push(ResourceKind::Model, m::FEATURES_AVAILABLE, SourceId::Providers, 100);
    // In practice these two paths are always resolved through the
    // complex-structure composition policy instead (see
    // `merger::complex::features_overrides`), which also prefers
    // `Providers`; these entries exist so the table stays a complete
    // description of §4.1 on its own.
    push(ResourceKind::Model, m::FEATURES_MODALITIES_INPUT, SourceId::Providers, 100);
    push(ResourceKind::Model, m::FEATURES_MODALITIES_OUTPUT, SourceId::Providers, 100);
    push(ResourceKind::Model, m::FEATURES_MODALITIES_INPUT, SourceId::ModelsDevHttp, 90);
    push(ResourceKind::Model, m::FEATURES_MODALITIES_OUTPUT, SourceId::ModelsDevHttp, 90);

    // Names: provider APIs are authoritative on display name.
    push(ResourceKind::Model, m::NAME, SourceId::Providers, 100);
    push(ResourceKind::Model, m::NAME, SourceId::ModelsDevHttp, 80);

    // Hand-edited fields: local catalog wins everywhere it supplies a value.
    push(ResourceKind::Model, "*", SourceId::LocalCatalog, 70);
    push(ResourceKind::Provider, pr::NAME, SourceId::Providers, 100);
    push(ResourceKind::Provider, pr::ENV_VAR, SourceId::Providers, 100);
    push(ResourceKind::Provider, pr::DOC_URL, SourceId::ModelsDevHttp, 90);
    push(ResourceKind::Provider, "*", SourceId::LocalCatalog, 70);
    push(ResourceKind::Author, "*", SourceId::LocalCatalog, 70);

    AuthorityTable::with_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn pricing_resolves_to_community_database_over_local_catalog() {
        let table = default_table();
        let resolved = table
            .resolve(
                ResourceKind::Model,
                m::PRICING_INPUT_PER_1M,
                &[SourceId::ModelsDevHttp, SourceId::LocalCatalog],
            )
            .expect("pricing should resolve to a known source");
        assert_eq!(resolved.source, SourceId::ModelsDevHttp);
    }

    #[test]
    #[allow(clippy::expect_used)]
    fn tool_call_resolves_to_providers() {
        let table = default_table();
        let resolved = table
            .resolve(
                ResourceKind::Model,
                m::FEATURES_TOOL_CALL,
                &[SourceId::Providers, SourceId::ModelsDevHttp],
            )
            .expect("tool_call should resolve to providers");
        assert_eq!(resolved.source, SourceId::Providers);
    }
}
