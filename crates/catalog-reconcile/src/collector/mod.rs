//! Gathers per-source catalogs into the flat per-provider, per-model shape
//! the merger expects (§4.7).
use std::collections::BTreeMap;

use crate::ids::SourceId;
use crate::model::{Catalog, Model, Provider};

/// One source's reported catalog, or `None` if that source produced
/// nothing (unreachable, disabled, or not yet fetched).
pub type SourceCatalogs<'a> = BTreeMap<SourceId, Option<&'a Catalog>>;

/// Collects the list of providers each source reports (§4.7:
/// "collect_providers: source -> providers list").
pub fn collect_providers(catalogs: &SourceCatalogs<'_>) -> BTreeMap<SourceId, Vec<Provider>> {
    catalogs
        .iter()
        .filter_map(|(source, catalog)| catalog.map(|c| (source.clone(), c.providers.clone())))
        .collect()
}

/// Collects the models one provider owns, across every source.
///
/// For a non-primary source, when a primary source is configured, this
/// also scans that source's full catalog for models served by the
/// primary's matching provider that weren't already collected directly
/// under this provider id/alias (§4.7: "for non-primary sources ... also
/// scan all-models view for models served by primary's provider P not
/// already collected").
///
/// When a primary source is configured and it serves this provider, every
/// source's contribution is then restricted to model ids the primary
/// actually serves for that provider: a secondary source's extra models
/// are discarded rather than merged in (§8, "primary filter drops unknown
/// models").
pub fn collect_models_for_provider(
    catalogs: &SourceCatalogs<'_>,
    provider_id: &str,
    primary: Option<&SourceId>,
) -> BTreeMap<SourceId, Vec<Model>> {
    let mut by_source: BTreeMap<SourceId, Vec<Model>> = BTreeMap::new();

    for (source, catalog) in catalogs {
        let Some(catalog) = catalog else { continue };
        if let Some(provider) = find_provider(catalog, provider_id) {
            by_source.insert(source.clone(), provider.models.clone());
        }
    }

    let Some(primary) = primary else {
        return by_source;
    };
    let Some(primary_catalog) = catalogs.get(primary).copied().flatten() else {
        return by_source;
    };
    let Some(primary_provider) = find_provider(primary_catalog, provider_id) else {
        return by_source;
    };
    // The primary's own model list is the source of truth for "which models
    // belong to provider P" when scanning a secondary source's differently
    // grouped catalog (§4.7), and for discarding models no source should
    // have contributed in the first place (§8).
    let primary_model_ids: std::collections::BTreeSet<&str> =
        primary_provider.models.iter().map(|m| m.id.as_str()).collect();

    for (source, catalog) in catalogs {
        if source == primary {
            continue;
        }
        let Some(catalog) = catalog else { continue };
        let already: std::collections::BTreeSet<&str> = by_source
            .get(source)
            .into_iter()
            .flatten()
            .map(|m| m.id.as_str())
            .collect();

        let extra: Vec<Model> = catalog
            .all_models()
            .filter(|(_, m)| primary_model_ids.contains(m.id.as_str()) && !already.contains(m.id.as_str()))
            .map(|(_, m)| m.clone())
            .collect();

        if !extra.is_empty() {
            by_source.entry(source.clone()).or_default().extend(extra);
        }
    }

    for (source, models) in &mut by_source {
        if source == primary {
            continue;
        }
        models.retain(|m| primary_model_ids.contains(m.id.as_str()));
    }

    by_source
}

fn find_provider<'a>(catalog: &'a Catalog, provider_id: &str) -> Option<&'a Provider> {
    catalog.providers.iter().find(|p| p.matches_id_or_alias(provider_id))
}

/// Resolves the baseline catalog to diff and seed the merge against: the
/// caller-supplied baseline if given, otherwise the first source (in key
/// order) that produced a non-`None` catalog (§4.7, §9's resolved Open
/// Question: "first-source-catalog fallback uniformly").
pub fn resolve_baseline<'a>(catalogs: &'a SourceCatalogs<'a>, supplied: Option<&'a Catalog>) -> Option<&'a Catalog> {
    supplied.or_else(|| catalogs.values().find_map(|c| *c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn provider_with_model(id: &str, model_id: &str) -> Provider {
        let mut p = Provider::new(id);
        p.models.push(Model::new(model_id, Utc::now()));
        p
    }

    #[test]
    fn collect_providers_skips_sources_with_no_catalog() {
        let c1 = Catalog {
            providers: vec![Provider::new("openai")],
            authors: vec![],
        };
        let catalogs: SourceCatalogs<'_> = [
            (SourceId::LocalCatalog, Some(&c1)),
            (SourceId::ModelsDevHttp, None),
        ]
        .into_iter()
        .collect();

        let collected = collect_providers(&catalogs);
        assert_eq!(collected.len(), 1);
        assert!(collected.contains_key(&SourceId::LocalCatalog));
    }

    #[test]
    fn collect_models_for_provider_finds_by_alias() {
        let mut provider = Provider::new("openai");
        provider.aliases.push("open-ai".to_owned());
        provider.models.push(Model::new("gpt-4", Utc::now()));
        let catalog = Catalog {
            providers: vec![provider],
            authors: vec![],
        };
        let catalogs: SourceCatalogs<'_> = [(SourceId::LocalCatalog, Some(&catalog))].into_iter().collect();

        let models = collect_models_for_provider(&catalogs, "open-ai", None);
        assert_eq!(models.get(&SourceId::LocalCatalog).map(Vec::len), Some(1));
    }

    #[test]
    fn non_primary_source_rescues_models_grouped_under_an_unrelated_provider_bucket() {
        let primary_catalog = Catalog {
            providers: vec![provider_with_model("openai", "gpt-4")],
            authors: vec![],
        };
        // The secondary source has no "openai" provider at all; it files
        // the same model id under an unrelated bucket.
        let secondary_catalog = Catalog {
            providers: vec![provider_with_model("community-mirror", "gpt-4")],
            authors: vec![],
        };
        let catalogs: SourceCatalogs<'_> = [
            (SourceId::Providers, Some(&primary_catalog)),
            (SourceId::ModelsDevHttp, Some(&secondary_catalog)),
        ]
        .into_iter()
        .collect();

        let models = collect_models_for_provider(&catalogs, "openai", Some(&SourceId::Providers));
        let secondary_ids: Vec<&str> = models
            .get(&SourceId::ModelsDevHttp)
            .into_iter()
            .flatten()
            .map(|m| m.id.as_str())
            .collect();
        assert!(secondary_ids.contains(&"gpt-4"));
    }

    #[test]
    fn primary_filter_drops_models_the_primary_does_not_serve() {
        let primary_catalog = Catalog {
            providers: vec![provider_with_model("openai", "m1")],
            authors: vec![],
        };
        let mut secondary_provider = Provider::new("openai");
        secondary_provider.models.push(Model::new("m1", Utc::now()));
        secondary_provider.models.push(Model::new("m99", Utc::now()));
        let secondary_catalog = Catalog {
            providers: vec![secondary_provider],
            authors: vec![],
        };
        let catalogs: SourceCatalogs<'_> = [
            (SourceId::Providers, Some(&primary_catalog)),
            (SourceId::ModelsDevHttp, Some(&secondary_catalog)),
        ]
        .into_iter()
        .collect();

        let models = collect_models_for_provider(&catalogs, "openai", Some(&SourceId::Providers));
        let secondary_ids: Vec<&str> = models
            .get(&SourceId::ModelsDevHttp)
            .into_iter()
            .flatten()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(secondary_ids, vec!["m1"]);
    }

    #[test]
    fn resolve_baseline_falls_back_to_first_available_source_catalog() {
        let c1 = Catalog::new();
        let catalogs: SourceCatalogs<'_> = [
            (SourceId::LocalCatalog, None),
            (SourceId::ModelsDevHttp, Some(&c1)),
        ]
        .into_iter()
        .collect();

        assert!(resolve_baseline(&catalogs, None).is_some());
    }
}
