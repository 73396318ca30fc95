//! The reconciliation pipeline (§4.8): orchestrates collection, merging,
//! enhancement, assembly, and diffing into one `reconcile` call.
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::authority::AuthorityTable;
use crate::clock::Clock;
use crate::collector::{self, SourceCatalogs};
use crate::differ::{self, Changeset};
use crate::enhancer::Enhancer;
use crate::error::{ConfigurationError, ReconcileError, ResourceError};
use crate::ids::{ResourceKind, SourceId};
use crate::merger;
use crate::model::{Author, Catalog, Model, Provider};
use crate::provenance::ProvenanceTracker;
use crate::source::FetchContext;
use crate::strategy::{AuthorityStrategy, SourceOrderStrategy, Strategy};

/// Which [`Strategy`] implementation a reconciliation run resolves fields
/// with (§4.2 names two: authority and source-order).
///
/// A fresh [`Strategy`] instance is built per resource kind at reconcile
/// time, since [`AuthorityStrategy`] is scoped to one [`ResourceKind`].
pub enum StrategyChoice {
    Authority(AuthorityTable),
    SourceOrder(Vec<SourceId>),
}

impl StrategyChoice {
    fn build(&self, kind: ResourceKind) -> Box<dyn Strategy> {
        match self {
            StrategyChoice::Authority(table) => Box::new(AuthorityStrategy::new(table.clone(), kind)),
            StrategyChoice::SourceOrder(order) => Box::new(SourceOrderStrategy::new(order.clone())),
        }
    }

    /// A short identifier for the strategy in use, recorded in
    /// [`RunMetadata::strategy`].
    fn label(&self) -> &'static str {
        match self {
            StrategyChoice::Authority(_) => "authority",
            StrategyChoice::SourceOrder(_) => "source_order",
        }
    }
}

/// Configuration a [`Reconciler`] is built from (§6).
///
/// Only the primary source being unknown or a required source being
/// missing are validated at construction time (§6: "only missing
/// sources/unknown primary id are initialize-time errors").
pub struct ReconcilerConfig {
    pub primary: SourceId,
    pub sources: Vec<SourceId>,
    pub authorities: StrategyChoice,
    pub enhancers: Vec<Box<dyn Enhancer>>,
    pub provenance_tracking: bool,
    pub baseline: Option<Catalog>,
    pub restrict_to_primary_providers: bool,
    /// When set, the run still executes in full but callers may skip acting
    /// on its result (§4.8 step 7, "dry-run flag"). Recorded on
    /// [`RunMetadata`] so callers can tell a dry run's result apart from one
    /// meant to be persisted.
    pub dry_run: bool,
}

impl ReconcilerConfig {
    pub fn new(primary: SourceId, sources: Vec<SourceId>, authorities: StrategyChoice) -> Self {
        Self {
            primary,
            sources,
            authorities,
            enhancers: Vec::new(),
            provenance_tracking: true,
            baseline: None,
            restrict_to_primary_providers: true,
            dry_run: false,
        }
    }
}

/// Per-provider outcome counts and any non-fatal error the provider's merge
/// step hit (§4.8 step 5: "per-provider model-reconciliation errors
/// captured non-fatally").
#[derive(Debug, Default)]
pub struct ProviderOutcome {
    pub model_count_from_primary: usize,
    pub error: Option<ResourceError>,
}

/// Run metadata attached to a [`ReconciliationResult`] (§4.8 step 7:
/// "metadata (sources, strategy, dry-run flag, timing, statistics:
/// providers processed, models processed, total time)").
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration: chrono::Duration,
    pub primary: SourceId,
    pub sources_used: Vec<SourceId>,
    pub strategy: &'static str,
    pub dry_run: bool,
    pub providers_processed: usize,
    pub models_processed: usize,
}

/// The full output of one `reconcile` call (§4.8 step 7, "assemble
/// result").
#[derive(Debug)]
pub struct ReconciliationResult {
    pub catalog: Catalog,
    pub changeset: Changeset,
    pub provenance: ProvenanceTracker,
    pub provider_outcomes: BTreeMap<String, ProviderOutcome>,
    pub model_to_provider: BTreeMap<String, String>,
    pub metadata: RunMetadata,
}

/// Orchestrates one reconciliation run across a fixed set of per-source
/// catalogs (§4.8).
pub struct Reconciler {
    config: ReconcilerConfig,
    clock: Box<dyn Clock>,
}

impl Reconciler {
    /// Builds a reconciler, validating that the configured primary source
    /// is among `config.sources` (§4.8 step 1).
    pub fn new(config: ReconcilerConfig, clock: Box<dyn Clock>) -> Result<Self, ReconcileError> {
        if !config.sources.contains(&config.primary) {
            return Err(ReconcileError::UnknownPrimarySource(config.primary.to_string()));
        }
        Ok(Self { config, clock })
    }

    /// Runs the full pipeline against the supplied per-source catalogs
    /// (§4.8 steps 1–7), with no cancellation support.
    pub fn reconcile(&self, catalogs: &SourceCatalogs<'_>) -> Result<ReconciliationResult, ReconcileError> {
        self.reconcile_with(catalogs, None)
    }

    /// Runs the full pipeline, polling `ctx` between enhancer invocations
    /// and between providers (§5). If cancelled partway, the enhancer
    /// pipeline stops early for the provider being processed at that
    /// moment, no further providers are started, and authors are carried
    /// over from the baseline rather than freshly merged. The partial
    /// catalog assembled up to that point is returned inside
    /// `Err(ReconcileError::Cancelled(result))` rather than discarded.
    pub fn reconcile_cancellable(
        &self,
        catalogs: &SourceCatalogs<'_>,
        ctx: &FetchContext,
    ) -> Result<ReconciliationResult, ReconcileError> {
        self.reconcile_with(catalogs, Some(ctx))
    }

    fn reconcile_with(
        &self,
        catalogs: &SourceCatalogs<'_>,
        ctx: Option<&FetchContext>,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let started_at = self.clock.now();
        self.initialize(catalogs)?;

        let baseline_catalog = collector::resolve_baseline(catalogs, self.config.baseline.as_ref());
        let baseline_providers: Option<BTreeMap<String, Provider>> = baseline_catalog
            .map(|c| c.providers.iter().map(|p| (p.id.clone(), p.clone())).collect());
        let baseline_authors: Option<BTreeMap<String, Author>> = baseline_catalog
            .map(|c| c.authors.iter().map(|a| (a.id.clone(), a.clone())).collect());

        let mut tracker = if self.config.provenance_tracking {
            ProvenanceTracker::enabled()
        } else {
            ProvenanceTracker::disabled()
        };

        let provider_strategy = self.config.authorities.build(ResourceKind::Provider);
        let by_source_providers = collector::collect_providers(catalogs);
        let (mut merged_providers, provider_errors) = merger::merge_providers(
            &by_source_providers,
            baseline_providers.as_ref(),
            provider_strategy.as_ref(),
            started_at,
            &mut tracker,
        );
        for err in &provider_errors {
            tracing::warn!(provider = %err.id, error = %err, "provider field merge skipped");
        }

        if self.config.restrict_to_primary_providers {
            merged_providers = self.filter_to_primary(merged_providers, catalogs);
        }

        let model_strategy = self.config.authorities.build(ResourceKind::Model);
        let mut provider_outcomes = BTreeMap::new();
        let mut model_to_provider = BTreeMap::new();
        let mut stopped_early = false;

        for provider in &mut merged_providers {
            if ctx.is_some_and(FetchContext::is_cancelled) {
                stopped_early = true;
                break;
            }

            let by_source_models =
                collector::collect_models_for_provider(catalogs, &provider.id, Some(&self.config.primary));
            let api_model_count = by_source_models.get(&self.config.primary).map_or(0, Vec::len);

            let baseline_models: Option<BTreeMap<String, Model>> = baseline_catalog
                .and_then(|c| c.providers.iter().find(|p| p.id == provider.id))
                .map(|p| p.models.iter().map(|m| (m.id.clone(), m.clone())).collect());

            let (merged_models, model_errors) = merger::merge_models(
                &by_source_models,
                baseline_models.as_ref(),
                model_strategy.as_ref(),
                started_at,
                &mut tracker,
            );
            let enhanced = crate::enhancer::run_pipeline(
                &self.config.enhancers,
                merged_models,
                started_at,
                Some(&mut tracker),
                ctx,
            );

            for model in &enhanced {
                model_to_provider.insert(model.id.clone(), provider.id.clone());
            }
            provider.models = enhanced;

            provider_outcomes.insert(
                provider.id.clone(),
                ProviderOutcome {
                    model_count_from_primary: api_model_count,
                    error: model_errors.into_iter().next(),
                },
            );
        }

        let cancelled = stopped_early || ctx.is_some_and(FetchContext::is_cancelled);

        let (merged_authors, author_errors) = if cancelled {
            (
                baseline_authors.map(|b| b.into_values().collect()).unwrap_or_default(),
                Vec::new(),
            )
        } else {
            let author_strategy = self.config.authorities.build(ResourceKind::Author);
            let by_source_authors = collect_authors(catalogs);
            merger::merge_authors(
                &by_source_authors,
                baseline_authors.as_ref(),
                author_strategy.as_ref(),
                started_at,
                &mut tracker,
            )
        };
        for err in &author_errors {
            tracing::warn!(author = %err.id, error = %err, "author field merge skipped");
        }

        let catalog = Catalog {
            providers: merged_providers,
            authors: merged_authors,
        };

        let empty_baseline = Catalog::new();
        let changeset = differ::diff_catalog(baseline_catalog.unwrap_or(&empty_baseline), &catalog);

        let ended_at = self.clock.now();
        let providers_processed = catalog.providers.len();
        let models_processed = catalog.all_models().count();

        let result = ReconciliationResult {
            catalog,
            changeset,
            provenance: tracker,
            provider_outcomes,
            model_to_provider,
            metadata: RunMetadata {
                started_at,
                ended_at,
                duration: ended_at - started_at,
                primary: self.config.primary.clone(),
                sources_used: self.config.sources.clone(),
                strategy: self.config.authorities.label(),
                dry_run: self.config.dry_run,
                providers_processed,
                models_processed,
            },
        };

        if cancelled {
            return Err(ReconcileError::Cancelled(Box::new(result)));
        }
        Ok(result)
    }

    /// Validates that every configured source is present in `catalogs` and
    /// that the primary produced a non-`None` catalog (§4.8 step 1).
    fn initialize(&self, catalogs: &SourceCatalogs<'_>) -> Result<(), ReconcileError> {
        for source in &self.config.sources {
            if !catalogs.contains_key(source) {
                return Err(ReconcileError::MissingSource(source.to_string()));
            }
        }
        match catalogs.get(&self.config.primary) {
            Some(Some(_)) => Ok(()),
            _ => Err(ReconcileError::PrimarySourceUnavailable(self.config.primary.to_string())),
        }
    }

    /// Drops any provider not present (by id or alias) in the primary
    /// source's catalog (§4.8 step 2, "filter providers by primary
    /// membership").
    fn filter_to_primary(&self, providers: Vec<Provider>, catalogs: &SourceCatalogs<'_>) -> Vec<Provider> {
        let Some(Some(primary_catalog)) = catalogs.get(&self.config.primary) else {
            return providers;
        };
        providers
            .into_iter()
            .filter(|p| {
                primary_catalog
                    .providers
                    .iter()
                    .any(|pp| pp.matches_id_or_alias(&p.id) || p.matches_id_or_alias(&pp.id))
            })
            .collect()
    }
}

fn collect_authors(catalogs: &SourceCatalogs<'_>) -> BTreeMap<SourceId, Vec<Author>> {
    catalogs
        .iter()
        .filter_map(|(source, catalog)| catalog.map(|c| (source.clone(), c.authors.clone())))
        .collect()
}

/// Rejects an empty source list before it reaches [`Reconciler::new`]'s
/// primary-membership check, which would otherwise report a confusing
/// "unknown primary" for what is really a configuration error.
pub fn require_non_empty_sources(sources: &[SourceId]) -> Result<(), ConfigurationError> {
    if sources.is_empty() {
        return Err(ConfigurationError {
            component: "ReconcilerConfig".to_owned(),
            message: "at least one source must be configured".to_owned(),
        });
    }
    Ok(())
}
