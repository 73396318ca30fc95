//! The `Source` contract (§6): what a data source must provide to
//! participate in reconciliation, plus the registry that holds them and the
//! in-memory fixture used by tests (§1, "Supplemented features").
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::SourceError;
use crate::ids::SourceId;
use crate::model::Catalog;

/// A typed option value recognized by [`FetchOptions`] (§6).
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

/// Options controlling a single `Source::fetch` call.
///
/// Unknown option keys passed to [`FetchOptions::with`] are accepted and
/// stored; a source that doesn't recognize a key simply ignores it (§6:
/// "unknown options tolerated").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOptions {
    values: HashMap<String, OptionValue>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn provider_filter(self, provider_id: impl Into<String>) -> Self {
        self.with("provider_filter", OptionValue::Str(provider_id.into()))
    }

    #[must_use]
    pub fn fresh(self, fresh: bool) -> Self {
        self.with("fresh", OptionValue::Bool(fresh))
    }

    #[must_use]
    pub fn safe_mode(self, safe_mode: bool) -> Self {
        self.with("safe_mode", OptionValue::Bool(safe_mode))
    }

    #[must_use]
    pub fn cleanup_repo(self, cleanup_repo: bool) -> Self {
        self.with("cleanup_repo", OptionValue::Bool(cleanup_repo))
    }

    #[must_use]
    pub fn reformat(self, reformat: bool) -> Self {
        self.with("reformat", OptionValue::Bool(reformat))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn bool_flag(&self, key: &str) -> bool {
        matches!(self.values.get(key), Some(OptionValue::Bool(true)))
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Shared, cooperative state one `reconcile` call threads through every
/// source fetch (§5: "cooperative cancellation flag").
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    cancelled: Arc<std::sync::atomic::AtomicBool>,
}

impl FetchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(std::sync::atomic::Ordering::SeqCst)
    }
}

/// One data source participating in reconciliation (§6).
///
/// `fetch` populates the source's internal catalog; `catalog` exposes
/// whatever was last fetched (`None` before the first successful fetch, or
/// if the fetch failed). Sources that can be skipped without aborting a
/// reconciliation advertise `is_optional() == true`.
#[async_trait]
pub trait Source: Send + Sync {
    fn id(&self) -> SourceId;
    fn name(&self) -> &str;
    async fn fetch(&self, ctx: &FetchContext, options: &FetchOptions) -> Result<(), SourceError>;
    fn catalog(&self) -> Option<Catalog>;
    fn cleanup(&self) {}
    fn dependencies(&self) -> &[SourceId] {
        &[]
    }
    fn is_optional(&self) -> bool {
        false
    }
}

/// An in-memory source fixture that always reports a preloaded catalog
/// (§1, "Supplemented features": a concrete fixture for tests, since actual
/// source implementations are out of scope).
#[derive(Debug, Clone)]
pub struct StaticSource {
    id: SourceId,
    name: String,
    catalog: Catalog,
    optional: bool,
}

impl StaticSource {
    pub fn new(id: SourceId, name: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            id,
            name: name.into(),
            catalog,
            optional: false,
        }
    }

    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

#[async_trait]
impl Source for StaticSource {
    fn id(&self) -> SourceId {
        self.id.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, _ctx: &FetchContext, _options: &FetchOptions) -> Result<(), SourceError> {
        Ok(())
    }

    fn catalog(&self) -> Option<Catalog> {
        Some(self.catalog.clone())
    }

    fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Process-wide registry of available sources, keyed by id (Design Notes,
/// "`SourceRegistry` via `std::sync::RwLock`").
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: RwLock<HashMap<SourceId, Arc<dyn Source>>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, source: Arc<dyn Source>) {
        let mut sources = self.sources.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        sources.insert(source.id(), source);
    }

    pub fn get(&self, id: &SourceId) -> Option<Arc<dyn Source>> {
        let sources = self.sources.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        sources.get(id).cloned()
    }

    pub fn ids(&self) -> Vec<SourceId> {
        let sources = self.sources.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        let mut ids: Vec<SourceId> = sources.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> FetchContext {
        FetchContext::new()
    }

    #[test]
    fn fetch_context_cancellation_is_observable() {
        let c = ctx();
        assert!(!c.is_cancelled());
        c.cancel();
        assert!(c.is_cancelled());
    }

    #[test]
    fn fetch_options_round_trip_known_builders() {
        let options = FetchOptions::new().provider_filter("openai").fresh(true);
        assert_eq!(options.str_value("provider_filter"), Some("openai"));
        assert!(options.bool_flag("fresh"));
        assert!(!options.bool_flag("safe_mode"));
    }

    #[test]
    fn fetch_options_tolerates_unknown_keys() {
        let options = FetchOptions::new().with("made_up_key", OptionValue::Bool(true));
        assert!(options.bool_flag("made_up_key"));
    }

    #[test]
    fn static_source_reports_its_preloaded_catalog() {
        let source = StaticSource::new(SourceId::LocalCatalog, "local", Catalog::new());
        assert!(source.catalog().is_some());
        assert!(!source.is_optional());
    }

    #[test]
    fn registry_round_trips_sources_by_id() {
        let registry = SourceRegistry::new();
        let source = Arc::new(StaticSource::new(SourceId::Providers, "providers", Catalog::new()));
        registry.register(source);
        assert!(registry.get(&SourceId::Providers).is_some());
        assert_eq!(registry.ids(), vec![SourceId::Providers]);
    }
}
