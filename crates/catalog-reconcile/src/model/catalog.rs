//! The reconciled catalog: the top-level output of a reconciliation run.
use serde::{Deserialize, Serialize};

use super::provider::{Author, Provider};

/// All providers, authors, and (transitively, through each provider) models
/// produced by a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub authors: Vec<Author>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn provider(&self, provider_id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == provider_id)
    }

    pub fn provider_mut(&mut self, provider_id: &str) -> Option<&mut Provider> {
        self.providers.iter_mut().find(|p| p.id == provider_id)
    }

    pub fn author(&self, author_id: &str) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == author_id)
    }

    pub fn author_mut(&mut self, author_id: &str) -> Option<&mut Author> {
        self.authors.iter_mut().find(|a| a.id == author_id)
    }

    /// Flattened view of every model across every provider, in provider then
    /// model order.
    pub fn all_models(&self) -> impl Iterator<Item = (&Provider, &super::model::Model)> {
        self.providers
            .iter()
            .flat_map(|p| p.models.iter().map(move |m| (p, m)))
    }

    pub fn model_count(&self) -> usize {
        self.providers.iter().map(|p| p.models.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::model::Model;
    use chrono::Utc;

    #[test]
    fn all_models_flattens_across_providers() {
        let now = Utc::now();
        let mut catalog = Catalog::new();
        let mut p1 = Provider::new("openai");
        p1.models.push(Model::new("gpt-4", now));
        p1.models.push(Model::new("gpt-4o", now));
        let mut p2 = Provider::new("anthropic");
        p2.models.push(Model::new("claude-3", now));
        catalog.providers.push(p1);
        catalog.providers.push(p2);

        assert_eq!(catalog.model_count(), 3);
        let ids: Vec<&str> = catalog.all_models().map(|(_, m)| m.id.as_str()).collect();
        assert_eq!(ids, vec!["gpt-4", "gpt-4o", "claude-3"]);
    }

    #[test]
    fn provider_lookup_is_by_id_not_name() {
        let mut catalog = Catalog::new();
        catalog.providers.push(Provider::new("openai"));
        assert!(catalog.provider("openai").is_some());
        assert!(catalog.provider("OpenAI").is_none());
    }
}
