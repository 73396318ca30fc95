//! The `Provider` and `Author` records.
//!
//! Unlike [`Model`], these carry no `created_at`/`updated_at`: the
//! timestamp-preservation rule in §4.3 step 4 is worked through only for
//! models, and this crate doesn't extend it to providers/authors (see
//! DESIGN.md's Open Questions).
use serde::{Deserialize, Serialize};

use super::model::Model;

/// An organization that serves one or more models through an API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_url: Option<String>,
    #[serde(default)]
    pub models: Vec<Model>,
}

impl Provider {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            aliases: Vec::new(),
            env_var: None,
            doc_url: None,
            models: Vec::new(),
        }
    }

    /// `true` if `candidate_id` is this provider's own id or one of its
    /// declared aliases (§4.7/§4.8's alias-lookup and primary-membership
    /// rules).
    pub fn matches_id_or_alias(&self, candidate_id: &str) -> bool {
        self.id == candidate_id || self.aliases.iter().any(|a| a == candidate_id)
    }

    pub fn model(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == model_id)
    }

    pub fn model_mut(&mut self, model_id: &str) -> Option<&mut Model> {
        self.models.iter_mut().find(|m| m.id == model_id)
    }
}

/// The maintainer of an open-weights model, when known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

impl Author {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            homepage: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    #[allow(clippy::expect_used)]
    fn provider_model_lookup_finds_by_id() {
        let now = Utc::now();
        let mut p = Provider::new("openai");
        p.models.push(Model::new("gpt-4", now));
        assert!(p.model("gpt-4").is_some());
        assert!(p.model("gpt-5").is_none());
        p.model_mut("gpt-4").expect("present").name = "GPT-4".to_owned();
        assert_eq!(p.model("gpt-4").expect("present").name, "GPT-4");
    }

    #[test]
    fn matches_id_or_alias_checks_both() {
        let mut p = Provider::new("openai");
        p.aliases.push("open-ai".to_owned());
        assert!(p.matches_id_or_alias("openai"));
        assert!(p.matches_id_or_alias("open-ai"));
        assert!(!p.matches_id_or_alias("anthropic"));
    }
}
