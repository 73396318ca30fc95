//! Source and resource-kind identifiers (data-model.md-equivalent §3).
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque identifier of a data source.
///
/// The four well-known sources are first-class enum arms so that the
/// default authority table (see [`crate::authority::defaults`]) can match on
/// them directly. [`SourceId::Other`] lets a caller register additional
/// sources at runtime without a breaking change to this enum (§3:
/// "New ids may be registered at runtime").
///
/// Serializes as a bare string (its [`SourceId::as_str`] form), matching the
/// wire representation in §6 rather than an externally-tagged enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// Live provider APIs (availability, capability flags).
    Providers,
    /// models.dev, fetched over HTTP.
    ModelsDevHttp,
    /// models.dev, fetched via a Git clone of its data repository.
    ModelsDevGit,
    /// The operator's hand-edited local catalog.
    LocalCatalog,
    /// Any source registered at runtime under a custom id.
    Other(String),
}

impl Serialize for SourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SourceId::parse(&s))
    }
}

impl SourceId {
    /// Returns the wire representation used by the provenance persistence
    /// format and other serialized surfaces (§6: "Source ids on the wire").
    pub fn as_str(&self) -> &str {
        match self {
            SourceId::Providers => "providers",
            SourceId::ModelsDevHttp => "models_dev_http",
            SourceId::ModelsDevGit => "models_dev_git",
            SourceId::LocalCatalog => "local_catalog",
            SourceId::Other(s) => s.as_str(),
        }
    }

    /// Parses a wire-format source id string.
    ///
    /// Unknown strings become [`SourceId::Other`] rather than an error, since
    /// the id space is explicitly extensible.
    pub fn parse(s: &str) -> Self {
        match s {
            "providers" => SourceId::Providers,
            "models_dev_http" => SourceId::ModelsDevHttp,
            "models_dev_git" => SourceId::ModelsDevGit,
            "local_catalog" => SourceId::LocalCatalog,
            other => SourceId::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        SourceId::parse(s)
    }
}

/// The three resource kinds the reconciliation engine operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Model,
    Provider,
    Author,
}

impl ResourceKind {
    /// Returns the wire representation (§6: `"model"`, `"provider"`, `"author"`).
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Model => "model",
            ResourceKind::Provider => "provider",
            ResourceKind::Author => "author",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
