//! Domain types reconciled by this crate: models, providers, authors, and
//! the catalog that collects them.
pub mod catalog;
pub mod model;
pub mod provider;

pub use catalog::Catalog;
pub use model::{Features, Limits, Metadata, Model, Modalities, Pricing};
pub use provider::{Author, Provider};
