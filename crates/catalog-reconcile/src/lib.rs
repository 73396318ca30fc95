//! Field-level reconciliation engine for multi-source AI model catalogs.
//!
//! Given the same logical catalog reported differently by several sources
//! (live provider APIs, the community model database, a hand-edited local
//! file), this crate merges them into one catalog field-by-field, tracks
//! which source won each field and why, and computes a structural diff
//! against whatever catalog existed before.
//!
//! The [`reconciler::Reconciler`] is the entry point; everything else is a
//! stage in its pipeline (§4.8).

#![warn(missing_debug_implementations)]

pub mod access;
pub mod authority;
pub mod clock;
pub mod collector;
pub mod differ;
pub mod enhancer;
pub mod error;
pub mod ids;
pub mod merger;
pub mod model;
pub mod paths;
pub mod provenance;
pub mod reconciler;
pub mod source;
pub mod strategy;

pub use clock::{Clock, SystemClock};
pub use error::ReconcileError;
pub use ids::{ResourceKind, SourceId};
pub use model::{Author, Catalog, Model, Provider};
pub use reconciler::{Reconciler, ReconcilerConfig, ReconciliationResult, StrategyChoice};
pub use source::{FetchContext, FetchOptions, Source, SourceRegistry};
