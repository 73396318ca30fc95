//! Provenance tracking, reporting, auditing, and persistence (§4.5, §6).
mod auditor;
mod persistence;
mod report;
mod tracker;
mod types;

pub use auditor::{audit, AuditResult};
pub use persistence::{from_value, to_value, PersistenceError};
pub use report::{build_report, render, Conflict, FieldReport, ResourceReport};
pub use tracker::ProvenanceTracker;
pub use types::{ProvenanceKey, ProvenanceRecord};
