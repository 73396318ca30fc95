//! Structural diff engine (§4.4): computes added/updated/removed changesets
//! between two catalog snapshots.
mod compare;
mod engine;
mod types;

pub use engine::{diff_catalog, diff_records};
pub use types::{
    ChangeKind, Changeset, DiffFilter, DiffSummary, FieldChange, RecordDiff, UpdatedRecord,
    DISPLAY_WIDTH,
};
