use serde::{Deserialize, Serialize};

/// Kind of change a single field underwent within an updated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Updated,
}

/// A single field-level change within an updated record (§3, "A field
/// change is `(path, old value, new value, change kind)`").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub path: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub kind: ChangeKind,
}

/// Maximum display width for a field change's stringified value before
/// truncation with an ellipsis (§4.4: "String values exceeding a display
/// width (50 characters)").
pub const DISPLAY_WIDTH: usize = 50;

/// Truncates `s` to [`DISPLAY_WIDTH`] characters, appending `...` when
/// truncated. The underlying record is never touched; only the change
/// record's display strings are shortened.
pub fn truncate_for_display(s: &str) -> String {
    if s.chars().count() <= DISPLAY_WIDTH {
        return s.to_owned();
    }
    let truncated: String = s.chars().take(DISPLAY_WIDTH).collect();
    format!("{truncated}...")
}

/// A record that was added, removed, or modified with field changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatedRecord {
    pub id: String,
    pub changes: Vec<FieldChange>,
}

/// Per-kind structural diff: which ids were added, removed, or updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub updated: Vec<UpdatedRecord>,
}

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    fn sort(&mut self) {
        self.added.sort();
        self.removed.sort();
        self.updated.sort_by(|a, b| a.id.cmp(&b.id));
    }
}

/// Summary counts across all kinds in a [`Changeset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
}

/// Structural diff across all three resource kinds (§3, "Changeset").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changeset {
    pub models: RecordDiff,
    pub providers: RecordDiff,
    pub authors: RecordDiff,
    pub summary: DiffSummary,
}

impl Changeset {
    pub(super) fn finish(mut self) -> Self {
        self.models.sort();
        self.providers.sort();
        self.authors.sort();
        self.summary = DiffSummary {
            added: self.models.added.len() + self.providers.added.len() + self.authors.added.len(),
            removed: self.models.removed.len()
                + self.providers.removed.len()
                + self.authors.removed.len(),
            updated: self.models.updated.len()
                + self.providers.updated.len()
                + self.authors.updated.len(),
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty() && self.providers.is_empty() && self.authors.is_empty()
    }
}

/// Which categories of a [`Changeset`] an apply policy retains (§4.4,
/// "filter operation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffFilter {
    All,
    Additive,
    UpdatesOnly,
    AdditionsOnly,
    RemovalsOnly,
}

impl DiffFilter {
    fn keep(self, added: bool, updated: bool, removed: bool) -> (bool, bool, bool) {
        match self {
            DiffFilter::All => (added, updated, removed),
            DiffFilter::Additive => (added, updated, false),
            DiffFilter::UpdatesOnly => (false, updated, false),
            DiffFilter::AdditionsOnly => (added, false, false),
            DiffFilter::RemovalsOnly => (false, false, removed),
        }
    }
}

fn filter_record_diff(diff: &RecordDiff, filter: DiffFilter) -> RecordDiff {
    let (keep_added, keep_updated, keep_removed) = filter.keep(true, true, true);
    RecordDiff {
        added: if keep_added { diff.added.clone() } else { Vec::new() },
        removed: if keep_removed { diff.removed.clone() } else { Vec::new() },
        updated: if keep_updated { diff.updated.clone() } else { Vec::new() },
    }
}

impl Changeset {
    /// Returns a new changeset retaining only the categories `filter` allows.
    pub fn filter(&self, filter: DiffFilter) -> Changeset {
        Changeset {
            models: filter_record_diff(&self.models, filter),
            providers: filter_record_diff(&self.providers, filter),
            authors: filter_record_diff(&self.authors, filter),
            summary: DiffSummary::default(),
        }
        .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_for_display_leaves_short_strings_untouched() {
        assert_eq!(truncate_for_display("short"), "short");
    }

    #[test]
    fn truncate_for_display_appends_ellipsis_past_width() {
        let long = "a".repeat(60);
        let truncated = truncate_for_display(&long);
        assert_eq!(truncated.chars().count(), DISPLAY_WIDTH + 3);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn filter_additions_only_drops_updates_and_removals() {
        let mut cs = Changeset {
            models: RecordDiff {
                added: vec!["m4".to_owned()],
                removed: vec!["m3".to_owned()],
                updated: vec![UpdatedRecord {
                    id: "m1".to_owned(),
                    changes: vec![],
                }],
            },
            ..Default::default()
        }
        .finish();
        cs = cs.filter(DiffFilter::AdditionsOnly);
        assert_eq!(cs.models.added, vec!["m4".to_owned()]);
        assert!(cs.models.removed.is_empty());
        assert!(cs.models.updated.is_empty());
    }
}
