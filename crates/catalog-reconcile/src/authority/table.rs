use crate::ids::{ResourceKind, SourceId};

use super::pattern;

/// A declared preference `(pattern, source, priority)` selecting which
/// source wins a field, scoped to one resource kind (§3: "Authority entry").
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorityEntry {
    pub kind: ResourceKind,
    pub pattern: String,
    pub source: SourceId,
    pub priority: i32,
}

/// The maximum priority value authority scores are linear-mapped from
/// (§4.1: "Authority scores used in provenance are linear-mapped from
/// [0,150] into [0.0,1.0]").
pub const MAX_PRIORITY: f64 = 150.0;

/// Maps `(resource kind, field-path pattern, source) -> priority` and
/// resolves the best match for a concrete field path.
#[derive(Debug, Clone, Default)]
pub struct AuthorityTable {
    entries: Vec<AuthorityEntry>,
}

impl AuthorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<AuthorityEntry>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, entry: AuthorityEntry) {
        self.entries.push(entry);
    }

    /// All authority entries declared for a resource kind, in table order.
    pub fn entries_for(&self, kind: ResourceKind) -> impl Iterator<Item = &AuthorityEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    /// Resolves the best authority for `path` among sources with a
    /// candidate value available, per §4.1's three-step tiebreak:
    /// priority desc, then pattern specificity desc, then table order.
    pub fn resolve<'a>(
        &'a self,
        kind: ResourceKind,
        path: &str,
        available_sources: &[SourceId],
    ) -> Option<&'a AuthorityEntry> {
        self.entries_for(kind)
            .enumerate()
            .filter(|(_, e)| pattern::matches(&e.pattern, path))
            .filter(|(_, e)| available_sources.contains(&e.source))
            .max_by(|(ia, a), (ib, b)| {
                a.priority
                    .cmp(&b.priority)
                    .then_with(|| pattern::specificity(&a.pattern).cmp(&pattern::specificity(&b.pattern)))
                    .then_with(|| ib.cmp(ia))
            })
            // `ib.cmp(ia)` (not `ia.cmp(ib)`) so the earlier table entry, on
            // an otherwise-exact tie, compares as the greater element.
            .map(|(_, e)| e)
    }

    /// Maps a priority (expected in `0..=150`, but not enforced) into a
    /// `[0.0, 1.0]` authority score for provenance records (§4.1).
    pub fn authority_score(priority: i32) -> f64 {
        (f64::from(priority) / MAX_PRIORITY).clamp(0.0, 1.0)
    }
}
