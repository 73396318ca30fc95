use std::collections::BTreeMap;

use crate::access::FieldValue;
use crate::authority::AuthorityTable;
use crate::ids::{ResourceKind, SourceId};

use super::{fallback, ApplyPolicy, Resolution, Strategy};

/// Resolves each field by consulting an [`AuthorityTable`] for the
/// resource kind being merged (§4.2, "authority strategy").
pub struct AuthorityStrategy {
    table: AuthorityTable,
    kind: ResourceKind,
}

impl AuthorityStrategy {
    pub fn new(table: AuthorityTable, kind: ResourceKind) -> Self {
        Self { table, kind }
    }
}

impl Strategy for AuthorityStrategy {
    fn resolve(&self, path: &str, candidates: &BTreeMap<SourceId, FieldValue>) -> Resolution {
        let available: Vec<SourceId> = candidates.keys().cloned().collect();
        if let Some(entry) = self.table.resolve(self.kind, path, &available) {
            if let Some(value) = candidates.get(&entry.source) {
                return Resolution {
                    value: Some(value.clone()),
                    source: Some(entry.source.clone()),
                    reason: format!("selected by authority (priority: {})", entry.priority),
                    authority: Some(AuthorityTable::authority_score(entry.priority)),
                };
            }
        }
        fallback(candidates, "using first non-empty value (no authority match)")
    }

    fn apply_policy(&self) -> ApplyPolicy {
        ApplyPolicy::ADDITIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{AuthorityEntry, AuthorityTable};

    fn candidates(pairs: &[(SourceId, FieldValue)]) -> BTreeMap<SourceId, FieldValue> {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn resolves_via_highest_priority_authority() {
        let table = AuthorityTable::with_entries(vec![
            AuthorityEntry {
                kind: ResourceKind::Model,
                pattern: "pricing.*".to_owned(),
                source: SourceId::ModelsDevHttp,
                priority: 110,
            },
            AuthorityEntry {
                kind: ResourceKind::Model,
                pattern: "pricing.*".to_owned(),
                source: SourceId::ModelsDevGit,
                priority: 100,
            },
        ]);
        let strategy = AuthorityStrategy::new(table, ResourceKind::Model);
        let resolved = strategy.resolve(
            "pricing.input_per_1m",
            &candidates(&[
                (SourceId::ModelsDevHttp, FieldValue::F64(10.0)),
                (SourceId::ModelsDevGit, FieldValue::F64(20.0)),
            ]),
        );
        assert_eq!(resolved.value, Some(FieldValue::F64(10.0)));
        assert_eq!(resolved.source, Some(SourceId::ModelsDevHttp));
        assert!(resolved.reason.contains("authority"));
    }

    #[test]
    fn falls_back_to_first_non_empty_when_no_authority_matches() {
        let strategy = AuthorityStrategy::new(AuthorityTable::new(), ResourceKind::Model);
        let resolved = strategy.resolve(
            "pricing.input_per_1m",
            &candidates(&[(SourceId::LocalCatalog, FieldValue::F64(5.0))]),
        );
        assert_eq!(resolved.value, Some(FieldValue::F64(5.0)));
        assert!(resolved.reason.contains("no authority match"));
    }

    #[test]
    fn empty_candidates_yield_no_value_available() {
        let strategy = AuthorityStrategy::new(AuthorityTable::new(), ResourceKind::Model);
        let resolved = strategy.resolve("pricing.input_per_1m", &BTreeMap::new());
        assert_eq!(resolved.value, None);
        assert_eq!(resolved.source, None);
        assert_eq!(resolved.reason, "no value available");
    }
}
