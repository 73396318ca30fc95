use super::report::ResourceReport;

/// Validates the completeness of a provenance report (§1, "Supplemented
/// features": a concrete completeness-check API the distilled spec names
/// but never describes the shape of).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditResult {
    /// Authority scores observed outside `[0.0, 1.0]`, as `(field, score)`.
    pub out_of_range_scores: Vec<(String, f64)>,
    /// Fields from the required list that no resource has any history for.
    pub missing_required_fields: Vec<String>,
    /// Count of fields with at least one unresolved conflict.
    pub unresolved_conflict_count: usize,
}

impl AuditResult {
    pub fn is_clean(&self) -> bool {
        self.out_of_range_scores.is_empty()
            && self.missing_required_fields.is_empty()
            && self.unresolved_conflict_count == 0
    }
}

/// Checks a report's authority scores, required-field coverage, and
/// outstanding conflicts.
pub fn audit(reports: &[ResourceReport], required_fields: &[&str]) -> AuditResult {
    let mut out_of_range_scores = Vec::new();
    let mut unresolved_conflict_count = 0;
    let mut covered_fields: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();

    for resource in reports {
        for field in &resource.fields {
            covered_fields.insert(field.field.as_str());
            for record in &field.history {
                if !(0.0..=1.0).contains(&record.authority) {
                    out_of_range_scores.push((field.field.clone(), record.authority));
                }
            }
            if !field.conflicts.is_empty() {
                unresolved_conflict_count += 1;
            }
        }
    }

    let missing_required_fields: Vec<String> = required_fields
        .iter()
        .filter(|f| !covered_fields.contains(*f))
        .map(|f| (*f).to_owned())
        .collect();

    AuditResult {
        out_of_range_scores,
        missing_required_fields,
        unresolved_conflict_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ResourceKind;
    use crate::provenance::report::FieldReport;

    fn field(name: &str) -> FieldReport {
        FieldReport {
            field: name.to_owned(),
            history: vec![],
            conflicts: vec![],
        }
    }

    #[test]
    fn clean_report_covering_required_fields_is_clean() {
        let reports = vec![ResourceReport {
            kind: ResourceKind::Model,
            id: "gpt-4".to_owned(),
            fields: vec![field("name"), field("pricing.input_per_1m")],
        }];
        let result = audit(&reports, &["name", "pricing.input_per_1m"]);
        assert!(result.is_clean());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let reports = vec![ResourceReport {
            kind: ResourceKind::Model,
            id: "gpt-4".to_owned(),
            fields: vec![field("name")],
        }];
        let result = audit(&reports, &["name", "pricing.input_per_1m"]);
        assert_eq!(result.missing_required_fields, vec!["pricing.input_per_1m".to_owned()]);
        assert!(!result.is_clean());
    }
}
