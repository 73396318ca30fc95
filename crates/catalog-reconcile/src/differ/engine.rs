use std::collections::BTreeSet;

use crate::access::FieldAccess;

use super::compare::values_equal;
use super::types::{ChangeKind, Changeset, FieldChange, RecordDiff, UpdatedRecord, truncate_for_display};

/// Compares two lists of records of the same kind by id, producing a
/// [`RecordDiff`] (§4.4).
///
/// `fields` is the fixed list of field paths to compare for change
/// detection, typically a resource kind's full path vocabulary (structural
/// fields plus the leaf paths of its complex structures).
pub fn diff_records<T>(old: &[T], new: &[T], fields: &[&str], id_of: impl Fn(&T) -> &str) -> RecordDiff
where
    T: FieldAccess,
{
    let old_ids: BTreeSet<&str> = old.iter().map(&id_of).collect();
    let new_ids: BTreeSet<&str> = new.iter().map(&id_of).collect();

    let added: Vec<String> = new_ids.difference(&old_ids).map(|s| (*s).to_owned()).collect();
    let removed: Vec<String> = old_ids.difference(&new_ids).map(|s| (*s).to_owned()).collect();

    let mut updated = Vec::new();
    for new_record in new {
        let id = id_of(new_record);
        let Some(old_record) = old.iter().find(|r| id_of(r) == id) else {
            continue;
        };
        let changes = field_changes(old_record, new_record, fields);
        if !changes.is_empty() {
            updated.push(UpdatedRecord {
                id: id.to_owned(),
                changes,
            });
        }
    }

    let mut diff = RecordDiff {
        added,
        removed,
        updated,
    };
    diff.added.sort();
    diff.removed.sort();
    diff.updated.sort_by(|a, b| a.id.cmp(&b.id));
    diff
}

fn field_changes<T: FieldAccess>(old: &T, new: &T, fields: &[&str]) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    for &path in fields {
        let old_value = old.get_field(path);
        let new_value = new.get_field(path);
        let kind = match (&old_value, &new_value) {
            (None, Some(_)) => Some(ChangeKind::Added),
            (Some(_), None) => Some(ChangeKind::Removed),
            (Some(a), Some(b)) if !values_equal(a, b) => Some(ChangeKind::Updated),
            _ => None,
        };
        if let Some(kind) = kind {
            changes.push(FieldChange {
                path: path.to_owned(),
                old_value: old_value.map(|v| truncate_for_display(&display(&v))),
                new_value: new_value.map(|v| truncate_for_display(&display(&v))),
                kind,
            });
        }
    }
    changes
}

fn display(value: &crate::access::FieldValue) -> String {
    use crate::access::FieldValue;
    match value {
        FieldValue::Str(s) => s.clone(),
        FieldValue::F64(v) => v.to_string(),
        FieldValue::U64(v) => v.to_string(),
        FieldValue::Bool(v) => v.to_string(),
        FieldValue::Date(v) => v.to_string(),
        FieldValue::StrSeq(v) => v.join(","),
    }
}

/// Compares full catalogs, producing a [`Changeset`] covering all three
/// resource kinds.
pub fn diff_catalog(
    old: &crate::model::Catalog,
    new: &crate::model::Catalog,
) -> Changeset {
    use crate::paths::{author as a, model as m, provider as pr};

    let mut model_fields: Vec<&str> = m::STRUCTURAL_FIELDS.to_vec();
    model_fields.extend_from_slice(&[
        m::PRICING_INPUT_PER_1M,
        m::PRICING_OUTPUT_PER_1M,
        m::PRICING_CACHE_READ_PER_1M,
        m::PRICING_CACHE_WRITE_PER_1M,
        m::LIMITS_CONTEXT_WINDOW,
        m::LIMITS_MAX_OUTPUT_TOKENS,
        m::FEATURES_MODALITIES_INPUT,
        m::FEATURES_MODALITIES_OUTPUT,
        m::FEATURES_TOOL_CALL,
        m::FEATURES_REASONING,
        m::FEATURES_AVAILABLE,
        m::METADATA_RELEASE_DATE,
        m::METADATA_LAST_UPDATED,
        m::METADATA_KNOWLEDGE_CUTOFF,
        m::METADATA_OPEN_WEIGHTS,
    ]);

    let old_models: Vec<_> = old.all_models().map(|(_, model)| model.clone()).collect();
    let new_models: Vec<_> = new.all_models().map(|(_, model)| model.clone()).collect();
    let models = diff_records(&old_models, &new_models, &model_fields, |m| m.id.as_str());

    let provider_fields: Vec<&str> = pr::STRUCTURAL_FIELDS.to_vec();
    let providers = diff_records(&old.providers, &new.providers, &provider_fields, |p| p.id.as_str());

    let author_fields: Vec<&str> = a::STRUCTURAL_FIELDS.to_vec();
    let authors = diff_records(&old.authors, &new.authors, &author_fields, |author| author.id.as_str());

    Changeset {
        models,
        providers,
        authors,
        summary: Default::default(),
    }
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Limits, Model};
    use chrono::Utc;
    use proptest::prelude::*;

    fn model_with_context_window(id: &str, ctx: u64) -> Model {
        let mut m = Model::new(id, Utc::now());
        m.limits = Limits {
            context_window: Some(ctx),
            max_output_tokens: None,
        };
        m
    }

    #[test]
    fn diff_records_classifies_added_updated_removed() {
        let old = vec![
            model_with_context_window("m1", 1000),
            model_with_context_window("m2", 1000),
            model_with_context_window("m3", 1000),
        ];
        let new = vec![
            model_with_context_window("m1", 2000),
            model_with_context_window("m2", 1000),
            model_with_context_window("m4", 1000),
        ];
        let fields = [crate::paths::model::LIMITS_CONTEXT_WINDOW];
        let diff = diff_records(&old, &new, &fields, |m| m.id.as_str());

        assert_eq!(diff.added, vec!["m4".to_owned()]);
        assert_eq!(diff.removed, vec!["m3".to_owned()]);
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.updated[0].id, "m1");
        assert_eq!(diff.updated[0].changes[0].old_value, Some("1000".to_owned()));
        assert_eq!(diff.updated[0].changes[0].new_value, Some("2000".to_owned()));
    }

    #[test]
    fn diff_records_is_idempotent_for_identical_inputs() {
        let records = vec![model_with_context_window("m1", 1000)];
        let fields = [crate::paths::model::LIMITS_CONTEXT_WINDOW];
        let diff = diff_records(&records, &records, &fields, |m| m.id.as_str());
        assert!(diff.is_empty());
    }

    proptest! {
        /// Shuffling the input record lists never changes the diff: added
        /// and removed ids end up sorted ascending regardless of arrival
        /// order (§4.4, §5: "added/updated/removed lists are sorted
        /// ascending by id").
        #[test]
        fn diff_records_output_order_is_independent_of_input_order(
            mut ids in prop::collection::vec(1u32..20, 1..8)
        ) {
            ids.sort_unstable();
            ids.dedup();
            let old: Vec<Model> = ids.iter().map(|i| model_with_context_window(&format!("m{i}"), 1000)).collect();
            let fields = [crate::paths::model::LIMITS_CONTEXT_WINDOW];

            let mut shuffled = old.clone();
            shuffled.reverse();

            let forward = diff_records(&old, &[], &fields, |m| m.id.as_str());
            let reversed = diff_records(&shuffled, &[], &fields, |m| m.id.as_str());
            prop_assert_eq!(forward.removed.clone(), reversed.removed.clone());

            let mut expected = forward.removed.clone();
            expected.sort();
            prop_assert_eq!(forward.removed, expected);
        }
    }
}
