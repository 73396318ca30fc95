use super::{FieldAccess, FieldValue, FieldWriteError};
use crate::model::model::Model;
use crate::paths::model as p;

fn unknown(path: &str) -> FieldWriteError {
    FieldWriteError {
        path: path.to_owned(),
        message: "unknown field path".to_owned(),
    }
}

fn mismatch(path: &str, expected: &str) -> FieldWriteError {
    FieldWriteError {
        path: path.to_owned(),
        message: format!("expected a {expected} value"),
    }
}

impl FieldAccess for Model {
    fn get_field(&self, path: &str) -> Option<FieldValue> {
        match path {
            p::NAME => Some(FieldValue::Str(self.name.clone())),
            p::PRICING_INPUT_PER_1M => self.pricing.input_per_1m.map(FieldValue::F64),
            p::PRICING_OUTPUT_PER_1M => self.pricing.output_per_1m.map(FieldValue::F64),
            p::PRICING_CACHE_READ_PER_1M => self.pricing.cache_read_per_1m.map(FieldValue::F64),
            p::PRICING_CACHE_WRITE_PER_1M => self.pricing.cache_write_per_1m.map(FieldValue::F64),
            p::LIMITS_CONTEXT_WINDOW => self.limits.context_window.map(FieldValue::U64),
            p::LIMITS_MAX_OUTPUT_TOKENS => self.limits.max_output_tokens.map(FieldValue::U64),
            p::FEATURES_MODALITIES_INPUT => {
                Some(FieldValue::StrSeq(self.features.modalities.input.clone()))
            }
            p::FEATURES_MODALITIES_OUTPUT => {
                Some(FieldValue::StrSeq(self.features.modalities.output.clone()))
            }
            p::FEATURES_TOOL_CALL => self.features.tool_call.map(FieldValue::Bool),
            p::FEATURES_REASONING => self.features.reasoning.map(FieldValue::Bool),
            p::FEATURES_AVAILABLE => self.features.available.map(FieldValue::Bool),
            p::METADATA_RELEASE_DATE => self.metadata.release_date.map(FieldValue::Date),
            p::METADATA_LAST_UPDATED => self.metadata.last_updated.map(FieldValue::Date),
            p::METADATA_KNOWLEDGE_CUTOFF => self.metadata.knowledge_cutoff.map(FieldValue::Date),
            p::METADATA_OPEN_WEIGHTS => self.metadata.open_weights.map(FieldValue::Bool),
            _ => None,
        }
    }

    fn set_field(&mut self, path: &str, value: FieldValue) -> Result<(), FieldWriteError> {
        match path {
            p::NAME => {
                self.name = value.as_str().ok_or_else(|| mismatch(path, "string"))?.to_owned();
            }
            p::PRICING_INPUT_PER_1M => {
                self.pricing.input_per_1m =
                    Some(value.as_f64().ok_or_else(|| mismatch(path, "f64"))?);
            }
            p::PRICING_OUTPUT_PER_1M => {
                self.pricing.output_per_1m =
                    Some(value.as_f64().ok_or_else(|| mismatch(path, "f64"))?);
            }
            p::PRICING_CACHE_READ_PER_1M => {
                self.pricing.cache_read_per_1m =
                    Some(value.as_f64().ok_or_else(|| mismatch(path, "f64"))?);
            }
            p::PRICING_CACHE_WRITE_PER_1M => {
                self.pricing.cache_write_per_1m =
                    Some(value.as_f64().ok_or_else(|| mismatch(path, "f64"))?);
            }
            p::LIMITS_CONTEXT_WINDOW => {
                self.limits.context_window =
                    Some(value.as_u64().ok_or_else(|| mismatch(path, "u64"))?);
            }
            p::LIMITS_MAX_OUTPUT_TOKENS => {
                self.limits.max_output_tokens =
                    Some(value.as_u64().ok_or_else(|| mismatch(path, "u64"))?);
            }
            p::FEATURES_MODALITIES_INPUT => {
                self.features.modalities.input = value
                    .as_str_seq()
                    .ok_or_else(|| mismatch(path, "string sequence"))?
                    .to_vec();
            }
            p::FEATURES_MODALITIES_OUTPUT => {
                self.features.modalities.output = value
                    .as_str_seq()
                    .ok_or_else(|| mismatch(path, "string sequence"))?
                    .to_vec();
            }
            p::FEATURES_TOOL_CALL => {
                self.features.tool_call =
                    Some(value.as_bool().ok_or_else(|| mismatch(path, "bool"))?);
            }
            p::FEATURES_REASONING => {
                self.features.reasoning =
                    Some(value.as_bool().ok_or_else(|| mismatch(path, "bool"))?);
            }
            p::FEATURES_AVAILABLE => {
                self.features.available =
                    Some(value.as_bool().ok_or_else(|| mismatch(path, "bool"))?);
            }
            p::METADATA_RELEASE_DATE => {
                self.metadata.release_date =
                    Some(value.as_date().ok_or_else(|| mismatch(path, "date"))?);
            }
            p::METADATA_LAST_UPDATED => {
                self.metadata.last_updated =
                    Some(value.as_date().ok_or_else(|| mismatch(path, "date"))?);
            }
            p::METADATA_KNOWLEDGE_CUTOFF => {
                self.metadata.knowledge_cutoff =
                    Some(value.as_date().ok_or_else(|| mismatch(path, "date"))?);
            }
            p::METADATA_OPEN_WEIGHTS => {
                self.metadata.open_weights =
                    Some(value.as_bool().ok_or_else(|| mismatch(path, "bool"))?);
            }
            _ => return Err(unknown(path)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    #[allow(clippy::expect_used)]
    fn round_trips_scalar_fields() {
        let mut m = Model::new("gpt-4", Utc::now());
        m.set_field(p::PRICING_INPUT_PER_1M, FieldValue::F64(10.0))
            .expect("set_field should succeed for a known numeric path");
        assert_eq!(m.get_field(p::PRICING_INPUT_PER_1M), Some(FieldValue::F64(10.0)));
    }

    #[test]
    fn get_field_on_absent_value_is_none() {
        let m = Model::new("gpt-4", Utc::now());
        assert_eq!(m.get_field(p::PRICING_INPUT_PER_1M), None);
    }

    #[test]
    fn set_field_on_unknown_path_errors() {
        let mut m = Model::new("gpt-4", Utc::now());
        let err = m.set_field("bogus.path", FieldValue::Bool(true));
        assert!(err.is_err());
    }

    #[test]
    fn set_field_with_wrong_type_errors_without_panicking() {
        let mut m = Model::new("gpt-4", Utc::now());
        let err = m.set_field(p::PRICING_INPUT_PER_1M, FieldValue::Bool(true));
        assert!(err.is_err());
    }
}
