use super::{FieldAccess, FieldValue, FieldWriteError};
use crate::model::provider::Provider;
use crate::paths::provider as p;

impl FieldAccess for Provider {
    fn get_field(&self, path: &str) -> Option<FieldValue> {
        match path {
            p::NAME => Some(FieldValue::Str(self.name.clone())),
            p::ENV_VAR => self.env_var.clone().map(FieldValue::Str),
            p::DOC_URL => self.doc_url.clone().map(FieldValue::Str),
            _ => None,
        }
    }

    fn set_field(&mut self, path: &str, value: FieldValue) -> Result<(), FieldWriteError> {
        let as_str = |v: &FieldValue| {
            v.as_str().map(ToOwned::to_owned).ok_or_else(|| FieldWriteError {
                path: path.to_owned(),
                message: "expected a string value".to_owned(),
            })
        };
        match path {
            p::NAME => self.name = as_str(&value)?,
            p::ENV_VAR => self.env_var = Some(as_str(&value)?),
            p::DOC_URL => self.doc_url = Some(as_str(&value)?),
            _ => {
                return Err(FieldWriteError {
                    path: path.to_owned(),
                    message: "unknown field path".to_owned(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::expect_used)]
    fn round_trips_name() {
        let mut p = Provider::new("openai");
        p.set_field("name", FieldValue::Str("OpenAI".to_owned()))
            .expect("set_field should succeed for a known string path");
        assert_eq!(p.get_field("name"), Some(FieldValue::Str("OpenAI".to_owned())));
    }
}
