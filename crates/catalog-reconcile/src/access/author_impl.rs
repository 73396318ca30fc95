use super::{FieldAccess, FieldValue, FieldWriteError};
use crate::model::provider::Author;
use crate::paths::author as p;

impl FieldAccess for Author {
    fn get_field(&self, path: &str) -> Option<FieldValue> {
        match path {
            p::NAME => Some(FieldValue::Str(self.name.clone())),
            p::HOMEPAGE => self.homepage.clone().map(FieldValue::Str),
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
            p::HOMEPAGE => self.homepage = Some(as_str(&value)?),
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
    fn round_trips_homepage() {
        let mut a = Author::new("meta");
        a.set_field("homepage", FieldValue::Str("https://ai.meta.com".to_owned()))
            .expect("set_field should succeed for a known string path");
        assert_eq!(
            a.get_field("homepage"),
            Some(FieldValue::Str("https://ai.meta.com".to_owned()))
        );
    }
}
