use chrono::NaiveDate;

/// A typed value read from or written to a field path.
///
/// Covers exactly the leaf types present in [`crate::model`]'s substructures
/// plus string sequences for the modality lists.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    F64(f64),
    U64(u64),
    Bool(bool),
    Date(NaiveDate),
    StrSeq(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str_seq(&self) -> Option<&[String]> {
        match self {
            FieldValue::StrSeq(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// `true` for the "non-zero value" gate the merger applies when
    /// collecting candidates (§4.3 step 2): empty strings, empty sequences,
    /// and `false` booleans still count as present values here — only the
    /// candidate-gathering step filters those out per field semantics.
    pub fn is_empty_display(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::StrSeq(v) => v.is_empty(),
            _ => false,
        }
    }
}
