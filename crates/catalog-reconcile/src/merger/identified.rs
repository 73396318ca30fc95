use crate::model::{Author, Model, Provider};

/// Gives the merger uniform access to a record's id without routing it
/// through [`crate::access::FieldAccess`] — the id is the merge key, not a
/// field merged field-by-field.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Model {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Provider {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Author {
    fn id(&self) -> &str {
        &self.id
    }
}
