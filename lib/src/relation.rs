//! The relation record carried through the stream.

use crate::consts::{is_relation_field, IDENTIFIER};
use crate::errors::{Error, Result};
use crate::options::UnknownFields;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// null decodes the same as an absent field
fn null_as_empty<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// One subject/relation/object edge.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    #[serde(default, alias = "object_type", deserialize_with = "null_as_empty")]
    pub object_type: String,
    #[serde(default, alias = "object_id", deserialize_with = "null_as_empty")]
    pub object_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relation: String,
    #[serde(default, alias = "subject_type", deserialize_with = "null_as_empty")]
    pub subject_type: String,
    #[serde(default, alias = "subject_id", deserialize_with = "null_as_empty")]
    pub subject_id: String,
    #[serde(
        default,
        alias = "subject_relation",
        deserialize_with = "null_as_empty"
    )]
    pub subject_relation: String,
}

impl Relation {
    pub fn new(
        object_type: impl Into<String>,
        object_id: impl Into<String>,
        relation: impl Into<String>,
        subject_type: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Relation {
            object_type: object_type.into(),
            object_id: object_id.into(),
            relation: relation.into(),
            subject_type: subject_type.into(),
            subject_id: subject_id.into(),
            subject_relation: String::new(),
        }
    }

    pub fn with_subject_relation(mut self, subject_relation: impl Into<String>) -> Self {
        self.subject_relation = subject_relation.into();
        self
    }

    pub fn is_identifier(&self) -> bool {
        self.relation == IDENTIFIER
    }

    /// Exchanges the object type/id pair with the subject type/id pair.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.object_type, &mut self.subject_type);
        std::mem::swap(&mut self.object_id, &mut self.subject_id);
    }

    /// Builds a relation from one decoded array element. `index` is the
    /// element's position in the array and only feeds error messages.
    pub(crate) fn from_map(
        map: Map<String, Value>,
        index: u64,
        unknown_fields: UnknownFields,
    ) -> Result<Self> {
        if unknown_fields.is_drop() {
            if let Some(field) = map.keys().find(|k| !is_relation_field(k)) {
                return Err(Error::UnknownField {
                    field: field.clone(),
                    index,
                });
            }
        }
        serde_json::from_value(Value::Object(map)).map_err(Error::Decode)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "object_type:{:?} object_id:{:?} relation:{:?} subject_type:{:?} subject_id:{:?} subject_relation:{:?}",
            self.object_type,
            self.object_id,
            self.relation,
            self.subject_type,
            self.subject_id,
            self.subject_relation
        )
    }
}
