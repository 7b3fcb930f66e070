//! Names shared by the relation codec and the inverter.

/// Relation name whose subject and object are swapped.
pub const IDENTIFIER: &str = "identifier";

/// Array field name used for the output container unless configured otherwise.
pub const DEFAULT_FIELD: &str = "relations";

// accepted spellings of the relation fields, json name then proto name
pub const RELATION_FIELDS: [(&str, &str); 6] = [
    ("objectType", "object_type"),
    ("objectId", "object_id"),
    ("relation", "relation"),
    ("subjectType", "subject_type"),
    ("subjectId", "subject_id"),
    ("subjectRelation", "subject_relation"),
];

/// Returns true if `name` is one of the relation fields under either spelling.
pub fn is_relation_field(name: &str) -> bool {
    RELATION_FIELDS
        .iter()
        .any(|(json, proto)| *json == name || *proto == name)
}
