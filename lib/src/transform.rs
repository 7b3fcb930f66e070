//! Per-relation transform applied between the reader and the writer.
//! Only identifier relations are rewritten; every other relation passes
//! through untouched.

use crate::errors::{Error, Result};
use crate::relation::Relation;

/// Moves the identity to the subject side of an identifier relation.
///
/// `user:u1 #identifier @identity:i1` becomes `identity:i1 #identifier @user:u1`.
/// An identifier relation with a subject relation cannot be inverted and is
/// rejected with [`Error::InvariantViolation`].
pub fn invert_identifier(mut relation: Relation) -> Result<Relation> {
    if !relation.is_identifier() {
        return Ok(relation);
    }
    if !relation.subject_relation.is_empty() {
        return Err(Error::InvariantViolation(Box::new(relation)));
    }
    relation.swap();
    Ok(relation)
}
