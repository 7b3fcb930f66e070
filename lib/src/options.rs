//! Option types that replace boolean flag parameters in the Rust API.

/// Controls what happens to a relation that carries fields outside the
/// relation shape.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum UnknownFields {
    /// Drop the whole relation and keep reading.
    #[default]
    Drop,
    /// Decode the known fields and keep the relation.
    Ignore,
}

impl UnknownFields {
    pub fn is_drop(self) -> bool {
        matches!(self, UnknownFields::Drop)
    }
}

impl From<bool> for UnknownFields {
    /// `true` means keep relations with unknown fields.
    fn from(keep: bool) -> Self {
        if keep {
            UnknownFields::Ignore
        } else {
            UnknownFields::Drop
        }
    }
}
