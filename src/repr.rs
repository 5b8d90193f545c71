//! Errors raised by structural access into a tag tree ([`NbtCompound::get_checked`],
//! [`crate::tag::NbtList::get`], ...), as distinct from the wire-decode errors
//! in [`crate::error`].

use std::fmt;

use thiserror::Error;

/// The three ways a caller's expectation about a tag tree's shape can be
/// wrong: a key that isn't there, an index past the end of a list, or a
/// value of the wrong tag type.
///
/// This is the crate's only structural-access error; there is no
/// open-ended "custom" variant, since every accessor in `tag.rs` raises
/// exactly one of these three.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NbtStructureError {
    #[error("missing tag \"{tag_name}\"")]
    MissingTag { tag_name: Box<str> },

    #[error("index out of range: {index} >= {length}")]
    InvalidIndex { index: usize, length: usize },

    #[error("tag type mismatch: expected {expected} but found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl NbtStructureError {
    pub fn missing_tag<T: Into<String>>(tag_name: T) -> Self {
        Self::MissingTag {
            tag_name: tag_name.into().into_boxed_str(),
        }
    }

    pub fn invalid_index(index: usize, length: usize) -> Self {
        Self::InvalidIndex { index, length }
    }

    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }
}

/// Thin wrapper around [`NbtStructureError`], kept as its own type rather
/// than a bare alias so that accessor signatures (`NbtTag::as_i32`,
/// `NbtCompound::get_checked`, ...) read as "tree access can fail" at the
/// type level, distinct from [`crate::error::NbtError`] (which means "this
/// byte buffer or SNBT text failed to decode").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NbtReprError(NbtStructureError);

impl NbtReprError {
    pub fn kind(&self) -> &NbtStructureError {
        &self.0
    }
}

impl From<NbtStructureError> for NbtReprError {
    fn from(error: NbtStructureError) -> Self {
        Self(error)
    }
}

impl fmt::Display for NbtReprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for NbtReprError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tag_message_names_the_key() {
        let err = NbtReprError::from(NbtStructureError::missing_tag("health"));
        assert_eq!(err.to_string(), "missing tag \"health\"");
    }

    #[test]
    fn kind_exposes_the_underlying_variant() {
        let err: NbtReprError = NbtStructureError::invalid_index(3, 2).into();
        assert_eq!(err.kind(), &NbtStructureError::invalid_index(3, 2));
    }
}
