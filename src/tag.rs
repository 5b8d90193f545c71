//! The in-memory tag tree: [`NbtTag`], and its two container wrappers
//! [`NbtList`] and [`NbtCompound`].

use std::fmt;
use std::slice;
use std::vec;

use indexmap::IndexMap;

use crate::repr::{NbtReprError, NbtStructureError};

/// The wire tag id of a [`NbtTag`] variant.
///
/// `Id::End` is never materialized as a tag value; it only appears as the
/// element type of an empty [`NbtList`] and as the compound terminator on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagId {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagId {
    pub fn from_u8(id: u8) -> Option<Self> {
        Some(match id {
            0 => Self::End,
            1 => Self::Byte,
            2 => Self::Short,
            3 => Self::Int,
            4 => Self::Long,
            5 => Self::Float,
            6 => Self::Double,
            7 => Self::ByteArray,
            8 => Self::String,
            9 => Self::List,
            10 => Self::Compound,
            11 => Self::IntArray,
            12 => Self::LongArray,
            _ => return None,
        })
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// The name used in SNBT error messages and `Debug` output ("BYTE", "LIST", ...).
    pub fn name(self) -> &'static str {
        match self {
            Self::End => "END",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Int => "INT",
            Self::Long => "LONG",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::ByteArray => "BYTE_ARRAY",
            Self::String => "STRING",
            Self::List => "LIST",
            Self::Compound => "COMPOUND",
            Self::IntArray => "INT_ARRAY",
            Self::LongArray => "LONG_ARRAY",
        }
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single NBT value: a tagged sum over the twelve wire payload types.
///
/// Booleans are not a variant — per the data model, a boolean is an
/// input-only convenience that converts into `Byte(0)`/`Byte(1)` via
/// [`From<bool>`]; nothing ever produces a boolean back out of a tag tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(NbtList),
    Compound(NbtCompound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl NbtTag {
    /// The wire tag id of this value. Unlike the language-agnostic
    /// `type_of` in the component design (which can return "not a tag"),
    /// every `NbtTag` is by construction a valid tag, so this is infallible.
    pub fn id(&self) -> TagId {
        match self {
            Self::Byte(_) => TagId::Byte,
            Self::Short(_) => TagId::Short,
            Self::Int(_) => TagId::Int,
            Self::Long(_) => TagId::Long,
            Self::Float(_) => TagId::Float,
            Self::Double(_) => TagId::Double,
            Self::ByteArray(_) => TagId::ByteArray,
            Self::String(_) => TagId::String,
            Self::List(_) => TagId::List,
            Self::Compound(_) => TagId::Compound,
            Self::IntArray(_) => TagId::IntArray,
            Self::LongArray(_) => TagId::LongArray,
        }
    }

    pub fn as_i8(&self) -> Result<i8, NbtReprError> {
        match self {
            Self::Byte(v) => Ok(*v),
            other => Err(mismatch("BYTE", other.id())),
        }
    }

    pub fn as_i16(&self) -> Result<i16, NbtReprError> {
        match self {
            Self::Short(v) => Ok(*v),
            other => Err(mismatch("SHORT", other.id())),
        }
    }

    pub fn as_i32(&self) -> Result<i32, NbtReprError> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(mismatch("INT", other.id())),
        }
    }

    pub fn as_i64(&self) -> Result<i64, NbtReprError> {
        match self {
            Self::Long(v) => Ok(*v),
            other => Err(mismatch("LONG", other.id())),
        }
    }

    pub fn as_f32(&self) -> Result<f32, NbtReprError> {
        match self {
            Self::Float(v) => Ok(*v),
            other => Err(mismatch("FLOAT", other.id())),
        }
    }

    pub fn as_f64(&self) -> Result<f64, NbtReprError> {
        match self {
            Self::Double(v) => Ok(*v),
            other => Err(mismatch("DOUBLE", other.id())),
        }
    }

    pub fn as_str(&self) -> Result<&str, NbtReprError> {
        match self {
            Self::String(v) => Ok(v.as_str()),
            other => Err(mismatch("STRING", other.id())),
        }
    }

    pub fn as_list(&self) -> Result<&NbtList, NbtReprError> {
        match self {
            Self::List(v) => Ok(v),
            other => Err(mismatch("LIST", other.id())),
        }
    }

    pub fn as_compound(&self) -> Result<&NbtCompound, NbtReprError> {
        match self {
            Self::Compound(v) => Ok(v),
            other => Err(mismatch("COMPOUND", other.id())),
        }
    }

    /// `true`/`1` if this is BYTE and nonzero, `false`/`0` if BYTE and zero.
    /// Mirrors the SNBT reader's `true`/`false` literals, which decode to
    /// BYTE(1)/BYTE(0); this is the inverse convenience for callers that
    /// want a `bool` back out.
    pub fn as_bool(&self) -> Result<bool, NbtReprError> {
        self.as_i8().map(|v| v != 0)
    }
}

fn mismatch(expected: &'static str, found: TagId) -> NbtReprError {
    NbtStructureError::type_mismatch(expected, found.name()).into()
}

macro_rules! from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for NbtTag {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

from_scalar!(i8, Byte);
from_scalar!(i16, Short);
from_scalar!(i32, Int);
from_scalar!(i64, Long);
from_scalar!(f32, Float);
from_scalar!(f64, Double);
from_scalar!(String, String);
from_scalar!(NbtList, List);
from_scalar!(NbtCompound, Compound);

impl From<bool> for NbtTag {
    fn from(v: bool) -> Self {
        Self::Byte(if v { 1 } else { 0 })
    }
}

impl From<&str> for NbtTag {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

/// Wraps `Vec<i8>` as a BYTE_ARRAY tag (as opposed to a LIST of BYTE).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByteArray(pub Vec<i8>);
/// Wraps `Vec<i32>` as an INT_ARRAY tag (as opposed to a LIST of INT).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntArray(pub Vec<i32>);
/// Wraps `Vec<i64>` as a LONG_ARRAY tag (as opposed to a LIST of LONG).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LongArray(pub Vec<i64>);

impl From<ByteArray> for NbtTag {
    fn from(v: ByteArray) -> Self {
        Self::ByteArray(v.0)
    }
}
impl From<IntArray> for NbtTag {
    fn from(v: IntArray) -> Self {
        Self::IntArray(v.0)
    }
}
impl From<LongArray> for NbtTag {
    fn from(v: LongArray) -> Self {
        Self::LongArray(v.0)
    }
}

/// A homogeneous, ordered sequence of [`NbtTag`]s.
///
/// The element type is not stored separately: it is always derivable as
/// the id of the first element, or [`TagId::End`] for an empty list. Every
/// mutating method enforces homogeneity, so a `NbtList` is never
/// observably mixed-type; the write-side `HeterogeneousList` error
/// ([`crate::error::NbtError::HeterogeneousList`]) exists for the case
/// where a caller builds one by hand via `NbtList::from_vec_unchecked` and
/// then tries to write it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtList(Vec<NbtTag>);

impl NbtList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Builds a list without checking homogeneity. Used by the binary and
    /// SNBT readers, which already guarantee homogeneity by construction
    /// (every element was read under the same declared element type).
    pub fn from_vec_unchecked(elements: Vec<NbtTag>) -> Self {
        Self(elements)
    }

    pub fn element_id(&self) -> TagId {
        self.0.first().map(NbtTag::id).unwrap_or(TagId::End)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&NbtTag, NbtReprError> {
        self.0
            .get(index)
            .ok_or_else(|| NbtStructureError::invalid_index(index, self.0.len()).into())
    }

    pub fn iter(&self) -> slice::Iter<'_, NbtTag> {
        self.0.iter()
    }

    /// Appends a value, failing if it would make the list heterogeneous.
    pub fn push<T: Into<NbtTag>>(&mut self, value: T) -> Result<(), NbtReprError> {
        let tag = value.into();
        if !self.0.is_empty() && tag.id() != self.element_id() {
            return Err(NbtStructureError::type_mismatch(
                self.element_id().name(),
                tag.id().name(),
            )
            .into());
        }
        self.0.push(tag);
        Ok(())
    }

    /// Checks that every element shares one tag id (or the list is empty),
    /// returning that id. Called by the writer before encoding; a caller
    /// that only ever used [`NbtList::push`] can never fail this check.
    pub fn validate_homogeneous(&self) -> Result<TagId, HeterogeneousList> {
        let mut elements = self.0.iter();
        let Some(first) = elements.next() else {
            return Ok(TagId::End);
        };
        let expected = first.id();
        for (offset, element) in elements.enumerate() {
            if element.id() != expected {
                return Err(HeterogeneousList {
                    expected,
                    found: element.id(),
                    index: offset + 1,
                });
            }
        }
        Ok(expected)
    }

    pub fn as_slice(&self) -> &[NbtTag] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<NbtTag> {
        self.0
    }
}

/// Raised by [`NbtList::validate_homogeneous`]; converted into
/// [`crate::error::NbtError::HeterogeneousList`] by the writer.
#[derive(Debug, Clone, Copy)]
pub struct HeterogeneousList {
    pub expected: TagId,
    pub found: TagId,
    pub index: usize,
}

impl IntoIterator for NbtList {
    type Item = NbtTag;
    type IntoIter = vec::IntoIter<NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtList {
    type Item = &'a NbtTag;
    type IntoIter = slice::Iter<'a, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<NbtTag> for NbtList {
    fn from_iter<T: IntoIterator<Item = NbtTag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An insertion-ordered mapping from string key to [`NbtTag`].
///
/// Backed unconditionally by [`indexmap::IndexMap`] rather than a
/// feature-gated choice between a hash map and an ordered map — see
/// `DESIGN.md` for why the ordering guarantee is made mandatory here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtCompound(IndexMap<String, NbtTag>);

impl NbtCompound {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&NbtTag> {
        self.0.get(key)
    }

    pub fn get_checked(&self, key: &str) -> Result<&NbtTag, NbtReprError> {
        self.0
            .get(key)
            .ok_or_else(|| NbtStructureError::missing_tag(key).into())
    }

    /// Inserts a value under `key`, preserving `key`'s existing position if
    /// it was already present (matches `IndexMap::insert` semantics, which
    /// in turn matches the read-side behavior: re-reading the same key
    /// twice under one compound updates in place rather than moving to the
    /// end).
    pub fn insert<T: Into<NbtTag>>(&mut self, key: impl Into<String>, value: T) -> Option<NbtTag> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<NbtTag> {
        self.0.shift_remove(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, NbtTag> {
        self.0.iter()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, NbtTag> {
        self.0.keys()
    }
}

impl FromIterator<(String, NbtTag)> for NbtCompound {
    fn from_iter<T: IntoIterator<Item = (String, NbtTag)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for NbtCompound {
    type Item = (String, NbtTag);
    type IntoIter = indexmap::map::IntoIter<String, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NbtCompound {
    type Item = (&'a String, &'a NbtTag);
    type IntoIter = indexmap::map::Iter<'a, String, NbtTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_push_rejects_heterogeneous() {
        let mut list = NbtList::new();
        list.push(1i8).unwrap();
        assert!(list.push(1i32).is_err());
    }

    #[test]
    fn empty_list_element_id_is_end() {
        assert_eq!(NbtList::new().element_id(), TagId::End);
    }

    #[test]
    fn compound_preserves_insertion_order() {
        let mut compound = NbtCompound::new();
        compound.insert("z", 1i32);
        compound.insert("a", 2i32);
        let keys: Vec<_> = compound.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn bool_converts_to_byte() {
        let tag: NbtTag = true.into();
        assert_eq!(tag, NbtTag::Byte(1));
    }
}
