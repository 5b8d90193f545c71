//! The unified wire/text decode error surface, [`NbtError`].
//!
//! Every kind named by the error-handling design is exactly one variant
//! here; nothing is collapsed or split further, so a caller can match on
//! a closed, documented set.

use thiserror::Error;

use crate::tag::{NbtTag, TagId};

/// A decode, encode, or format error from the binary codec, the SNBT
/// codec, or the format probe.
#[derive(Error, Debug)]
pub enum NbtError {
    /// A read would advance past the end of the buffer.
    #[error("buffer underflow: needed {needed} more byte(s) at offset {offset}")]
    BufferUnderflow { offset: usize, needed: usize },

    /// The byte at a tag-id position is not a value in `0..=12`.
    #[error("unknown tag id {id} at offset {offset}")]
    UnknownTagId { offset: usize, id: u8 },

    /// An END tag id was read where a payload was required (only a
    /// COMPOUND body may legitimately consume END, as its terminator).
    #[error("unexpected END tag at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// A LIST being written has elements of more than one tag id.
    #[error("heterogeneous list: expected every element to be {expected}, found {found} at index {index}")]
    HeterogeneousList {
        expected: TagId,
        found: TagId,
        index: usize,
    },

    /// The root tag id is not COMPOUND (legacy dialect) or not
    /// COMPOUND/LIST (new dialect).
    #[error("invalid envelope: root tag id {found} is not permitted by this dialect")]
    InvalidEnvelope { found: TagId },

    /// Strict mode: the buffer has a non-empty suffix after the root was
    /// fully read. Carries the successfully parsed root as a byproduct so
    /// a caller can recover it without re-parsing non-strictly.
    #[error("{remaining} trailing byte(s) after the root value, starting at offset {offset}")]
    TrailingBytes {
        offset: usize,
        remaining: usize,
        parsed: Box<NbtTag>,
    },

    /// A varint's accumulated shift exceeded the width limit for its
    /// target type (31 bits for int-width fields, 63 for long-width).
    #[error("varint overflow at offset {offset}: exceeded {bits}-bit width")]
    VarintOverflow { offset: usize, bits: u32 },

    /// A textual (SNBT) parse failure.
    #[error("SNBT syntax error at character {cursor}: {message}")]
    SnbtSyntax { message: String, cursor: usize },

    /// A caller-supplied option value is outside its recognized set
    /// (e.g. a LIST root requested under the legacy dialect, or a
    /// recursion depth limit exceeded).
    #[error("invalid option: {message}")]
    InvalidOption { message: String },

    /// Propagated from the external (de)compression step.
    #[error("compression failure: {0}")]
    CompressionFailure(#[source] std::io::Error),
}

impl NbtError {
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption {
            message: message.into(),
        }
    }
}

pub type NbtResult<T> = Result<T, NbtError>;
