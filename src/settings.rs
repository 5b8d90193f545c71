//! The dialect/options layer: everything needed to pin down a
//! deterministic binary decode or encode, plus the SNBT formatter's
//! indentation and escape-handling knobs.

use std::fmt;

/// Byte order and varint dialect of a binary NBT stream.
///
/// `LittleVarint` is the Bedrock *network* dialect: INT, LONG, and LIST
/// length are zig-zag varints, STRING length is an unsigned varint, and
/// every other fixed-width scalar is little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Big,
    Little,
    LittleVarint,
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Big => "big",
            Self::Little => "little",
            Self::LittleVarint => "little-varint",
        })
    }
}

/// Which dialect generation governs the root tag id.
///
/// Carries forward the resolved Open Question: the legacy dialect accepts
/// only COMPOUND roots; the new dialect additionally accepts LIST roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialectGeneration {
    Legacy,
    #[default]
    New,
}

/// The (de)compression scheme wrapping a binary NBT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NbtCompression {
    #[default]
    None,
    Gzip,
    Zlib,
    /// Raw DEFLATE with no zlib or gzip wrapper.
    RawDeflate,
}

/// Whether, and how, to read/write the root name string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RootNameSetting {
    /// Read/write a root name (whatever string is present).
    #[default]
    Present,
    /// The root has no name field at all (some Bedrock contexts).
    Absent,
    /// Require the root name to equal this exact string.
    Literal(String),
}

/// Whether a Bedrock level-file header (`[u32-le version][u32-le length]`)
/// precedes the root tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BedrockHeaderSetting {
    #[default]
    Absent,
    /// Present, with this declared version (write side) or an expected
    /// version to validate against (read side, if `Some`).
    Present(Option<u32>),
}

/// A caller-configurable ceiling on recursive descent into nested
/// LIST/COMPOUND payloads, bounding worst-case stack and memory use on
/// adversarial input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthLimit(pub u32);

impl Default for DepthLimit {
    fn default() -> Self {
        Self(512)
    }
}

/// A fully-pinned choice of `{endian, compression, root-name policy,
/// bedrock-level policy}` that makes decoding deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialect {
    pub endian: Endianness,
    pub generation: DialectGeneration,
    pub compression: NbtCompression,
    pub root_name: RootNameSetting,
    pub bedrock_header: BedrockHeaderSetting,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            endian: Endianness::Big,
            generation: DialectGeneration::New,
            compression: NbtCompression::None,
            root_name: RootNameSetting::Present,
            bedrock_header: BedrockHeaderSetting::Absent,
        }
    }
}

/// Options for [`crate::io::read`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOptions {
    pub dialect: Dialect,
    /// Fail if the buffer has trailing bytes after the root is fully read.
    pub strict: bool,
    pub depth_limit: DepthLimit,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            strict: true,
            depth_limit: DepthLimit::default(),
        }
    }
}

/// Options for [`crate::io::write`]. Mirrors [`ReadOptions`]; an
/// `EnvelopedTree` read back in with the same dialect re-encodes to
/// identical bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    pub dialect: Dialect,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
        }
    }
}

/// The out-of-tree metadata describing a decoded root: its name and the
/// dialect that was used (or, after a probe, detected) to read it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub name: Option<String>,
    pub dialect: Dialect,
}

/// A decoded root tag together with its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopedTree {
    pub root: crate::tag::NbtTag,
    pub envelope: Envelope,
}

// ================================
//      SNBT formatting / parsing options
// ================================

/// Indentation unit for the SNBT writer. An empty string produces the
/// compact single-line form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indentation {
    None,
    Spaces(u32),
    Str(String),
}

impl Default for Indentation {
    fn default() -> Self {
        Self::None
    }
}

impl Indentation {
    pub fn unit(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Spaces(n) => " ".repeat(*n as usize),
            Self::Str(s) => s.clone(),
        }
    }

    pub fn is_pretty(&self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnbtWriteOptions {
    pub indentation: Indentation,
}

/// Which backslash escape sequences the SNBT reader accepts inside
/// quoted strings, beyond the always-legal `\\` and `\'`/`\"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnabledEscapeSequences {
    bits: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum EscapeSequence {
    B = 1 << 0,
    S = 1 << 1,
    T = 1 << 2,
    N = 1 << 3,
    F = 1 << 4,
    R = 1 << 5,
    UnicodeTwo = 1 << 6,
    UnicodeFour = 1 << 7,
    UnicodeEight = 1 << 8,
    UnicodeNamed = 1 << 9,
}

impl EnabledEscapeSequences {
    pub const NONE: Self = Self { bits: 0 };
    pub const ALL: Self = Self { bits: 0b11_1111_1111 };

    pub fn is_enabled(self, seq: EscapeSequence) -> bool {
        self.bits & (seq as u16) != 0
    }
}

impl Default for EnabledEscapeSequences {
    /// `\\` and `\'`/`\"` are always legal (hardcoded in the lexer, not
    /// part of this set) and are the *only* escapes the core grammar
    /// recognizes. Every other escape here is an enrichment beyond
    /// spec.md's minimal grammar and so defaults to off.
    fn default() -> Self {
        Self::NONE
    }
}

/// What to do with a syntactically present, but disabled, escape
/// sequence (e.g. `ሴ` when `EscapeSequence::UnicodeFour` is off).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleInvalidEscape {
    #[default]
    Error,
    Ignore,
    CopyVerbatim,
}

/// Whether the unquoted tokens `NaN`/`Infinity`/`-Infinity` (each with an
/// optional `f`/`F`/`d`/`D` suffix) parse as non-finite FLOAT/DOUBLE
/// values. When `false`, those tokens fall through to the ordinary
/// unquoted-token classification and parse as a bare STRING instead. The
/// writer always emits these same tokens for a non-finite float/double
/// regardless of this flag — it only gates what the reader accepts back.
/// Spec.md's SNBT round-trip property is defined to exclude non-finite
/// values, so this defaults to permissive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnbtParseOptions {
    pub enabled_escape_sequences: EnabledEscapeSequences,
    pub handle_invalid_escape: HandleInvalidEscape,
    pub replace_non_finite: bool,
}

impl Default for SnbtParseOptions {
    fn default() -> Self {
        Self {
            enabled_escape_sequences: EnabledEscapeSequences::default(),
            handle_invalid_escape: HandleInvalidEscape::default(),
            replace_non_finite: true,
        }
    }
}
