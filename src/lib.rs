//! Reads, writes, and textually represents NBT (Named Binary Tag) data:
//! the hierarchical binary format Minecraft uses for world saves, player
//! data, schematics, and network packets.
//!
//! The three representations of one logical tree are:
//! - a compact tagged binary encoding in one of three wire dialects
//!   (big-endian Java, little-endian Bedrock, little-endian-with-varint
//!   Bedrock network) — see [`io`];
//! - a human-readable textual form, SNBT — see [`snbt`];
//! - an in-memory tagged tree, [`tag::NbtTag`].
//!
//! When the wire dialect is not known ahead of time, [`probe::read_auto`]
//! searches the candidate space (compression, endianness, root-name
//! presence, Bedrock header) and returns the first successful decode.

pub mod error;
pub mod io;
pub mod probe;
mod raw;
pub mod repr;
#[cfg(feature = "serde")]
pub mod serde;
pub mod settings;
pub mod snbt;
pub mod tag;

pub use error::{NbtError, NbtResult};
pub use repr::{NbtReprError, NbtStructureError};
pub use tag::{ByteArray, HeterogeneousList, IntArray, LongArray, NbtCompound, NbtList, NbtTag, TagId};

pub use io::{read, write, write_tag};
pub use probe::{read_auto, ProbeOptions};
pub use settings::{Dialect, Envelope, EnvelopedTree, ReadOptions, WriteOptions};
pub use snbt::{parse, stringify};
