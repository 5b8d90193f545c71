//! The binary reader and writer (components C and D), plus the
//! compression wrapping that sits between them and raw bytes.

mod reader;
mod writer;

use std::io::{Read, Write};

use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use crate::error::{NbtError, NbtResult};
use crate::settings::{EnvelopedTree, NbtCompression, ReadOptions, WriteOptions};
use crate::tag::NbtTag;

pub(crate) use reader::read_pinned;
pub(crate) use writer::write_pinned;

/// Decodes `bytes` into a root tag and envelope under the dialect pinned
/// by `options`. Every field of `options.dialect` must already be
/// resolved; use [`crate::probe::read_auto`] when one or more fields are
/// unspecified.
pub fn read(bytes: &[u8], options: &ReadOptions) -> NbtResult<EnvelopedTree> {
    let decompressed = decompress(bytes, options.dialect.compression)?;
    reader::read_pinned(&decompressed, options)
}

/// Encodes `tree` to bytes under `options.dialect`.
pub fn write(tree: &EnvelopedTree, options: &WriteOptions) -> NbtResult<Vec<u8>> {
    let uncompressed = writer::write_pinned(tree, options)?;
    compress(&uncompressed, options.dialect.compression)
}

/// Convenience for writing an anonymous/default-enveloped tree: builds a
/// minimal envelope from `options.dialect` with no root name.
pub fn write_tag(tag: &NbtTag, options: &WriteOptions) -> NbtResult<Vec<u8>> {
    let tree = EnvelopedTree {
        root: tag.clone(),
        envelope: crate::settings::Envelope {
            name: None,
            dialect: options.dialect.clone(),
        },
    };
    write(&tree, options)
}

pub(crate) fn decompress(bytes: &[u8], scheme: NbtCompression) -> NbtResult<Vec<u8>> {
    let mut out = Vec::new();
    let result = match scheme {
        NbtCompression::None => {
            out.extend_from_slice(bytes);
            Ok(())
        }
        NbtCompression::Gzip => GzDecoder::new(bytes).read_to_end(&mut out).map(|_| ()),
        NbtCompression::Zlib => ZlibDecoder::new(bytes).read_to_end(&mut out).map(|_| ()),
        NbtCompression::RawDeflate => flate2::read::DeflateDecoder::new(bytes)
            .read_to_end(&mut out)
            .map(|_| ()),
    };
    result.map(|()| out).map_err(NbtError::CompressionFailure)
}

fn compress(bytes: &[u8], scheme: NbtCompression) -> NbtResult<Vec<u8>> {
    match scheme {
        NbtCompression::None => Ok(bytes.to_vec()),
        NbtCompression::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(bytes)
                .and_then(|()| encoder.finish())
                .map_err(NbtError::CompressionFailure)
        }
        NbtCompression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(bytes)
                .and_then(|()| encoder.finish())
                .map_err(NbtError::CompressionFailure)
        }
        NbtCompression::RawDeflate => {
            let mut encoder =
                flate2::write::DeflateEncoder::new(Vec::new(), Compression::default());
            encoder
                .write_all(bytes)
                .and_then(|()| encoder.finish())
                .map_err(NbtError::CompressionFailure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Dialect, Envelope};
    use crate::tag::{NbtCompound, NbtList};

    fn envelope(root: NbtTag, name: Option<&str>) -> EnvelopedTree {
        EnvelopedTree {
            root,
            envelope: Envelope {
                name: name.map(str::to_owned),
                dialect: Dialect::default(),
            },
        }
    }

    #[test]
    fn empty_compound_named_root_round_trips() {
        let tree = envelope(NbtTag::Compound(NbtCompound::new()), Some("root"));
        let write_opts = WriteOptions::default();
        let bytes = write(&tree, &write_opts).unwrap();
        assert_eq!(
            bytes,
            vec![0x0A, 0x00, 0x04, b'r', b'o', b'o', b't', 0x00]
        );

        let read_opts = ReadOptions::default();
        let decoded = read(&bytes, &read_opts).unwrap();
        assert_eq!(decoded.root, tree.root);
        assert_eq!(decoded.envelope.name.as_deref(), Some("root"));
    }

    #[test]
    fn byte_inside_compound_scenario() {
        let bytes = [
            0x0A, 0x00, 0x00, // compound, empty root name
            0x01, 0x00, 0x01, b'x', 0x7F, // BYTE "x" = 127
            0x00, // end
        ];
        let mut opts = ReadOptions::default();
        opts.dialect.root_name = crate::settings::RootNameSetting::Present;
        let decoded = read(&bytes, &opts).unwrap();
        let compound = decoded.root.as_compound().unwrap();
        assert_eq!(compound.get("x").unwrap().as_i8().unwrap(), 127);
    }

    #[test]
    fn gzip_round_trip() {
        let tree = envelope(NbtTag::Compound(NbtCompound::new()), Some("root"));
        let mut write_opts = WriteOptions::default();
        write_opts.dialect.compression = NbtCompression::Gzip;
        let bytes = write(&tree, &write_opts).unwrap();
        assert_eq!(&bytes[0..2], &[0x1F, 0x8B]);

        let mut read_opts = ReadOptions::default();
        read_opts.dialect.compression = NbtCompression::Gzip;
        let decoded = read(&bytes, &read_opts).unwrap();
        assert_eq!(decoded.root, tree.root);
    }

    #[test]
    fn nested_tree_round_trips_structurally() {
        let mut inner = NbtCompound::new();
        inner.insert("name", "Steve");
        inner.insert("health", 20i16);
        let mut scores = NbtList::new();
        scores.push(1i32).unwrap();
        scores.push(2i32).unwrap();
        scores.push(3i32).unwrap();
        inner.insert("scores", scores);
        inner.insert("inventory", NbtTag::ByteArray(vec![1, 2, 3]));

        let mut root = NbtCompound::new();
        root.insert("player", NbtTag::Compound(inner));

        let tree = envelope(NbtTag::Compound(root), Some(""));
        let bytes = write(&tree, &WriteOptions::default()).unwrap();
        let decoded = read(&bytes, &ReadOptions::default()).unwrap();
        assert_eq!(decoded.root, tree.root);
    }

    #[test]
    fn width_is_preserved_through_two_s_complement_truncation() {
        // A BYTE written as -1 must re-decode as i8::MAX-adjacent -1, not
        // as some widened positive value.
        let tree = envelope(
            NbtTag::Compound({
                let mut c = NbtCompound::new();
                c.insert("b", -1i8);
                c.insert("s", i16::MIN);
                c.insert("i", i32::MIN);
                c
            }),
            Some(""),
        );
        let bytes = write(&tree, &WriteOptions::default()).unwrap();
        let decoded = read(&bytes, &ReadOptions::default()).unwrap();
        let compound = decoded.root.as_compound().unwrap();
        assert_eq!(compound.get("b").unwrap().as_i8().unwrap(), -1);
        assert_eq!(compound.get("s").unwrap().as_i16().unwrap(), i16::MIN);
        assert_eq!(compound.get("i").unwrap().as_i32().unwrap(), i32::MIN);
    }

    #[test]
    fn strict_mode_detects_trailing_bytes() {
        let tree = envelope(NbtTag::Compound(NbtCompound::new()), Some("root"));
        let mut bytes = write(&tree, &WriteOptions::default()).unwrap();
        bytes.push(0xFF);

        let strict_err = read(&bytes, &ReadOptions::default()).unwrap_err();
        assert!(matches!(strict_err, NbtError::TrailingBytes { remaining: 1, .. }));

        let mut lenient = ReadOptions::default();
        lenient.strict = false;
        let decoded = read(&bytes, &lenient).unwrap();
        assert_eq!(decoded.root, tree.root);
    }
}
