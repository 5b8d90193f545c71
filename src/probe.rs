//! Format auto-detection (component F): when the caller leaves dialect
//! fields unspecified, retry decode attempts across the candidate space
//! until one succeeds.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{NbtError, NbtResult};
use crate::io;
use crate::settings::{
    BedrockHeaderSetting, Dialect, DialectGeneration, Endianness, EnvelopedTree, NbtCompression,
    ReadOptions, RootNameSetting,
};

/// Dialect fields the probe should search over. `None` means "try every
/// candidate for this axis"; `Some(value)` pins it, removing that axis
/// from the search.
#[derive(Debug, Clone, Default)]
pub struct ProbeOptions {
    pub compression: Option<NbtCompression>,
    pub endian: Option<Endianness>,
    pub root_name: Option<RootNameSetting>,
    pub generation: DialectGeneration,
    pub strict: bool,
    pub depth_limit: crate::settings::DepthLimit,
}

const COMPRESSION_AXIS: [NbtCompression; 2] = [NbtCompression::None, NbtCompression::RawDeflate];
const ENDIAN_AXIS: [Endianness; 3] = [
    Endianness::Big,
    Endianness::Little,
    Endianness::LittleVarint,
];
const ROOT_NAME_AXIS: [bool; 2] = [true, false];

/// Probes `bytes` for compression, endianness, root-name presence, and a
/// Bedrock level header, returning the first successful decode. At most
/// 2 x 3 x 2 = 12 full read attempts are made.
pub fn read_auto(bytes: &[u8], options: &ProbeOptions) -> NbtResult<EnvelopedTree> {
    let compression_candidates = compression_candidates(bytes, options.compression);

    let mut first_error: Option<NbtError> = None;

    for compression in compression_candidates {
        let decompressed = match decompress_for_probe(bytes, compression) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::trace!("probe: compression {compression:?} failed to decompress");
                first_error.get_or_insert(err);
                continue;
            }
        };

        let endian_candidates: Vec<Endianness> = match options.endian {
            Some(endian) => vec![endian],
            None => ENDIAN_AXIS.to_vec(),
        };

        for endian in endian_candidates {
            let bedrock_header = detect_bedrock_header(&decompressed, endian);

            let root_name_candidates: Vec<RootNameSetting> = match &options.root_name {
                Some(setting) => vec![setting.clone()],
                None => ROOT_NAME_AXIS
                    .iter()
                    .map(|&present| {
                        if present {
                            RootNameSetting::Present
                        } else {
                            RootNameSetting::Absent
                        }
                    })
                    .collect(),
            };

            for root_name in root_name_candidates {
                let dialect = Dialect {
                    endian,
                    generation: options.generation,
                    compression,
                    root_name,
                    bedrock_header,
                };
                let read_options = ReadOptions {
                    dialect,
                    strict: options.strict,
                    depth_limit: options.depth_limit,
                };

                log::trace!(
                    "probe attempt: compression={compression:?} endian={endian} bedrock={bedrock_header:?}"
                );

                match io::read_pinned(&decompressed, &read_options) {
                    Ok(tree) => {
                        log::debug!(
                            "probe succeeded: compression={compression:?} endian={endian} bedrock={bedrock_header:?}"
                        );
                        return Ok(tree);
                    }
                    Err(err) => {
                        first_error.get_or_insert(err);
                    }
                }
            }
        }
    }

    Err(first_error.unwrap_or_else(|| NbtError::invalid_option("no dialect candidates to probe")))
}

fn compression_candidates(bytes: &[u8], pinned: Option<NbtCompression>) -> Vec<NbtCompression> {
    if let Some(scheme) = pinned {
        return vec![scheme];
    }
    match bytes.first().zip(bytes.get(1)) {
        Some((0x1F, 0x8B)) => vec![NbtCompression::Gzip],
        Some((0x78, _)) => vec![NbtCompression::Zlib],
        _ => COMPRESSION_AXIS.to_vec(),
    }
}

fn decompress_for_probe(bytes: &[u8], compression: NbtCompression) -> NbtResult<Vec<u8>> {
    io::decompress(bytes, compression)
}

fn detect_bedrock_header(bytes: &[u8], endian: Endianness) -> BedrockHeaderSetting {
    if endian != Endianness::Little || bytes.len() < 8 {
        return BedrockHeaderSetting::Absent;
    }
    let declared_len = LittleEndian::read_u32(&bytes[4..8]);
    if declared_len as usize == bytes.len() - 8 {
        let version = LittleEndian::read_u32(&bytes[0..4]);
        BedrockHeaderSetting::Present(Some(version))
    } else {
        BedrockHeaderSetting::Absent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Envelope, ReadOptions, WriteOptions};
    use crate::tag::{NbtCompound, NbtTag};

    /// Exercises the `log::trace!`/`log::debug!` instrumentation in
    /// [`read_auto`]: with a real subscriber installed, a successful probe
    /// must not panic or otherwise misbehave when its attempt/success
    /// lines are actually formatted and emitted, not just compiled.
    #[test]
    fn successful_probe_logs_through_a_real_subscriber() {
        let _ = env_logger::builder().is_test(true).try_init();

        let tree = EnvelopedTree {
            root: NbtTag::Compound(NbtCompound::new()),
            envelope: Envelope {
                name: None,
                dialect: Dialect::default(),
            },
        };
        let bytes = io::write(&tree, &WriteOptions::default()).unwrap();
        let decoded = read_auto(&bytes, &ProbeOptions::default()).unwrap();
        assert_eq!(decoded.root, tree.root);
    }

    #[test]
    fn auto_detects_gzip_little_endian_anonymous_compound() {
        let tree = EnvelopedTree {
            root: NbtTag::Compound(NbtCompound::new()),
            envelope: Envelope {
                name: None,
                dialect: Dialect {
                    endian: Endianness::Little,
                    generation: DialectGeneration::New,
                    compression: NbtCompression::Gzip,
                    root_name: RootNameSetting::Absent,
                    bedrock_header: BedrockHeaderSetting::Absent,
                },
            },
        };
        let write_options = WriteOptions {
            dialect: tree.envelope.dialect.clone(),
        };
        let bytes = io::write(&tree, &write_options).unwrap();

        let probe_options = ProbeOptions {
            strict: true,
            ..ProbeOptions::default()
        };
        let decoded = read_auto(&bytes, &probe_options).unwrap();
        assert_eq!(decoded.root, tree.root);
        assert_eq!(decoded.envelope.dialect.compression, NbtCompression::Gzip);
        assert_eq!(decoded.envelope.dialect.endian, Endianness::Little);
        assert_eq!(decoded.envelope.name, None);
    }

    #[test]
    fn bedrock_header_detected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u32.to_le_bytes());
        // compound tag id, empty root name, end
        let payload = [0x0A, 0x00, 0x00, 0x00];
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);

        let probe_options = ProbeOptions {
            strict: true,
            ..ProbeOptions::default()
        };
        let decoded = read_auto(&bytes, &probe_options).unwrap();
        assert_eq!(
            decoded.envelope.dialect.bedrock_header,
            BedrockHeaderSetting::Present(Some(10))
        );
    }

    #[test]
    fn probe_agrees_with_a_pinned_dialect() {
        let dialect = Dialect {
            endian: Endianness::LittleVarint,
            generation: DialectGeneration::New,
            compression: NbtCompression::None,
            root_name: RootNameSetting::Present,
            bedrock_header: BedrockHeaderSetting::Absent,
        };
        let tree = EnvelopedTree {
            root: NbtTag::Compound(NbtCompound::new()),
            envelope: Envelope {
                name: Some("probe-idempotence".to_owned()),
                dialect: dialect.clone(),
            },
        };
        let bytes = io::write(&tree, &WriteOptions { dialect: dialect.clone() }).unwrap();

        let pinned = io::read(
            &bytes,
            &ReadOptions {
                dialect,
                strict: true,
                depth_limit: crate::settings::DepthLimit::default(),
            },
        )
        .unwrap();
        let probed = read_auto(&bytes, &ProbeOptions { strict: true, ..ProbeOptions::default() }).unwrap();
        assert_eq!(pinned.root, probed.root);
        assert_eq!(pinned.envelope.dialect, probed.envelope.dialect);
    }
}
