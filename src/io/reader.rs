use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{NbtError, NbtResult};
use crate::raw;
use crate::settings::{
    BedrockHeaderSetting, DialectGeneration, Endianness, Envelope, EnvelopedTree, ReadOptions,
    RootNameSetting,
};
use crate::tag::{NbtCompound, NbtList, NbtTag, TagId};

pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
    endian: Endianness,
    depth_limit: u32,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> NbtResult<&'a [u8]> {
        let available = self.bytes.len().saturating_sub(self.pos);
        if n > available {
            return Err(NbtError::BufferUnderflow {
                offset: self.pos,
                needed: n - available,
            });
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn big_endian(&self) -> bool {
        matches!(self.endian, Endianness::Big)
    }

    fn read_u8(&mut self) -> NbtResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_i8(&mut self) -> NbtResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    /// Fixed-width 16-bit read; SHORT is never varint-encoded in any dialect.
    fn read_i16_fixed(&mut self) -> NbtResult<i16> {
        let b = self.take(2)?;
        Ok(if self.big_endian() {
            BigEndian::read_i16(b)
        } else {
            LittleEndian::read_i16(b)
        })
    }

    fn read_u16_fixed(&mut self) -> NbtResult<u16> {
        let b = self.take(2)?;
        Ok(if self.big_endian() {
            BigEndian::read_u16(b)
        } else {
            LittleEndian::read_u16(b)
        })
    }

    /// Fixed-width 32-bit read; used for array-payload lengths, which are
    /// always a fixed signed 32-bit field regardless of varint dialect.
    fn read_i32_fixed(&mut self) -> NbtResult<i32> {
        let b = self.take(4)?;
        Ok(if self.big_endian() {
            BigEndian::read_i32(b)
        } else {
            LittleEndian::read_i32(b)
        })
    }

    fn read_f32_fixed(&mut self) -> NbtResult<f32> {
        let b = self.take(4)?;
        Ok(if self.big_endian() {
            BigEndian::read_f32(b)
        } else {
            LittleEndian::read_f32(b)
        })
    }

    fn read_f64_fixed(&mut self) -> NbtResult<f64> {
        let b = self.take(8)?;
        Ok(if self.big_endian() {
            BigEndian::read_f64(b)
        } else {
            LittleEndian::read_f64(b)
        })
    }

    fn read_i64_fixed(&mut self) -> NbtResult<i64> {
        let b = self.take(8)?;
        Ok(if self.big_endian() {
            BigEndian::read_i64(b)
        } else {
            LittleEndian::read_i64(b)
        })
    }

    /// Always little-endian, independent of dialect — the Bedrock level
    /// header predates, and is orthogonal to, the endianness of the body.
    fn read_u32_header(&mut self) -> NbtResult<u32> {
        let b = self.take(4)?;
        Ok(LittleEndian::read_u32(b))
    }

    /// A standalone INT value (tag payload, or a LIST/array element):
    /// zig-zag varint under the varint dialect, else fixed-width.
    fn read_int_value(&mut self) -> NbtResult<i32> {
        match self.endian {
            Endianness::LittleVarint => {
                let (raw, len) = raw::read_unsigned_varint(self.bytes, self.pos, 31)?;
                self.pos += len;
                Ok(raw::zigzag_decode_i32(raw))
            }
            _ => self.read_i32_fixed(),
        }
    }

    fn read_long_value(&mut self) -> NbtResult<i64> {
        match self.endian {
            Endianness::LittleVarint => {
                let (raw, len) = raw::read_unsigned_varint(self.bytes, self.pos, 63)?;
                self.pos += len;
                Ok(raw::zigzag_decode_i64(raw))
            }
            _ => self.read_i64_fixed(),
        }
    }

    /// LIST length: zig-zag varint under the varint dialect, else fixed
    /// signed 32-bit.
    fn read_list_length(&mut self) -> NbtResult<i32> {
        self.read_int_value()
    }

    /// Array-payload length (BYTE_ARRAY/INT_ARRAY/LONG_ARRAY): always a
    /// fixed signed 32-bit field.
    fn read_array_length(&mut self) -> NbtResult<i32> {
        self.read_i32_fixed()
    }

    /// STRING length: unsigned varint under the varint dialect, else
    /// fixed unsigned 16-bit.
    fn read_string_length(&mut self) -> NbtResult<usize> {
        match self.endian {
            Endianness::LittleVarint => {
                let (raw, len) = raw::read_unsigned_varint(self.bytes, self.pos, 31)?;
                self.pos += len;
                Ok(raw as usize)
            }
            _ => Ok(self.read_u16_fixed()? as usize),
        }
    }

    fn read_string(&mut self) -> NbtResult<String> {
        let len = self.read_string_length()?;
        let bytes = self.take(len)?;
        Ok(raw::decode_modified_utf8(bytes))
    }

    fn read_tag_id(&mut self) -> NbtResult<TagId> {
        let offset = self.pos;
        let id = self.read_u8()?;
        TagId::from_u8(id).ok_or(NbtError::UnknownTagId { offset, id })
    }

    fn check_depth(&self, depth: u32) -> NbtResult<()> {
        if depth > self.depth_limit {
            return Err(NbtError::invalid_option(format!(
                "recursion depth {depth} exceeds limit {}",
                self.depth_limit
            )));
        }
        Ok(())
    }

    fn read_payload(&mut self, id: TagId, depth: u32) -> NbtResult<NbtTag> {
        match id {
            TagId::End => Err(NbtError::UnexpectedEnd { offset: self.pos }),
            TagId::Byte => Ok(NbtTag::Byte(self.read_i8()?)),
            TagId::Short => Ok(NbtTag::Short(self.read_i16_fixed()?)),
            TagId::Int => Ok(NbtTag::Int(self.read_int_value()?)),
            TagId::Long => Ok(NbtTag::Long(self.read_long_value()?)),
            TagId::Float => Ok(NbtTag::Float(self.read_f32_fixed()?)),
            TagId::Double => Ok(NbtTag::Double(self.read_f64_fixed()?)),
            TagId::ByteArray => {
                let len = non_negative_len(self.read_array_length()?)?;
                let bytes = self.take(len)?;
                Ok(NbtTag::ByteArray(raw::bytes_to_i8(bytes)))
            }
            TagId::String => Ok(NbtTag::String(self.read_string()?)),
            TagId::List => {
                self.check_depth(depth + 1)?;
                let element_id = self.read_tag_id()?;
                let len = non_negative_len(self.read_list_length()?)?;
                if element_id == TagId::End && len != 0 {
                    return Err(NbtError::UnexpectedEnd { offset: self.pos });
                }
                let mut elements = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    elements.push(self.read_payload(element_id, depth + 1)?);
                }
                Ok(NbtTag::List(NbtList::from_vec_unchecked(elements)))
            }
            TagId::Compound => {
                self.check_depth(depth + 1)?;
                let mut compound = NbtCompound::new();
                loop {
                    let entry_id = self.read_tag_id()?;
                    if entry_id == TagId::End {
                        break;
                    }
                    let key = self.read_string()?;
                    let value = self.read_payload(entry_id, depth + 1)?;
                    compound.insert(key, value);
                }
                Ok(NbtTag::Compound(compound))
            }
            TagId::IntArray => {
                let len = non_negative_len(self.read_array_length()?)?;
                let mut values = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    values.push(self.read_int_value()?);
                }
                Ok(NbtTag::IntArray(values))
            }
            TagId::LongArray => {
                let len = non_negative_len(self.read_array_length()?)?;
                let mut values = Vec::with_capacity(len.min(4096));
                for _ in 0..len {
                    values.push(self.read_long_value()?);
                }
                Ok(NbtTag::LongArray(values))
            }
        }
    }
}

fn non_negative_len(len: i32) -> NbtResult<usize> {
    usize::try_from(len).map_err(|_| NbtError::invalid_option(format!("negative length {len}")))
}

pub(crate) fn read_pinned(bytes: &[u8], options: &ReadOptions) -> NbtResult<EnvelopedTree> {
    let dialect = &options.dialect;
    let mut reader = Reader {
        bytes,
        pos: 0,
        endian: dialect.endian,
        depth_limit: options.depth_limit.0,
    };

    if let BedrockHeaderSetting::Present(expected_version) = dialect.bedrock_header {
        let version = reader.read_u32_header()?;
        let payload_len = reader.read_u32_header()?;
        let expected_payload_len = bytes.len().saturating_sub(8);
        if payload_len as usize != expected_payload_len {
            return Err(NbtError::invalid_option(format!(
                "Bedrock header payload length {payload_len} does not match buffer length {expected_payload_len}"
            )));
        }
        if let Some(expected) = expected_version {
            if expected != version {
                return Err(NbtError::invalid_option(format!(
                    "Bedrock header version {version} does not match expected {expected}"
                )));
            }
        }
        log::trace!("read Bedrock level header: version={version}, payload_len={payload_len}");
    }

    let root_id = reader.read_tag_id()?;
    let root_allowed = match dialect.generation {
        DialectGeneration::Legacy => root_id == TagId::Compound,
        DialectGeneration::New => matches!(root_id, TagId::Compound | TagId::List),
    };
    if !root_allowed {
        return Err(NbtError::InvalidEnvelope { found: root_id });
    }

    let name = match &dialect.root_name {
        RootNameSetting::Absent => None,
        RootNameSetting::Present => Some(reader.read_string()?),
        RootNameSetting::Literal(expected) => {
            let found = reader.read_string()?;
            if &found != expected {
                return Err(NbtError::invalid_option(format!(
                    "root name \"{found}\" does not match expected \"{expected}\""
                )));
            }
            Some(found)
        }
    };

    let root = reader.read_payload(root_id, 0)?;

    if options.strict && reader.pos < reader.bytes.len() {
        let remaining = reader.bytes.len() - reader.pos;
        return Err(NbtError::TrailingBytes {
            offset: reader.pos,
            remaining,
            parsed: Box::new(root),
        });
    }

    Ok(EnvelopedTree {
        root,
        envelope: Envelope {
            name,
            dialect: dialect.clone(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Dialect;

    /// Mirrors the writer-side test: a LIST root tag id on the wire is
    /// rejected under the legacy generation, the same Open Question this
    /// crate resolved in favor of new-dialect-only LIST roots.
    #[test]
    fn legacy_generation_rejects_a_list_root_on_the_wire() {
        // TagId::List, empty root name, element id End, length 0.
        let bytes = [0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let options = ReadOptions {
            dialect: Dialect {
                generation: DialectGeneration::Legacy,
                root_name: RootNameSetting::Absent,
                ..Dialect::default()
            },
            strict: false,
            depth_limit: crate::settings::DepthLimit::default(),
        };

        let err = read_pinned(&bytes, &options).unwrap_err();
        assert!(matches!(err, NbtError::InvalidEnvelope { found: TagId::List }));
    }

    #[test]
    fn new_generation_accepts_a_list_root_on_the_wire() {
        let bytes = [0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        let options = ReadOptions {
            dialect: Dialect {
                generation: DialectGeneration::New,
                root_name: RootNameSetting::Absent,
                ..Dialect::default()
            },
            strict: true,
            depth_limit: crate::settings::DepthLimit::default(),
        };

        let decoded = read_pinned(&bytes, &options).unwrap();
        assert_eq!(decoded.root, NbtTag::List(NbtList::new()));
    }
}
