use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::{NbtError, NbtResult};
use crate::raw;
use crate::settings::{BedrockHeaderSetting, DialectGeneration, Endianness, EnvelopedTree, RootNameSetting, WriteOptions};
use crate::tag::{NbtTag, TagId};

/// Starting capacity for a fresh write buffer; doubles on demand via
/// `Vec`'s own amortized growth, per the writer-growth design note.
const INITIAL_CAPACITY: usize = 1024;

pub(crate) struct Writer {
    buf: Vec<u8>,
    endian: Endianness,
}

impl Writer {
    fn new(endian: Endianness) -> Self {
        Self {
            buf: Vec::with_capacity(INITIAL_CAPACITY),
            endian,
        }
    }

    fn big_endian(&self) -> bool {
        matches!(self.endian, Endianness::Big)
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_i8(&mut self, v: i8) {
        self.write_u8(v as u8);
    }

    fn write_i16_fixed(&mut self, v: i16) {
        let mut tmp = [0u8; 2];
        if self.big_endian() {
            BigEndian::write_i16(&mut tmp, v);
        } else {
            LittleEndian::write_i16(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_u16_fixed(&mut self, v: u16) {
        let mut tmp = [0u8; 2];
        if self.big_endian() {
            BigEndian::write_u16(&mut tmp, v);
        } else {
            LittleEndian::write_u16(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_i32_fixed(&mut self, v: i32) {
        let mut tmp = [0u8; 4];
        if self.big_endian() {
            BigEndian::write_i32(&mut tmp, v);
        } else {
            LittleEndian::write_i32(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_i64_fixed(&mut self, v: i64) {
        let mut tmp = [0u8; 8];
        if self.big_endian() {
            BigEndian::write_i64(&mut tmp, v);
        } else {
            LittleEndian::write_i64(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_f32_fixed(&mut self, v: f32) {
        let mut tmp = [0u8; 4];
        if self.big_endian() {
            BigEndian::write_f32(&mut tmp, v);
        } else {
            LittleEndian::write_f32(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_f64_fixed(&mut self, v: f64) {
        let mut tmp = [0u8; 8];
        if self.big_endian() {
            BigEndian::write_f64(&mut tmp, v);
        } else {
            LittleEndian::write_f64(&mut tmp, v);
        }
        self.buf.extend_from_slice(&tmp);
    }

    fn write_u32_header(&mut self, v: u32) {
        let mut tmp = [0u8; 4];
        LittleEndian::write_u32(&mut tmp, v);
        self.buf.extend_from_slice(&tmp);
    }

    fn write_int_value(&mut self, v: i32) {
        match self.endian {
            Endianness::LittleVarint => raw::write_unsigned_varint(&mut self.buf, raw::zigzag_encode_i32(v)),
            _ => self.write_i32_fixed(v),
        }
    }

    fn write_long_value(&mut self, v: i64) {
        match self.endian {
            Endianness::LittleVarint => raw::write_unsigned_varint(&mut self.buf, raw::zigzag_encode_i64(v)),
            _ => self.write_i64_fixed(v),
        }
    }

    fn write_list_length(&mut self, v: i32) {
        self.write_int_value(v)
    }

    fn write_array_length(&mut self, v: i32) {
        self.write_i32_fixed(v)
    }

    fn write_string(&mut self, s: &str) {
        let bytes = raw::encode_modified_utf8(s);
        match self.endian {
            Endianness::LittleVarint => raw::write_unsigned_varint(&mut self.buf, bytes.len() as u64),
            _ => self.write_u16_fixed(bytes.len() as u16),
        }
        self.buf.extend_from_slice(&bytes);
    }

    fn write_tag_id(&mut self, id: TagId) {
        self.write_u8(id.as_u8());
    }

    fn write_payload(&mut self, tag: &NbtTag) -> NbtResult<()> {
        match tag {
            NbtTag::Byte(v) => self.write_i8(*v),
            NbtTag::Short(v) => self.write_i16_fixed(*v),
            NbtTag::Int(v) => self.write_int_value(*v),
            NbtTag::Long(v) => self.write_long_value(*v),
            NbtTag::Float(v) => self.write_f32_fixed(*v),
            NbtTag::Double(v) => self.write_f64_fixed(*v),
            NbtTag::ByteArray(values) => {
                self.write_array_length(values.len() as i32);
                self.buf.extend_from_slice(&raw::i8_to_bytes(values));
            }
            NbtTag::String(s) => self.write_string(s),
            NbtTag::List(list) => {
                let element_id = list.validate_homogeneous().map_err(|h| NbtError::HeterogeneousList {
                    expected: h.expected,
                    found: h.found,
                    index: h.index,
                })?;
                self.write_tag_id(element_id);
                self.write_list_length(list.len() as i32);
                for element in list.iter() {
                    self.write_payload(element)?;
                }
            }
            NbtTag::Compound(compound) => {
                for (key, value) in compound.iter() {
                    self.write_tag_id(value.id());
                    self.write_string(key);
                    self.write_payload(value)?;
                }
                self.write_tag_id(TagId::End);
            }
            NbtTag::IntArray(values) => {
                self.write_array_length(values.len() as i32);
                for v in values {
                    self.write_int_value(*v);
                }
            }
            NbtTag::LongArray(values) => {
                self.write_array_length(values.len() as i32);
                for v in values {
                    self.write_long_value(*v);
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn write_pinned(tree: &EnvelopedTree, options: &WriteOptions) -> NbtResult<Vec<u8>> {
    let dialect = &options.dialect;
    let root_id = tree.root.id();

    let root_allowed = match dialect.generation {
        DialectGeneration::Legacy => root_id == TagId::Compound,
        DialectGeneration::New => matches!(root_id, TagId::Compound | TagId::List),
    };
    if !root_allowed {
        return Err(NbtError::InvalidEnvelope { found: root_id });
    }

    let mut writer = Writer::new(dialect.endian);
    writer.write_tag_id(root_id);

    match &dialect.root_name {
        RootNameSetting::Absent => {}
        RootNameSetting::Present => {
            writer.write_string(tree.envelope.name.as_deref().unwrap_or(""));
        }
        RootNameSetting::Literal(expected) => {
            writer.write_string(expected);
        }
    }

    writer.write_payload(&tree.root)?;

    let body = writer.buf;

    match dialect.bedrock_header {
        BedrockHeaderSetting::Absent => Ok(body),
        BedrockHeaderSetting::Present(version) => {
            let version = version.ok_or_else(|| {
                NbtError::invalid_option("writing a Bedrock level header requires a known version")
            })?;
            let mut header_writer = Writer::new(Endianness::Little);
            header_writer.write_u32_header(version);
            header_writer.write_u32_header(body.len() as u32);
            header_writer.buf.extend_from_slice(&body);
            Ok(header_writer.buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Dialect, Envelope, RootNameSetting};
    use crate::tag::NbtList;

    /// Pins the resolved Open Question from the Legacy/New dialect split:
    /// a LIST root is accepted under the new generation but rejected
    /// under the legacy one.
    #[test]
    fn legacy_generation_rejects_a_list_root() {
        let tree = EnvelopedTree {
            root: NbtTag::List(NbtList::new()),
            envelope: Envelope {
                name: None,
                dialect: Dialect {
                    generation: DialectGeneration::Legacy,
                    root_name: RootNameSetting::Absent,
                    ..Dialect::default()
                },
            },
        };
        let options = WriteOptions {
            dialect: tree.envelope.dialect.clone(),
        };

        let err = write_pinned(&tree, &options).unwrap_err();
        assert!(matches!(err, NbtError::InvalidEnvelope { found: TagId::List }));
    }

    #[test]
    fn new_generation_accepts_a_list_root() {
        let tree = EnvelopedTree {
            root: NbtTag::List(NbtList::new()),
            envelope: Envelope {
                name: None,
                dialect: Dialect {
                    generation: DialectGeneration::New,
                    root_name: RootNameSetting::Absent,
                    ..Dialect::default()
                },
            },
        };
        let options = WriteOptions {
            dialect: tree.envelope.dialect.clone(),
        };

        assert!(write_pinned(&tree, &options).is_ok());
    }
}
