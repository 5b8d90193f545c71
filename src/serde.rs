//! Optional `serde::Serialize`/`Deserialize` bridge for the tag tree types,
//! gated behind the `serde` feature. Lets a caller derive a typed Rust
//! struct that converts to/from an [`NbtTag`] subtree instead of walking
//! [`NbtCompound`] by hand.
//!
//! This is pure ambient convenience on top of the tag tree: it touches
//! neither the wire codec nor the SNBT grammar, and a LIST decoded through
//! this bridge is always reconstructed as `NbtTag::List`, never as one of
//! the array variants — a caller that needs a BYTE_ARRAY/INT_ARRAY/
//! LONG_ARRAY back out of `serde_json`-shaped input should target
//! `ByteArray`/`IntArray`/`LongArray` directly rather than `NbtTag`.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tag::{NbtCompound, NbtList, NbtTag};

impl Serialize for NbtTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Byte(v) => serializer.serialize_i8(*v),
            Self::Short(v) => serializer.serialize_i16(*v),
            Self::Int(v) => serializer.serialize_i32(*v),
            Self::Long(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f32(*v),
            Self::Double(v) => serializer.serialize_f64(*v),
            Self::ByteArray(values) => values.serialize(serializer),
            Self::String(v) => serializer.serialize_str(v),
            Self::List(list) => list.serialize(serializer),
            Self::Compound(compound) => compound.serialize(serializer),
            Self::IntArray(values) => values.serialize(serializer),
            Self::LongArray(values) => values.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for NbtTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NbtTagVisitor)
    }
}

struct NbtTagVisitor;

impl<'de> Visitor<'de> for NbtTagVisitor {
    type Value = NbtTag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a value representable as an NBT tag")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(NbtTag::Byte(v.into()))
    }

    fn visit_i8<E: de::Error>(self, v: i8) -> Result<Self::Value, E> {
        Ok(NbtTag::Byte(v))
    }

    fn visit_i16<E: de::Error>(self, v: i16) -> Result<Self::Value, E> {
        Ok(NbtTag::Short(v))
    }

    fn visit_i32<E: de::Error>(self, v: i32) -> Result<Self::Value, E> {
        Ok(NbtTag::Int(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NbtTag::Long(v))
    }

    fn visit_u8<E: de::Error>(self, v: u8) -> Result<Self::Value, E> {
        Ok(NbtTag::Byte(v as i8))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(NbtTag::Long(v as i64))
    }

    fn visit_f32<E: de::Error>(self, v: f32) -> Result<Self::Value, E> {
        Ok(NbtTag::Float(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(NbtTag::Double(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(NbtTag::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(NbtTag::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut list = NbtList::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(element) = seq.next_element::<NbtTag>()? {
            list.push(element)
                .map_err(|_| de::Error::custom("heterogeneous sequence deserialized as an NBT list"))?;
        }
        Ok(NbtTag::List(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut compound = NbtCompound::new();
        while let Some((key, value)) = map.next_entry::<String, NbtTag>()? {
            compound.insert(key, value);
        }
        Ok(NbtTag::Compound(compound))
    }
}

impl Serialize for NbtList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NbtList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let elements: Vec<NbtTag> = Deserialize::deserialize(deserializer)?;
        Ok(elements.into_iter().collect())
    }
}

impl Serialize for NbtCompound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NbtCompound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NbtCompoundVisitor)
    }
}

struct NbtCompoundVisitor;

impl<'de> Visitor<'de> for NbtCompoundVisitor {
    type Value = NbtCompound;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map representable as an NBT compound")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut compound = NbtCompound::new();
        while let Some((key, value)) = map.next_entry::<String, NbtTag>()? {
            compound.insert(key, value);
        }
        Ok(compound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Player {
        name: String,
        health: i16,
        scores: Vec<i32>,
    }

    #[test]
    fn tag_tree_round_trips_through_a_typed_struct() {
        let mut compound = NbtCompound::new();
        compound.insert("name", "Alex");
        compound.insert("health", 18i16);
        let mut scores = NbtList::new();
        scores.push(4i32).unwrap();
        scores.push(5i32).unwrap();
        compound.insert("scores", scores);
        let tag = NbtTag::Compound(compound);

        let value = serde_json::to_value(&tag).unwrap();
        let player: Player = serde_json::from_value(value).unwrap();
        assert_eq!(
            player,
            Player {
                name: "Alex".to_owned(),
                health: 18,
                scores: vec![4, 5],
            }
        );
    }
}
