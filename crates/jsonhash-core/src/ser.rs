//! # Conversion Into the Node Model
//!
//! [`to_node`] copies any `Serialize` value into a fresh, fully independent
//! [`JsonNode`] tree. This is the only place an unsupported value kind can
//! show up, and it is rejected here with `UnsupportedType` rather than
//! silently coerced:
//!
//! - byte blobs (`serialize_bytes`) have no JSON form;
//! - map keys must be strings, chars, unit variants or integers; integers
//!   are written out in decimal at full width, never through `f64`.
//!
//! Unit values and `None` become `Null`. Floats keep their exact value,
//! including NaN and infinities, so the number policy can reject them
//! explicitly instead of losing them to `null`.

use serde::ser::{self, Impossible, Serialize};

use crate::error::CanonicalizationError;
use crate::node::{JsonNode, Map};

/// Copy a serializable value into a [`JsonNode`] tree.
///
/// # Errors
///
/// Returns `CanonicalizationError::UnsupportedType` for byte blobs and
/// non-scalar or non-integral map keys.
pub fn to_node<T: ?Sized + Serialize>(value: &T) -> Result<JsonNode> {
    value.serialize(NodeSerializer)
}

/// Serde serializer producing [`JsonNode`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeSerializer;

type Result<T> = std::result::Result<T, CanonicalizationError>;

impl ser::Serializer for NodeSerializer {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    type SerializeSeq = SerializeList;
    type SerializeTuple = SerializeList;
    type SerializeTupleStruct = SerializeList;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<JsonNode> {
        Ok(JsonNode::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<JsonNode> {
        Ok(JsonNode::Number(v as f64))
    }

    fn serialize_i128(self, v: i128) -> Result<JsonNode> {
        Ok(JsonNode::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<JsonNode> {
        Ok(JsonNode::Number(v as f64))
    }

    fn serialize_u128(self, v: u128) -> Result<JsonNode> {
        Ok(JsonNode::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<JsonNode> {
        Ok(JsonNode::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<JsonNode> {
        Ok(JsonNode::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<JsonNode> {
        Ok(JsonNode::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsonNode> {
        Ok(JsonNode::String(v.to_owned()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<JsonNode> {
        Err(CanonicalizationError::UnsupportedType("bytes".to_string()))
    }

    fn serialize_none(self) -> Result<JsonNode> {
        Ok(JsonNode::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<JsonNode> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsonNode> {
        Ok(JsonNode::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsonNode> {
        Ok(JsonNode::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsonNode> {
        Ok(JsonNode::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<JsonNode> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsonNode> {
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_owned(), value.serialize(self)?);
        Ok(JsonNode::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeList> {
        Ok(SerializeList {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeList> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant: variant.to_owned(),
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap {
            map: Map::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant: variant.to_owned(),
            map: Map::with_capacity(len),
        })
    }
}

pub struct SerializeList {
    items: Vec<JsonNode>,
}

impl ser::SerializeSeq for SerializeList {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonNode> {
        Ok(JsonNode::List(self.items))
    }
}

impl ser::SerializeTuple for SerializeList {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonNode> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeList {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonNode> {
        ser::SerializeSeq::end(self)
    }
}

pub struct SerializeTupleVariant {
    variant: String,
    items: Vec<JsonNode>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonNode> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant, JsonNode::List(self.items));
        Ok(JsonNode::Map(map))
    }
}

pub struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.next_key = Some(map_key(key)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let key = self.next_key.take().ok_or_else(|| {
            CanonicalizationError::Custom("map value serialized before its key".to_string())
        })?;
        self.map.insert(key, value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonNode> {
        Ok(JsonNode::Map(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.map.insert(key.to_owned(), value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonNode> {
        Ok(JsonNode::Map(self.map))
    }
}

pub struct SerializeStructVariant {
    variant: String,
    map: Map,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = JsonNode;
    type Error = CanonicalizationError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.map.insert(key.to_owned(), value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<JsonNode> {
        let mut outer = Map::with_capacity(1);
        outer.insert(self.variant, JsonNode::Map(self.map));
        Ok(JsonNode::Map(outer))
    }
}

/// Serialize a map key, accepting strings and integers only.
fn map_key<T: ?Sized + Serialize>(key: &T) -> Result<String> {
    key.serialize(MapKeySerializer)
}

fn key_rejected(kind: &str) -> CanonicalizationError {
    CanonicalizationError::UnsupportedType(format!("{kind} map key"))
}

/// Turns map keys into strings. Integers are stringified directly so that
/// keys beyond 2^53 stay distinct.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = CanonicalizationError;

    type SerializeSeq = Impossible<String, CanonicalizationError>;
    type SerializeTuple = Impossible<String, CanonicalizationError>;
    type SerializeTupleStruct = Impossible<String, CanonicalizationError>;
    type SerializeTupleVariant = Impossible<String, CanonicalizationError>;
    type SerializeMap = Impossible<String, CanonicalizationError>;
    type SerializeStruct = Impossible<String, CanonicalizationError>;
    type SerializeStructVariant = Impossible<String, CanonicalizationError>;

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(key_rejected("boolean"))
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_rejected("number"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_rejected("number"))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_rejected("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_rejected("null"))
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_rejected("null"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_rejected("null"))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String> {
        Err(key_rejected("map"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_rejected("list"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_rejected("list"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_rejected("list"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_rejected("map"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_rejected("map"))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_rejected("map"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_rejected("map"))
    }
}
