//! # JSON Node Model
//!
//! [`JsonNode`] is the closed set of value kinds the hasher understands:
//! null, booleans, numbers, strings, maps and lists. Every consumer matches
//! on it exhaustively, so an unsupported kind can only enter at the
//! conversion boundary ([`crate::ser::to_node`]).
//!
//! Numbers are IEEE-754 doubles, the number model shared by every platform
//! that has to agree on a hash. Maps keep insertion order so documents
//! round-trip unchanged; the canonical encoder sorts keys on its own.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// The reserved key holding a map's content hash.
pub const HASH_KEY: &str = "_hash";

/// Largest magnitude at which every integer is exactly representable in an f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Ordered map of field name to node.
pub type Map = IndexMap<String, JsonNode>;

/// A JSON-like tree node.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonNode {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Map(Map),
    List(Vec<JsonNode>),
}

impl JsonNode {
    /// Human-readable name of the node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Map(_) => "map",
            Self::List(_) => "list",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[JsonNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<JsonNode>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field of a map node. Returns `None` for non-maps.
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// The node's `_hash`, if it is a map carrying a non-empty string hash.
    pub fn hash(&self) -> Option<&str> {
        self.as_map().and_then(stored_hash)
    }

    /// Look up a descendant by a `/`-separated path such as `/parent/0/child`.
    ///
    /// Numeric segments index into lists; every other segment is a map key,
    /// with `~1` standing for `/` and `~0` for `~` as in JSON Pointer.
    pub fn pointer(&self, path: &str) -> Option<&JsonNode> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| match node {
                Self::Map(map) => map.get(segment.replace("~1", "/").replace("~0", "~").as_str()),
                Self::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }
}

/// The non-empty string stored under `_hash`, if any.
pub(crate) fn stored_hash(map: &Map) -> Option<&str> {
    map.get(HASH_KEY)
        .and_then(JsonNode::as_str)
        .filter(|h| !h.is_empty())
}

impl From<bool> for JsonNode {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for JsonNode {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for JsonNode {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<i32> for JsonNode {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u64> for JsonNode {
    fn from(v: u64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for JsonNode {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for JsonNode {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Map> for JsonNode {
    fn from(v: Map) -> Self {
        Self::Map(v)
    }
}

impl From<Vec<JsonNode>> for JsonNode {
    fn from(v: Vec<JsonNode>) -> Self {
        Self::List(v)
    }
}

impl From<serde_json::Value> for JsonNode {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            // serde_json only holds finite numbers, all of which have an f64 view.
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl fmt::Display for JsonNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(fmt::Error),
        }
    }
}

impl Serialize for JsonNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            // Integral values are written without a fraction so `1.0` reads back as `1`.
            Self::Number(n) if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for JsonNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = JsonNode;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonNode, E> {
        Ok(JsonNode::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonNode, E> {
        Ok(JsonNode::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonNode, E> {
        Ok(JsonNode::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonNode, E> {
        Ok(JsonNode::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonNode, E> {
        Ok(JsonNode::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonNode, E> {
        Ok(JsonNode::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonNode, E> {
        Ok(JsonNode::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonNode, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonNode, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonNode::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JsonNode, A::Error> {
        let mut map = Map::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, JsonNode>()? {
            map.insert(key, value);
        }
        Ok(JsonNode::Map(map))
    }
}
