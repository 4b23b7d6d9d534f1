//! # Hasher — Recursive Apply
//!
//! [`JsonHasher`] walks a tree leaves-first and writes a `_hash` into every
//! map. A map's hash covers its own fields (except `_hash`) with every
//! child map replaced by the child's hash and every list flattened the same
//! way, which makes the hashes Merkle-style: changing a leaf changes every
//! ancestor up to the root.
//!
//! ## Policy
//!
//! - `update_existing_hashes = false`: a map that already carries a
//!   non-empty `_hash` is an opaque leaf; its hash is reused and its
//!   children are not visited.
//! - `recursive = false`: the root is always recomputed, hashed descendants
//!   are taken as they are.
//! - `throw_on_hash_mismatch`: a recomputed hash that differs from a stored
//!   one fails with `HashMismatch`; otherwise it is overwritten.
//!
//! Every error aborts the whole operation, and the caller's tree is never
//! left half-hashed.

use tracing::{debug, trace};

use crate::canonical::CanonicalBytes;
use crate::config::{ApplyConfig, HashConfig};
use crate::digest::{encode_hash, encoded_len, DigestAlgorithm, DigestPrimitive};
use crate::error::{CanonicalizationError, JsonHashError};
use crate::node::{stored_hash, JsonNode, Map, HASH_KEY};
use crate::number::normalize;
use crate::path::NodePath;

/// Key of the synthetic map used to hash a bare list.
pub const LIST_WRAPPER_KEY: &str = "value";

/// Computes, embeds and checks content hashes.
#[derive(Debug, Clone)]
pub struct JsonHasher<D = DigestAlgorithm> {
    config: HashConfig,
    digest: D,
}

impl JsonHasher<DigestAlgorithm> {
    /// Create a hasher using the configured built-in algorithm.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: HashConfig) -> Result<Self, JsonHashError> {
        config.validate()?;
        Ok(Self {
            digest: config.algorithm,
            config,
        })
    }
}

impl Default for JsonHasher<DigestAlgorithm> {
    fn default() -> Self {
        let config = HashConfig::default();
        Self {
            digest: config.algorithm,
            config,
        }
    }
}

impl<D: DigestPrimitive> JsonHasher<D> {
    /// Create a hasher with a custom digest primitive.
    ///
    /// `config.algorithm` is ignored; `hash_length` is checked against the
    /// output size of `digest`.
    pub fn with_digest(config: HashConfig, digest: D) -> Result<Self, JsonHashError> {
        let output = digest.digest(&[]).len();
        config.validate_for(encoded_len(output))?;
        Ok(Self { config, digest })
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Return a hashed copy of `node`, leaving `node` untouched.
    ///
    /// The root must be a map or a list. A list root gets no hash of its
    /// own; the maps inside it are hashed.
    pub fn apply(
        &self,
        node: &JsonNode,
        options: &ApplyConfig,
    ) -> Result<JsonNode, JsonHashError> {
        check_nesting(node, self.config.max_depth)?;
        let mut copy = node.clone();
        self.hash_root(&mut copy, options)?;
        Ok(copy)
    }

    /// Hash `node` in place.
    ///
    /// On error `node` is left exactly as it was.
    pub fn apply_in_place(
        &self,
        node: &mut JsonNode,
        options: &ApplyConfig,
    ) -> Result<(), JsonHashError> {
        let hashed = self.apply(node, options)?;
        *node = hashed;
        Ok(())
    }

    /// Parse JSON text, hash it and write it back in compact form.
    ///
    /// Field order is preserved; maps that had no `_hash` get one appended.
    pub fn apply_to_string(
        &self,
        text: &str,
        options: &ApplyConfig,
    ) -> Result<String, JsonHashError> {
        let mut node: JsonNode = serde_json::from_str(text)?;
        self.apply_in_place(&mut node, options)?;
        Ok(serde_json::to_string(&node)?)
    }

    /// Compute the hash of an ad hoc value.
    ///
    /// - string: digest of its UTF-8 bytes;
    /// - list: hash of the map `{"value": list}`;
    /// - map: the hash `apply` would store in it, ignoring any stored hashes.
    pub fn calc_hash(&self, value: &JsonNode) -> Result<String, JsonHashError> {
        check_nesting(value, self.config.max_depth)?;
        match value {
            JsonNode::String(s) => Ok(self.hash_bytes(s.as_bytes())),
            JsonNode::List(items) => {
                let mut wrapper = Map::with_capacity(1);
                wrapper.insert(LIST_WRAPPER_KEY.to_owned(), JsonNode::List(items.clone()));
                self.calc_hash(&JsonNode::Map(wrapper))
            }
            JsonNode::Map(map) => {
                let mut copy = map.clone();
                let options = ApplyConfig::overwrite();
                let pass = Pass::new(self, &options);
                pass.hash_map(&mut copy, &mut NodePath::root(), true)
            }
            other => Err(unsupported_root(other)),
        }
    }

    /// Digest and encode raw bytes.
    pub fn hash_bytes(&self, data: &[u8]) -> String {
        encode_hash(&self.digest.digest(data), self.config.hash_length)
    }

    /// Canonical bytes a map's hash is computed over, children reduced to
    /// their hashes. Nothing is written into `node`.
    pub fn canonical_bytes(&self, node: &JsonNode) -> Result<CanonicalBytes, JsonHashError> {
        check_nesting(node, self.config.max_depth)?;
        let mut copy = node.clone();
        let options = ApplyConfig::overwrite();
        let pass = Pass::new(self, &options);
        let mut path = NodePath::root();
        let reduced = match &mut copy {
            JsonNode::Map(map) => pass.reduce_fields(map, &mut path)?,
            other => pass.reduce_value(other, &mut path)?,
        };
        Ok(CanonicalBytes::encode(&reduced)?)
    }

    fn hash_root(&self, root: &mut JsonNode, options: &ApplyConfig) -> Result<(), JsonHashError> {
        let pass = Pass::new(self, options);
        let mut path = NodePath::root();
        match root {
            JsonNode::Map(map) => {
                let hash = pass.hash_map(map, &mut path, true)?;
                debug!(hash = %hash, "hashed document");
                Ok(())
            }
            JsonNode::List(_) => {
                pass.reduce_value(root, &mut path)?;
                debug!("hashed maps inside list root");
                Ok(())
            }
            other => Err(unsupported_root(other)),
        }
    }

    fn hash_reduced(&self, reduced: &JsonNode) -> Result<String, JsonHashError> {
        let bytes = CanonicalBytes::encode(reduced)?;
        trace!(canonical = bytes.as_str(), "encoded node");
        Ok(encode_hash(
            &self.digest.digest_canonical(&bytes),
            self.config.hash_length,
        ))
    }
}

/// Fail with `DepthExceeded` at the first map or list nested `max_depth`
/// levels below `root`, in document order.
///
/// Iterative, so it is safe to run on input whose depth would overflow the
/// stack of the recursive walk or of `Clone`.
fn check_nesting(root: &JsonNode, max_depth: usize) -> Result<(), JsonHashError> {
    enum Children<'a> {
        Map(indexmap::map::Iter<'a, String, JsonNode>),
        List(std::iter::Enumerate<std::slice::Iter<'a, JsonNode>>),
    }

    fn children(node: &JsonNode) -> Option<Children<'_>> {
        match node {
            JsonNode::Map(map) => Some(Children::Map(map.iter())),
            JsonNode::List(items) => Some(Children::List(items.iter().enumerate())),
            _ => None,
        }
    }

    let mut path = NodePath::root();
    let mut stack: Vec<Children<'_>> = children(root).into_iter().collect();
    while let Some(top) = stack.last_mut() {
        let next = match top {
            Children::Map(entries) => entries.next().map(|(key, value)| {
                path.push_key(key);
                value
            }),
            Children::List(items) => items.next().map(|(index, value)| {
                path.push_index(index);
                value
            }),
        };
        let Some(child) = next else {
            stack.pop();
            path.pop();
            continue;
        };
        match children(child) {
            Some(grandchildren) => {
                if path.depth() >= max_depth {
                    return Err(JsonHashError::DepthExceeded {
                        path: path.to_string(),
                        max_depth,
                    });
                }
                stack.push(grandchildren);
            }
            None => path.pop(),
        }
    }
    Ok(())
}

fn unsupported_root(node: &JsonNode) -> JsonHashError {
    CanonicalizationError::UnsupportedType(format!("{} at document root", node.kind_name())).into()
}

/// One apply traversal: a hasher plus the policy for this call.
struct Pass<'a, D> {
    hasher: &'a JsonHasher<D>,
    options: &'a ApplyConfig,
}

impl<'a, D: DigestPrimitive> Pass<'a, D> {
    fn new(hasher: &'a JsonHasher<D>, options: &'a ApplyConfig) -> Self {
        Self { hasher, options }
    }

    /// Hash a map post-order, write its `_hash` and return it.
    fn hash_map(
        &self,
        map: &mut Map,
        path: &mut NodePath,
        is_root: bool,
    ) -> Result<String, JsonHashError> {
        let existing = stored_hash(map).map(str::to_owned);

        if let Some(hash) = existing.as_ref() {
            let keep = !self.options.update_existing_hashes
                || (!self.options.recursive && !is_root);
            if keep {
                trace!(path = %path, "keeping existing hash");
                return Ok(hash.clone());
            }
        }

        let reduced = self.reduce_fields(map, path)?;
        let hash = self.hasher.hash_reduced(&reduced)?;

        if let Some(old) = existing {
            if old != hash {
                if self.options.throw_on_hash_mismatch {
                    return Err(JsonHashError::HashMismatch {
                        path: path.to_string(),
                        expected: hash,
                        actual: old,
                    });
                }
                debug!(path = %path, old = %old, new = %hash, "overwriting stale hash");
            }
        }

        map.insert(HASH_KEY.to_owned(), JsonNode::String(hash.clone()));
        Ok(hash)
    }

    /// The to-be-hashed form of a map's fields: `_hash` dropped, children
    /// reduced.
    fn reduce_fields(
        &self,
        map: &mut Map,
        path: &mut NodePath,
    ) -> Result<JsonNode, JsonHashError> {
        self.check_depth(path)?;
        let mut reduced = Map::with_capacity(map.len());
        for (key, value) in map.iter_mut() {
            if key == HASH_KEY {
                continue;
            }
            path.push_key(key);
            let value = self.reduce_value(value, path)?;
            path.pop();
            reduced.insert(key.clone(), value);
        }
        Ok(JsonNode::Map(reduced))
    }

    /// Maps become their hash, lists are flattened element by element and
    /// numbers are normalized.
    fn reduce_value(
        &self,
        value: &mut JsonNode,
        path: &mut NodePath,
    ) -> Result<JsonNode, JsonHashError> {
        match value {
            JsonNode::Map(map) => {
                self.check_depth(path)?;
                Ok(JsonNode::String(self.hash_map(map, path, false)?))
            }
            JsonNode::List(items) => {
                self.check_depth(path)?;
                let mut flattened = Vec::with_capacity(items.len());
                for (index, item) in items.iter_mut().enumerate() {
                    path.push_index(index);
                    flattened.push(self.reduce_value(item, path)?);
                    path.pop();
                }
                Ok(JsonNode::List(flattened))
            }
            JsonNode::Number(n) => normalize(*n, &self.hasher.config.numbers)
                .map(JsonNode::Number)
                .map_err(|source| JsonHashError::Number {
                    path: path.to_string(),
                    source,
                }),
            JsonNode::Null | JsonNode::Bool(_) | JsonNode::String(_) => Ok(value.clone()),
        }
    }

    fn check_depth(&self, path: &NodePath) -> Result<(), JsonHashError> {
        let max_depth = self.hasher.config.max_depth;
        if path.depth() >= max_depth {
            return Err(JsonHashError::DepthExceeded {
                path: path.to_string(),
                max_depth,
            });
        }
        Ok(())
    }
}

/// Hashed copy of `node` under the default configuration.
pub fn apply(node: &JsonNode) -> Result<JsonNode, JsonHashError> {
    JsonHasher::default().apply(node, &ApplyConfig::default())
}

/// Hash `node` in place under the default configuration.
pub fn apply_in_place(node: &mut JsonNode) -> Result<(), JsonHashError> {
    JsonHasher::default().apply_in_place(node, &ApplyConfig::default())
}

/// Hash JSON text under the default configuration.
pub fn apply_to_string(text: &str) -> Result<String, JsonHashError> {
    JsonHasher::default().apply_to_string(text, &ApplyConfig::default())
}

/// Hash of an ad hoc value under the default configuration.
pub fn calc_hash(value: &JsonNode) -> Result<String, JsonHashError> {
    JsonHasher::default().calc_hash(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NumberConfig, NumberPolicy};
    use crate::digest::FnDigest;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn node(value: serde_json::Value) -> JsonNode {
        JsonNode::from(value)
    }

    fn hash_of(value: serde_json::Value) -> String {
        apply(&node(value))
            .unwrap()
            .hash()
            .expect("root should carry a hash")
            .to_string()
    }

    #[test]
    fn string_value() {
        assert_eq!(hash_of(json!({"key": "value"})), "5Dq88zdSRIOcAS-WM_lYYt");
    }

    #[test]
    fn integer_and_float_one_agree() {
        assert_eq!(hash_of(json!({"key": 1})), "t4HVsGBJblqznOBwy6IeLt");
        assert_eq!(hash_of(json!({"key": 1.0})), "t4HVsGBJblqznOBwy6IeLt");
    }

    #[test]
    fn key_order_does_not_matter() {
        let a = hash_of(json!({"a": "value", "b": 1.0, "c": true}));
        let mut reordered = Map::new();
        reordered.insert("b".into(), 1.0.into());
        reordered.insert("a".into(), "value".into());
        reordered.insert("c".into(), true.into());
        let b = apply(&JsonNode::Map(reordered)).unwrap();
        assert_eq!(b.hash(), Some(a.as_str()));
    }

    #[test]
    fn list_field() {
        assert_eq!(
            hash_of(json!({"key": ["value", 1.0, true]})),
            "nbNb1YfpgqnPfyFTyCQ5YF"
        );
    }

    #[test]
    fn null_field() {
        assert_eq!(hash_of(json!({"key": null})), "BZwS6bAVtKxSW0AW5y8ANk");
    }

    #[test]
    fn nested_maps_are_hashed_and_substituted() {
        let hashed = apply(&node(json!({"a": {"b": 1}}))).unwrap();
        assert_eq!(
            hashed.pointer("/a/_hash").and_then(JsonNode::as_str),
            Some("647TzLUCMJO1b0kKRlAeiN")
        );
        assert_eq!(hashed.hash(), Some("aGyCrR_fCrzMa6oP_6N50z"));
    }

    #[test]
    fn maps_inside_nested_lists() {
        let hashed = apply(&node(json!({"a": [[1, {"b": 2}], {}]}))).unwrap();
        assert_eq!(
            hashed.pointer("/a/0/1/_hash").and_then(JsonNode::as_str),
            Some("CrGm05TNMBlfBkK2euEYDD")
        );
        assert_eq!(
            hashed.pointer("/a/1/_hash").and_then(JsonNode::as_str),
            Some("RBNvo1WzZ4oRRq0W9-hknp")
        );
        assert_eq!(hashed.hash(), Some("UGgWJDSw6jNXm4tYXkUWb7"));
    }

    #[test]
    fn merkle_propagation() {
        let before = apply(&node(json!({"a": {"x": 1}, "b": {"y": 2}}))).unwrap();
        let after = apply(&node(json!({"a": {"x": 1}, "b": {"y": 3}}))).unwrap();
        assert_eq!(before.hash(), Some("6drbb4yaq-9yH7QNdluo-M"));
        assert_eq!(after.hash(), Some("f29lEa1pGzvlOWaKpD-hwP"));
        assert_eq!(before.pointer("/a/_hash"), after.pointer("/a/_hash"));
        assert_ne!(before.pointer("/b/_hash"), after.pointer("/b/_hash"));
    }

    #[test]
    fn numbers_are_truncated_before_hashing() {
        assert_eq!(hash_of(json!({"a": 1.23456789012345})), "j84RS1umPL5JdbaAWnN1Hs");
        assert_eq!(hash_of(json!({"a": 1.2345678901})), "j84RS1umPL5JdbaAWnN1Hs");
    }

    #[test]
    fn hashed_values_keep_original_numbers() {
        let hashed = apply(&node(json!({"a": 1.23456789012345}))).unwrap();
        assert_eq!(hashed.get("a"), Some(&JsonNode::Number(1.23456789012345)));
    }

    #[test]
    fn apply_leaves_the_original_untouched() {
        let original = node(json!({"a": {"b": 1}}));
        let hashed = apply(&original).unwrap();
        assert!(original.hash().is_none());
        assert!(original.pointer("/a/_hash").is_none());
        assert!(hashed.pointer("/a/_hash").is_some());
    }

    #[test]
    fn apply_in_place_mutates() {
        let mut doc = node(json!({"key": "value"}));
        apply_in_place(&mut doc).unwrap();
        assert_eq!(doc.hash(), Some("5Dq88zdSRIOcAS-WM_lYYt"));
    }

    #[test]
    fn apply_in_place_is_all_or_nothing() {
        let mut doc = node(json!({"ok": {"x": 1}, "bad": [f64::MAX]}));
        let before = doc.clone();
        let err = apply_in_place(&mut doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RangeExceeded);
        assert_eq!(err.path(), Some("/bad/0"));
        assert_eq!(doc, before);
    }

    #[test]
    fn nan_is_rejected_with_path() {
        let mut map = Map::new();
        map.insert("x".into(), JsonNode::List(vec![JsonNode::Number(f64::NAN)]));
        let err = apply(&JsonNode::Map(map)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
        assert_eq!(err.path(), Some("/x/0"));
    }

    #[test]
    fn first_error_in_post_order_wins() {
        let mut inner = Map::new();
        inner.insert("n".into(), JsonNode::Number(f64::NAN));
        let mut outer = Map::new();
        outer.insert("child".into(), JsonNode::Map(inner));
        outer.insert("_hash".into(), "stale".into());
        let err = apply(&JsonNode::Map(outer)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
        assert_eq!(err.path(), Some("/child/n"));
    }

    #[test]
    fn mismatch_throws_by_default() {
        let err = apply(&node(json!({"a": 3, "_hash": "invalid"}))).unwrap_err();
        match err {
            JsonHashError::HashMismatch { path, expected, actual } => {
                assert_eq!(path, "/");
                assert_eq!(actual, "invalid");
                assert_eq!(expected, "cHeM4BrY0agsgKNQC-5Hbz");
            }
            other => panic!("expected HashMismatch, got: {other}"),
        }
    }

    #[test]
    fn mismatch_in_child_reports_child_path() {
        let doc = node(json!({"parent": [{"child": "x", "_hash": "wrong"}]}));
        let err = apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::HashMismatch);
        assert_eq!(err.path(), Some("/parent/0"));
    }

    #[test]
    fn mismatch_overwritten_when_allowed() {
        let hasher = JsonHasher::default();
        let doc = node(json!({"a": 3, "_hash": "invalid"}));
        let hashed = hasher.apply(&doc, &ApplyConfig::overwrite()).unwrap();
        assert_eq!(hashed.hash(), Some("cHeM4BrY0agsgKNQC-5Hbz"));
    }

    #[test]
    fn empty_hash_is_treated_as_missing() {
        let hashed = apply(&node(json!({"a": 3, "_hash": ""}))).unwrap();
        assert_eq!(hashed.hash(), Some("cHeM4BrY0agsgKNQC-5Hbz"));
    }

    #[test]
    fn existing_hash_field_keeps_its_position() {
        let out = apply_to_string(r#"{"_hash":"","key":"value"}"#).unwrap();
        assert_eq!(out, r#"{"_hash":"5Dq88zdSRIOcAS-WM_lYYt","key":"value"}"#);
    }

    #[test]
    fn preserve_existing_treats_hashed_children_as_opaque() {
        let hasher = JsonHasher::default();
        let doc = node(json!({"child": {"x": 1, "_hash": "kept"}, "y": 2}));
        let hashed = hasher.apply(&doc, &ApplyConfig::preserve_existing()).unwrap();
        assert_eq!(hashed.pointer("/child/_hash").and_then(JsonNode::as_str), Some("kept"));

        let expected = hasher
            .apply(&node(json!({"child": "kept", "y": 2})), &ApplyConfig::default())
            .unwrap();
        assert_eq!(hashed.hash(), expected.hash());
    }

    #[test]
    fn preserve_existing_is_idempotent() {
        let hasher = JsonHasher::default();
        let options = ApplyConfig::preserve_existing();
        let once = hasher
            .apply(&node(json!({"a": {"b": [1, {"c": 2}]}, "d": "e"})), &options)
            .unwrap();
        let twice = hasher.apply(&once, &options).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn preserve_existing_keeps_root_hash() {
        let hasher = JsonHasher::default();
        let doc = node(json!({"a": 3, "_hash": "invalid"}));
        let hashed = hasher.apply(&doc, &ApplyConfig::preserve_existing()).unwrap();
        assert_eq!(hashed.hash(), Some("invalid"));
    }

    #[test]
    fn non_recursive_forces_root_only() {
        let hasher = JsonHasher::default();
        let options = ApplyConfig {
            recursive: false,
            throw_on_hash_mismatch: false,
            ..ApplyConfig::default()
        };
        let doc = node(json!({
            "child": {"x": 1, "_hash": "kept"},
            "fresh": {"b": 1},
            "_hash": "old"
        }));
        let hashed = hasher.apply(&doc, &options).unwrap();
        assert_eq!(hashed.pointer("/child/_hash").and_then(JsonNode::as_str), Some("kept"));
        assert_eq!(
            hashed.pointer("/fresh/_hash").and_then(JsonNode::as_str),
            Some("647TzLUCMJO1b0kKRlAeiN")
        );
        assert_ne!(hashed.hash(), Some("old"));
    }

    #[test]
    fn list_root_hashes_contained_maps() {
        let hashed = apply(&node(json!([{"b": 1}, 2, [{"b": 1}]]))).unwrap();
        assert!(hashed.hash().is_none());
        assert_eq!(
            hashed.pointer("/0/_hash").and_then(JsonNode::as_str),
            Some("647TzLUCMJO1b0kKRlAeiN")
        );
        assert_eq!(
            hashed.pointer("/2/0/_hash").and_then(JsonNode::as_str),
            Some("647TzLUCMJO1b0kKRlAeiN")
        );
    }

    #[test]
    fn scalar_root_is_unsupported() {
        let err = apply(&JsonNode::from("text")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert!(err.to_string().contains("string at document root"));
    }

    #[test]
    fn depth_limit() {
        let hasher = JsonHasher::new(HashConfig {
            max_depth: 3,
            ..HashConfig::default()
        })
        .unwrap();
        let ok = node(json!({"a": {"b": {"c": 1}}}));
        assert!(hasher.apply(&ok, &ApplyConfig::default()).is_ok());

        let deep = node(json!({"a": {"b": {"c": {"d": 1}}}}));
        let err = hasher.apply(&deep, &ApplyConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert_eq!(err.path(), Some("/a/b/c"));
    }

    fn nested_lists(depth: usize) -> JsonNode {
        let mut doc = JsonNode::from(1);
        for _ in 0..depth {
            doc = JsonNode::List(vec![doc]);
        }
        let mut root = Map::new();
        root.insert("deep".into(), doc);
        JsonNode::Map(root)
    }

    #[test]
    fn deeply_nested_input_fails_cleanly() {
        let doc = nested_lists(2_000);
        let err = apply(&doc).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DepthExceeded);
        assert!(err.path().is_some_and(|p| p.starts_with("/deep/0/0")));

        let mut in_place = nested_lists(2_000);
        assert_eq!(
            apply_in_place(&mut in_place).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
        assert_eq!(crate::validate(&doc).unwrap_err().kind(), ErrorKind::DepthExceeded);
        assert_eq!(calc_hash(&doc).unwrap_err().kind(), ErrorKind::DepthExceeded);
        let list = doc.get("deep").unwrap();
        assert_eq!(calc_hash(list).unwrap_err().kind(), ErrorKind::DepthExceeded);
        assert_eq!(
            JsonHasher::default().canonical_bytes(&doc).unwrap_err().kind(),
            ErrorKind::DepthExceeded
        );
    }

    #[test]
    fn depth_limit_path_matches_recursive_walk() {
        let hasher = JsonHasher::new(HashConfig {
            max_depth: 2,
            ..HashConfig::default()
        })
        .unwrap();
        let doc = node(json!({"ok": [1, 2], "x/y": [{"z": {"w": 1}}]}));
        let err = hasher.apply(&doc, &ApplyConfig::default()).unwrap_err();
        assert_eq!(err.path(), Some("/x~1y/0"));
        assert!(doc.pointer("/x~1y/0").is_some());
    }

    #[test]
    fn hash_length_is_configurable() {
        let hasher = JsonHasher::new(HashConfig {
            hash_length: 10,
            ..HashConfig::default()
        })
        .unwrap();
        let hashed = hasher
            .apply(&node(json!({"key": "value"})), &ApplyConfig::default())
            .unwrap();
        assert_eq!(hashed.hash(), Some("5Dq88zdSRI"));
    }

    #[test]
    fn invalid_config_rejected() {
        let err = JsonHasher::new(HashConfig {
            hash_length: 100,
            ..HashConfig::default()
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn strict_profile_rejects_fine_numbers() {
        let hasher = JsonHasher::new(HashConfig::strict()).unwrap();
        assert!(hasher
            .apply(&node(json!({"a": 1.5, "b": 0.125})), &ApplyConfig::default())
            .is_ok());
        let err = hasher
            .apply(&node(json!({"a": {"b": 1.0005}})), &ApplyConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PrecisionExceeded);
        assert_eq!(err.path(), Some("/a/b"));
    }

    #[test]
    fn range_check_can_be_disabled() {
        let hasher = JsonHasher::new(HashConfig {
            numbers: NumberConfig {
                throw_on_range_error: false,
                policy: NumberPolicy::Truncate { digits: 10 },
                ..NumberConfig::default()
            },
            ..HashConfig::default()
        })
        .unwrap();
        assert!(hasher
            .apply(&node(json!({"big": 1e300})), &ApplyConfig::default())
            .is_ok());
    }

    #[test]
    fn custom_digest_primitive() {
        let hasher = JsonHasher::with_digest(
            HashConfig {
                hash_length: 4,
                ..HashConfig::default()
            },
            FnDigest(|data: &[u8]| {
                let mut out = data.to_vec();
                out.resize(32, 0);
                out
            }),
        )
        .unwrap();
        // Zero-padded identity: the hash starts with the base64url of the
        // canonical bytes.
        let hashed = hasher
            .apply(&node(json!({"a": 1})), &ApplyConfig::default())
            .unwrap();
        assert_eq!(hashed.hash(), Some("eyJh"));
    }

    #[test]
    fn calc_hash_variants() {
        assert_eq!(
            calc_hash(&node(json!({"key": "value", "_hash": "ignored"}))).unwrap(),
            "5Dq88zdSRIOcAS-WM_lYYt"
        );
        assert_eq!(
            calc_hash(&node(json!(["a", 1]))).unwrap(),
            "0SP-QOa0u9pRSq3j-F0ivA"
        );
        assert_eq!(
            calc_hash(&JsonNode::from(r#"{"key":"value"}"#)).unwrap(),
            "5Dq88zdSRIOcAS-WM_lYYt"
        );
        assert_eq!(calc_hash(&JsonNode::Null).unwrap_err().kind(), ErrorKind::UnsupportedType);
    }

    #[test]
    fn canonical_bytes_substitute_children() {
        let hasher = JsonHasher::default();
        let bytes = hasher
            .canonical_bytes(&node(json!({"z": {"b": 1}, "a": [1.0, "x\"y"]})))
            .unwrap();
        assert_eq!(
            bytes.as_str(),
            r#"{"a":[1,"x\"y"],"z":"647TzLUCMJO1b0kKRlAeiN"}"#
        );
    }

    #[test]
    fn apply_to_string_round_trip() {
        let out = apply_to_string(r#"{"key":["value",1.0,true]}"#).unwrap();
        assert_eq!(out, r#"{"key":["value",1,true],"_hash":"nbNb1YfpgqnPfyFTyCQ5YF"}"#);
        assert_eq!(apply_to_string("{").unwrap_err().kind(), ErrorKind::Json);
    }
}
