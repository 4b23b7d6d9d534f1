//! # Validation
//!
//! Recomputes every hash on a private copy and compares it against the
//! `_hash` fields stored in the caller's tree, top-down. A map is only
//! descended into once its own stored hash has matched, so the error names
//! the outermost point of divergence.

use tracing::debug;

use crate::config::{ApplyConfig, ValidateConfig};
use crate::digest::DigestPrimitive;
use crate::error::JsonHashError;
use crate::hasher::JsonHasher;
use crate::node::{stored_hash, JsonNode, HASH_KEY};
use crate::path::NodePath;

impl<D: DigestPrimitive> JsonHasher<D> {
    /// Check the stored hashes of `node` and return it unchanged on success.
    ///
    /// # Errors
    ///
    /// - `HashMismatch` with the path of the first map whose stored hash
    ///   differs from the recomputed one;
    /// - `HashMissing` for a map without a hash, unless
    ///   `ignore_missing_hashes` is set;
    /// - any error `apply` would raise for the same tree.
    pub fn validate<'a>(
        &self,
        node: &'a JsonNode,
        options: &ValidateConfig,
    ) -> Result<&'a JsonNode, JsonHashError> {
        let fresh = self.apply(node, &ApplyConfig::overwrite())?;
        compare(node, &fresh, &mut NodePath::root(), options)?;
        debug!("document hashes valid");
        Ok(node)
    }
}

fn compare(
    stored: &JsonNode,
    fresh: &JsonNode,
    path: &mut NodePath,
    options: &ValidateConfig,
) -> Result<(), JsonHashError> {
    match (stored, fresh) {
        (JsonNode::Map(stored_map), JsonNode::Map(fresh_map)) => {
            let expected = stored_hash(fresh_map).unwrap_or_default();
            match stored_hash(stored_map) {
                Some(actual) if actual != expected => {
                    return Err(JsonHashError::HashMismatch {
                        path: path.to_string(),
                        expected: expected.to_owned(),
                        actual: actual.to_owned(),
                    });
                }
                Some(_) => {}
                None if options.ignore_missing_hashes => {}
                None => {
                    return Err(JsonHashError::HashMissing {
                        path: path.to_string(),
                    })
                }
            }
            for (key, value) in stored_map {
                if key == HASH_KEY {
                    continue;
                }
                if let Some(fresh_value) = fresh_map.get(key) {
                    path.push_key(key);
                    compare(value, fresh_value, path, options)?;
                    path.pop();
                }
            }
            Ok(())
        }
        (JsonNode::List(stored_items), JsonNode::List(fresh_items)) => {
            for (index, (value, fresh_value)) in stored_items.iter().zip(fresh_items).enumerate() {
                path.push_index(index);
                compare(value, fresh_value, path, options)?;
                path.pop();
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Validate `node` under the default configuration.
pub fn validate(node: &JsonNode) -> Result<&JsonNode, JsonHashError> {
    JsonHasher::default().validate(node, &ValidateConfig::default())
}
