//! # Canonical Encoding — Byte Production for Hashing
//!
//! This module defines [`CanonicalBytes`], the sole construction path for
//! bytes that are fed into a digest.
//!
//! ## Invariant
//!
//! The inner buffer is private. The only way to construct `CanonicalBytes`
//! is [`CanonicalBytes::encode()`], so every digest in the crate is computed
//! over bytes produced by the rules below.
//!
//! ## Encoding Rules
//!
//! 1. Object keys are sorted ascending by code point.
//! 2. No whitespace between tokens.
//! 3. Strings are wrapped in `"` and only `"` is escaped (as `\"`). No other
//!    character is escaped; this is the encoding every peer implementation
//!    produces, so it is kept as is.
//! 4. Numbers use [`format_number`]: integers without a decimal point,
//!    shortest round-tripping digits otherwise.
//! 5. `true`, `false` and `null` as literals.
//!
//! The encoder does not normalize numbers or substitute child hashes; the
//! hasher reduces a node first and hands the reduced form in here.

use crate::error::CanonicalizationError;
use crate::node::JsonNode;
use crate::number::format_number;

/// Bytes produced exclusively by the canonical encoder.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::encode()`.
/// - Keys are sorted, separators compact, numbers finite.
/// - Content is valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Encode a node in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::NonFiniteNumber` if the node holds a
    /// NaN or an infinity.
    pub fn encode(node: &JsonNode) -> Result<Self, CanonicalizationError> {
        let mut out = String::new();
        write_node(&mut out, node)?;
        Ok(Self(out))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical form as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

fn write_node(out: &mut String, node: &JsonNode) -> Result<(), CanonicalizationError> {
    match node {
        JsonNode::Null => out.push_str("null"),
        JsonNode::Bool(true) => out.push_str("true"),
        JsonNode::Bool(false) => out.push_str("false"),
        JsonNode::Number(n) => {
            if !n.is_finite() {
                return Err(CanonicalizationError::NonFiniteNumber(*n));
            }
            out.push_str(&format_number(*n));
        }
        JsonNode::String(s) => write_string(out, s),
        JsonNode::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_node(out, item)?;
            }
            out.push(']');
        }
        JsonNode::Map(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_node(out, value)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        if ch == '"' {
            out.push_str("\\\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
