//! # jsonhash-core — Deterministic Content Hashes for JSON Trees
//!
//! Embeds a `_hash` field into every map of a JSON tree and checks those
//! hashes later. A hash is stable across platforms and key orders, and a
//! parent's hash covers its children through their hashes (Merkle-style), so
//! a change anywhere in a subtree shows up at the root.
//!
//! ```
//! use jsonhash_core::{apply, validate, JsonNode};
//!
//! let doc: JsonNode = serde_json::from_str(r#"{"key": "value"}"#).unwrap();
//! let hashed = apply(&doc).unwrap();
//! assert_eq!(hashed.hash(), Some("5Dq88zdSRIOcAS-WM_lYYt"));
//! assert!(validate(&hashed).is_ok());
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** Every digest is computed over bytes from
//!    `CanonicalBytes::encode()`: sorted keys, no whitespace, only `"`
//!    escaped, numbers in shortest round-trip form.
//!
//! 2. **Numbers are normalized before encoding.** Non-integers are truncated
//!    to a fixed number of decimal digits (or, under the strict profile,
//!    required to be multiples of a step) so that float drift between
//!    platforms does not change a hash.
//!
//! 3. **Configuration is a value.** `HashConfig`, `ApplyConfig` and
//!    `ValidateConfig` are passed into each call; there is no global state.
//!
//! 4. **All or nothing.** Apply and validate either succeed completely or
//!    fail with a path-qualified error; the caller's tree is never left
//!    partially hashed.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod config;
pub mod digest;
pub mod error;
pub mod hasher;
pub mod node;
pub mod number;
pub mod path;
pub mod ser;
pub mod validate;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use config::{
    ApplyConfig, HashConfig, NumberConfig, NumberPolicy, ValidateConfig, MAX_SAFE_INTEGER,
};
pub use digest::{encode_hash, sha256_hash, DigestAlgorithm, DigestPrimitive, FnDigest};
pub use error::{CanonicalizationError, ErrorKind, JsonHashError, NumberError};
pub use hasher::{apply, apply_in_place, apply_to_string, calc_hash, JsonHasher};
pub use node::{JsonNode, Map, HASH_KEY};
pub use path::NodePath;
pub use ser::to_node;
pub use validate::validate;
