//! # Digest Primitive
//!
//! The hash function behind every `_hash` is pluggable: anything
//! implementing [`DigestPrimitive`] can be handed to
//! [`crate::JsonHasher::with_digest`]. SHA-256 is the default and the
//! primitive every peer implementation uses.
//!
//! The digest bytes are turned into the stored hash string by
//! [`encode_hash`]: URL-safe base64 (`-` and `_` instead of `+` and `/`),
//! padding stripped, truncated to the configured length.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::canonical::CanonicalBytes;

/// A one-way hash function over byte strings.
pub trait DigestPrimitive {
    /// Hash `data`.
    fn digest(&self, data: &[u8]) -> Vec<u8>;

    /// Hash canonical bytes.
    fn digest_canonical(&self, data: &CanonicalBytes) -> Vec<u8> {
        self.digest(data.as_bytes())
    }
}

/// Built-in digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, the cross-platform default.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest size in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Length of the unpadded base64url encoding of a digest.
    pub fn encoded_len(&self) -> usize {
        encoded_len(self.output_len())
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DigestPrimitive for DigestAlgorithm {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Adapter turning a plain function into a [`DigestPrimitive`].
///
/// ```
/// use jsonhash_core::{FnDigest, DigestPrimitive};
///
/// let reversed = FnDigest(|data: &[u8]| -> Vec<u8> { data.iter().rev().copied().collect() });
/// assert_eq!(reversed.digest(b"ab"), b"ba".to_vec());
/// ```
#[derive(Clone, Copy)]
pub struct FnDigest<F>(pub F);

impl<F> fmt::Debug for FnDigest<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnDigest(..)")
    }
}

impl<F> DigestPrimitive for FnDigest<F>
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        (self.0)(data)
    }
}

impl<D: DigestPrimitive + ?Sized> DigestPrimitive for &D {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        (**self).digest(data)
    }
}

/// Length of the unpadded base64 encoding of `bytes` bytes.
pub fn encoded_len(bytes: usize) -> usize {
    (bytes * 4 + 2) / 3
}

/// Encode digest bytes as unpadded base64url, truncated to `length` characters.
pub fn encode_hash(digest: &[u8], length: usize) -> String {
    let mut encoded = URL_SAFE_NO_PAD.encode(digest);
    // The alphabet is ASCII, so any index is a char boundary.
    encoded.truncate(length);
    encoded
}

/// SHA-256 hash string of arbitrary bytes, at the given length.
pub fn sha256_hash(data: &[u8], length: usize) -> String {
    encode_hash(&DigestAlgorithm::Sha256.digest(data), length)
}
