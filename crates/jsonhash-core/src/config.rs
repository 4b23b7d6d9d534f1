//! # Configuration
//!
//! Immutable value objects passed into every call. Nothing here is
//! process-wide state: two hashers with different configurations can run
//! side by side.
//!
//! All types deserialize with per-field defaults, so a configuration file
//! only needs to name what it changes:
//!
//! ```yaml
//! hash_length: 16
//! numbers:
//!   policy: { mode: step, step: 0.001 }
//!   max_num: 1000000000
//! ```

use serde::{Deserialize, Serialize};

use crate::digest::DigestAlgorithm;
use crate::error::JsonHashError;

/// Largest integer every peer platform represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Default number of characters kept from the encoded digest.
pub const DEFAULT_HASH_LENGTH: usize = 22;

/// Default number of decimal digits kept by the truncate policy.
pub const DEFAULT_PRECISION: u32 = 10;

/// Default recursion limit for tree traversal.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Hash computation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Characters kept from the base64url-encoded digest.
    pub hash_length: usize,
    /// Built-in digest primitive.
    pub algorithm: DigestAlgorithm,
    /// Number normalization and range settings.
    pub numbers: NumberConfig,
    /// Maximum nesting depth before traversal fails with `DepthExceeded`.
    pub max_depth: usize,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
            algorithm: DigestAlgorithm::Sha256,
            numbers: NumberConfig::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl HashConfig {
    /// Profile using the step number policy instead of truncation.
    pub fn strict() -> Self {
        Self {
            numbers: NumberConfig::strict(),
            ..Self::default()
        }
    }

    /// Check the settings against a digest producing `encoded_len` characters.
    pub(crate) fn validate_for(&self, encoded_len: usize) -> Result<(), JsonHashError> {
        if self.hash_length == 0 || self.hash_length > encoded_len {
            return Err(JsonHashError::InvalidConfig(format!(
                "hash_length must be between 1 and {encoded_len}, got {}",
                self.hash_length
            )));
        }
        if self.max_depth == 0 {
            return Err(JsonHashError::InvalidConfig(
                "max_depth must be positive".to_string(),
            ));
        }
        self.numbers.validate()
    }

    /// Check the settings against the configured built-in algorithm.
    pub fn validate(&self) -> Result<(), JsonHashError> {
        self.validate_for(self.algorithm.encoded_len())
    }
}

/// How non-integer numbers are made platform independent.
///
/// The two policies are mutually exclusive: a document hashed under one
/// does not, in general, hash the same under the other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NumberPolicy {
    /// Keep at most `digits` decimal digits, dropping the rest.
    Truncate { digits: u32 },
    /// Require every non-integer to be a multiple of `step`.
    Step { step: f64 },
}

impl Default for NumberPolicy {
    fn default() -> Self {
        Self::Truncate {
            digits: DEFAULT_PRECISION,
        }
    }
}

/// Number normalization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberConfig {
    pub policy: NumberPolicy,
    pub min_num: f64,
    pub max_num: f64,
    /// Fail on out-of-range numbers instead of hashing them as they are.
    pub throw_on_range_error: bool,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            policy: NumberPolicy::default(),
            min_num: -MAX_SAFE_INTEGER,
            max_num: MAX_SAFE_INTEGER,
            throw_on_range_error: true,
        }
    }
}

impl NumberConfig {
    /// Step policy of 0.001 within ±1e9.
    pub fn strict() -> Self {
        Self {
            policy: NumberPolicy::Step { step: 0.001 },
            min_num: -1e9,
            max_num: 1e9,
            throw_on_range_error: true,
        }
    }

    fn validate(&self) -> Result<(), JsonHashError> {
        if let NumberPolicy::Step { step } = self.policy {
            if !(step.is_finite() && step > 0.0) {
                return Err(JsonHashError::InvalidConfig(format!(
                    "precision step must be a positive number, got {step}"
                )));
            }
        }
        if self.min_num.is_nan() || self.max_num.is_nan() || self.min_num > self.max_num {
            return Err(JsonHashError::InvalidConfig(format!(
                "invalid number range [{}, {}]",
                self.min_num, self.max_num
            )));
        }
        Ok(())
    }
}

/// Policy flags for [`crate::JsonHasher::apply`].
///
/// Whether the caller's tree is mutated is decided by the entry point:
/// `apply` takes `&JsonNode` and returns a hashed copy, `apply_in_place`
/// takes `&mut JsonNode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// Recompute hashes of maps that already carry one.
    pub update_existing_hashes: bool,
    /// Fail when an existing hash differs from the recomputed one.
    pub throw_on_hash_mismatch: bool,
    /// Descend into hashed children. When off, only the root is forced and
    /// hashed descendants are taken as they are.
    pub recursive: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            update_existing_hashes: true,
            throw_on_hash_mismatch: true,
            recursive: true,
        }
    }
}

impl ApplyConfig {
    /// Recompute everything and overwrite whatever is stored.
    pub fn overwrite() -> Self {
        Self {
            update_existing_hashes: true,
            throw_on_hash_mismatch: false,
            recursive: true,
        }
    }

    /// Hash only what has no hash yet.
    pub fn preserve_existing() -> Self {
        Self {
            update_existing_hashes: false,
            ..Self::default()
        }
    }
}

/// Options for [`crate::JsonHasher::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Accept maps without `_hash` instead of failing with `HashMissing`.
    pub ignore_missing_hashes: bool,
}
