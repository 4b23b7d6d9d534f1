//! # Error Hierarchy
//!
//! Structured error types for hashing and validation, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Every failure aborts the whole operation. Errors raised while walking a
//! tree carry the structural path of the offending node (`/parent/0/child`)
//! so the first point of divergence can be located without rescanning.

use std::fmt;

use thiserror::Error;

/// Top-level error type for apply, validate and hash computation.
#[derive(Error, Debug)]
pub enum JsonHashError {
    /// A value could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A number was rejected by the configured number policy.
    #[error("number error at {path}: {source}")]
    Number {
        /// Path of the offending value.
        path: String,
        /// What was wrong with the number.
        #[source]
        source: NumberError,
    },

    /// A map that should carry a `_hash` does not.
    #[error("hash missing at {path}")]
    HashMissing {
        /// Path of the map without a hash.
        path: String,
    },

    /// A stored `_hash` differs from the freshly computed one.
    #[error("hash at {path} \"{actual}\" is wrong; should be \"{expected}\"")]
    HashMismatch {
        /// Path of the map whose hash differs.
        path: String,
        /// The freshly computed hash.
        expected: String,
        /// The hash found in the document.
        actual: String,
    },

    /// The tree nests deeper than `HashConfig::max_depth`.
    #[error("nesting depth at {path} exceeds the configured maximum of {max_depth}")]
    DepthExceeded {
        /// Path at which the limit was hit.
        path: String,
        /// The configured limit.
        max_depth: usize,
    },

    /// The configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON text could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl JsonHashError {
    /// The error kind, for callers that branch on the failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Canonicalization(CanonicalizationError::NonFiniteNumber(_)) => {
                ErrorKind::InvalidNumber
            }
            Self::Canonicalization(_) => ErrorKind::UnsupportedType,
            Self::Number { source, .. } => source.kind(),
            Self::HashMissing { .. } => ErrorKind::HashMissing,
            Self::HashMismatch { .. } => ErrorKind::HashMismatch,
            Self::DepthExceeded { .. } => ErrorKind::DepthExceeded,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::Json(_) => ErrorKind::Json,
        }
    }

    /// The structural path carried by the error, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Number { path, .. }
            | Self::HashMissing { path }
            | Self::HashMismatch { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Failure classes, independent of the carried context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedType,
    InvalidNumber,
    PrecisionExceeded,
    RangeExceeded,
    HashMissing,
    HashMismatch,
    DepthExceeded,
    InvalidConfig,
    Json,
}

impl ErrorKind {
    /// Returns the kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedType => "UnsupportedType",
            Self::InvalidNumber => "InvalidNumber",
            Self::PrecisionExceeded => "PrecisionExceeded",
            Self::RangeExceeded => "RangeExceeded",
            Self::HashMissing => "HashMissing",
            Self::HashMismatch => "HashMismatch",
            Self::DepthExceeded => "DepthExceeded",
            Self::InvalidConfig => "InvalidConfig",
            Self::Json => "Json",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors while converting or encoding a value.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The value is not one of null, bool, number, string, map or list.
    #[error("unsupported value type: {0}")]
    UnsupportedType(String),

    /// NaN or infinity reached the encoder.
    #[error("non-finite number cannot be encoded: {0}")]
    NonFiniteNumber(f64),

    /// A `Serialize` implementation reported its own failure.
    #[error("serialization failed: {0}")]
    Custom(String),
}

impl serde::ser::Error for CanonicalizationError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// Errors raised by the number policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberError {
    /// NaN or infinity.
    #[error("{0} is not a valid number")]
    InvalidNumber(f64),

    /// The value is not a multiple of the configured precision step.
    #[error("number {value} has a higher precision than {step}")]
    PrecisionExceeded {
        /// The rejected value.
        value: f64,
        /// The configured step.
        step: f64,
    },

    /// The value lies outside `[min, max]`.
    #[error("number {value} is outside the allowed range [{min}, {max}]")]
    RangeExceeded {
        /// The rejected value.
        value: f64,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl NumberError {
    /// The error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidNumber(_) => ErrorKind::InvalidNumber,
            Self::PrecisionExceeded { .. } => ErrorKind::PrecisionExceeded,
            Self::RangeExceeded { .. } => ErrorKind::RangeExceeded,
        }
    }
}
