//! # jsonhash-cli — Command-Line Interface
//!
//! Thin clap front end over `jsonhash-core`. Documents are read from a file
//! or from stdin (`-` or no path) and written to stdout unless `--in-place`
//! or `--output` says otherwise.
//!
//! ## Subcommands
//!
//! - `apply` — embed `_hash` fields
//! - `validate` — check embedded hashes, exit status 1 on mismatch
//! - `hash` — print the hash of a document, list or raw string
//!
//! ```bash
//! jsonhash apply doc.json --in-place
//! jsonhash validate doc.json
//! jsonhash --profile strict hash --string "some text"
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the hashing logic.
//! - Handlers return `anyhow::Result<u8>`; the `u8` is the exit status.

pub mod apply;
pub mod hash;
pub mod validate;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use jsonhash_core::{ApplyConfig, HashConfig, JsonHasher, ValidateConfig};

/// Named hash configuration profiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Profile {
    /// Truncate non-integers to 10 decimal digits.
    #[default]
    Default,
    /// Require non-integers to be multiples of 0.001, range ±1e9.
    Strict,
}

impl Profile {
    pub fn hash_config(self) -> HashConfig {
        match self {
            Self::Default => HashConfig::default(),
            Self::Strict => HashConfig::strict(),
        }
    }
}

/// Contents of a `--config` YAML file. Every section is optional.
///
/// ```yaml
/// hash:
///   hash_length: 16
/// apply:
///   throw_on_hash_mismatch: false
/// validate:
///   ignore_missing_hashes: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub hash: HashConfig,
    pub apply: ApplyConfig,
    pub validate: ValidateConfig,
}

impl Settings {
    /// Start from a profile, then layer the config file on top if given.
    ///
    /// A `hash` section in the file replaces the profile's hash settings;
    /// fields it leaves out fall back to the defaults.
    pub fn load(profile: Profile, config: Option<&Path>) -> Result<Self> {
        let Some(path) = config else {
            return Ok(Self {
                hash: profile.hash_config(),
                ..Self::default()
            });
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let raw: serde_yaml::Value = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        let has_hash_section = raw.get("hash").is_some();
        let mut settings: Self = if raw.is_null() {
            Self::default()
        } else {
            serde_yaml::from_value(raw)
                .with_context(|| format!("invalid config: {}", path.display()))?
        };
        if !has_hash_section {
            settings.hash = profile.hash_config();
        }
        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok(settings)
    }

    /// Build a hasher, rejecting inconsistent settings.
    pub fn hasher(&self) -> Result<JsonHasher> {
        JsonHasher::new(self.hash.clone()).context("invalid hash configuration")
    }
}

/// Read a document from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read file: {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Human-readable name of an input for messages.
pub fn input_name(path: Option<&PathBuf>) -> String {
    match path {
        Some(p) if p.as_path() != Path::new("-") => p.display().to_string(),
        _ => "<stdin>".to_string(),
    }
}
