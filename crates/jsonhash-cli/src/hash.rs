//! # Hash Subcommand
//!
//! Prints a hash without modifying anything: the `_hash` a document would
//! get, the hash of a list (`{"value": list}`), or with `--string` the hash
//! of the raw UTF-8 bytes of a string.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jsonhash_core::JsonNode;

use crate::{input_name, read_input, Settings};

/// Arguments for the `jsonhash hash` subcommand.
#[derive(Args, Debug, Default)]
pub struct HashArgs {
    /// JSON document to hash. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE", conflicts_with = "string")]
    pub file: Option<PathBuf>,

    /// Hash this string instead of a document.
    #[arg(long, value_name = "TEXT")]
    pub string: Option<String>,
}

/// Execute the hash subcommand.
pub fn run_hash(args: &HashArgs, settings: &Settings) -> Result<u8> {
    let hasher = settings.hasher()?;

    let value = match &args.string {
        Some(text) => JsonNode::String(text.clone()),
        None => {
            let name = input_name(args.file.as_ref());
            let content = read_input(args.file.as_deref())?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse JSON: {name}"))?
        }
    };

    let hash = hasher.calc_hash(&value).context("failed to compute hash")?;
    println!("{hash}");
    Ok(0)
}
