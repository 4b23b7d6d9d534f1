//! # Validate Subcommand
//!
//! Checks that every `_hash` in a document matches its content. Prints
//! `OK` and exits 0 when it does, prints `FAIL` with the offending path and
//! exits 1 on a missing or mismatched hash. Unreadable input and number
//! policy violations are errors.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use jsonhash_core::{ErrorKind, JsonNode, ValidateConfig};

use crate::{input_name, read_input, Settings};

/// Arguments for the `jsonhash validate` subcommand.
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// JSON document to check. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Accept maps that carry no `_hash`.
    #[arg(long)]
    pub ignore_missing: bool,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<u8> {
    let hasher = settings.hasher()?;
    let options = ValidateConfig {
        ignore_missing_hashes: settings.validate.ignore_missing_hashes || args.ignore_missing,
    };
    let name = input_name(args.file.as_ref());

    let content = read_input(args.file.as_deref())?;
    let doc: JsonNode =
        serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {name}"))?;

    match hasher.validate(&doc, &options) {
        Ok(doc) => {
            println!("OK: {name} hash={}", doc.hash().unwrap_or("-"));
            Ok(0)
        }
        Err(e) if matches!(e.kind(), ErrorKind::HashMismatch | ErrorKind::HashMissing) => {
            println!("FAIL: {name}: {e}");
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("failed to validate {name}")),
    }
}
