//! # Apply Subcommand
//!
//! Embeds `_hash` fields into a JSON document. The hashed document goes to
//! stdout by default, to `--output` if given, or back into the input file
//! with `--in-place`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use jsonhash_core::{ApplyConfig, JsonNode};

use crate::{input_name, read_input, Settings};

/// Arguments for the `jsonhash apply` subcommand.
#[derive(Args, Debug, Default)]
pub struct ApplyArgs {
    /// JSON document to hash. Reads stdin when omitted or `-`.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Rewrite the input file instead of printing the result.
    #[arg(long, conflicts_with = "output")]
    pub in_place: bool,

    /// Write the result to this file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Keep hashes that are already present instead of recomputing them.
    #[arg(long)]
    pub preserve_existing: bool,

    /// Overwrite stale hashes instead of failing on a mismatch.
    #[arg(long)]
    pub overwrite: bool,

    /// Only force the root; take hashed descendants as they are.
    #[arg(long)]
    pub no_recursive: bool,

    /// Pretty-print the output.
    #[arg(long)]
    pub pretty: bool,
}

impl ApplyArgs {
    /// Layer command-line flags over the configured apply options.
    pub fn options(&self, base: ApplyConfig) -> ApplyConfig {
        ApplyConfig {
            update_existing_hashes: base.update_existing_hashes && !self.preserve_existing,
            throw_on_hash_mismatch: base.throw_on_hash_mismatch && !self.overwrite,
            recursive: base.recursive && !self.no_recursive,
        }
    }
}

/// Execute the apply subcommand.
pub fn run_apply(args: &ApplyArgs, settings: &Settings) -> Result<u8> {
    let in_place_target = match (&args.file, args.in_place) {
        (Some(path), true) if path.as_path() != Path::new("-") => Some(path.as_path()),
        (_, true) => bail!("--in-place requires an input file"),
        (_, false) => None,
    };

    let hasher = settings.hasher()?;
    let options = args.options(settings.apply);
    let name = input_name(args.file.as_ref());

    let content = read_input(args.file.as_deref())?;
    let mut doc: JsonNode =
        serde_json::from_str(&content).with_context(|| format!("failed to parse JSON: {name}"))?;

    hasher
        .apply_in_place(&mut doc, &options)
        .with_context(|| format!("failed to hash {name}"))?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };

    match in_place_target.or(args.output.as_deref()) {
        Some(target) => {
            std::fs::write(target, format!("{rendered}\n"))
                .with_context(|| format!("failed to write file: {}", target.display()))?;
            tracing::info!(
                file = %target.display(),
                hash = doc.hash().unwrap_or("-"),
                "wrote hashed document"
            );
        }
        None => println!("{rendered}"),
    }

    Ok(0)
}
