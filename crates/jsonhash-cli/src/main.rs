//! # jsonhash CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jsonhash_cli::apply::{run_apply, ApplyArgs};
use jsonhash_cli::hash::{run_hash, HashArgs};
use jsonhash_cli::validate::{run_validate, ValidateArgs};
use jsonhash_cli::{Profile, Settings};

/// Deterministic content hashes for JSON documents.
///
/// Embeds a `_hash` field into every object, checks embedded hashes, and
/// computes hashes of documents and strings.
#[derive(Parser, Debug)]
#[command(name = "jsonhash", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number normalization profile.
    #[arg(long, value_enum, default_value_t = Profile::Default, global = true)]
    profile: Profile,

    /// Override the number of hash characters kept.
    #[arg(long, global = true)]
    hash_length: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Embed `_hash` fields into a document.
    Apply(ApplyArgs),

    /// Check the `_hash` fields of a document.
    Validate(ValidateArgs),

    /// Print the hash of a document or string.
    Hash(HashArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("jsonhash CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Settings::load(cli.profile, cli.config.as_deref()).and_then(|mut settings| {
        if let Some(length) = cli.hash_length {
            settings.hash.hash_length = length;
        }
        match &cli.command {
            Commands::Apply(args) => run_apply(args, &settings),
            Commands::Validate(args) => run_validate(args, &settings),
            Commands::Hash(args) => run_hash(args, &settings),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
