#![deny(missing_docs)]

//! # Typemap CLI
//!
//! Command Line Interface for inspecting type-mapping rule documents.
//!
//! Supported Commands:
//! - `check`: Loads a rule document and prints what it contains.
//! - `resolve`: Answers a single lookup against a rule document.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod check;
mod error;
mod resolve;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Type mapping rules CLI")]
struct Cli {
    /// Log every rule tried by a lookup.
    #[clap(long, global = true)]
    trace: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a rule document and summarize its scopes.
    Check(check::CheckArgs),
    /// Resolve one lookup against a rule document.
    Resolve(resolve::ResolveArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let default_level = if cli.trace { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match &cli.command {
        Commands::Check(args) => check::execute(args)?,
        Commands::Resolve(args) => resolve::execute(args, cli.trace)?,
    }

    Ok(())
}
