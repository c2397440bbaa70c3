#![deny(missing_docs)]

//! # Paramcodec CLI
//!
//! Command Line Interface for the OpenAPI parameter codec.
//!
//! Supported Commands:
//! - `classify`: Reduces a parameter schema to its canonical shape.
//! - `parse`: Decodes one parameter string.
//! - `parse-query`: Decodes several parameters out of a query string.
//! - `serialize`: Encodes a value as a parameter string.
//! - `strategies`: Lists the supported strategies and their defaults.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paramcodec_core::config;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::CliResult;

mod classify;
mod error;
mod input;
mod parse;
mod parse_query;
mod serialize;
mod strategies;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI parameter codec CLI")]
struct Cli {
    /// JSON or YAML configuration file.
    #[clap(long, global = true, env = "PARAMCODEC_CONFIG")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical shape of a schema.
    Classify(classify::ClassifyArgs),
    /// Parse a single parameter string.
    Parse(parse::ParseArgs),
    /// Parse declared parameters out of a query string.
    ParseQuery(parse_query::ParseQueryArgs),
    /// Serialize a value as a parameter string.
    Serialize(serialize::SerializeArgs),
    /// List supported strategies.
    Strategies(strategies::StrategiesArgs),
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        debug!(path = %path.display(), "loading configuration");
        config::replace(input::load_config(path)?)?;
    }

    match &cli.command {
        Commands::Classify(args) => classify::execute(args)?,
        Commands::Parse(args) => parse::execute(args)?,
        Commands::ParseQuery(args) => parse_query::execute(args)?,
        Commands::Serialize(args) => serialize::execute(args)?,
        Commands::Strategies(args) => strategies::execute(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_arguments() {
        let cli = Cli::try_parse_from([
            "paramcodec",
            "parse-query",
            "--query",
            "?a=1",
            "--param",
            r#"a={"kind":"number"}"#,
        ])
        .unwrap();
        match cli.command {
            Commands::ParseQuery(args) => assert_eq!(args.params.len(), 1),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_position_is_rejected() {
        let result = Cli::try_parse_from([
            "paramcodec",
            "classify",
            "--schema",
            r#"{"kind":"string"}"#,
            "--position",
            "body",
        ]);
        assert!(result.is_err());
    }
}
