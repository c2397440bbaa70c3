#![deny(missing_docs)]

//! # Parse Query Command
//!
//! Reads several declared parameters out of one query string. Every failing
//! parameter is reported, not just the first.

use paramcodec_core::{
    aggregate_with, parse_context, parse_query_parameters, AppError, ParameterPosition, Value,
};

use crate::error::{CliError, CliResult};
use crate::input::load_schema;

/// Arguments for the parse-query command.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseQueryArgs {
    /// The raw query string, with or without a leading `?`.
    #[clap(long, allow_hyphen_values = true)]
    pub query: String,

    /// Declared parameter as `name=<schema>`, where the schema is inline JSON
    /// or `@path`. Repeat for each parameter.
    #[clap(long = "param", value_name = "NAME=SCHEMA", required = true)]
    pub params: Vec<String>,
}

fn split_param(param: &str) -> CliResult<(String, String)> {
    param
        .split_once('=')
        .map(|(name, schema)| (name.trim().to_string(), schema.to_string()))
        .ok_or_else(|| CliError::General(format!("Expected NAME=SCHEMA, got '{param}'")))
}

/// Parses the query and returns every value as a pretty JSON object.
pub fn run(args: &ParseQueryArgs) -> CliResult<String> {
    let declared = args
        .params
        .iter()
        .map(|param| split_param(param))
        .collect::<CliResult<Vec<_>>>()?;

    let contexts = aggregate_with(declared, |_, schema| {
        let schema = load_schema(&schema)?;
        Ok::<_, CliError>(parse_context(&schema, ParameterPosition::QueryParameter)?)
    })
    .map_err(|failures| CliError::General(failures.to_string()))?;

    let values =
        parse_query_parameters(&args.query, contexts.iter()).map_err(AppError::Parameters)?;
    Ok(serde_json::to_string_pretty(&Value::Object(values))?)
}

/// Executes the parse-query command.
pub fn execute(args: &ParseQueryArgs) -> CliResult<()> {
    println!("{}", run(args)?);
    Ok(())
}
