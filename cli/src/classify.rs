#![deny(missing_docs)]

//! # Classify Command
//!
//! Prints the canonical shape a parameter schema reduces to.

use paramcodec_core::{classify, ParameterPosition};

use crate::error::CliResult;
use crate::input::load_schema;

/// Arguments for the classify command.
#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    /// Schema as inline JSON, or `@path` to a JSON/YAML file.
    #[clap(long)]
    pub schema: String,

    /// Parameter location (`path`, `query`, `header` or `cookie`).
    #[clap(long)]
    pub position: ParameterPosition,
}

/// Classifies the schema and returns the shape name.
pub fn run(args: &ClassifyArgs) -> CliResult<String> {
    let schema = load_schema(&args.schema)?;
    Ok(classify(&schema, args.position)?.to_string())
}

/// Executes the classify command.
pub fn execute(args: &ClassifyArgs) -> CliResult<()> {
    println!("{}", run(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(schema: &str, position: ParameterPosition) -> ClassifyArgs {
        ClassifyArgs {
            schema: schema.to_string(),
            position,
        }
    }

    #[test]
    fn test_classify_record() {
        let shape = run(&args(
            r#"{ "kind": "object", "stringIndex": { "kind": "number" } }"#,
            ParameterPosition::QueryParameter,
        ))
        .unwrap();
        assert_eq!(shape, "object_number");
    }

    #[test]
    fn test_classify_failure_message() {
        let err = run(&args(r#"{ "kind": "unknown" }"#, ParameterPosition::Cookie)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Classification Error: unknown (use string instead) not supported in cookies"
        );
    }
}
