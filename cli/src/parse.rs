#![deny(missing_docs)]

//! # Parse Command
//!
//! Decodes a single parameter string and prints the value as JSON.

use paramcodec_core::{
    parse, parse_content, parse_context, parse_encoded, MediaType, ParameterPosition,
    SerdeJsonCodec,
};

use crate::error::CliResult;
use crate::input::load_schema;

/// Arguments for the parse command.
#[derive(clap::Args, Debug, Clone)]
pub struct ParseArgs {
    /// Schema as inline JSON, or `@path` to a JSON/YAML file.
    #[clap(long)]
    pub schema: String,

    /// Parameter location (`path`, `query`, `header` or `cookie`).
    #[clap(long)]
    pub position: ParameterPosition,

    /// The raw parameter string.
    #[clap(long, allow_hyphen_values = true)]
    pub input: String,

    /// Percent-decode tokens after splitting.
    #[clap(long, conflicts_with = "content")]
    pub encoded: bool,

    /// Treat the input as `content` of this media type.
    #[clap(long)]
    pub content: Option<MediaType>,
}

/// Parses the input and returns the value as pretty JSON.
pub fn run(args: &ParseArgs) -> CliResult<String> {
    let schema = load_schema(&args.schema)?;
    let context = parse_context(&schema, args.position)?;
    let value = match args.content {
        Some(media_type) => parse_content(&args.input, media_type, &context, &SerdeJsonCodec)?,
        None if args.encoded => parse_encoded(&args.input, &context)?,
        None => parse(&args.input, &context)?,
    };
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Executes the parse command.
pub fn execute(args: &ParseArgs) -> CliResult<()> {
    println!("{}", run(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(schema: &str, input: &str) -> ParseArgs {
        ParseArgs {
            schema: schema.to_string(),
            position: ParameterPosition::Header,
            input: input.to_string(),
            encoded: false,
            content: None,
        }
    }

    #[test]
    fn test_parse_object() {
        let out = run(&args(
            r#"{ "kind": "object", "fields": { "a": { "kind": "number" }, "b": { "kind": "number" } } }"#,
            "a=1,b=2.5",
        ))
        .unwrap();
        assert_eq!(out, "{\n  \"a\": 1,\n  \"b\": 2.5\n}");
    }

    #[test]
    fn test_parse_encoded() {
        let mut args = args(r#"{ "kind": "string" }"#, "a%2Cb");
        args.encoded = true;
        assert_eq!(run(&args).unwrap(), "\"a,b\"");
    }

    #[test]
    fn test_parse_json_content() {
        let mut args = args(
            r#"{ "kind": "array", "items": { "kind": "boolean" } }"#,
            "[true,false]",
        );
        args.content = Some(MediaType::Json);
        assert_eq!(run(&args).unwrap(), "[\n  true,\n  false\n]");
    }

    #[test]
    fn test_parse_failure() {
        let err = run(&args(r#"{ "kind": "boolean" }"#, "maybe")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Parse Error: Parsing failed of \"maybe\" using context {position: header, shape: boolean}"
        );
    }
}
