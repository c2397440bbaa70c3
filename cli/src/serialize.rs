#![deny(missing_docs)]

//! # Serialize Command
//!
//! Writes a JSON value as a parameter string. The strategy is given
//! explicitly (`--style`/`--explode` or `--content`), or looked up from the
//! configured defaults for `--position` and `--shape`.

use paramcodec_core::strategies::is_supported;
use paramcodec_core::{
    check_cookie_name, check_cookie_value, check_header_name, check_header_value, config,
    serialize, CanonicalShape, Config, Direction, MediaType, ParameterPosition,
    QueryStringBuilder, SerializationStrategy, Style,
};
use tracing::warn;

use crate::error::{CliError, CliResult};
use crate::input::load_value;

/// Arguments for the serialize command.
#[derive(clap::Args, Debug, Clone)]
pub struct SerializeArgs {
    /// Value as inline JSON, or `@path` to a JSON/YAML file.
    #[clap(long, allow_hyphen_values = true)]
    pub value: String,

    /// Parameter location. Headers and cookies use the response defaults.
    #[clap(long)]
    pub position: Option<ParameterPosition>,

    /// Canonical shape of the value, e.g. `array_number`.
    #[clap(long)]
    pub shape: Option<CanonicalShape>,

    /// Explicit style.
    #[clap(long, conflicts_with = "content")]
    pub style: Option<Style>,

    /// Explode flag for `--style`.
    #[clap(long, requires = "style")]
    pub explode: bool,

    /// Serialize as `content` of this media type.
    #[clap(long)]
    pub content: Option<MediaType>,

    /// Parameter name. Queries print `name=value` pairs, headers
    /// `name: value` and cookies `name=value`.
    #[clap(long)]
    pub name: Option<String>,
}

fn direction(position: ParameterPosition) -> Direction {
    match position {
        ParameterPosition::Header | ParameterPosition::Cookie => Direction::Response,
        ParameterPosition::PathParameter | ParameterPosition::QueryParameter => {
            Direction::Request
        }
    }
}

fn resolve_strategy(args: &SerializeArgs, config: &Config) -> CliResult<SerializationStrategy> {
    let explicit = match (args.content, args.style) {
        (Some(media_type), _) => Some(SerializationStrategy::Content { media_type }),
        (None, Some(style)) => Some(SerializationStrategy::style(style, args.explode)),
        (None, None) => None,
    };

    match (explicit, args.position, args.shape) {
        (Some(strategy), Some(position), Some(shape)) => {
            if !is_supported(direction(position), position, shape, strategy) {
                warn!(%strategy, %position, %shape, "strategy is not supported here");
            }
            Ok(strategy)
        }
        (Some(strategy), _, _) => Ok(strategy),
        (None, Some(position), Some(shape)) => match direction(position) {
            Direction::Response => config
                .response_defaults
                .strategy(position, shape.category())
                .ok_or_else(|| {
                    CliError::General(format!("A {position} cannot be part of a response"))
                }),
            Direction::Request => Ok(config
                .request_defaults
                .strategy(position, shape.category())),
        },
        (None, _, _) => Err(CliError::General(
            "Give --style, --content, or both --position and --shape".into(),
        )),
    }
}

/// Serializes the value and returns the wire text.
pub fn run(args: &SerializeArgs) -> CliResult<String> {
    let config = config::current();
    let value = load_value(&args.value)?;
    let strategy = resolve_strategy(args, &config)?;

    let Some(name) = &args.name else {
        return Ok(serialize(&value, strategy)?);
    };
    match args.position {
        None | Some(ParameterPosition::QueryParameter) => {
            let mut builder = QueryStringBuilder::new();
            builder.append(name, &value, strategy)?;
            Ok(builder.build())
        }
        Some(ParameterPosition::Header) => {
            let serialized = serialize(&value, strategy)?;
            check_header_name(name)?;
            check_header_value(&serialized)?;
            Ok(format!("{name}: {serialized}"))
        }
        Some(ParameterPosition::Cookie) => {
            let serialized = serialize(&value, strategy)?;
            check_cookie_name(name)?;
            check_cookie_value(&serialized)?;
            Ok(format!("{name}={serialized}"))
        }
        Some(ParameterPosition::PathParameter) => Ok(serialize(&value, strategy)?),
    }
}

/// Executes the serialize command.
pub fn execute(args: &SerializeArgs) -> CliResult<()> {
    println!("{}", run(args)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(value: &str) -> SerializeArgs {
        SerializeArgs {
            value: value.to_string(),
            position: None,
            shape: None,
            style: None,
            explode: false,
            content: None,
            name: None,
        }
    }

    #[test]
    fn test_explicit_style() {
        let mut args = args("[1, 2, 3]");
        args.style = Some(Style::Simple);
        assert_eq!(run(&args).unwrap(), "1,2,3");
    }

    #[test]
    fn test_json_content() {
        let mut args = args(r#"{"a": [1, null]}"#);
        args.content = Some(MediaType::Json);
        assert_eq!(run(&args).unwrap(), r#"{"a":[1,null]}"#);
    }

    #[test]
    fn test_response_header_default() {
        let mut args = args(r#"{"a": 1, "b": 2}"#);
        args.position = Some(ParameterPosition::Header);
        args.shape = Some(CanonicalShape::ObjectOf(paramcodec_core::Primitive::Number));
        args.name = Some("x-page".into());
        assert_eq!(run(&args).unwrap(), "x-page: a=1,b=2");
    }

    #[test]
    fn test_query_pairs() {
        let mut args = args(r#"{"size": 10, "offset": 20}"#);
        args.position = Some(ParameterPosition::QueryParameter);
        args.shape = Some(CanonicalShape::ObjectOf(paramcodec_core::Primitive::Number));
        args.name = Some("page".into());
        assert_eq!(run(&args).unwrap(), "page[size]=10&page[offset]=20");
    }

    #[test]
    fn test_cookie_name_compliance() {
        let mut args = args("\"abc\"");
        args.position = Some(ParameterPosition::Cookie);
        args.shape = Some(CanonicalShape::Primitive(paramcodec_core::Primitive::String));
        args.name = Some("bad name".into());
        assert_eq!(
            run(&args).unwrap_err().to_string(),
            "Compliance Error: Non-compliant cookie name \"bad name\""
        );
    }

    #[test]
    fn test_path_uses_request_default() {
        let mut args = args("1");
        args.position = Some(ParameterPosition::PathParameter);
        args.shape = Some(CanonicalShape::Primitive(paramcodec_core::Primitive::Number));
        assert_eq!(run(&args).unwrap(), "1");
    }

    #[test]
    fn test_strategy_is_required() {
        let err = run(&args("1")).unwrap_err();
        assert!(matches!(err, CliError::General(_)));
    }
}
