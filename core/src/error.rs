#![deny(missing_docs)]

//! # Error Handling
//!
//! Typed errors for every codec stage, plus the unified `AppError` enum used
//! across the workspace.
//!
//! Classification errors surface once, when a parameter schema is registered.
//! Parse and serialize errors surface per request and are usually collected
//! through [`crate::aggregate`] so that every failing parameter is reported.

use crate::aggregate::FailureMap;
use crate::compliance::ComplianceTarget;
use crate::models::{ParameterPosition, ParseContext, ShapeCategory};
use crate::strategies::{Direction, SerializationStrategy};
use derive_more::{Display, From};
use std::fmt;

/// Raised when a schema cannot be reduced to a canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ClassifyError {
    /// The schema is understood but has no wire representation in this position.
    #[display("{reason} not supported in {position}s")]
    TypeNotSupported {
        /// Human readable description, including the nesting context.
        reason: String,
        /// The position the schema was classified for.
        position: ParameterPosition,
    },

    /// The schema could not be categorized at all.
    #[display("{reason}")]
    TypeInferenceFailed {
        /// Human readable description, including the nesting context.
        reason: String,
    },
}

impl ClassifyError {
    pub(crate) fn not_supported(reason: impl Into<String>, position: ParameterPosition) -> Self {
        ClassifyError::TypeNotSupported {
            reason: reason.into(),
            position,
        }
    }

    pub(crate) fn inference_failed(reason: impl Into<String>) -> Self {
        ClassifyError::TypeInferenceFailed {
            reason: reason.into(),
        }
    }

    /// Prefixes the reason with the context the failure happened in,
    /// e.g. `in array: ` or `object property a: `.
    pub(crate) fn within(self, context: &str) -> Self {
        match self {
            ClassifyError::TypeNotSupported { reason, position } => {
                ClassifyError::TypeNotSupported {
                    reason: format!("{context}: {reason}"),
                    position,
                }
            }
            ClassifyError::TypeInferenceFailed { reason } => ClassifyError::TypeInferenceFailed {
                reason: format!("{context}: {reason}"),
            },
        }
    }

    /// The failure description without the position suffix.
    pub fn reason(&self) -> &str {
        match self {
            ClassifyError::TypeNotSupported { reason, .. }
            | ClassifyError::TypeInferenceFailed { reason } => reason,
        }
    }
}

impl std::error::Error for ClassifyError {}

/// A wire string does not match the encoding expected for its shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterParseError {
    /// The (sub)string that failed to parse.
    pub input: String,
    /// The context it was parsed with.
    pub context: ParseContext,
    /// Optional explanation appended to the message.
    pub detail: Option<String>,
}

impl ParameterParseError {
    pub(crate) fn new(input: impl Into<String>, context: ParseContext) -> Self {
        Self {
            input: input.into(),
            context,
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl fmt::Display for ParameterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parsing failed of \"{}\" using context {}",
            self.input, self.context
        )?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParameterParseError {}

/// Failure of a single parameter while reading a request.
#[derive(Debug, Clone, PartialEq, Eq, Display, From)]
pub enum ParseError {
    /// The raw value was present but malformed.
    #[display("{_0}")]
    Parameter(ParameterParseError),

    /// The parameter is required but absent.
    #[from(ignore)]
    #[display("Request is missing {position} {name}")]
    RequestDoesNotContain {
        /// Where the parameter was expected.
        position: ParameterPosition,
        /// Parameter name.
        name: String,
    },
}

impl std::error::Error for ParseError {}

/// A value cannot be written to the wire.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{detail}")]
pub struct SerializeError {
    /// Human readable description.
    pub detail: String,
}

impl SerializeError {
    pub(crate) fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl From<JsonError> for SerializeError {
    fn from(error: JsonError) -> Self {
        SerializeError::new(error.to_string())
    }
}

impl std::error::Error for SerializeError {}

/// Errors reported by a [`crate::json::JsonCodec`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum JsonError {
    /// Encoding failed.
    #[display("{_0}")]
    Serialize(String),
    /// Decoding failed.
    #[display("{_0}")]
    Parse(String),
}

impl std::error::Error for JsonError {}

/// A header or cookie name/value contains characters outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("Non-compliant {target} \"{input}\"")]
pub struct ComplianceError {
    /// What was checked.
    pub target: ComplianceTarget,
    /// The offending input.
    pub input: String,
}

impl std::error::Error for ComplianceError {}

/// A configured default strategy is not part of the supported tables.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("{direction} strategy {strategy} is not supported for {category} {position}s")]
pub struct ConfigError {
    /// Request (parse) or response (serialize) side.
    pub direction: Direction,
    /// Parameter position.
    pub position: ParameterPosition,
    /// Shape category.
    pub category: ShapeCategory,
    /// The rejected strategy.
    pub strategy: SerializationStrategy,
}

impl std::error::Error for ConfigError {}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Schema classification failure.
    #[display("Classification Error: {_0}")]
    Classify(ClassifyError),

    /// Single parameter parse failure.
    #[display("Parse Error: {_0}")]
    Parse(ParseError),

    /// Every failure of a multi-parameter parse.
    #[display("Parse Error: {_0}")]
    Parameters(FailureMap<String, ParseError>),

    /// Serialization failure.
    #[display("Serialize Error: {_0}")]
    Serialize(SerializeError),

    /// JSON codec failure.
    #[display("JSON Error: {_0}")]
    Json(JsonError),

    /// Rejected header/cookie name or value.
    #[display("Compliance Error: {_0}")]
    Compliance(ComplianceError),

    /// Invalid configuration.
    #[display("Config Error: {_0}")]
    Config(ConfigError),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

impl From<ParameterParseError> for AppError {
    fn from(error: ParameterParseError) -> Self {
        AppError::Parse(error.into())
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalShape, Primitive};

    #[test]
    fn test_not_supported_message() {
        let err = ClassifyError::not_supported("empty object", ParameterPosition::Header);
        assert_eq!(err.to_string(), "empty object not supported in headers");
    }

    #[test]
    fn test_within_prefixes_reason() {
        let err = ClassifyError::not_supported("multidimensional arrays", ParameterPosition::Cookie)
            .within("in union")
            .within("in array");
        assert_eq!(err.reason(), "in array: in union: multidimensional arrays");
        assert_eq!(
            err.to_string(),
            "in array: in union: multidimensional arrays not supported in cookies"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let context = ParseContext::new(
            ParameterPosition::QueryParameter,
            CanonicalShape::Primitive(Primitive::String),
        );
        let err = ParameterParseError::new("?a=1&a=2", context)
            .with_detail("no duplicate values allowed");
        assert_eq!(
            err.to_string(),
            "Parsing failed of \"?a=1&a=2\" using context {position: query parameter, shape: string}: no duplicate values allowed"
        );
    }

    #[test]
    fn test_missing_parameter_display() {
        let err = ParseError::RequestDoesNotContain {
            position: ParameterPosition::QueryParameter,
            name: "limit".into(),
        };
        assert_eq!(err.to_string(), "Request is missing query parameter limit");
    }

    #[test]
    fn test_string_conversion() {
        let app_err: AppError = String::from("something wrong").into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_json_error_wrapped_into_serialize_error() {
        let err: SerializeError = JsonError::Serialize("key must be a string".into()).into();
        assert_eq!(err.detail, "key must be a string");
    }
}
