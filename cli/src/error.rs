#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use paramcodec_core::{
    AppError, ClassifyError, ComplianceError, ConfigError, ParseError, SerializeError,
};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Codec failure.
    #[display("{}", _0)]
    App(AppError),

    /// Malformed JSON input.
    #[display("JSON Error: {}", _0)]
    Json(serde_json::Error),

    /// Malformed YAML input.
    #[display("YAML Error: {}", _0)]
    Yaml(serde_yaml::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

impl From<ClassifyError> for CliError {
    fn from(error: ClassifyError) -> Self {
        CliError::App(error.into())
    }
}

impl From<ParseError> for CliError {
    fn from(error: ParseError) -> Self {
        CliError::App(error.into())
    }
}

impl From<SerializeError> for CliError {
    fn from(error: SerializeError) -> Self {
        CliError::App(error.into())
    }
}

impl From<ComplianceError> for CliError {
    fn from(error: ComplianceError) -> Self {
        CliError::App(error.into())
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::App(error.into())
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
