#![deny(missing_docs)]

//! # Input Loading
//!
//! Command arguments that carry documents accept either inline text or
//! `@path`. Files ending in `.yaml`/`.yml` are read as YAML, everything else
//! as JSON.

use std::fs;
use std::path::Path;

use paramcodec_core::{Config, Schema, Value};
use serde::de::DeserializeOwned;

use crate::error::{CliError, CliResult};

/// Document formats understood by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            _ => Format::Json,
        }
    }

    fn decode<T: DeserializeOwned>(self, text: &str) -> CliResult<T> {
        match self {
            Format::Json => Ok(serde_json::from_str(text)?),
            Format::Yaml => Ok(serde_yaml::from_str(text)?),
        }
    }
}

/// Reads an inline document or the file named by `@path`.
fn load<T: DeserializeOwned>(arg: &str) -> CliResult<T> {
    match arg.strip_prefix('@') {
        Some(path) => load_file(Path::new(path)),
        None => Format::Json.decode(arg),
    }
}

/// Reads a JSON or YAML file.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::General(format!("Failed to read {}: {}", path.display(), e))
    })?;
    Format::of(path).decode(&text)
}

/// Loads a parameter schema.
pub fn load_schema(arg: &str) -> CliResult<Schema> {
    load(arg)
}

/// Loads a runtime value.
pub fn load_value(arg: &str) -> CliResult<Value> {
    load::<serde_json::Value>(arg).map(Value::from)
}

/// Loads a configuration file.
pub fn load_config(path: &Path) -> CliResult<Config> {
    load_file(path)
}
