#![deny(missing_docs)]

//! # Value Serializer
//!
//! Writes [`Value`]s as parameter strings.
//!
//! Styled strategies share one layout: arrays join their elements with `,`,
//! objects join each key with its value (`=` when exploded, `,` otherwise) and
//! join the pairs with `,`. The style itself only matters to the query string
//! builder, which lays out repeated keys and `name[key]` pairs around this.

use crate::config::Config;
use crate::error::SerializeError;
use crate::json::{JsonCodec, SerdeJsonCodec};
use crate::models::{CanonicalShape, ParameterPosition};
use crate::strategies::{MediaType, SerializationStrategy};
use crate::value::{format_number, Value};

/// Serializes `value` under `strategy`, using `serde_json` for content strategies.
pub fn serialize(value: &Value, strategy: SerializationStrategy) -> Result<String, SerializeError> {
    serialize_with(value, strategy, &SerdeJsonCodec)
}

/// Serializes `value` under `strategy` with a caller supplied JSON codec.
pub fn serialize_with(
    value: &Value,
    strategy: SerializationStrategy,
    json: &dyn JsonCodec,
) -> Result<String, SerializeError> {
    match strategy {
        SerializationStrategy::Content {
            media_type: MediaType::Json,
        } => Ok(json.serialize(value)?),
        SerializationStrategy::Style { explode, .. } => {
            Tokens::plain(explode).serialize(value)
        }
    }
}

/// Serializes a response header or cookie with the configured default
/// strategy for its shape.
pub fn serialize_response_parameter(
    value: &Value,
    position: ParameterPosition,
    shape: CanonicalShape,
    config: &Config,
) -> Result<String, SerializeError> {
    let strategy = config
        .response_defaults
        .strategy(position, shape.category())
        .ok_or_else(|| {
            SerializeError::new(format!("A {position} cannot be part of a response"))
        })?;
    serialize(value, strategy)
}

/// Styled serialization with a hook applied to every scalar token.
pub(crate) struct Tokens {
    explode: bool,
    leaf: fn(&str) -> String,
}

impl Tokens {
    pub(crate) fn plain(explode: bool) -> Self {
        Self {
            explode,
            leaf: str::to_string,
        }
    }

    pub(crate) fn encoded(explode: bool, leaf: fn(&str) -> String) -> Self {
        Self { explode, leaf }
    }

    pub(crate) fn serialize(&self, value: &Value) -> Result<String, SerializeError> {
        match value {
            Value::Function => Err(SerializeError::new("Functions cannot be serialized!")),
            Value::Symbol => Err(SerializeError::new("Symbols cannot be serialized!")),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Number(n) if n.is_nan() => Err(SerializeError::new(
                "Number \"NaN\" cannot be serialized!",
            )),
            Value::Number(n) if n.is_infinite() => Err(SerializeError::new(
                "Infinite number cannot be serialized!",
            )),
            Value::Number(n) => Ok(format_number(*n)),
            Value::Null => Ok(String::new()),
            Value::Array(items) => Ok(items
                .iter()
                .map(|item| self.serialize(item))
                .collect::<Result<Vec<_>, _>>()?
                .join(",")),
            Value::Custom(custom) => self.serialize(&custom.to_json()),
            Value::Object(entries) => {
                let separator = if self.explode { '=' } else { ',' };
                let mut pairs = Vec::with_capacity(entries.len());
                for (k, v) in entries {
                    pairs.push(format!("{}{separator}{}", (self.leaf)(k), self.serialize(v)?));
                }
                Ok(pairs.join(","))
            }
            Value::String(s) => Ok((self.leaf)(s)),
        }
    }
}
