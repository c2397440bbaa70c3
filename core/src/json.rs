#![deny(missing_docs)]

//! # JSON Service
//!
//! The JSON codec used for `content: application/json` parameters. Callers can
//! plug in their own implementation through [`JsonCodec`].

use crate::error::JsonError;
use crate::value::Value;

/// Encodes and decodes JSON text.
pub trait JsonCodec: Send + Sync {
    /// Encodes `value` as JSON text.
    fn serialize(&self, value: &Value) -> Result<String, JsonError>;

    /// Decodes JSON text.
    fn parse(&self, text: &str) -> Result<Value, JsonError>;
}

/// [`JsonCodec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn serialize(&self, value: &Value) -> Result<String, JsonError> {
        serde_json::to_string(value).map_err(|e| JsonError::Serialize(e.to_string()))
    }

    fn parse(&self, text: &str) -> Result<Value, JsonError> {
        serde_json::from_str::<serde_json::Value>(text)
            .map(Value::from)
            .map_err(|e| JsonError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_nan_is_written_as_null() {
        let codec = SerdeJsonCodec;
        assert_eq!(codec.serialize(&Value::Number(f64::NAN)).unwrap(), "null");
        assert_eq!(
            codec
                .serialize(&Value::array([Value::from(1), Value::Number(f64::NAN)]))
                .unwrap(),
            "[1,null]"
        );
    }

    #[test]
    fn test_parse_keeps_key_order() {
        let value = SerdeJsonCodec.parse(r#"{"z":1,"a":2}"#).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SerdeJsonCodec.parse("{"),
            Err(JsonError::Parse(_))
        ));
    }
}
