#![deny(missing_docs)]

//! # Runtime Values
//!
//! The dynamic value model flowing through the serializer and out of the parser.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Conversion of a host value into its JSON representation.
///
/// The serializer writes `to_json()` in place of the value, so a date type can
/// go on the wire as its ISO string.
pub trait ToJson: fmt::Debug + Send + Sync {
    /// The value to serialize instead of `self`.
    fn to_json(&self) -> Value;
}

/// A dynamically typed parameter value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// `null` / `undefined`.
    #[default]
    Null,
    /// `true` / `false`.
    Bool(bool),
    /// A number. May be non-finite on the serialize side, where it is rejected.
    Number(f64),
    /// Text.
    String(String),
    /// An ordered list.
    Array(Vec<Value>),
    /// A string-keyed map, in insertion order.
    Object(IndexMap<String, Value>),
    /// A value converting itself through [`ToJson`].
    Custom(Arc<dyn ToJson>),
    /// A callable. Has no wire form.
    Function,
    /// A unique symbol. Has no wire form.
    Symbol,
}

impl Value {
    /// Wraps a [`ToJson`] implementor.
    pub fn custom(value: impl ToJson + 'static) -> Self {
        Value::Custom(Arc::new(value))
    }

    /// Builds an object from key/value pairs.
    pub fn object<K: Into<String>, V: Into<Value>>(
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Builds an array.
    pub fn array<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// Returns true for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The string, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The number, if this is a `Number`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The boolean, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The elements, if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is an `Object`.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Resolves `Custom` values (repeatedly) to what they convert to.
    pub fn resolved(&self) -> Value {
        match self {
            Value::Custom(custom) => custom.to_json().resolved(),
            other => other.clone(),
        }
    }
}

/// Formats a finite number the way it goes on the wire: shortest round-trip
/// text, integral values without a fraction, `-0` as `0`.
///
/// Magnitudes from `1e21` up and below `1e-6` use exponent form with an
/// explicit sign, e.g. `1e+21` and `1.5e-7`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let exponent = format!("{n:e}");
        return match exponent.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{mantissa}e+{power}")
            }
            _ => exponent,
        };
    }
    n.to_string()
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null)
            | (Value::Function, Value::Function)
            | (Value::Symbol, Value::Symbol) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Custom(a), _) => a.to_json() == *other,
            (_, Value::Custom(b)) => *self == b.to_json(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::array(items)
    }
}

impl<V: Into<Value>> From<Option<V>> for Value {
    fn from(value: Option<V>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl Serialize for Value {
    /// Writes JSON-compatible output. Non-finite numbers, functions and
    /// symbols become `null`.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Function | Value::Symbol => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Custom(custom) => custom.to_json().serialize(serializer),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Date(&'static str);

    impl ToJson for Date {
        fn to_json(&self) -> Value {
            Value::from(self.0)
        }
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(1.2), "1.2");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(-3.5), "-3.5");
    }

    #[test]
    fn test_format_number_exponent_range() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e30), "-2.5e+30");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(0.000001), "0.000001");
        for n in [1e21, -2.5e30, 1.5e-7, 1e-300] {
            assert_eq!(format_number(n).parse::<f64>(), Ok(n));
        }
    }

    #[test]
    fn test_custom_equality_resolves_to_json() {
        let date = Value::custom(Date("2020-01-01"));
        assert_eq!(date, Value::from("2020-01-01"));
        assert_eq!(Value::from("2020-01-01"), date);
        assert_ne!(date, Value::from("2021-01-01"));
    }

    #[test]
    fn test_serialize_json() {
        let value = Value::object([
            ("a", Value::from(1)),
            ("b", Value::Number(f64::NAN)),
            ("c", Value::array([1.5, 2.0])),
            ("d", Value::custom(Date("x"))),
        ]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"a":1,"b":null,"c":[1.5,2],"d":"x"}"#
        );
    }

    #[test]
    fn test_from_serde_json() {
        let json: serde_json::Value = serde_json::json!({"b": [true, null], "a": "x"});
        assert_eq!(
            Value::from(json),
            Value::object([
                ("b", Value::array([Value::Bool(true), Value::Null])),
                ("a", Value::from("x")),
            ])
        );
    }
}
