#![deny(missing_docs)]

//! # Query String Multiplexer
//!
//! Reads every declared query parameter out of one raw query string, and the
//! reverse: builds a query string out of named values.
//!
//! - Repeated keys (`a=1&a=2`) are only accepted for array parameters.
//! - Object parameters that are not present under their own name are read
//!   from `name[key]=value` pairs (the `deepObject` style).
//! - Keys are percent-decoded up front. Values are decoded per token by the
//!   parser, so an encoded `,` never splits a token.
//! - `+` stands for a space in keys and values. A literal plus is `%2B`.

use crate::aggregate::{aggregate_with, Aggregated};
use crate::config::Config;
use crate::error::{ParameterParseError, ParseError, SerializeError};
use crate::models::{CanonicalShape, ParameterPosition, ParseContext, Primitive};
use crate::parser::{parse_element, parse_encoded, Decoding};
use crate::serializer::{serialize, Tokens};
use crate::strategies::{SerializationStrategy, Style};
use crate::value::Value;
use indexmap::IndexMap;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;
use tracing::debug;

/// Characters left unescaped in query keys and values.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A query string split into decoded keys and their raw values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuery {
    entries: IndexMap<String, Vec<String>>,
}

impl RawQuery {
    /// Splits `raw` (with or without a leading `?`) on `&` and `=`.
    ///
    /// Empty segments are skipped and a segment without `=` has an empty value.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut entries: IndexMap<String, Vec<String>> = IndexMap::new();
        for segment in raw.split('&').filter(|segment| !segment.is_empty()) {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            let key = percent_decode_str(&plus_as_space(key.trim()))
                .decode_utf8_lossy()
                .into_owned();
            entries
                .entry(key)
                .or_default()
                .push(plus_as_space(value).into_owned());
        }
        Self { entries }
    }

    /// Raw values of `key`, in order of appearance.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Decoded keys, in order of first appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the query has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses every named parameter out of `raw_query`.
///
/// Succeeds with all values only if every parameter parses. Otherwise every
/// failing parameter is reported.
pub fn parse_query_parameters<'c, K>(
    raw_query: &str,
    contexts: impl IntoIterator<Item = (K, &'c ParseContext)>,
) -> Aggregated<String, Value, ParseError>
where
    K: AsRef<str>,
{
    let query = RawQuery::parse(raw_query);
    debug!(keys = query.len(), "parsing query string");
    aggregate_with(
        contexts
            .into_iter()
            .map(|(name, context)| (name.as_ref().to_string(), context)),
        |name, context| parse_query_parameter(&query, name, context),
    )
}

/// Parses one named parameter out of an already split query.
pub fn parse_query_parameter(
    query: &RawQuery,
    name: &str,
    context: &ParseContext,
) -> Result<Value, ParseError> {
    match query.get(name) {
        Some([single]) => parse_encoded(single, context),
        Some(values) => match context.shape {
            CanonicalShape::ArrayOf(primitive) => Ok(Value::Array(
                values
                    .iter()
                    .map(|value| parse_element(value, primitive, context, Decoding::Percent))
                    .collect::<Result<_, _>>()?,
            )),
            _ => Err(duplicate_values(name, values, context).into()),
        },
        None => match context.shape {
            CanonicalShape::ObjectOf(primitive) => deep_object(query, name, primitive, context),
            _ => Err(ParseError::RequestDoesNotContain {
                position: ParameterPosition::QueryParameter,
                name: name.to_string(),
            }),
        },
    }
}

/// Collects `name[key]=value` pairs into an object.
fn deep_object(
    query: &RawQuery,
    name: &str,
    primitive: Primitive,
    context: &ParseContext,
) -> Result<Value, ParseError> {
    let prefix = format!("{name}[");
    let mut entries = IndexMap::new();
    for key in query.keys() {
        let Some(sub_key) = key
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(']'))
        else {
            continue;
        };
        let value = match query.get(key) {
            Some([single]) => parse_element(single, primitive, context, Decoding::Percent)?,
            Some(values) => return Err(duplicate_values(key, values, context).into()),
            None => continue,
        };
        entries.insert(sub_key.to_string(), value);
    }
    debug!(parameter = name, fields = entries.len(), "collected deep object");
    Ok(Value::Object(entries))
}

fn duplicate_values(name: &str, values: &[String], context: &ParseContext) -> ParameterParseError {
    let input = format!("?{name}={}", values.join(&format!("&{name}=")));
    ParameterParseError::new(input, *context).with_detail("no duplicate values allowed")
}

/// Rewrites form-encoded spaces so percent-decoding yields them.
fn plus_as_space(component: &str) -> Cow<'_, str> {
    if component.contains('+') {
        Cow::Owned(component.replace('+', "%20"))
    } else {
        Cow::Borrowed(component)
    }
}

fn encode(component: &str) -> String {
    utf8_percent_encode(component, QUERY_COMPONENT).to_string()
}

/// Builds a query string from named values.
///
/// Exploded arrays become repeated keys, `deepObject` objects become
/// `name[key]=value` pairs, and everything else a single `name=value`. Every
/// key and token is percent-encoded. The result parses back with
/// [`parse_query_parameters`]. An exploded empty array adds nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStringBuilder {
    pairs: Vec<String>,
}

impl QueryStringBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under `name` using `strategy`.
    pub fn append(
        &mut self,
        name: &str,
        value: &Value,
        strategy: SerializationStrategy,
    ) -> Result<&mut Self, SerializeError> {
        let value = value.resolved();
        let key = encode(name);
        match (strategy, &value) {
            (SerializationStrategy::Content { .. }, _) => {
                let json = serialize(&value, strategy)?;
                self.push(&key, &encode(&json));
            }
            (
                SerializationStrategy::Style {
                    style: Style::DeepObject,
                    ..
                },
                Value::Object(entries),
            ) => {
                let tokens = Tokens::encoded(true, encode);
                for (sub_key, sub_value) in entries {
                    let serialized = tokens.serialize(sub_value)?;
                    self.push(&format!("{key}[{}]", encode(sub_key)), &serialized);
                }
            }
            (SerializationStrategy::Style { explode: true, .. }, Value::Array(items)) => {
                let tokens = Tokens::encoded(true, encode);
                for item in items {
                    let serialized = tokens.serialize(item)?;
                    self.push(&key, &serialized);
                }
            }
            (SerializationStrategy::Style { explode, .. }, _) => {
                let serialized = Tokens::encoded(explode, encode).serialize(&value)?;
                self.push(&key, &serialized);
            }
        }
        Ok(self)
    }

    /// Appends `value` with the configured request default for `shape`.
    pub fn append_default(
        &mut self,
        name: &str,
        value: &Value,
        shape: CanonicalShape,
        config: &Config,
    ) -> Result<&mut Self, SerializeError> {
        let strategy = config
            .request_defaults
            .strategy(ParameterPosition::QueryParameter, shape.category());
        self.append(name, value, strategy)
    }

    fn push(&mut self, key: &str, value: &str) {
        self.pairs.push(format!("{key}={value}"));
    }

    /// The query string, without a leading `?`.
    pub fn build(&self) -> String {
        self.pairs.join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query(shape: CanonicalShape) -> ParseContext {
        ParseContext::new(ParameterPosition::QueryParameter, shape)
    }

    #[test]
    fn test_raw_query_split() {
        let raw = RawQuery::parse("?a=1&&b&a=2&c%5B0%5D=x=y& d =z");
        assert_eq!(raw.get("a"), Some(&["1".to_string(), "2".to_string()][..]));
        assert_eq!(raw.get("b"), Some(&[String::new()][..]));
        assert_eq!(raw.get("c[0]"), Some(&["x=y".to_string()][..]));
        assert_eq!(raw.get("d"), Some(&["z".to_string()][..]));
        assert_eq!(raw.keys().collect::<Vec<_>>(), vec!["a", "b", "c[0]", "d"]);
    }

    #[test]
    fn test_plus_decodes_to_space() {
        let string = query(CanonicalShape::Primitive(Primitive::String));
        let strings = query(CanonicalShape::ArrayOf(Primitive::String));
        let result = parse_query_parameters(
            "q=hello+world&a+b=x&sum=1%2B1&tags=a+b,c%2Bd",
            [
                ("q", &string),
                ("a b", &string),
                ("sum", &string),
                ("tags", &strings),
            ],
        )
        .unwrap();
        assert_eq!(result["q"], Value::from("hello world"));
        assert_eq!(result["a b"], Value::from("x"));
        assert_eq!(result["sum"], Value::from("1+1"));
        assert_eq!(result["tags"], Value::array(["a b", "c+d"]));
    }

    #[test]
    fn test_builder_encodes_plus() {
        let mut builder = QueryStringBuilder::new();
        builder
            .append(
                "a+b",
                &Value::from("1+1 2"),
                SerializationStrategy::style(Style::Form, false),
            )
            .unwrap();
        assert_eq!(builder.build(), "a%2Bb=1%2B1%202");
    }

    #[test]
    fn test_single_values() {
        let number = query(CanonicalShape::Primitive(Primitive::Number));
        let strings = query(CanonicalShape::ArrayOf(Primitive::String));
        let result = parse_query_parameters(
            "limit=10&tags=a%2Cb,c",
            [("limit", &number), ("tags", &strings)],
        )
        .unwrap();
        assert_eq!(result["limit"], Value::from(10));
        assert_eq!(result["tags"], Value::array(["a,b", "c"]));
    }

    #[test]
    fn test_repeated_keys_only_for_arrays() {
        let numbers = query(CanonicalShape::ArrayOf(Primitive::Number));
        let result = parse_query_parameters("a=1&a=2&a=3", [("a", &numbers)]).unwrap();
        assert_eq!(result["a"], Value::array([1, 2, 3]));

        let string = query(CanonicalShape::Primitive(Primitive::String));
        let failures = parse_query_parameters("name=v1&name=v2", [("name", &string)]).unwrap_err();
        assert_eq!(
            failures["name"],
            ParseError::Parameter(
                ParameterParseError::new("?name=v1&name=v2", string)
                    .with_detail("no duplicate values allowed")
            )
        );
    }

    #[test]
    fn test_deep_object() {
        let object = query(CanonicalShape::ObjectOf(Primitive::Number));
        let result = parse_query_parameters("a=1&b[c]=2&b[d]=3", [("b", &object)]).unwrap();
        assert_eq!(result["b"], Value::object([("c", 2), ("d", 3)]));

        let result = parse_query_parameters("a=1", [("b", &object)]).unwrap();
        assert_eq!(result["b"], Value::object(Vec::<(String, Value)>::new()));
    }

    #[test]
    fn test_deep_object_duplicate_sub_key() {
        let object = query(CanonicalShape::ObjectOf(Primitive::String));
        let failures =
            parse_query_parameters("b[c]=v1&b[c]=v2", [("b", &object)]).unwrap_err();
        match &failures["b"] {
            ParseError::Parameter(e) => {
                assert_eq!(e.input, "?b[c]=v1&b[c]=v2");
                assert_eq!(e.detail.as_deref(), Some("no duplicate values allowed"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_parameters_are_all_reported() {
        let string = query(CanonicalShape::Primitive(Primitive::String));
        let number = query(CanonicalShape::Primitive(Primitive::Number));
        let failures = parse_query_parameters(
            "?present=x&n=abc",
            [("present", &string), ("absent", &string), ("n", &number)],
        )
        .unwrap_err();
        assert_eq!(
            failures.keys().cloned().collect::<Vec<_>>(),
            vec!["absent".to_string(), "n".to_string()]
        );
        assert_eq!(
            failures["absent"].to_string(),
            "Request is missing query parameter absent"
        );
    }

    #[test]
    fn test_builder() {
        let mut builder = QueryStringBuilder::new();
        builder
            .append(
                "ids",
                &Value::array([1, 2]),
                SerializationStrategy::style(Style::Form, true),
            )
            .unwrap()
            .append(
                "filter",
                &Value::object([("name", "a b"), ("kind", "x&y")]),
                SerializationStrategy::style(Style::DeepObject, true),
            )
            .unwrap()
            .append(
                "q",
                &Value::array(["a,b", "c"]),
                SerializationStrategy::style(Style::Form, false),
            )
            .unwrap();
        assert_eq!(
            builder.build(),
            "ids=1&ids=2&filter[name]=a%20b&filter[kind]=x%26y&q=a%2Cb,c"
        );
    }

    #[test]
    fn test_builder_output_parses_back() {
        let mut builder = QueryStringBuilder::new();
        builder
            .append(
                "filter",
                &Value::object([("name", "a b"), ("kind", "x&y")]),
                SerializationStrategy::style(Style::DeepObject, true),
            )
            .unwrap()
            .append(
                "json",
                &Value::object([("k", 1)]),
                SerializationStrategy::JSON,
            )
            .unwrap();
        let object = query(CanonicalShape::ObjectOf(Primitive::String));
        let result = parse_query_parameters(&builder.build(), [("filter", &object)]).unwrap();
        assert_eq!(
            result["filter"],
            Value::object([("name", "a b"), ("kind", "x&y")])
        );
        assert_eq!(RawQuery::parse(&builder.build()).get("json").map(|v| v.len()), Some(1));
    }

    #[test]
    fn test_builder_uses_configured_defaults() {
        let config = Config::default();
        let mut builder = QueryStringBuilder::new();
        builder
            .append_default(
                "sort",
                &Value::array(["name", "age"]),
                CanonicalShape::ArrayOf(Primitive::String),
                &config,
            )
            .unwrap()
            .append_default(
                "page",
                &Value::object([("size", 10), ("offset", 20)]),
                CanonicalShape::ObjectOf(Primitive::Number),
                &config,
            )
            .unwrap();
        assert_eq!(
            builder.build(),
            "sort=name,age&page[size]=10&page[offset]=20"
        );
    }

    #[test]
    fn test_builder_rejects_unserializable() {
        let mut builder = QueryStringBuilder::new();
        let err = builder
            .append(
                "n",
                &Value::Number(f64::NAN),
                SerializationStrategy::style(Style::Form, false),
            )
            .unwrap_err();
        assert_eq!(err.detail, "Number \"NaN\" cannot be serialized!");
    }
}
