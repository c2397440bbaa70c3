#![deny(missing_docs)]

//! # Value Parser
//!
//! Decodes parameter strings into [`Value`]s, driven by the [`ParseContext`]
//! the parameter's schema classified to.
//!
//! Containers are comma separated. Objects are read as `k=v,k=v` when every
//! token carries a `=`, and as `k,v,k,v` otherwise. Errors on container
//! elements report the element and the element's own context.

use crate::error::{ParameterParseError, ParseError};
use crate::json::JsonCodec;
use crate::models::{CanonicalShape, ParseContext, Primitive};
use crate::strategies::MediaType;
use crate::value::Value;
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Tokens accepted as `null`.
const NULL_TOKENS: [&str; 4] = ["null", "", "\0", "%00"];

/// How tokens are read once the input has been split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoding {
    /// Tokens are used as they are.
    Verbatim,
    /// Tokens are percent-decoded after splitting, as in query strings.
    Percent,
}

/// Parses `serialized` according to `context`. Tokens are taken verbatim.
pub fn parse(serialized: &str, context: &ParseContext) -> Result<Value, ParseError> {
    Ok(parse_value(serialized, context, Decoding::Verbatim)?)
}

/// Like [`parse`], but percent-decodes every token after splitting, so that an
/// encoded `,` (`%2C`) stays inside its token.
pub fn parse_encoded(serialized: &str, context: &ParseContext) -> Result<Value, ParseError> {
    Ok(parse_value(serialized, context, Decoding::Percent)?)
}

/// Parses a `content` parameter through `json` and checks that the decoded
/// value has the shape of `context`.
pub fn parse_content(
    serialized: &str,
    media_type: MediaType,
    context: &ParseContext,
    json: &dyn JsonCodec,
) -> Result<Value, ParseError> {
    let value = match media_type {
        MediaType::Json => json.parse(serialized).map_err(|e| {
            ParameterParseError::new(serialized, *context).with_detail(e.to_string())
        })?,
    };
    if conforms(&value, context.shape) {
        Ok(value)
    } else {
        Err(ParameterParseError::new(serialized, *context)
            .with_detail(format!("expected {}", context.shape))
            .into())
    }
}

pub(crate) fn parse_value(
    serialized: &str,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Value, ParameterParseError> {
    match context.shape {
        CanonicalShape::Primitive(p) => parse_primitive(serialized, p, context, decoding),
        CanonicalShape::ArrayOf(p) => parse_array(serialized, p, context, decoding),
        CanonicalShape::ObjectOf(p) => parse_object(serialized, p, context, decoding),
    }
}

/// Parses a single token as `primitive`, reporting errors against the
/// primitive's own context.
pub(crate) fn parse_element(
    token: &str,
    primitive: Primitive,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Value, ParameterParseError> {
    let element = context.with_shape(CanonicalShape::Primitive(primitive));
    parse_primitive(token, primitive, &element, decoding)
}

fn parse_primitive(
    token: &str,
    primitive: Primitive,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Value, ParameterParseError> {
    let fail = || ParameterParseError::new(token, *context);
    match primitive {
        Primitive::Null => {
            let decoded = decode(token, context, decoding)?;
            if NULL_TOKENS.contains(&token) || NULL_TOKENS.contains(&&*decoded) {
                Ok(Value::Null)
            } else {
                Err(fail())
            }
        }
        Primitive::Boolean => {
            let decoded = decode(token, context, decoding)?;
            if decoded.eq_ignore_ascii_case("true") || decoded == "1" {
                Ok(Value::Bool(true))
            } else if decoded.eq_ignore_ascii_case("false") || decoded == "0" {
                Ok(Value::Bool(false))
            } else {
                Err(fail())
            }
        }
        Primitive::String => {
            let decoded = decode(token.trim(), context, decoding)?;
            Ok(Value::String(decoded.into_owned()))
        }
        Primitive::Number => {
            let decoded = decode(token, context, decoding)?;
            match decoded.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(fail()),
            }
        }
    }
}

fn parse_array(
    serialized: &str,
    primitive: Primitive,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Value, ParameterParseError> {
    if serialized.is_empty() {
        return Ok(Value::Array(Vec::new()));
    }
    serialized
        .split(',')
        .map(|token| parse_element(token, primitive, context, decoding))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn parse_object(
    serialized: &str,
    primitive: Primitive,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Value, ParameterParseError> {
    if serialized.is_empty() {
        return Ok(Value::Object(IndexMap::new()));
    }

    let tokens: Vec<&str> = serialized.split(',').collect();
    let mut entries = IndexMap::with_capacity(tokens.len());

    if tokens.iter().all(|token| key_value_split(token, decoding).is_some()) {
        for token in &tokens {
            if let Some((key, value)) = key_value_split(token, decoding) {
                entries.insert(
                    parse_key(key, context, decoding)?,
                    parse_element(value, primitive, context, decoding)?,
                );
            }
        }
        return Ok(Value::Object(entries));
    }

    if tokens.len() <= 1 {
        return Err(
            ParameterParseError::new(serialized, *context).with_detail("must contain comma")
        );
    }
    if tokens.len() % 2 != 0 {
        return Err(ParameterParseError::new(serialized, *context)
            .with_detail("must contain even number of comma-separated values"));
    }
    for pair in tokens.chunks_exact(2) {
        entries.insert(
            parse_key(pair[0], context, decoding)?,
            parse_element(pair[1], primitive, context, decoding)?,
        );
    }
    Ok(Value::Object(entries))
}

/// Splits `k=v` on the first `=`. Encoded input may also use `%3D`.
fn key_value_split(token: &str, decoding: Decoding) -> Option<(&str, &str)> {
    if let Some(split) = token.split_once('=') {
        return Some(split);
    }
    if decoding == Decoding::Percent {
        for encoded in ["%3D", "%3d"] {
            if let Some(split) = token.split_once(encoded) {
                return Some(split);
            }
        }
    }
    None
}

fn parse_key(
    token: &str,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<String, ParameterParseError> {
    match parse_element(token, Primitive::String, context, decoding)? {
        Value::String(key) => Ok(key),
        _ => Err(ParameterParseError::new(token, *context)),
    }
}

fn decode<'a>(
    token: &'a str,
    context: &ParseContext,
    decoding: Decoding,
) -> Result<Cow<'a, str>, ParameterParseError> {
    match decoding {
        Decoding::Verbatim => Ok(Cow::Borrowed(token)),
        Decoding::Percent => percent_decode_str(token).decode_utf8().map_err(|_| {
            ParameterParseError::new(token, *context).with_detail("invalid percent-encoding")
        }),
    }
}

fn conforms(value: &Value, shape: CanonicalShape) -> bool {
    match shape {
        CanonicalShape::Primitive(p) => is_primitive(value, p),
        CanonicalShape::ArrayOf(p) => value
            .as_array()
            .is_some_and(|items| items.iter().all(|item| is_primitive(item, p))),
        CanonicalShape::ObjectOf(p) => value
            .as_object()
            .is_some_and(|entries| entries.values().all(|item| is_primitive(item, p))),
    }
}

fn is_primitive(value: &Value, primitive: Primitive) -> bool {
    matches!(
        (value, primitive),
        (Value::Null, Primitive::Null)
            | (Value::Bool(_), Primitive::Boolean)
            | (Value::String(_), Primitive::String)
            | (Value::Number(_), Primitive::Number)
    )
}
