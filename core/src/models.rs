#![deny(missing_docs)]

//! # Codec Models
//!
//! The canonical shapes a parameter schema reduces to, the positions a
//! parameter can occupy in a request, and the parse context binding the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::openapi::path::ParameterIn;

/// The scalar kinds a parameter value can carry on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    /// `null` / `undefined` / empty value.
    Null,
    /// `true` / `false`.
    Boolean,
    /// Free text.
    String,
    /// Finite floating point number.
    Number,
}

impl Primitive {
    fn as_str(self) -> &'static str {
        match self {
            Primitive::Null => "null",
            Primitive::Boolean => "boolean",
            Primitive::String => "string",
            Primitive::Number => "number",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "null" => Some(Primitive::Null),
            "boolean" => Some(Primitive::Boolean),
            "string" => Some(Primitive::String),
            "number" => Some(Primitive::Number),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The minimal structural classification of a parameter schema.
///
/// Depth never exceeds two: arrays and objects only ever contain primitives.
/// Serialized as its display name (`string`, `array_number`, `object_boolean`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CanonicalShape {
    /// A single primitive value.
    Primitive(Primitive),
    /// A homogeneous list of primitives.
    ArrayOf(Primitive),
    /// A string-keyed map whose values all share one primitive kind.
    ObjectOf(Primitive),
}

impl CanonicalShape {
    /// The primitive carried by the shape (the element/value type for containers).
    pub fn primitive(&self) -> Primitive {
        match self {
            CanonicalShape::Primitive(p)
            | CanonicalShape::ArrayOf(p)
            | CanonicalShape::ObjectOf(p) => *p,
        }
    }

    /// The category used to look up serialization strategies.
    pub fn category(&self) -> ShapeCategory {
        match self {
            CanonicalShape::Primitive(_) => ShapeCategory::Primitive,
            CanonicalShape::ArrayOf(_) => ShapeCategory::Array,
            CanonicalShape::ObjectOf(_) => ShapeCategory::Object,
        }
    }

    /// Returns true for `ArrayOf` shapes.
    pub fn is_array(&self) -> bool {
        matches!(self, CanonicalShape::ArrayOf(_))
    }

    /// Returns true for `ObjectOf` shapes.
    pub fn is_object(&self) -> bool {
        matches!(self, CanonicalShape::ObjectOf(_))
    }
}

impl fmt::Display for CanonicalShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonicalShape::Primitive(p) => write!(f, "{p}"),
            CanonicalShape::ArrayOf(p) => write!(f, "array_{p}"),
            CanonicalShape::ObjectOf(p) => write!(f, "object_{p}"),
        }
    }
}

impl FromStr for CanonicalShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || format!("Unknown shape '{s}'");
        if let Some(rest) = s.strip_prefix("array_") {
            return Primitive::from_name(rest)
                .map(CanonicalShape::ArrayOf)
                .ok_or_else(unknown);
        }
        if let Some(rest) = s.strip_prefix("object_") {
            return Primitive::from_name(rest)
                .map(CanonicalShape::ObjectOf)
                .ok_or_else(unknown);
        }
        Primitive::from_name(s)
            .map(CanonicalShape::Primitive)
            .ok_or_else(unknown)
    }
}

impl From<CanonicalShape> for String {
    fn from(shape: CanonicalShape) -> Self {
        shape.to_string()
    }
}

impl TryFrom<String> for CanonicalShape {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Strategy tables are keyed by this coarse view of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeCategory {
    /// Single primitive.
    Primitive,
    /// Array of primitives.
    Array,
    /// Object of primitives.
    Object,
}

impl ShapeCategory {
    /// All categories in table order.
    pub const ALL: [ShapeCategory; 3] = [
        ShapeCategory::Primitive,
        ShapeCategory::Array,
        ShapeCategory::Object,
    ];
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeCategory::Primitive => write!(f, "primitive"),
            ShapeCategory::Array => write!(f, "array"),
            ShapeCategory::Object => write!(f, "object"),
        }
    }
}

/// Where a parameter lives in a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterPosition {
    /// A templated path segment.
    PathParameter,
    /// A query string parameter.
    QueryParameter,
    /// A request/response header.
    Header,
    /// A cookie.
    Cookie,
}

impl ParameterPosition {
    /// All positions in table order.
    pub const ALL: [ParameterPosition; 4] = [
        ParameterPosition::PathParameter,
        ParameterPosition::QueryParameter,
        ParameterPosition::Header,
        ParameterPosition::Cookie,
    ];
}

impl fmt::Display for ParameterPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterPosition::PathParameter => write!(f, "path parameter"),
            ParameterPosition::QueryParameter => write!(f, "query parameter"),
            ParameterPosition::Header => write!(f, "header"),
            ParameterPosition::Cookie => write!(f, "cookie"),
        }
    }
}

impl FromStr for ParameterPosition {
    type Err = String;

    /// Accepts OpenAPI `in` values (`path`, `query`, `header`, `cookie`)
    /// as well as the display and camelCase forms.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path" | "path parameter" | "pathParameter" => Ok(ParameterPosition::PathParameter),
            "query" | "query parameter" | "queryParameter" => {
                Ok(ParameterPosition::QueryParameter)
            }
            "header" => Ok(ParameterPosition::Header),
            "cookie" => Ok(ParameterPosition::Cookie),
            other => Err(format!("Unknown parameter position '{other}'")),
        }
    }
}

impl From<ParameterIn> for ParameterPosition {
    fn from(location: ParameterIn) -> Self {
        match location {
            ParameterIn::Path => ParameterPosition::PathParameter,
            ParameterIn::Query => ParameterPosition::QueryParameter,
            ParameterIn::Header => ParameterPosition::Header,
            ParameterIn::Cookie => ParameterPosition::Cookie,
        }
    }
}

impl From<ParameterPosition> for ParameterIn {
    fn from(position: ParameterPosition) -> Self {
        match position {
            ParameterPosition::PathParameter => ParameterIn::Path,
            ParameterPosition::QueryParameter => ParameterIn::Query,
            ParameterPosition::Header => ParameterIn::Header,
            ParameterPosition::Cookie => ParameterIn::Cookie,
        }
    }
}

/// Everything the parser needs to decode one parameter.
///
/// Built once per declared parameter and reused across requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParseContext {
    /// Where the parameter lives.
    pub position: ParameterPosition,
    /// The shape its schema classified to.
    pub shape: CanonicalShape,
}

impl ParseContext {
    /// Creates a new context.
    pub fn new(position: ParameterPosition, shape: CanonicalShape) -> Self {
        Self { position, shape }
    }

    /// Same position, different shape. Used for container elements.
    pub fn with_shape(&self, shape: CanonicalShape) -> Self {
        Self {
            position: self.position,
            shape,
        }
    }
}

impl fmt::Display for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{position: {}, shape: {}}}", self.position, self.shape)
    }
}
