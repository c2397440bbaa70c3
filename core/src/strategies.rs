#![deny(missing_docs)]

//! # Serialization Strategies
//!
//! OpenAPI parameter styles and the registry of which ones are supported for
//! each `(position, category)` pair.
//!
//! The request side lists what can be parsed from an incoming request, the
//! response side what can be written into response headers and cookies. Lists
//! are ordered and the first entry is the default.

use crate::models::{CanonicalShape, ParameterPosition, ShapeCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::openapi::path::ParameterStyle;

/// OpenAPI `style` values handled by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Style {
    /// Comma separated (`a,b,c`). Path and header default.
    Simple,
    /// `name=value` pairs. Query and cookie default.
    Form,
    /// Space separated arrays (`a%20b`).
    SpaceDelimited,
    /// Pipe separated arrays (`a|b`).
    PipeDelimited,
    /// `name[key]=value` objects.
    DeepObject,
}

impl Style {
    fn as_str(self) -> &'static str {
        match self {
            Style::Simple => "simple",
            Style::Form => "form",
            Style::SpaceDelimited => "spaceDelimited",
            Style::PipeDelimited => "pipeDelimited",
            Style::DeepObject => "deepObject",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Style::Simple),
            "form" => Ok(Style::Form),
            "spaceDelimited" => Ok(Style::SpaceDelimited),
            "pipeDelimited" => Ok(Style::PipeDelimited),
            "deepObject" => Ok(Style::DeepObject),
            other => Err(format!("Unknown style '{other}'")),
        }
    }
}

impl From<Style> for ParameterStyle {
    fn from(style: Style) -> Self {
        match style {
            Style::Simple => ParameterStyle::Simple,
            Style::Form => ParameterStyle::Form,
            Style::SpaceDelimited => ParameterStyle::SpaceDelimited,
            Style::PipeDelimited => ParameterStyle::PipeDelimited,
            Style::DeepObject => ParameterStyle::DeepObject,
        }
    }
}

impl TryFrom<ParameterStyle> for Style {
    type Error = String;

    fn try_from(style: ParameterStyle) -> Result<Self, Self::Error> {
        match style {
            ParameterStyle::Simple => Ok(Style::Simple),
            ParameterStyle::Form => Ok(Style::Form),
            ParameterStyle::SpaceDelimited => Ok(Style::SpaceDelimited),
            ParameterStyle::PipeDelimited => Ok(Style::PipeDelimited),
            ParameterStyle::DeepObject => Ok(Style::DeepObject),
            ParameterStyle::Matrix => Err("Style 'matrix' is not supported".into()),
            ParameterStyle::Label => Err("Style 'label' is not supported".into()),
        }
    }
}

/// Media types accepted for `content` parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// `application/json`.
    #[serde(rename = "application/json")]
    Json,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Json => f.write_str("application/json"),
        }
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application/json" => Ok(MediaType::Json),
            other => Err(format!("Unsupported media type '{other}'")),
        }
    }
}

/// How a value is laid out on the wire.
///
/// Serialized the way OpenAPI spells it: `{"style":"form","explode":true}` or
/// `{"content":"application/json"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializationStrategy {
    /// A `style` + `explode` pair.
    Style {
        /// The style.
        style: Style,
        /// Whether containers are exploded.
        explode: bool,
    },
    /// Raw `content` of the given media type.
    Content {
        /// The media type.
        #[serde(rename = "content")]
        media_type: MediaType,
    },
}

impl SerializationStrategy {
    /// Shorthand for [`SerializationStrategy::Style`].
    pub const fn style(style: Style, explode: bool) -> Self {
        SerializationStrategy::Style { style, explode }
    }

    /// `content: application/json`.
    pub const JSON: SerializationStrategy = SerializationStrategy::Content {
        media_type: MediaType::Json,
    };

    /// The explode flag. Content strategies never explode.
    pub fn explode(&self) -> bool {
        match self {
            SerializationStrategy::Style { explode, .. } => *explode,
            SerializationStrategy::Content { .. } => false,
        }
    }
}

impl fmt::Display for SerializationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializationStrategy::Style { style, explode } => {
                write!(f, "{style}(explode={explode})")
            }
            SerializationStrategy::Content { media_type } => write!(f, "content({media_type})"),
        }
    }
}

/// Which side of the exchange a strategy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Parsing incoming request parameters.
    Request,
    /// Serializing outgoing response headers/cookies.
    Response,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Request => write!(f, "request"),
            Direction::Response => write!(f, "response"),
        }
    }
}

/// Supported strategies of one position, by shape category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTable {
    /// Single primitives.
    pub primitive: &'static [SerializationStrategy],
    /// Arrays of primitives.
    pub array: &'static [SerializationStrategy],
    /// Objects of primitives.
    pub object: &'static [SerializationStrategy],
}

impl CategoryTable {
    /// The ordered list for `category`.
    pub fn get(&self, category: ShapeCategory) -> &'static [SerializationStrategy] {
        match category {
            ShapeCategory::Primitive => self.primitive,
            ShapeCategory::Array => self.array,
            ShapeCategory::Object => self.object,
        }
    }
}

const fn simple(explode: bool) -> SerializationStrategy {
    SerializationStrategy::style(Style::Simple, explode)
}

const fn form(explode: bool) -> SerializationStrategy {
    SerializationStrategy::style(Style::Form, explode)
}

const JSON: SerializationStrategy = SerializationStrategy::JSON;

const SIMPLE: CategoryTable = CategoryTable {
    primitive: &[simple(false), simple(true)],
    array: &[simple(false), simple(true)],
    object: &[simple(true), simple(false)],
};

const QUERY: CategoryTable = CategoryTable {
    primitive: &[form(false), form(true)],
    array: &[
        form(false),
        form(true),
        SerializationStrategy::style(Style::SpaceDelimited, true),
        SerializationStrategy::style(Style::PipeDelimited, true),
    ],
    object: &[SerializationStrategy::style(Style::DeepObject, true), form(false)],
};

const COOKIE: CategoryTable = CategoryTable {
    primitive: &[form(false), form(true)],
    array: &[form(false)],
    object: &[form(false)],
};

pub(crate) const RESPONSE_HEADER: CategoryTable = CategoryTable {
    primitive: &[simple(false), simple(true), JSON],
    array: &[simple(false), simple(true), JSON],
    object: &[simple(true), simple(false), JSON],
};

pub(crate) const RESPONSE_COOKIE: CategoryTable = CategoryTable {
    primitive: &[form(false), form(true), JSON],
    array: &[form(false)],
    object: &[form(false)],
};

/// Request-side table of a position.
pub fn parse_table(position: ParameterPosition) -> &'static CategoryTable {
    match position {
        ParameterPosition::PathParameter | ParameterPosition::Header => &SIMPLE,
        ParameterPosition::QueryParameter => &QUERY,
        ParameterPosition::Cookie => &COOKIE,
    }
}

/// Response-side table of a position. Only headers and cookies are written
/// into responses.
pub fn serialize_table(position: ParameterPosition) -> Option<&'static CategoryTable> {
    match position {
        ParameterPosition::Header => Some(&RESPONSE_HEADER),
        ParameterPosition::Cookie => Some(&RESPONSE_COOKIE),
        ParameterPosition::PathParameter | ParameterPosition::QueryParameter => None,
    }
}

/// Strategies a request parameter can be parsed with, default first.
pub fn supported_parse_strategies(
    position: ParameterPosition,
    category: ShapeCategory,
) -> &'static [SerializationStrategy] {
    parse_table(position).get(category)
}

/// Strategies a response parameter can be serialized with, default first.
pub fn supported_serialize_strategies(
    position: ParameterPosition,
    category: ShapeCategory,
) -> Option<&'static [SerializationStrategy]> {
    serialize_table(position).map(|table| table.get(category))
}

/// The request-side default.
pub fn default_parse_strategy(
    position: ParameterPosition,
    category: ShapeCategory,
) -> SerializationStrategy {
    supported_parse_strategies(position, category)[0]
}

/// The response-side default, for positions that appear in responses.
pub fn default_serialize_strategy(
    position: ParameterPosition,
    category: ShapeCategory,
) -> Option<SerializationStrategy> {
    supported_serialize_strategies(position, category).map(|list| list[0])
}

/// Whether `strategy` may be used for a parameter of `shape` in `position`.
pub fn is_supported(
    direction: Direction,
    position: ParameterPosition,
    shape: CanonicalShape,
    strategy: SerializationStrategy,
) -> bool {
    is_supported_category(direction, position, shape.category(), strategy)
}

/// Whether `strategy` is listed for `(position, category)`.
pub fn is_supported_category(
    direction: Direction,
    position: ParameterPosition,
    category: ShapeCategory,
    strategy: SerializationStrategy,
) -> bool {
    let list = match direction {
        Direction::Request => Some(supported_parse_strategies(position, category)),
        Direction::Response => supported_serialize_strategies(position, category),
    };
    list.is_some_and(|list| list.contains(&strategy))
}
