#![deny(missing_docs)]

//! # Paramcodec Core
//!
//! OpenAPI parameter codec: classifies parameter schemas into canonical
//! shapes, then serializes and parses path, query, header and cookie values
//! under the OpenAPI `style`/`explode` rules.

/// Shared error types.
pub mod error;

/// Partial-failure aggregation of keyed results.
pub mod aggregate;

/// Parameter schema trees.
pub mod schema;

/// Canonical shapes, positions and parse contexts.
pub mod models;

/// Schema to shape classification.
pub mod classifier;

/// Supported serialization strategies.
pub mod strategies;

/// Runtime values.
pub mod value;

/// Pluggable JSON codec.
pub mod json;

/// Value to wire string.
pub mod serializer;

/// Wire string to value.
pub mod parser;

/// Query string reading and building.
pub mod query;

/// Process-wide settings.
pub mod config;

/// Header and cookie character checks.
pub mod compliance;

pub use aggregate::{aggregate, aggregate_with, Aggregated, FailureMap};
pub use classifier::{classify, parse_context};
pub use compliance::{
    check_cookie_name, check_cookie_value, check_header_name, check_header_value,
    ComplianceTarget,
};
pub use config::{CompliancePolicy, Config};
pub use error::{
    AppError, AppResult, ClassifyError, ComplianceError, ConfigError, JsonError,
    ParameterParseError, ParseError, SerializeError,
};
pub use json::{JsonCodec, SerdeJsonCodec};
pub use models::{CanonicalShape, ParameterPosition, ParseContext, Primitive, ShapeCategory};
pub use parser::{parse, parse_content, parse_encoded};
pub use query::{parse_query_parameters, QueryStringBuilder, RawQuery};
pub use schema::{EnumMember, ObjectSchema, Schema};
pub use serializer::{serialize, serialize_response_parameter, serialize_with};
pub use strategies::{
    default_parse_strategy, default_serialize_strategy, supported_parse_strategies,
    supported_serialize_strategies, Direction, MediaType, SerializationStrategy, Style,
};
pub use value::{ToJson, Value};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_thread_safe() {
        assert_send_sync::<Schema>();
        assert_send_sync::<ParseContext>();
        assert_send_sync::<Value>();
        assert_send_sync::<Config>();
        assert_send_sync::<AppError>();
        assert_send_sync::<FailureMap<String, ParseError>>();
        assert_send_sync::<SerdeJsonCodec>();
    }
}
