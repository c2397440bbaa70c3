#![deny(missing_docs)]

//! # Configuration
//!
//! Process-wide codec settings.
//!
//! The active [`Config`] lives behind an [`ArcSwap`]: readers take a cheap
//! snapshot with [`current`], writers swap in a whole new value with
//! [`replace`] or [`update`]. A reader never observes a half-written config.

use crate::compliance::ComplianceTarget;
use crate::error::ConfigError;
use crate::models::{ParameterPosition, ShapeCategory};
use crate::strategies::{
    is_supported_category, parse_table, CategoryTable, Direction, SerializationStrategy,
    RESPONSE_COOKIE, RESPONSE_HEADER,
};
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// One strategy per shape category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefaults {
    /// Strategy for single primitives.
    pub primitive: SerializationStrategy,
    /// Strategy for arrays.
    pub array: SerializationStrategy,
    /// Strategy for objects.
    pub object: SerializationStrategy,
}

impl CategoryDefaults {
    /// The first entry of every list in `table`.
    pub fn from_table(table: &CategoryTable) -> Self {
        Self {
            primitive: table.primitive[0],
            array: table.array[0],
            object: table.object[0],
        }
    }

    /// The strategy for `category`.
    pub fn get(&self, category: ShapeCategory) -> SerializationStrategy {
        match category {
            ShapeCategory::Primitive => self.primitive,
            ShapeCategory::Array => self.array,
            ShapeCategory::Object => self.object,
        }
    }
}

/// Default strategies for request parameters, used when building requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDefaults {
    /// Path parameters.
    pub path_parameter: CategoryDefaults,
    /// Query parameters.
    pub query_parameter: CategoryDefaults,
    /// Request headers.
    pub header: CategoryDefaults,
    /// Request cookies.
    pub cookie: CategoryDefaults,
}

impl RequestDefaults {
    /// Defaults of one position.
    pub fn for_position(&self, position: ParameterPosition) -> &CategoryDefaults {
        match position {
            ParameterPosition::PathParameter => &self.path_parameter,
            ParameterPosition::QueryParameter => &self.query_parameter,
            ParameterPosition::Header => &self.header,
            ParameterPosition::Cookie => &self.cookie,
        }
    }

    /// The configured strategy for `(position, category)`.
    pub fn strategy(
        &self,
        position: ParameterPosition,
        category: ShapeCategory,
    ) -> SerializationStrategy {
        self.for_position(position).get(category)
    }
}

impl Default for RequestDefaults {
    fn default() -> Self {
        let defaults = |position| CategoryDefaults::from_table(parse_table(position));
        Self {
            path_parameter: defaults(ParameterPosition::PathParameter),
            query_parameter: defaults(ParameterPosition::QueryParameter),
            header: defaults(ParameterPosition::Header),
            cookie: defaults(ParameterPosition::Cookie),
        }
    }
}

/// Default strategies for response headers and cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDefaults {
    /// Response headers.
    pub header: CategoryDefaults,
    /// Response cookies.
    pub cookie: CategoryDefaults,
}

impl ResponseDefaults {
    /// Defaults of one position. Path and query parameters never appear in responses.
    pub fn for_position(&self, position: ParameterPosition) -> Option<&CategoryDefaults> {
        match position {
            ParameterPosition::Header => Some(&self.header),
            ParameterPosition::Cookie => Some(&self.cookie),
            ParameterPosition::PathParameter | ParameterPosition::QueryParameter => None,
        }
    }

    /// The configured strategy for `(position, category)`.
    pub fn strategy(
        &self,
        position: ParameterPosition,
        category: ShapeCategory,
    ) -> Option<SerializationStrategy> {
        self.for_position(position)
            .map(|defaults| defaults.get(category))
    }
}

impl Default for ResponseDefaults {
    fn default() -> Self {
        Self {
            header: CategoryDefaults::from_table(&RESPONSE_HEADER),
            cookie: CategoryDefaults::from_table(&RESPONSE_COOKIE),
        }
    }
}

/// What to do with a header or cookie that fails its character check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompliancePolicy {
    /// Accept silently.
    Ignore,
    /// Accept and log a warning.
    Warn,
    /// Reject.
    #[default]
    Fail,
}

/// Codec settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Default strategies for request parameters.
    pub request_defaults: RequestDefaults,
    /// Default strategies for response headers and cookies.
    pub response_defaults: ResponseDefaults,
    /// Handling of header names outside `[A-Za-z0-9_-]`.
    pub non_compliant_header_names: CompliancePolicy,
    /// Handling of header values with disallowed characters.
    pub non_compliant_header_values: CompliancePolicy,
    /// Handling of cookie names with disallowed characters.
    pub non_compliant_cookie_names: CompliancePolicy,
    /// Handling of cookie values with disallowed characters.
    pub non_compliant_cookie_values: CompliancePolicy,
}

impl Config {
    /// Checks that every default strategy is part of the supported tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for position in ParameterPosition::ALL {
            for category in ShapeCategory::ALL {
                let strategy = self.request_defaults.strategy(position, category);
                check(Direction::Request, position, category, strategy)?;
                if let Some(strategy) = self.response_defaults.strategy(position, category) {
                    check(Direction::Response, position, category, strategy)?;
                }
            }
        }
        Ok(())
    }

    /// The policy applied to `target`.
    pub fn compliance_policy(&self, target: ComplianceTarget) -> CompliancePolicy {
        match target {
            ComplianceTarget::HeaderName => self.non_compliant_header_names,
            ComplianceTarget::HeaderValue => self.non_compliant_header_values,
            ComplianceTarget::CookieName => self.non_compliant_cookie_names,
            ComplianceTarget::CookieValue => self.non_compliant_cookie_values,
        }
    }
}

fn check(
    direction: Direction,
    position: ParameterPosition,
    category: ShapeCategory,
    strategy: SerializationStrategy,
) -> Result<(), ConfigError> {
    if is_supported_category(direction, position, category, strategy) {
        Ok(())
    } else {
        Err(ConfigError {
            direction,
            position,
            category,
            strategy,
        })
    }
}

fn store() -> &'static ArcSwap<Config> {
    static CONFIG: OnceLock<ArcSwap<Config>> = OnceLock::new();
    CONFIG.get_or_init(|| ArcSwap::from_pointee(Config::default()))
}

/// A snapshot of the active configuration.
pub fn current() -> Arc<Config> {
    store().load_full()
}

/// Validates `config` and makes it the active configuration.
pub fn replace(config: Config) -> Result<(), ConfigError> {
    config.validate()?;
    store().store(Arc::new(config));
    debug!("configuration replaced");
    Ok(())
}

/// Derives a new active configuration from the current one.
///
/// `f` may run more than once if another writer races this one. Nothing is
/// stored when the derived config fails validation.
pub fn update(f: impl Fn(&mut Config)) -> Result<(), ConfigError> {
    let mut failure = None;
    store().rcu(|current| {
        let mut next = Config::clone(current);
        f(&mut next);
        match next.validate() {
            Ok(()) => {
                failure = None;
                Arc::new(next)
            }
            Err(error) => {
                failure = Some(error);
                Arc::clone(current)
            }
        }
    });
    match failure {
        Some(error) => Err(error),
        None => {
            debug!("configuration updated");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Style;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_takes_first_table_entries() {
        let config = Config::default();
        assert_eq!(
            config
                .request_defaults
                .strategy(ParameterPosition::QueryParameter, ShapeCategory::Object),
            SerializationStrategy::style(Style::DeepObject, true)
        );
        assert_eq!(
            config
                .response_defaults
                .strategy(ParameterPosition::Header, ShapeCategory::Object),
            Some(SerializationStrategy::style(Style::Simple, true))
        );
        assert_eq!(config.non_compliant_cookie_values, CompliancePolicy::Fail);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_unsupported_default() {
        let mut config = Config::default();
        config.response_defaults.cookie.array = SerializationStrategy::JSON;
        assert_eq!(
            config.validate(),
            Err(ConfigError {
                direction: Direction::Response,
                position: ParameterPosition::Cookie,
                category: ShapeCategory::Array,
                strategy: SerializationStrategy::JSON,
            })
        );
        assert_eq!(
            config.validate().unwrap_err().to_string(),
            "response strategy content(application/json) is not supported for array cookies"
        );
    }

    #[test]
    fn test_partial_config_deserializes_over_defaults() {
        let config: Config = serde_json::from_str(
            r#"{
                "nonCompliantHeaderNames": "warn",
                "requestDefaults": {
                    "pathParameter": {
                        "primitive": { "style": "simple", "explode": true },
                        "array": { "style": "simple", "explode": false },
                        "object": { "style": "simple", "explode": false }
                    },
                    "queryParameter": {
                        "primitive": { "style": "form", "explode": false },
                        "array": { "style": "pipeDelimited", "explode": true },
                        "object": { "style": "form", "explode": false }
                    },
                    "header": {
                        "primitive": { "style": "simple", "explode": false },
                        "array": { "style": "simple", "explode": false },
                        "object": { "style": "simple", "explode": true }
                    },
                    "cookie": {
                        "primitive": { "style": "form", "explode": true },
                        "array": { "style": "form", "explode": false },
                        "object": { "style": "form", "explode": false }
                    }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.non_compliant_header_names, CompliancePolicy::Warn);
        assert_eq!(config.non_compliant_header_values, CompliancePolicy::Fail);
        assert_eq!(
            config
                .request_defaults
                .strategy(ParameterPosition::QueryParameter, ShapeCategory::Array),
            SerializationStrategy::style(Style::PipeDelimited, true)
        );
        assert_eq!(config.response_defaults, ResponseDefaults::default());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_compliance_policy_lookup() {
        let config = Config {
            non_compliant_cookie_names: CompliancePolicy::Ignore,
            ..Config::default()
        };
        assert_eq!(
            config.compliance_policy(ComplianceTarget::CookieName),
            CompliancePolicy::Ignore
        );
        assert_eq!(
            config.compliance_policy(ComplianceTarget::HeaderName),
            CompliancePolicy::Fail
        );
    }
}
