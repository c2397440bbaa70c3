#![deny(missing_docs)]

//! # Header & Cookie Compliance
//!
//! Character checks for header and cookie names and values. What happens to a
//! non-compliant input is decided by the [`CompliancePolicy`] configured for
//! its target.

use crate::config::{self, CompliancePolicy, Config};
use crate::error::ComplianceError;
use derive_more::Display;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

/// What is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComplianceTarget {
    /// A header name.
    #[display("header name")]
    HeaderName,
    /// A header value.
    #[display("header value")]
    HeaderValue,
    /// A cookie name.
    #[display("cookie name")]
    CookieName,
    /// A cookie value.
    #[display("cookie value")]
    CookieValue,
}

impl ComplianceTarget {
    fn pattern(self) -> &'static Regex {
        static HEADER_NAME_RE: OnceLock<Regex> = OnceLock::new();
        static HEADER_VALUE_RE: OnceLock<Regex> = OnceLock::new();
        static COOKIE_NAME_RE: OnceLock<Regex> = OnceLock::new();
        static COOKIE_VALUE_RE: OnceLock<Regex> = OnceLock::new();

        match self {
            ComplianceTarget::HeaderName => HEADER_NAME_RE
                .get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("Invalid regex")),
            ComplianceTarget::HeaderValue => HEADER_VALUE_RE.get_or_init(|| {
                Regex::new(r##"^[A-Za-z0-9 _:;.,\\/"'?!(){}\[\]@<>=\-+*#$&`|~^%]*$"##)
                    .expect("Invalid regex")
            }),
            ComplianceTarget::CookieName => COOKIE_NAME_RE.get_or_init(|| {
                Regex::new(r"^[A-Za-z0-9!#$%&'*+\-.~^_]+$").expect("Invalid regex")
            }),
            ComplianceTarget::CookieValue => COOKIE_VALUE_RE.get_or_init(|| {
                Regex::new(r"^[A-Za-z0-9!#$%&'()*+\-./:<=>?`\[~\]^_@{}]*$").expect("Invalid regex")
            }),
        }
    }

    /// Whether `input` only uses characters allowed for this target.
    pub fn is_compliant(self, input: &str) -> bool {
        self.pattern().is_match(input)
    }
}

/// Checks `input` against `target`, applying the policy from `config`.
pub fn check(
    target: ComplianceTarget,
    input: &str,
    config: &Config,
) -> Result<(), ComplianceError> {
    if target.is_compliant(input) {
        return Ok(());
    }
    match config.compliance_policy(target) {
        CompliancePolicy::Ignore => Ok(()),
        CompliancePolicy::Warn => {
            warn!(%target, input, "non-compliant {target}");
            Ok(())
        }
        CompliancePolicy::Fail => Err(ComplianceError {
            target,
            input: input.to_string(),
        }),
    }
}

/// Checks a header name under the active configuration.
pub fn check_header_name(name: &str) -> Result<(), ComplianceError> {
    check(ComplianceTarget::HeaderName, name, &config::current())
}

/// Checks a header value under the active configuration.
pub fn check_header_value(value: &str) -> Result<(), ComplianceError> {
    check(ComplianceTarget::HeaderValue, value, &config::current())
}

/// Checks a cookie name under the active configuration.
pub fn check_cookie_name(name: &str) -> Result<(), ComplianceError> {
    check(ComplianceTarget::CookieName, name, &config::current())
}

/// Checks a cookie value under the active configuration.
pub fn check_cookie_value(value: &str) -> Result<(), ComplianceError> {
    check(ComplianceTarget::CookieValue, value, &config::current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_names() {
        assert!(ComplianceTarget::HeaderName.is_compliant("X-Request_Id"));
        assert!(!ComplianceTarget::HeaderName.is_compliant("X Request"));
        assert!(!ComplianceTarget::HeaderName.is_compliant("X:Id"));
        assert!(!ComplianceTarget::HeaderName.is_compliant(""));
    }

    #[test]
    fn test_header_values() {
        assert!(ComplianceTarget::HeaderValue.is_compliant(
            r#"Bearer abc.def, q="1"; {a:[b]} \/?!@<>=-+*#$&`|~^%"#
        ));
        assert!(ComplianceTarget::HeaderValue.is_compliant(""));
        assert!(!ComplianceTarget::HeaderValue.is_compliant("line\nbreak"));
        assert!(!ComplianceTarget::HeaderValue.is_compliant("caf\u{e9}"));
    }

    #[test]
    fn test_cookie_names_and_values() {
        assert!(ComplianceTarget::CookieName.is_compliant("session_id.v2~"));
        assert!(!ComplianceTarget::CookieName.is_compliant("session=id"));
        assert!(!ComplianceTarget::CookieName.is_compliant("a(b)"));
        assert!(ComplianceTarget::CookieValue.is_compliant("a=b/c:{d}[e]@f"));
        assert!(!ComplianceTarget::CookieValue.is_compliant("a;b"));
        assert!(!ComplianceTarget::CookieValue.is_compliant("a b"));
        assert!(!ComplianceTarget::CookieValue.is_compliant("a,b"));
    }

    #[test]
    fn test_policies() {
        let fail = Config::default();
        let err = check(ComplianceTarget::HeaderName, "bad name", &fail).unwrap_err();
        assert_eq!(err.to_string(), "Non-compliant header name \"bad name\"");

        let warn = Config {
            non_compliant_header_names: CompliancePolicy::Warn,
            ..Config::default()
        };
        assert_eq!(check(ComplianceTarget::HeaderName, "bad name", &warn), Ok(()));

        let ignore = Config {
            non_compliant_cookie_values: CompliancePolicy::Ignore,
            ..Config::default()
        };
        assert_eq!(check(ComplianceTarget::CookieValue, "a;b", &ignore), Ok(()));
        assert!(check(ComplianceTarget::CookieName, "a;b", &ignore).is_err());
    }
}
