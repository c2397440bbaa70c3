//! The process-wide configuration is shared by every test in a binary, so all
//! checks against it live in this one test.

use paramcodec_core::config::{self, CompliancePolicy, Config};
use paramcodec_core::{
    check_cookie_value, check_header_name, ConfigError, Direction, ParameterPosition,
    SerializationStrategy, ShapeCategory,
};
use pretty_assertions::assert_eq;
use std::thread;

#[test]
fn test_global_config_lifecycle() {
    assert_eq!(*config::current(), Config::default());
    assert!(check_header_name("Bad Header").is_err());

    config::update(|config| config.non_compliant_header_names = CompliancePolicy::Warn).unwrap();
    assert!(check_header_name("Bad Header").is_ok());
    assert!(check_cookie_value("a;b").is_err());

    let rejected = config::update(|config| {
        config.response_defaults.cookie.object = SerializationStrategy::JSON;
    });
    assert_eq!(
        rejected,
        Err(ConfigError {
            direction: Direction::Response,
            position: ParameterPosition::Cookie,
            category: ShapeCategory::Object,
            strategy: SerializationStrategy::JSON,
        })
    );
    assert_eq!(
        config::current().non_compliant_header_names,
        CompliancePolicy::Warn
    );

    let snapshot = config::current();
    let writers: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                config::replace(Config {
                    non_compliant_cookie_values: CompliancePolicy::Ignore,
                    ..Config::default()
                })
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap().unwrap();
    }
    assert_eq!(snapshot.non_compliant_cookie_values, CompliancePolicy::Fail);
    assert!(check_cookie_value("a;b").is_ok());
    assert!(check_header_name("Bad Header").is_err());

    config::replace(Config::default()).unwrap();
}
