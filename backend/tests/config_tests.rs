//! Tests for config - AppConfig loading from environment variables.

mod support;

use geogame::config::{AppConfig, Environment};
use std::time::Duration;

#[test]
fn test_from_env_defaults() {
    support::with_env(&[], || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.environment, Environment::Dev);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.db_timeout, Duration::from_secs(3));
        assert_eq!(config.token_secret, "");
        assert_eq!(config.token_ttl, Duration::from_secs(86_400));
    });
}

#[test]
fn test_from_env_overrides() {
    let vars = [
        ("ENV", "prod"),
        ("PORT", "9000"),
        ("HTTP_TIME_OUT", "5"),
        ("DB_TIME_OUT", "1"),
        ("TOKEN_SECRET", "s3cr3t"),
        ("TOKEN_TTL_SECS", "60"),
    ];
    support::with_env(&vars, || {
        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.port, 9000);
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.db_timeout, Duration::from_secs(1));
        assert_eq!(config.token_secret, "s3cr3t");
        assert_eq!(config.token_ttl, Duration::from_secs(60));
    });
}

#[test]
fn test_legacy_secret_variable_is_fallback() {
    support::with_env(&[("secret", "legacy")], || {
        assert_eq!(AppConfig::from_env().unwrap().token_secret, "legacy");
    });
}

#[test]
fn test_prod_requires_token_secret() {
    support::with_env(&[("ENV", "prod")], || {
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.contains("TOKEN_SECRET"), "{}", err);
    });
    support::with_env(&[("ENV", "prod"), ("secret", "legacy")], || {
        assert!(AppConfig::from_env().is_ok());
    });
}

#[test]
fn test_dev_allows_empty_token_secret() {
    support::with_env(&[("ENV", "dev")], || {
        assert_eq!(AppConfig::from_env().unwrap().token_secret, "");
    });
}

#[test]
fn test_oversized_token_ttl_is_error() {
    for value in ["9223372036854775807", "18446744073709551615"] {
        support::with_env(&[("TOKEN_TTL_SECS", value)], || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(err.contains("TOKEN_TTL_SECS"), "{}", err);
        });
    }
}

#[test]
fn test_unparsable_values_are_errors() {
    for (key, value) in [("PORT", "eighty"), ("DB_TIME_OUT", "-1"), ("ENV", "qa")] {
        support::with_env(&[(key, value)], || {
            let err = AppConfig::from_env().unwrap_err();
            assert!(err.contains(key), "{}", err);
        });
    }
}
