use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn with_var<'a>(key: &'a str, value: &'a str) -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert(key, value);
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MUAMBR_ENV"));
}

#[test]
fn build_app_config_succeeds_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.storefronts_path,
        std::path::PathBuf::from("./config/storefronts.yaml")
    );
    assert!(cfg.exchange_rate_api_key.is_none());
    assert_eq!(cfg.rates_primary_url, "https://v6.exchangerate-api.com/v6");
    assert_eq!(cfg.rates_secondary_url, "https://api.frankfurter.app");
    assert_eq!(cfg.rates_timeout_secs, 10);
    assert_eq!(cfg.extractor_timeout_secs, 30);
    assert_eq!(cfg.request_deadline_secs, 45);
    assert_eq!(cfg.extractor_max_concurrency, 5);
    assert_eq!(cfg.scraper_user_agent, "muambr/0.1 (price-comparison)");
    assert_eq!(cfg.scraper_max_retries, 1);
    assert_eq!(cfg.scraper_retry_backoff_base_ms, 500);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let map = with_var("MUAMBR_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MUAMBR_BIND_ADDR"),
        "expected InvalidEnvVar(MUAMBR_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn exchange_rate_api_key_is_read_when_present() {
    let map = with_var("EXCHANGE_RATE_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.exchange_rate_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn blank_exchange_rate_api_key_is_treated_as_missing() {
    let map = with_var("EXCHANGE_RATE_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.exchange_rate_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let map = with_var("EXCHANGE_RATE_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-key"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn extractor_timeout_override() {
    let map = with_var("MUAMBR_EXTRACTOR_TIMEOUT_SECS", "12");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.extractor_timeout_secs, 12);
}

#[test]
fn extractor_timeout_zero_is_rejected() {
    let map = with_var("MUAMBR_EXTRACTOR_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MUAMBR_EXTRACTOR_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MUAMBR_EXTRACTOR_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_deadline_invalid() {
    let map = with_var("MUAMBR_REQUEST_DEADLINE_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MUAMBR_REQUEST_DEADLINE_SECS"),
        "expected InvalidEnvVar(MUAMBR_REQUEST_DEADLINE_SECS), got: {result:?}"
    );
}

#[test]
fn max_concurrency_override() {
    let map = with_var("MUAMBR_EXTRACTOR_MAX_CONCURRENCY", "8");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.extractor_max_concurrency, 8);
}

#[test]
fn max_concurrency_zero_is_rejected() {
    let map = with_var("MUAMBR_EXTRACTOR_MAX_CONCURRENCY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MUAMBR_EXTRACTOR_MAX_CONCURRENCY"),
        "expected InvalidEnvVar(MUAMBR_EXTRACTOR_MAX_CONCURRENCY), got: {result:?}"
    );
}

#[test]
fn scraper_max_retries_invalid() {
    let map = with_var("MUAMBR_SCRAPER_MAX_RETRIES", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MUAMBR_SCRAPER_MAX_RETRIES"),
        "expected InvalidEnvVar(MUAMBR_SCRAPER_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn rates_urls_override() {
    let mut map = with_var("MUAMBR_RATES_PRIMARY_URL", "http://localhost:9000/v6");
    map.insert("MUAMBR_RATES_SECONDARY_URL", "http://localhost:9001");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.rates_primary_url, "http://localhost:9000/v6");
    assert_eq!(cfg.rates_secondary_url, "http://localhost:9001");
}
