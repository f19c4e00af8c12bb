use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if value == 0 {
            return Err(invalid(var, "must be greater than zero".to_string()));
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("MUAMBR_ENV", "development"))?;

    let bind_addr = parse_addr("MUAMBR_BIND_ADDR", "0.0.0.0:8080")?;
    let log_level = or_default("MUAMBR_LOG_LEVEL", "info");
    let storefronts_path = PathBuf::from(or_default(
        "MUAMBR_STOREFRONTS_PATH",
        "./config/storefronts.yaml",
    ));

    let exchange_rate_api_key = lookup("EXCHANGE_RATE_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let rates_primary_url = or_default(
        "MUAMBR_RATES_PRIMARY_URL",
        "https://v6.exchangerate-api.com/v6",
    );
    let rates_secondary_url = or_default(
        "MUAMBR_RATES_SECONDARY_URL",
        "https://api.frankfurter.app",
    );
    let rates_timeout_secs = positive_u64("MUAMBR_RATES_TIMEOUT_SECS", "10")?;

    let extractor_timeout_secs = positive_u64("MUAMBR_EXTRACTOR_TIMEOUT_SECS", "30")?;
    let request_deadline_secs = positive_u64("MUAMBR_REQUEST_DEADLINE_SECS", "45")?;
    let extractor_max_concurrency = parse_usize("MUAMBR_EXTRACTOR_MAX_CONCURRENCY", "5")?;
    if extractor_max_concurrency == 0 {
        return Err(invalid(
            "MUAMBR_EXTRACTOR_MAX_CONCURRENCY",
            "must be greater than zero".to_string(),
        ));
    }

    let scraper_user_agent = or_default(
        "MUAMBR_SCRAPER_USER_AGENT",
        "muambr/0.1 (price-comparison)",
    );
    let scraper_max_retries = parse_u32("MUAMBR_SCRAPER_MAX_RETRIES", "1")?;
    let scraper_retry_backoff_base_ms = parse_u64("MUAMBR_SCRAPER_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        storefronts_path,
        exchange_rate_api_key,
        rates_primary_url,
        rates_secondary_url,
        rates_timeout_secs,
        extractor_timeout_secs,
        request_deadline_secs,
        extractor_max_concurrency,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MUAMBR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
