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
/// Kept separate from the process environment so tests can drive it with a
/// plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("NODE_ENV", "development"));
    let store_uri = optional("MONGODB_URI").or_else(|| optional("DATABASE_URL"));
    let google_api_key = optional("GOOGLE_API_KEY");

    let api_base = match optional("LOC8R_API_BASE") {
        Some(base) => validate_api_base(&base)?,
        None => env.default_api_base().to_string(),
    };

    let bind_addr = parse_addr("LOC8R_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("LOC8R_LOG_LEVEL", "info");
    let api_timeout_secs = parse_u64("LOC8R_API_TIMEOUT_SECS", "30")?;

    let db_max_connections = parse_u32("LOC8R_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LOC8R_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LOC8R_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        store_uri,
        env,
        api_base,
        google_api_key,
        bind_addr,
        log_level,
        api_timeout_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a `NODE_ENV` value into an `Environment` variant.
///
/// Only `production` switches the upstream API; unrecognized values fall back
/// to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

/// The API base must be an absolute http(s) origin. A trailing slash is dropped
/// so request paths can be appended verbatim.
fn validate_api_base(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: "LOC8R_API_BASE".to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
