use crate::app_config::{AppConfig, Environment};
use crate::model::DEFAULT_RADIUS_MILES;
use crate::ConfigError;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Does not read `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::str::FromStr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("RADAR_ENV", "development"));

    let bind_addr: SocketAddr =
        parse_value("RADAR_BIND_ADDR", &or_default("RADAR_BIND_ADDR", "0.0.0.0:8000"))?;
    let log_level = or_default("RADAR_LOG_LEVEL", "info");

    let db_max_connections = parse_value(
        "RADAR_DB_MAX_CONNECTIONS",
        &or_default("RADAR_DB_MAX_CONNECTIONS", "10"),
    )?;
    let db_min_connections = parse_value(
        "RADAR_DB_MIN_CONNECTIONS",
        &or_default("RADAR_DB_MIN_CONNECTIONS", "1"),
    )?;
    let db_acquire_timeout_secs = parse_value(
        "RADAR_DB_ACQUIRE_TIMEOUT_SECS",
        &or_default("RADAR_DB_ACQUIRE_TIMEOUT_SECS", "10"),
    )?;

    let default_radius_miles: f64 = parse_value(
        "RADAR_DEFAULT_RADIUS_MILES",
        &or_default("RADAR_DEFAULT_RADIUS_MILES", &DEFAULT_RADIUS_MILES.to_string()),
    )?;
    if !default_radius_miles.is_finite() || default_radius_miles <= 0.0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RADAR_DEFAULT_RADIUS_MILES".to_string(),
            reason: format!("radius must be a positive number of miles, got {default_radius_miles}"),
        });
    }

    let cors_origins = parse_origins(&or_default("RADAR_CORS_ORIGINS", DEFAULT_CORS_ORIGINS));
    let rate_limit_per_minute = parse_value(
        "RADAR_RATE_LIMIT_PER_MINUTE",
        &or_default("RADAR_RATE_LIMIT_PER_MINUTE", "120"),
    )?;

    let openai_api_key = lookup("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty());
    let summarizer_base_url = or_default("RADAR_SUMMARIZER_BASE_URL", "https://api.openai.com/v1");
    let summarizer_model = or_default("RADAR_SUMMARIZER_MODEL", "gpt-4o-mini");
    let summarizer_timeout_secs = parse_value(
        "RADAR_SUMMARIZER_TIMEOUT_SECS",
        &or_default("RADAR_SUMMARIZER_TIMEOUT_SECS", "20"),
    )?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        default_radius_miles,
        cors_origins,
        rate_limit_per_minute,
        openai_api_key,
        summarizer_base_url,
        summarizer_model,
        summarizer_timeout_secs,
    })
}

/// Unrecognized values fall back to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
