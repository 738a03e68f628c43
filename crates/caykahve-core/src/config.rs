use crate::app_config::{AppConfig, Environment};
use crate::types::Location;
use crate::ConfigError;

/// Istanbul, Eminönü.
const DEFAULT_FALLBACK_LAT: &str = "41.015137";
const DEFAULT_FALLBACK_LON: &str = "28.979530";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let proxy_url = require("CAYKAHVE_PROXY_URL")?;
    let env = parse_environment(&or_default("CAYKAHVE_ENV", "development"))?;
    let log_level = or_default("CAYKAHVE_LOG_LEVEL", "info");

    let fallback_lat = parse_f64("CAYKAHVE_FALLBACK_LAT", DEFAULT_FALLBACK_LAT)?;
    let fallback_lon = parse_f64("CAYKAHVE_FALLBACK_LON", DEFAULT_FALLBACK_LON)?;
    let fallback_location =
        Location::new(fallback_lat, fallback_lon).map_err(|e| ConfigError::InvalidEnvVar {
            var: "CAYKAHVE_FALLBACK_LAT/CAYKAHVE_FALLBACK_LON".to_string(),
            reason: e.to_string(),
        })?;

    let location_timeout_ms = parse_u64("CAYKAHVE_LOCATION_TIMEOUT_MS", "6000")?;
    let device_timeout_ms = parse_u64("CAYKAHVE_DEVICE_TIMEOUT_MS", "5000")?;
    let search_timeout_secs = parse_u64("CAYKAHVE_SEARCH_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("CAYKAHVE_USER_AGENT", "caykahve/0.1 (place-discovery)");

    let max_results = parse_usize("CAYKAHVE_MAX_RESULTS", "10")?;
    if max_results == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CAYKAHVE_MAX_RESULTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let geoip_url = lookup("CAYKAHVE_GEOIP_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    Ok(AppConfig {
        env,
        log_level,
        proxy_url,
        fallback_location,
        location_timeout_ms,
        device_timeout_ms,
        search_timeout_secs,
        user_agent,
        max_results,
        geoip_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "CAYKAHVE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
