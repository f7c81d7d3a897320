use crate::app_config::{AppConfig, Environment};
use crate::geo::EARTH_RADIUS_KM;
use crate::ranking::{DEFAULT_IMAGE_URL, DEFAULT_RADIUS_KM};
use crate::ConfigError;

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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let parse_positive_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(var, format!("must be a positive number, got {value}")));
        }
        Ok(value)
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("MEDFIND_ENV", "development"))?;

    let bind_addr = parse_addr("MEDFIND_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("MEDFIND_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("MEDFIND_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("MEDFIND_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("MEDFIND_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let nearby_radius_km = parse_positive_f64("MEDFIND_NEARBY_RADIUS_KM", DEFAULT_RADIUS_KM)?;
    let earth_radius_km = parse_positive_f64("MEDFIND_EARTH_RADIUS_KM", EARTH_RADIUS_KM)?;
    let default_image_url = or_default("MEDFIND_DEFAULT_IMAGE_URL", DEFAULT_IMAGE_URL);

    let pharmacies_path =
        PathBuf::from(or_default("MEDFIND_PHARMACIES_PATH", "./data/pharmacies.json"));
    let image_overrides_path = PathBuf::from(or_default(
        "MEDFIND_IMAGE_OVERRIDES_PATH",
        "./config/pharmacy_images.yaml",
    ));
    let catalog_path = PathBuf::from(or_default("MEDFIND_CATALOG_PATH", "./config/catalog.yaml"));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        nearby_radius_km,
        earth_radius_km,
        default_image_url,
        pharmacies_path,
        image_overrides_path,
        catalog_path,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MEDFIND_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
