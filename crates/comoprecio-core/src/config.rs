use crate::app_config::{AppConfig, DEFAULT_SCRAPER_USER_AGENT};
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
/// Every variable has a default, so only malformed values fail.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
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

    let log_level = or_default("COMOPRECIO_LOG_LEVEL", "info");
    let catalog_path = optional("COMOPRECIO_CATALOG_PATH").map(PathBuf::from);
    let output_path = PathBuf::from(or_default("COMOPRECIO_OUTPUT_PATH", "./data/products.json"));
    let browser_output_path = PathBuf::from(or_default(
        "COMOPRECIO_BROWSER_OUTPUT_PATH",
        "./data/aliexpress_products.json",
    ));
    let watch_output_dir = PathBuf::from(or_default("COMOPRECIO_WATCH_OUTPUT_DIR", "."));

    let scraper_request_timeout_secs = parse_u64("COMOPRECIO_SCRAPER_REQUEST_TIMEOUT_SECS", "15")?;
    let scraper_user_agent = or_default("COMOPRECIO_SCRAPER_USER_AGENT", DEFAULT_SCRAPER_USER_AGENT);
    let scraper_max_attempts = parse_u32("COMOPRECIO_SCRAPER_MAX_ATTEMPTS", "3")?;
    if scraper_max_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COMOPRECIO_SCRAPER_MAX_ATTEMPTS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let scraper_retry_backoff_ms = parse_u64("COMOPRECIO_SCRAPER_RETRY_BACKOFF_MS", "2000")?;
    let scraper_inter_request_delay_ms =
        parse_u64("COMOPRECIO_SCRAPER_INTER_REQUEST_DELAY_MS", "1500")?;
    let browser_executable = optional("COMOPRECIO_BROWSER_EXECUTABLE");

    Ok(AppConfig {
        log_level,
        catalog_path,
        output_path,
        browser_output_path,
        watch_output_dir,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_attempts,
        scraper_retry_backoff_ms,
        scraper_inter_request_delay_ms,
        browser_executable,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
