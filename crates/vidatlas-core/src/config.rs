use crate::app_config::AppConfig;
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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
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

    let youtube_api_key = require("YOUTUBE_API_KEY")?;

    let log_level = or_default("VIDATLAS_LOG_LEVEL", "info");
    let channels_path = PathBuf::from(or_default(
        "VIDATLAS_CHANNELS_PATH",
        "./config/channels.yaml",
    ));
    let cache_dir = PathBuf::from(or_default("VIDATLAS_CACHE_DIR", "./cache"));

    let cache_ttl_hours = parse_u64("VIDATLAS_CACHE_TTL_HOURS", "24")?;

    let video_request_timeout_secs = parse_u64("VIDATLAS_VIDEO_REQUEST_TIMEOUT_SECS", "30")?;
    let video_max_results = parse_u32("VIDATLAS_VIDEO_MAX_RESULTS", "50")?;
    let video_max_retries = parse_u32("VIDATLAS_VIDEO_MAX_RETRIES", "3")?;
    let video_retry_backoff_base_ms = parse_u64("VIDATLAS_VIDEO_RETRY_BACKOFF_BASE_MS", "1000")?;

    let geocoder_user_agent = or_default(
        "VIDATLAS_GEOCODER_USER_AGENT",
        "vidatlas/0.1 (media-location-enrichment)",
    );
    let geocoder_timeout_secs = parse_u64("VIDATLAS_GEOCODER_TIMEOUT_SECS", "10")?;
    let geocoder_min_interval_ms = parse_u64("VIDATLAS_GEOCODER_MIN_INTERVAL_MS", "1000")?;

    Ok(AppConfig {
        youtube_api_key,
        log_level,
        channels_path,
        cache_dir,
        cache_ttl_hours,
        video_request_timeout_secs,
        video_max_results,
        video_max_retries,
        video_retry_backoff_base_ms,
        geocoder_user_agent,
        geocoder_timeout_secs,
        geocoder_min_interval_ms,
    })
}
