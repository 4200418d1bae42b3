use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric or enum value cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Tests and
/// callers that manage their own environment use this entry point.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric or enum value cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Blank credentials count as unset.
    let optional_key = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
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

    let env = parse_environment(&or_default("UKADDR_ENV", "development"))?;
    let log_level = or_default("UKADDR_LOG_LEVEL", "info");

    let mapbox_token = optional_key("MAPBOX_TOKEN");
    let google_maps_api_key = optional_key("GOOGLE_MAPS_API_KEY");
    let loqate_api_key = optional_key("LOQATE_API_KEY");
    let ideal_postcodes_api_key = optional_key("IDEAL_POSTCODES_API_KEY");
    let royal_mail_api_key = optional_key("ROYAL_MAIL_API_KEY");

    let request_timeout_secs = parse_u64("UKADDR_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("UKADDR_USER_AGENT", "ukaddr/0.1 (address-lookup)");
    let debounce_ms = parse_u64("UKADDR_DEBOUNCE_MS", "300")?;
    let cache_ttl_secs = parse_u64("UKADDR_CACHE_TTL_SECS", "300")?;
    let cache_max_entries = parse_usize("UKADDR_CACHE_MAX_ENTRIES", "512")?;

    if cache_max_entries == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "UKADDR_CACHE_MAX_ENTRIES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        log_level,
        mapbox_token,
        google_maps_api_key,
        loqate_api_key,
        ideal_postcodes_api_key,
        royal_mail_api_key,
        request_timeout_secs,
        user_agent,
        debounce_ms,
        cache_ttl_secs,
        cache_max_entries,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "UKADDR_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
