use crate::app_config::{AppConfig, Environment};
use crate::subscription::normalize_email;
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
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
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

    let parse_bool = |var: &str, default: bool| -> Result<bool, ConfigError> {
        match optional(var) {
            None => Ok(default),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                other => Err(invalid(var, format!("expected a boolean, got '{other}'"))),
            },
        }
    };

    let database_url = optional("DATABASE_URL");
    let env = parse_environment(&or_default("VREVERSE_ENV", "development"))?;
    let bind_addr = parse_addr("VREVERSE_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("VREVERSE_LOG_LEVEL", "info");

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("VREVERSE_GEMINI_MODEL", "gemini-3-pro-preview");
    let gemini_base_url = or_default(
        "VREVERSE_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com/v1beta",
    );
    let gemini_timeout_secs = parse_u64("VREVERSE_GEMINI_TIMEOUT_SECS", "120")?;
    let strict_variations = parse_bool("VREVERSE_STRICT_VARIATIONS", false)?;

    let admin_emails = parse_admin_emails(&or_default("VREVERSE_ADMIN_EMAILS", ""));
    let webhook_token = optional("VREVERSE_WEBHOOK_TOKEN");
    let max_upload_bytes = parse_usize("VREVERSE_MAX_UPLOAD_BYTES", "20971520")?;

    let db_max_connections = parse_u32("VREVERSE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("VREVERSE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("VREVERSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        gemini_timeout_secs,
        strict_variations,
        admin_emails,
        webhook_token,
        max_upload_bytes,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "VREVERSE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Split a comma-separated list, normalizing each entry and dropping anything
/// that is not an email address.
fn parse_admin_emails(raw: &str) -> Vec<String> {
    let mut emails: Vec<String> = raw.split(',').filter_map(normalize_email).collect();
    emails.sort();
    emails.dedup();
    emails
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
