use crate::app_config::{AppConfig, Environment, SheetsConfig};
use crate::users::parse_allowed_users;
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
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> { lookup(var).ok().filter(|v| !v.is_empty()) };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
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

    let spreadsheet_id = require("GOOGLE_SPREADSHEET_DB_ID")?;
    let client_email = require("GOOGLE_SHEETS_CLIENT_EMAIL")?;
    let private_key = expand_newlines(&require("GOOGLE_SHEETS_PRIVATE_KEY")?);
    let jwt_secret = require("JWT_SECRET")?;
    let allowed_users = parse_allowed_users(&require("ALLOWED_USERS")?)?;

    let env = parse_environment(&or_default("ROPERO_ENV", "development"))?;
    let bind_addr = parse_addr("ROPERO_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("ROPERO_LOG_LEVEL", "info");

    let api_base = or_default("ROPERO_SHEETS_API_BASE", "https://sheets.googleapis.com");
    let token_url = or_default(
        "ROPERO_SHEETS_TOKEN_URL",
        "https://oauth2.googleapis.com/token",
    );
    let request_timeout_secs = parse_u64("ROPERO_SHEETS_REQUEST_TIMEOUT_SECS", "30")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        sheets: SheetsConfig {
            spreadsheet_id,
            api_base: api_base.trim_end_matches('/').to_string(),
            token_url,
            client_email,
            private_key,
            project_id: optional("GOOGLE_SHEETS_PROJECT_ID"),
            client_id: optional("GOOGLE_SHEETS_CLIENT_ID"),
            request_timeout_secs,
        },
        jwt_secret,
        allowed_users,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ROPERO_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Private keys pasted into `.env` files usually carry literal `\n` escapes.
fn expand_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
