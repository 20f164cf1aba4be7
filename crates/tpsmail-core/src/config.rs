use crate::app_config::{AppConfig, ProxyConfig, SiteConfig};
use crate::ConfigError;

pub const PROXY_TOKEN_VAR: &str = "SCRAPE_DO_API_KEY";

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
/// Parsing is decoupled from the real environment so tests can feed a plain
/// `HashMap` instead of calling `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let token = require(PROXY_TOKEN_VAR)?;

    let bind_addr = or_default("TPSMAIL_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TPSMAIL_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TPSMAIL_LOG_LEVEL", "info");

    let proxy_base_url = parse_http_url(
        "TPSMAIL_PROXY_BASE_URL",
        &or_default("TPSMAIL_PROXY_BASE_URL", "https://api.scrape.do"),
    )?;
    let timeout_secs = or_default("TPSMAIL_PROXY_TIMEOUT_SECS", "30")
        .parse::<u64>()
        .map_err(|e| invalid("TPSMAIL_PROXY_TIMEOUT_SECS", e.to_string()))?;
    if timeout_secs == 0 {
        return Err(invalid(
            "TPSMAIL_PROXY_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let geo_code = or_default("TPSMAIL_PROXY_GEO_CODE", "us");
    let super_proxy = parse_bool(
        "TPSMAIL_PROXY_SUPER",
        &or_default("TPSMAIL_PROXY_SUPER", "true"),
    )?;

    let origin = parse_http_url(
        "TPSMAIL_SITE_ORIGIN",
        &or_default("TPSMAIL_SITE_ORIGIN", "https://www.truepeoplesearch.com"),
    )?;
    let operator_domain = or_default("TPSMAIL_OPERATOR_DOMAIN", "truepeoplesearch.com")
        .trim()
        .to_ascii_lowercase();

    Ok(AppConfig {
        bind_addr,
        log_level,
        proxy: ProxyConfig {
            token,
            base_url: proxy_base_url,
            timeout_secs,
            geo_code,
            super_proxy,
        },
        site: SiteConfig {
            origin,
            operator_domain,
        },
    })
}

fn parse_http_url(var: &str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected an http(s) URL, got \"{raw}\""),
        })
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
