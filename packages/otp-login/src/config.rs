use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::controller::LoginSettings;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const ACCOUNTS_PATH: &str = "/api/accounts";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API origin, without a trailing slash
    pub api_url: String,
    pub resend_cooldown_secs: u32,
    pub code_error_display: Duration,
    pub request_timeout: Duration,
    pub token_store_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            resend_cooldown_secs: LoginSettings::DEFAULT_RESEND_COOLDOWN_SECS,
            code_error_display: LoginSettings::DEFAULT_CODE_ERROR_DISPLAY,
            request_timeout: Duration::from_secs(15),
            token_store_path: PathBuf::from(".noonyar/session.json"),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("NOONYAR_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            resend_cooldown_secs: match env::var("NOONYAR_RESEND_COOLDOWN_SECS") {
                Ok(raw) => raw
                    .parse()
                    .context("NOONYAR_RESEND_COOLDOWN_SECS must be a whole number of seconds")?,
                Err(_) => defaults.resend_cooldown_secs,
            },
            code_error_display: match env::var("NOONYAR_CODE_ERROR_DISPLAY_MS") {
                Ok(raw) => Duration::from_millis(
                    raw.parse()
                        .context("NOONYAR_CODE_ERROR_DISPLAY_MS must be a number of milliseconds")?,
                ),
                Err(_) => defaults.code_error_display,
            },
            request_timeout: match env::var("NOONYAR_REQUEST_TIMEOUT_SECS") {
                Ok(raw) => Duration::from_secs(
                    raw.parse()
                        .context("NOONYAR_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                Err(_) => defaults.request_timeout,
            },
            token_store_path: env::var("NOONYAR_TOKEN_STORE")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_store_path),
        })
    }

    /// Base URL of the accounts endpoints (`send-code/`, `verify-code/`)
    pub fn accounts_url(&self) -> String {
        format!("{}{}", self.api_url, ACCOUNTS_PATH)
    }

    pub fn login_settings(&self) -> LoginSettings {
        LoginSettings {
            resend_cooldown_secs: self.resend_cooldown_secs,
            code_error_display: self.code_error_display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_url_joins_origin_and_path() {
        let config = ClientConfig {
            api_url: "https://noonyar.example".to_string(),
            ..ClientConfig::default()
        };
        assert_eq!(config.accounts_url(), "https://noonyar.example/api/accounts");
    }

    #[test]
    fn defaults_match_network_flow() {
        let settings = ClientConfig::default().login_settings();
        assert_eq!(settings.resend_cooldown_secs, 120);
        assert_eq!(settings.code_error_display, Duration::from_secs(3));
    }
}
