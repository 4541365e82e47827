//! Configuration loading from environment.

use std::env;
use std::time::Duration;

const DEFAULT_AUTHORIZER_TIMEOUT_SECS: u64 = 5;

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration.
pub struct Config {
    /// Base URL of the external authorizer. Everything is approved when unset.
    pub authorizer_url: Option<String>,
    pub authorizer_timeout: Duration,
    pub password_pepper: String,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let authorizer_url = env::var("AUTHORIZER_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout_secs = match env::var("AUTHORIZER_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("AUTHORIZER_TIMEOUT_SECS must be a whole number of seconds")
            })?,
            Err(_) => DEFAULT_AUTHORIZER_TIMEOUT_SECS,
        };

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| anyhow::anyhow!("PASSWORD_PEPPER environment variable is required"))?;
        if password_pepper.is_empty() {
            anyhow::bail!("PASSWORD_PEPPER must not be empty");
        }

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("pretty") | Err(_) => LogFormat::Pretty,
            Ok(other) => anyhow::bail!("LOG_FORMAT must be 'pretty' or 'json', got '{}'", other),
        };

        Ok(Self {
            authorizer_url,
            authorizer_timeout: Duration::from_secs(timeout_secs),
            password_pepper,
            log_format,
        })
    }
}
