//! Client configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! Configuration is loaded once at startup, before any component is wired up.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_API_BASE, DEFAULT_IDENTITY_FILE, DEFAULT_LOG_FILTER,
    DEFAULT_MATCH_POLL_INTERVAL_SECS,
};

/// Main client configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub polling: PollingConfig,
    pub identity: IdentityConfig,
    pub rust_log: String,
    pub log_format: LogFormat,
}

/// Log output format, from `LOG_FORMAT`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue("LOG_FORMAT".to_string())),
        }
    }
}

/// Battle server connection configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Transport timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

/// Polling configuration
#[derive(Debug, Clone)]
pub struct PollingConfig {
    pub match_interval: Duration,
}

/// Caller identity configuration
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Identity supplied by the hosting mini-app, if any
    pub host_tg_id: Option<i64>,
    /// File holding the last known identity
    pub fallback_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api: ApiConfig::from_env()?,
            polling: PollingConfig::from_env()?,
            identity: IdentityConfig::from_env()?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            log_format: match env::var("LOG_FORMAT") {
                Ok(raw) => LogFormat::parse(&raw)?,
                Err(_) => LogFormat::default(),
            },
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_API_BASE.to_string(),
                request_timeout: None,
            },
            polling: PollingConfig {
                match_interval: Duration::from_secs(DEFAULT_MATCH_POLL_INTERVAL_SECS),
            },
            identity: IdentityConfig {
                host_tg_id: None,
                fallback_path: PathBuf::from(DEFAULT_IDENTITY_FILE),
            },
            rust_log: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl ApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("CODEDUEL_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("CODEDUEL_API_BASE".to_string()));
        }

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(parse_positive(&raw, "REQUEST_TIMEOUT_SECS")?)),
            Err(_) => None,
        };

        Ok(Self {
            base_url,
            request_timeout,
        })
    }
}

impl PollingConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secs = env::var("MATCH_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| DEFAULT_MATCH_POLL_INTERVAL_SECS.to_string());

        Ok(Self {
            match_interval: Duration::from_secs(parse_positive(&secs, "MATCH_POLL_INTERVAL_SECS")?),
        })
    }
}

impl IdentityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host_tg_id = match env::var("TG_USER_ID") {
            Ok(raw) => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("TG_USER_ID".to_string()))?,
            ),
            Err(_) => None,
        };

        Ok(Self {
            host_tg_id,
            fallback_path: PathBuf::from(
                env::var("IDENTITY_FILE").unwrap_or_else(|_| DEFAULT_IDENTITY_FILE.to_string()),
            ),
        })
    }
}

fn parse_positive(raw: &str, name: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue(name.to_string())),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
