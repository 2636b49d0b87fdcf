//! Configuration types.
//!
//! Everything is read once at startup into an immutable [`AppConfig`] that
//! `main` hands to the collaborators that need it.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Vapi REST endpoint.
pub const DEFAULT_VAPI_API_URL: &str = "https://api.vapi.ai";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Interface to bind the HTTP server on.
    pub host: String,
    /// Port to bind the HTTP server on.
    pub port: u16,
    /// Path of the libSQL database file.
    pub db_path: PathBuf,
    /// Vapi credentials; `None` when `VAPI_API_PRIVATE_KEY` is unset.
    pub vapi: Option<VapiConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            db_path: PathBuf::from("./data/voice-todo.db"),
            vapi: None,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("VOICE_TODO_HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "VOICE_TODO_PORT")?.unwrap_or(defaults.port);
        let db_path = lookup("VOICE_TODO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);
        let vapi = VapiConfig::from_lookup(&lookup)?;

        Ok(Self {
            host,
            port,
            db_path,
            vapi,
        })
    }

    /// Socket address the server listens on.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "VOICE_TODO_HOST".to_string(),
                message: format!("{e}"),
            })
    }
}

/// Credentials and polling policy for the Vapi call API.
#[derive(Debug, Clone)]
pub struct VapiConfig {
    pub api_url: String,
    pub private_key: SecretString,
    /// Maximum number of status requests per call lookup.
    pub poll_attempts: u32,
    /// Delay between two status requests.
    pub poll_interval: Duration,
}

impl VapiConfig {
    /// Config with the default endpoint and polling policy.
    pub fn new(private_key: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_VAPI_API_URL.to_string(),
            private_key: SecretString::from(private_key.into()),
            poll_attempts: 3,
            poll_interval: Duration::from_secs(3),
        }
    }

    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(private_key) = lookup("VAPI_API_PRIVATE_KEY") else {
            return Ok(None);
        };

        let mut config = Self::new(private_key);
        if let Some(url) = lookup("VAPI_API_URL") {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(attempts) = parse_var::<u32, _>(lookup, "VAPI_POLL_ATTEMPTS")? {
            if attempts == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "VAPI_POLL_ATTEMPTS".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.poll_attempts = attempts;
        }
        if let Some(secs) = parse_var::<u64, _>(lookup, "VAPI_POLL_INTERVAL_SECS")? {
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(Some(config))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
