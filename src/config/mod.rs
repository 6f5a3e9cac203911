//! Configuration management for the reverie application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. The loaded `Config` is passed explicitly into
//! the model clients and the dream store; nothing in the reflection pipeline reads
//! the environment on its own.
//!
//! # Environment Variables
//!
//! - `REVERIE_AI_MODE`: `relay` (default) or `direct`
//! - `REVERIE_RELAY_URL`: Relay endpoint used in relay mode
//! - `REVERIE_RELAY_TOKEN`: Bearer token shared by the caller and the relay
//! - `REVERIE_RELAY_ADDR`: Bind address for `reverie relay`
//! - `GEMINI_API_KEY`: Provider credential (direct mode and the relay server)
//! - `REVERIE_GEMINI_BASE_URL` / `REVERIE_GEMINI_MODEL`: Provider endpoint and model
//! - `REVERIE_DB`: Path to the dream database (defaults to ~/.local/share/reverie/dreams.db)
//! - `REVERIE_TIMEOUT_SECS`: Optional per-request timeout; requests never time out by default

use crate::constants::{
    DEFAULT_DB_PATH, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_RELAY_ADDR,
    DEFAULT_RELAY_URL, ENV_VAR_AI_MODE, ENV_VAR_DB, ENV_VAR_GEMINI_API_KEY,
    ENV_VAR_GEMINI_BASE_URL, ENV_VAR_GEMINI_MODEL, ENV_VAR_RELAY_ADDR, ENV_VAR_RELAY_TOKEN,
    ENV_VAR_RELAY_URL, ENV_VAR_TIMEOUT_SECS, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// How the calling tier reaches the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    /// Through the credential-holding relay. The provider key never leaves the relay.
    #[default]
    Relay,
    /// Straight to the provider with a locally held key.
    Direct,
}

impl FromStr for AiMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relay" => Ok(AiMode::Relay),
            "direct" => Ok(AiMode::Direct),
            other => Err(AppError::Config(format!(
                "Unknown AI mode '{}'. Use 'relay' or 'direct'",
                other
            ))),
        }
    }
}

/// Settings for talking to the model provider directly.
#[derive(Clone)]
pub struct GeminiSettings {
    /// Provider base URL, without a trailing slash.
    pub base_url: String,
    /// Model name, e.g. "gemini-2.0-flash".
    pub model: String,
    /// Provider credential.
    pub api_key: String,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &REDACTED_PLACEHOLDER)
            .finish()
    }
}

/// Settings for talking to the relay.
#[derive(Clone)]
pub struct RelaySettings {
    /// Full URL of the relay's generate endpoint.
    pub url: String,
    /// Optional bearer token.
    pub token: Option<String>,
}

impl fmt::Debug for RelaySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySettings")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| REDACTED_PLACEHOLDER))
            .finish()
    }
}

/// Configuration for the reverie application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use reverie::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/tmp/dreams.db"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use reverie::Config;
///
/// let config = Config::load().expect("Failed to load configuration");
/// config.validate().expect("Invalid configuration");
/// ```
#[derive(Clone)]
pub struct Config {
    /// How the model is reached.
    pub ai_mode: AiMode,
    /// Relay endpoint for `{prompt}` requests.
    pub relay_url: String,
    /// Bearer token sent to (and, for the relay server, expected from) callers.
    pub relay_token: Option<String>,
    /// Bind address for the relay server.
    pub relay_addr: String,
    /// Provider credential. Required in direct mode and by the relay server.
    pub gemini_api_key: Option<String>,
    /// Provider base URL.
    pub gemini_base_url: String,
    /// Provider model name.
    pub gemini_model: String,
    /// Location of the dream database.
    pub db_path: PathBuf,
    /// Per-request timeout. `None` means requests wait as long as the connection does.
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("ai_mode", &self.ai_mode)
            .field("relay_url", &self.relay_url)
            .field(
                "relay_token",
                &self.relay_token.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("relay_addr", &self.relay_addr)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| REDACTED_PLACEHOLDER),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("db_path", &"[REDACTED_PATH]")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values and no credentials.
    fn default() -> Self {
        Config {
            ai_mode: AiMode::default(),
            relay_url: DEFAULT_RELAY_URL.to_string(),
            relay_token: None,
            relay_addr: DEFAULT_RELAY_ADDR.to_string(),
            gemini_api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            db_path: PathBuf::from(""),
            request_timeout: None,
        }
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The database path is expanded using `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - `REVERIE_AI_MODE` is neither `relay` nor `direct`
    /// - `REVERIE_TIMEOUT_SECS` is not a positive integer
    /// - The database path expansion fails
    pub fn load() -> AppResult<Self> {
        let ai_mode = match non_empty_var(ENV_VAR_AI_MODE) {
            Some(raw) => raw.parse()?,
            None => AiMode::default(),
        };

        let request_timeout = match non_empty_var(ENV_VAR_TIMEOUT_SECS) {
            Some(raw) => Some(Self::parse_timeout(&raw)?),
            None => None,
        };

        let db_path_str = non_empty_var(ENV_VAR_DB).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let expanded_path = shellexpand::full(&db_path_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let config = Config {
            ai_mode,
            relay_url: non_empty_var(ENV_VAR_RELAY_URL)
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            relay_token: non_empty_var(ENV_VAR_RELAY_TOKEN),
            relay_addr: non_empty_var(ENV_VAR_RELAY_ADDR)
                .unwrap_or_else(|| DEFAULT_RELAY_ADDR.to_string()),
            gemini_api_key: non_empty_var(ENV_VAR_GEMINI_API_KEY),
            gemini_base_url: non_empty_var(ENV_VAR_GEMINI_BASE_URL)
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: non_empty_var(ENV_VAR_GEMINI_MODEL)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            db_path: PathBuf::from(expanded_path.into_owned()),
            request_timeout,
        };

        Ok(config)
    }

    fn parse_timeout(raw: &str) -> AppResult<Duration> {
        match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
            _ => Err(AppError::Config(format!(
                "{} must be a positive number of seconds, got '{}'",
                ENV_VAR_TIMEOUT_SECS, raw
            ))),
        }
    }

    fn validate_url(name: &str, url: &str) -> AppResult<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "{} must start with http:// or https://",
                name
            )));
        }
        Ok(())
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path is empty or relative
    /// - The relay or provider URL is not an http(s) URL
    /// - Direct mode is selected without a provider credential
    ///
    /// # Examples
    ///
    /// ```
    /// use reverie::config::{AiMode, Config};
    /// use std::path::PathBuf;
    ///
    /// let config = Config {
    ///     ai_mode: AiMode::Direct,
    ///     db_path: PathBuf::from("/tmp/dreams.db"),
    ///     ..Config::default()
    /// };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be an absolute path".to_string(),
            ));
        }

        Self::validate_url(ENV_VAR_RELAY_URL, &self.relay_url)?;
        Self::validate_url(ENV_VAR_GEMINI_BASE_URL, &self.gemini_base_url)?;

        if self.ai_mode == AiMode::Direct && self.gemini_api_key.is_none() {
            return Err(AppError::Config(format!(
                "Direct mode requires {} to be set",
                ENV_VAR_GEMINI_API_KEY
            )));
        }

        Ok(())
    }

    /// Returns the settings for calling the provider directly.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if no provider credential is configured.
    pub fn gemini_settings(&self) -> AppResult<GeminiSettings> {
        let api_key = self.gemini_api_key.clone().ok_or_else(|| {
            AppError::Config(format!("{} is not set", ENV_VAR_GEMINI_API_KEY))
        })?;

        Ok(GeminiSettings {
            base_url: self.gemini_base_url.trim_end_matches('/').to_string(),
            model: self.gemini_model.clone(),
            api_key,
        })
    }

    /// Returns the settings for calling the relay.
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            url: self.relay_url.clone(),
            token: self.relay_token.clone(),
        }
    }
}
