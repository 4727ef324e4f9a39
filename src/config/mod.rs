//! Configuration management.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `QUOTE_FINDER_*` environment variables (nested keys use `__`, e.g.
//! `QUOTE_FINDER_API__MODEL`). The API key additionally falls back to
//! `QUOTE_FINDER_API_KEY` and `GEMINI_API_KEY`.

mod file_config;

pub use file_config::{ConfigFile, ConfigFileError};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::SortKey;
use crate::sources::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::utils::RetryConfig;

/// Environment variable prefix for layered settings
pub const ENV_PREFIX: &str = "QUOTE_FINDER";

/// Environment variables checked for the API key, in order
pub const API_KEY_VARS: [&str; 2] = ["QUOTE_FINDER_API_KEY", "GEMINI_API_KEY"];

/// Name of the config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "quote-finder.toml";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation service settings
    pub api: ApiConfig,

    /// Retry policy
    pub retry: RetrySettings,

    /// Terminal output settings
    pub display: DisplayConfig,
}

/// Generation service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key sent as the `key` query parameter
    pub key: Option<String>,

    /// Model name, e.g. "gemini-2.5-flash"
    pub model: String,

    /// Base URL of the API
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 60,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry policy settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Attempts including the first call
    pub max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    pub initial_delay_ms: u64,

    /// Factor applied to the delay after every retry
    pub backoff_multiplier: u32,
}

impl Default for RetrySettings {
    fn default() -> Self {
        let defaults = RetryConfig::default();
        Self {
            max_attempts: defaults.max_attempts,
            initial_delay_ms: defaults.initial_delay.as_millis() as u64,
            backoff_multiplier: defaults.backoff_multiplier,
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts,
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            backoff_multiplier: self.backoff_multiplier,
        }
    }
}

/// Terminal output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Colorize output when writing to a terminal
    pub color: bool,

    /// Sort key used for new sessions
    pub default_sort: SortKey,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            default_sort: SortKey::Author,
        }
    }
}

/// Load configuration from an optional file plus the environment
pub fn load_config(path: Option<&Path>) -> Result<Config, config::ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let mut config: Config = settings.try_deserialize()?;
    config.api.key = resolve_api_key(config.api.key.take(), |name| std::env::var(name).ok());

    Ok(config)
}

/// Pick the API key: an explicit setting wins, then [`API_KEY_VARS`] in order.
/// Blank values count as unset.
pub fn resolve_api_key<F>(explicit: Option<String>, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    explicit
        .filter(|k| !k.trim().is_empty())
        .or_else(|| {
            API_KEY_VARS
                .iter()
                .filter_map(|name| lookup(*name))
                .find(|k| !k.trim().is_empty())
        })
}

/// Find a config file in the working directory or the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }

    user_config_path().filter(|p| p.is_file())
}

/// `<config_dir>/quote-finder/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quote-finder").join("config.toml"))
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Ignoring invalid environment configuration: {}", e);
        let mut config = Config::default();
        config.api.key = resolve_api_key(None, |name| std::env::var(name).ok());
        config
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.model, DEFAULT_MODEL);
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry.to_retry_config(), RetryConfig::default());
        assert_eq!(config.display.default_sort, SortKey::Author);
        assert!(config.api.key.is_none());
    }

    #[test]
    fn test_resolve_api_key_precedence() {
        let lookup = |name: &str| match name {
            "QUOTE_FINDER_API_KEY" => Some("   ".to_string()),
            "GEMINI_API_KEY" => Some("gemini-key".to_string()),
            _ => None,
        };

        assert_eq!(
            resolve_api_key(Some("explicit".to_string()), lookup),
            Some("explicit".to_string())
        );
        assert_eq!(resolve_api_key(None, lookup), Some("gemini-key".to_string()));
        assert_eq!(resolve_api_key(Some(String::new()), |_| None), None);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quote-finder.toml");
        std::fs::write(
            &path,
            r#"
[api]
key = "file-key"
model = "gemini-test"

[retry]
max_attempts = 3
initial_delay_ms = 250

[display]
default_sort = "book"
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.api.key.as_deref(), Some("file-key"));
        assert_eq!(config.api.model, "gemini-test");
        assert_eq!(config.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 250);
        assert_eq!(config.retry.backoff_multiplier, 2);
        assert_eq!(config.display.default_sort, SortKey::Book);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/quote-finder.toml")));
        assert!(result.is_err());
    }
}
