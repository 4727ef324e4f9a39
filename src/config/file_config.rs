//! Configuration file support for quote-finder.
//!
//! # Configuration File Format
//!
//! ```toml
//! [api]
//! key = "your-gemini-api-key"
//! model = "gemini-2.5-flash"
//! endpoint = "https://generativelanguage.googleapis.com/v1beta"
//! timeout_secs = 60
//!
//! [retry]
//! max_attempts = 5
//! initial_delay_ms = 1000
//! backoff_multiplier = 2
//!
//! [display]
//! color = true
//! default_sort = "author"
//! ```

use std::path::Path;

use super::Config;

/// A TOML configuration file on disk
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFile {
    pub config: Config,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io(e.to_string()))?;

        let config = toml::from_str(&content).map_err(|e| ConfigFileError::Parse(e.to_string()))?;
        Ok(Self { config })
    }

    /// Save configuration to a TOML file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::Io(e.to_string()))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigFileError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigFileError::Serialize(e.to_string()))
    }

    /// Create default configuration
    pub fn create_default() -> Self {
        Self {
            config: Config::default(),
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
