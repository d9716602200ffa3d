//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use flowstate_types::interval::TimeInterval;
use flowstate_types::{TypesError, MAX_DECIMALS, TOKEN_DECIMALS};

use crate::Result;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FLOWSTATE_CONFIG";

/// Config file looked up in the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "flowstate.toml";

/// Complete preview configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Interval amounts are entered and shown in.
    #[serde(default)]
    pub interval: TimeInterval,
    /// Token decimals, at most [`MAX_DECIMALS`].
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace" | "debug" | "info" | "warn" | "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log file path. Empty = stderr.
    #[serde(default)]
    pub log_file: String,
}

// Default value functions

fn default_decimals() -> u32 {
    TOKEN_DECIMALS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            interval: TimeInterval::default(),
            decimals: default_decimals(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

impl PreviewConfig {
    /// Load configuration from the default location.
    ///
    /// Falls back to defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        if config_path.exists() {
            Self::from_path(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded preview config");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PreviewConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the preview cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.display.decimals > MAX_DECIMALS {
            return Err(TypesError::DecimalsOutOfRange {
                decimals: self.display.decimals,
                max: MAX_DECIMALS,
            }
            .into());
        }
        Ok(())
    }

    /// Log file path, if logs go to a file rather than stderr.
    pub fn log_file(&self) -> Option<PathBuf> {
        if self.logging.log_file.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.logging.log_file))
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        // Check env var override first
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }
}
