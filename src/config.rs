//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub regions: RegionsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Live feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// WebSocket URL of the real-time source
    #[serde(default = "default_feed_url")]
    pub url: String,

    /// First reconnect delay after a lost connection (ms)
    #[serde(default = "default_reconnect_initial")]
    pub reconnect_initial_ms: u64,

    /// Reconnect delay cap (ms)
    #[serde(default = "default_reconnect_max")]
    pub reconnect_max_ms: u64,
}

fn default_feed_url() -> String {
    "ws://localhost:9001/feed".to_string()
}

fn default_reconnect_initial() -> u64 {
    500
}

fn default_reconnect_max() -> u64 {
    30_000 // 30 seconds
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            reconnect_initial_ms: default_reconnect_initial(),
            reconnect_max_ms: default_reconnect_max(),
        }
    }
}

/// Region marker configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionsConfig {
    /// Optional TOML file with `[[region]]` tables; built-in defaults
    /// are used when unset
    pub file: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("monsoon").join("config.toml")),
            Some(PathBuf::from("/etc/monsoon/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Feed overrides
        if let Ok(url) = std::env::var("MONSOON_FEED_URL") {
            self.feed.url = url;
        }
        if let Ok(ms) = std::env::var("MONSOON_FEED_RECONNECT_INITIAL_MS") {
            if let Ok(ms) = ms.parse() {
                self.feed.reconnect_initial_ms = ms;
            }
        }
        if let Ok(ms) = std::env::var("MONSOON_FEED_RECONNECT_MAX_MS") {
            if let Ok(ms) = ms.parse() {
                self.feed.reconnect_max_ms = ms;
            }
        }

        // Regions overrides
        if let Ok(file) = std::env::var("MONSOON_REGIONS_FILE") {
            self.regions.file = Some(PathBuf::from(file));
        }

        // Logging overrides
        if let Ok(level) = std::env::var("MONSOON_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MONSOON_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Monsoon Configuration
#
# Environment variables override these settings:
# - MONSOON_FEED_URL
# - MONSOON_FEED_RECONNECT_INITIAL_MS
# - MONSOON_FEED_RECONNECT_MAX_MS
# - MONSOON_REGIONS_FILE
# - MONSOON_LOG_LEVEL
# - MONSOON_LOG_FORMAT

[feed]
# WebSocket URL of the real-time source
url = "ws://localhost:9001/feed"

# First reconnect delay after a lost connection (ms)
reconnect_initial_ms = 500

# Reconnect delay cap (ms)
reconnect_max_ms = 30000

[regions]
# Optional regions file; built-in defaults are used when unset
# file = "/etc/monsoon/regions.toml"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/monsoon/monsoon.log"
"#
    .to_string()
}
