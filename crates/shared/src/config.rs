//! Configuration management for the anime catalog client.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,

    /// Library storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Jikan API client settings
    #[serde(default)]
    pub jikan: JikanConfig,

    /// Favorites/recents settings
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Library storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Jikan API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JikanConfig {
    /// Jikan API base URL
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,

    /// Retry and throttle settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Shared request gate settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// How retry delays grow with the attempt index
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffCurve {
    /// `base * n`
    #[default]
    Linear,
    /// `base * 2^(n-1)`
    Exponential,
}

/// Retry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per query (at least 1)
    pub max_retries: u32,

    /// Base delay before a retry after a generic failure, in milliseconds
    pub retry_delay_ms: u64,

    /// Base delay after an HTTP 429 response, in milliseconds
    pub rate_limit_delay_ms: u64,

    /// Pause after every successful response, in milliseconds
    pub success_delay_ms: u64,

    /// Growth curve applied to both retry delays
    #[serde(default)]
    pub backoff: BackoffCurve,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Share one request gate across all queries of the process
    pub enabled: bool,

    /// Maximum requests per second
    pub requests_per_second: f64,

    /// Maximum requests per minute
    pub requests_per_minute: u32,
}

/// Favorites/recents configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Maximum number of recently viewed entries kept
    pub recents_capacity: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root_dir: "data".to_string(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: "library.db".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: true,
            json_format: false,
        }
    }
}

impl Default for JikanConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.jikan.moe/v4".to_string(),
            timeout_secs: 30,
            user_agent: format!("anime-catalog/{}", env!("CARGO_PKG_VERSION")),
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 3000,
            rate_limit_delay_ms: 5000,
            success_delay_ms: 2000,
            backoff: BackoffCurve::Linear,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Jikan's published limits
        Self {
            enabled: true,
            requests_per_second: 3.0,
            requests_per_minute: 60,
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            recents_capacity: 10,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the library database path
    pub fn storage_path(&self) -> PathBuf {
        self.resolve(&self.storage.path)
    }

    /// Get the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.storage.path, "library.db");
        assert_eq!(config.jikan.base_url, "https://api.jikan.moe/v4");
        assert_eq!(config.jikan.retry.max_retries, 3);
        assert_eq!(config.jikan.retry.retry_delay_ms, 3000);
        assert_eq!(config.jikan.retry.rate_limit_delay_ms, 5000);
        assert_eq!(config.jikan.retry.success_delay_ms, 2000);
        assert_eq!(config.jikan.retry.backoff, BackoffCurve::Linear);
        assert_eq!(config.library.recents_capacity, 10);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.jikan.retry.backoff = BackoffCurve::Exponential;
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(loaded_config.jikan.base_url, original_config.jikan.base_url);
        assert_eq!(loaded_config.jikan.retry.backoff, BackoffCurve::Exponential);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[jikan]
base_url = "http://localhost:8080/v4"
timeout_secs = 5
user_agent = "test"

[jikan.retry]
max_retries = 5
retry_delay_ms = 10
rate_limit_delay_ms = 20
success_delay_ms = 0
"#,
        )?;

        let config = Config::from_file(&config_path)?;
        assert_eq!(config.jikan.base_url, "http://localhost:8080/v4");
        assert_eq!(config.jikan.retry.max_retries, 5);
        assert_eq!(config.jikan.retry.backoff, BackoffCurve::Linear);
        assert!(config.jikan.rate_limit.enabled);
        assert_eq!(config.data.root_dir, "data");

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_path_resolution() {
        let mut config = Config::default();

        assert!(config.storage_path().ends_with("data/library.db"));
        assert!(config.log_dir().ends_with("data/logs"));

        config.storage.path = "/var/lib/anime/library.db".to_string();
        assert_eq!(
            config.storage_path(),
            PathBuf::from("/var/lib/anime/library.db")
        );
    }
}
