//! Service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings.
    pub api: ApiConfig,
    /// Synchronization settings.
    pub sync: SyncConfig,
    /// Storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - API base URL is http(s) and non-empty
    /// - Request and probe timeouts are non-zero
    /// - Sync interval is within reasonable bounds (1 minute - 24 hours)
    /// - Retry attempts are at least 1
    /// - Storage directory is not empty
    ///
    /// # Example
    ///
    /// ```
    /// use plantsync_service::Config;
    ///
    /// let config = Config::default();
    /// config.validate().expect("Default config should be valid");
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.api.validate());
        errors.extend(self.sync.validate());
        errors.extend(self.storage.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the remote plant API.
    pub base_url: String,
    /// Per-request timeout for data calls, in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for the reachability probe, in seconds.
    pub probe_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: plantsync_core::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: plantsync_core::DEFAULT_REQUEST_TIMEOUT.as_secs(),
            probe_timeout_secs: plantsync_core::DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }
}

impl ApiConfig {
    /// Validate API configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.base_url.is_empty() {
            errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: "base URL cannot be empty".to_string(),
            });
        } else if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(ValidationError {
                field: "api.base_url".to_string(),
                message: format!("base URL '{}' must start with http:// or https://", self.base_url),
            });
        }

        if self.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.request_timeout_secs".to_string(),
                message: "request timeout cannot be 0".to_string(),
            });
        }
        if self.probe_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.probe_timeout_secs".to_string(),
                message: "probe timeout cannot be 0".to_string(),
            });
        }

        errors
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Probe timeout as a [`Duration`].
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Minimum sync interval in seconds (1 minute).
pub const MIN_SYNC_INTERVAL: u64 = 60;
/// Maximum sync interval in seconds (24 hours).
pub const MAX_SYNC_INTERVAL: u64 = 86_400;

/// Synchronization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Interval between scheduled reconciliation passes, in seconds.
    pub interval_secs: u64,
    /// Attempts per data call before treating a timeout as unavailable.
    pub retry_attempts: u32,
    /// Base backoff delay between retry attempts, in seconds.
    pub retry_base_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: 900,
            retry_attempts: 3,
            retry_base_delay_secs: 1,
        }
    }
}

impl SyncConfig {
    /// Validate synchronization configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.interval_secs < MIN_SYNC_INTERVAL {
            errors.push(ValidationError {
                field: "sync.interval_secs".to_string(),
                message: format!(
                    "interval {} is too short (minimum {} seconds)",
                    self.interval_secs, MIN_SYNC_INTERVAL
                ),
            });
        } else if self.interval_secs > MAX_SYNC_INTERVAL {
            errors.push(ValidationError {
                field: "sync.interval_secs".to_string(),
                message: format!(
                    "interval {} is too long (maximum {} seconds / 24 hours)",
                    self.interval_secs, MAX_SYNC_INTERVAL
                ),
            });
        }

        if self.retry_attempts == 0 {
            errors.push(ValidationError {
                field: "sync.retry_attempts".to_string(),
                message: "at least one attempt is required".to_string(),
            });
        }

        errors
    }

    /// Scheduler interval as a [`Duration`].
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Retry settings for the sync engine.
    #[must_use]
    pub fn retry(&self) -> plantsync_core::RetryConfig {
        plantsync_core::RetryConfig::new(self.retry_attempts)
            .base_delay(Duration::from_secs(self.retry_base_delay_secs))
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory for credentials and entity snapshots.
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: plantsync_store::default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.dir".to_string(),
                message: "data directory cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `api.base_url`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("plantsync")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, plantsync_core::DEFAULT_BASE_URL);
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(config.api.probe_timeout_secs, 5);
        assert_eq!(config.sync.interval_secs, 900);
        assert_eq!(config.sync.retry_attempts, 3);
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            api: ApiConfig {
                base_url: "https://plants.example.com/api".to_string(),
                request_timeout_secs: 20,
                probe_timeout_secs: 3,
            },
            sync: SyncConfig {
                interval_secs: 300,
                retry_attempts: 5,
                retry_base_delay_secs: 2,
            },
            storage: StorageConfig {
                dir: PathBuf::from("/tmp/plantsync-test"),
            },
        };

        config.save(&config_path).unwrap();
        let loaded = Config::load(&config_path).unwrap();

        assert_eq!(loaded.api.base_url, "https://plants.example.com/api");
        assert_eq!(loaded.api.request_timeout_secs, 20);
        assert_eq!(loaded.sync.interval_secs, 300);
        assert_eq!(loaded.sync.retry_attempts, 5);
        assert_eq!(loaded.storage.dir, PathBuf::from("/tmp/plantsync-test"));
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [sync]
            interval_secs = 600
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sync.interval_secs, 600);
        assert_eq!(config.sync.retry_attempts, 3);
        assert_eq!(config.api.base_url, plantsync_core::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_api_url_validation() {
        let mut api = ApiConfig::default();
        assert!(api.validate().is_empty());

        api.base_url = String::new();
        assert_eq!(api.validate().len(), 1);

        api.base_url = "ftp://plants.example.com".to_string();
        let errors = api.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("http"));
    }

    #[test]
    fn test_sync_interval_bounds() {
        let mut sync = SyncConfig::default();
        assert!(sync.validate().is_empty());

        sync.interval_secs = 10;
        assert!(sync.validate()[0].message.contains("too short"));

        sync.interval_secs = 100_000;
        assert!(sync.validate()[0].message.contains("too long"));

        sync = SyncConfig {
            retry_attempts: 0,
            ..SyncConfig::default()
        };
        assert!(sync.validate()[0].message.contains("at least one"));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let api = ApiConfig {
            request_timeout_secs: 0,
            probe_timeout_secs: 0,
            ..ApiConfig::default()
        };
        assert_eq!(api.validate().len(), 2);
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("plantsync/config.toml"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError {
            field: "api.base_url".to_string(),
            message: "cannot be empty".to_string(),
        };
        assert_eq!(format!("{}", error), "api.base_url: cannot be empty");
    }
}
