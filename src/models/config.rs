//! Configuration data model and validation

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the measurement backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Download payload size in MiB
    #[serde(default = "default_download_size_mb")]
    pub download_size_mb: f64,

    /// Upload payload size in MiB
    #[serde(default = "default_upload_size_mb")]
    pub upload_size_mb: f64,

    /// Number of serial latency samples per run
    #[serde(default = "default_ping_samples")]
    pub ping_samples: u32,

    /// Pause between latency samples in milliseconds
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    /// Request timeout duration
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Maximum number of stored results fetched for history display
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            download_size_mb: default_download_size_mb(),
            upload_size_mb: default_upload_size_mb(),
            ping_samples: default_ping_samples(),
            ping_interval_ms: default_ping_interval_ms(),
            timeout_seconds: default_timeout_secs(),
            history_limit: default_history_limit(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Get the pause between latency samples as Duration
    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    /// Client identifier sent with persisted results
    pub fn user_agent(&self) -> String {
        format!("{}/{}", crate::PKG_NAME, crate::VERSION)
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AppError::config("Backend base URL cannot be empty"));
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) => {
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "Backend base URL must use http or https: {}",
                        self.base_url
                    )));
                }
            }
            Err(e) => {
                return Err(AppError::config(format!(
                    "Invalid backend base URL '{}': {}",
                    self.base_url, e
                )));
            }
        }

        // The backend caps payload generation at 50 MiB
        if self.download_size_mb <= 0.0 || self.download_size_mb > 50.0 {
            return Err(AppError::config(format!(
                "Download size must be between 0 and 50 MiB, got: {}",
                self.download_size_mb
            )));
        }

        if self.upload_size_mb <= 0.0 || self.upload_size_mb > 50.0 {
            return Err(AppError::config(format!(
                "Upload size must be between 0 and 50 MiB, got: {}",
                self.upload_size_mb
            )));
        }

        if self.ping_samples == 0 || self.ping_samples > 100 {
            return Err(AppError::config(format!(
                "Ping sample count must be between 1 and 100, got: {}",
                self.ping_samples
            )));
        }

        if self.ping_interval_ms > 10_000 {
            return Err(AppError::config(format!(
                "Ping interval cannot exceed 10000 ms, got: {}",
                self.ping_interval_ms
            )));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(AppError::config(format!(
                "Timeout must be between 1 and 300 seconds, got: {}",
                self.timeout_seconds
            )));
        }

        if self.history_limit == 0 || self.history_limit > 1000 {
            return Err(AppError::config(format!(
                "History limit must be between 1 and 1000, got: {}",
                self.history_limit
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(base_url) = std::env::var("API_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.base_url = base_url.trim().to_string();
            }
        }

        if let Ok(size) = std::env::var("DOWNLOAD_SIZE_MB") {
            self.download_size_mb = size.parse().map_err(|e| {
                AppError::config(format!("Invalid DOWNLOAD_SIZE_MB value '{}': {}", size, e))
            })?;
        }

        if let Ok(size) = std::env::var("UPLOAD_SIZE_MB") {
            self.upload_size_mb = size.parse().map_err(|e| {
                AppError::config(format!("Invalid UPLOAD_SIZE_MB value '{}': {}", size, e))
            })?;
        }

        if let Ok(samples) = std::env::var("PING_SAMPLES") {
            self.ping_samples = samples.parse().map_err(|e| {
                AppError::config(format!("Invalid PING_SAMPLES value '{}': {}", samples, e))
            })?;
        }

        if let Ok(timeout) = std::env::var("TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(limit) = std::env::var("HISTORY_LIMIT") {
            self.history_limit = limit.parse().map_err(|e| {
                AppError::config(format!("Invalid HISTORY_LIMIT value '{}': {}", limit, e))
            })?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    crate::defaults::DEFAULT_BASE_URL.to_string()
}

fn default_download_size_mb() -> f64 {
    crate::defaults::DEFAULT_DOWNLOAD_SIZE_MB
}

fn default_upload_size_mb() -> f64 {
    crate::defaults::DEFAULT_UPLOAD_SIZE_MB
}

fn default_ping_samples() -> u32 {
    crate::defaults::DEFAULT_PING_SAMPLES
}

fn default_ping_interval_ms() -> u64 {
    crate::defaults::DEFAULT_PING_INTERVAL.as_millis() as u64
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_history_limit() -> u32 {
    crate::defaults::DEFAULT_HISTORY_LIMIT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
