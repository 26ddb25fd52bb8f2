//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        // Try to load .env from current directory
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                println!("Loaded configuration from .env file");
            }
        } else if debug {
            println!("No .env file found, using defaults and CLI arguments");
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Bandwidth Tester Configuration
#
# Values specified here are used as defaults and can be overridden by
# environment variables or command-line arguments.

# Base URL of the measurement backend
# API_BASE_URL=http://localhost:8000

# Download payload size in MiB (0-50)
# DOWNLOAD_SIZE_MB=5

# Upload payload size in MiB (0-50)
# UPLOAD_SIZE_MB=3

# Number of serial latency samples per run (1-100)
# PING_SAMPLES=10

# Request timeout in seconds (1-300)
# TIMEOUT_SECONDS=60

# Maximum number of stored results fetched for --history (1-1000)
# HISTORY_LIMIT=100

# Enable colored output (true/false)
# ENABLE_COLOR=true
"#
        .to_string()
    }

    /// Save example .env file to disk
    pub fn save_example_env_file(path: &Path) -> Result<()> {
        use std::fs;

        let content = Self::create_example_env_content();
        fs::write(path, content)
            .map_err(|e| AppError::config(format!("Failed to write example .env file: {}", e)))?;

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "API_BASE_URL" => {
                let parsed = url::Url::parse(value)
                    .map_err(|e| AppError::config(format!("Invalid API_BASE_URL '{}': {}", value, e)))?;
                if parsed.scheme() != "http" && parsed.scheme() != "https" {
                    return Err(AppError::config(format!(
                        "API_BASE_URL must use http or https: {}",
                        value
                    )));
                }
            }
            "DOWNLOAD_SIZE_MB" | "UPLOAD_SIZE_MB" => {
                let size: f64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", key, value, e))
                })?;
                if size <= 0.0 || size > 50.0 {
                    return Err(AppError::config(format!(
                        "{} must be between 0 and 50, got: {}",
                        key, size
                    )));
                }
            }
            "PING_SAMPLES" => {
                let samples: u32 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid PING_SAMPLES value '{}': {}", value, e))
                })?;
                if samples == 0 || samples > 100 {
                    return Err(AppError::config(format!(
                        "PING_SAMPLES must be between 1 and 100, got: {}",
                        samples
                    )));
                }
            }
            "TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > 300 {
                    return Err(AppError::config(format!(
                        "TIMEOUT_SECONDS must be between 1 and 300, got: {}",
                        timeout
                    )));
                }
            }
            "HISTORY_LIMIT" => {
                let limit: u32 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid HISTORY_LIMIT value '{}': {}", value, e))
                })?;
                if limit == 0 || limit > 1000 {
                    return Err(AppError::config(format!(
                        "HISTORY_LIMIT must be between 1 and 1000, got: {}",
                        limit
                    )));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("API_BASE_URL", "Base URL of the measurement backend", "http://localhost:8000"),
            ("DOWNLOAD_SIZE_MB", "Download payload size in MiB (0-50)", "5"),
            ("UPLOAD_SIZE_MB", "Upload payload size in MiB (0-50)", "3"),
            ("PING_SAMPLES", "Latency samples per run (1-100)", "10"),
            ("TIMEOUT_SECONDS", "Request timeout in seconds (1-300)", "60"),
            ("HISTORY_LIMIT", "Stored results fetched for history (1-1000)", "100"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<18} {}\n", var, description));
            help.push_str(&format!("  {:<18} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate all currently set environment variables
    pub fn validate_current_env() -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        for (var_name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(var_name) {
                if let Err(e) = Self::validate_env_var(var_name, &value) {
                    warnings.push(format!("Warning: {}", e));
                }
            }
        }

        Ok(warnings)
    }
}
