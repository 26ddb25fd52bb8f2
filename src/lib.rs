//! Bandwidth Tester
//!
//! A sequential internet bandwidth measurement tool that runs a
//! latency/jitter, download, and upload cycle against an HTTP backend,
//! reports live progress, and stores results for later inspection.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod runner;
pub mod stats;
pub mod transfer;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{
    Config, HealthStatus, LatencyStatistic, ResultRecord, StoredResult, TestRun,
    ThroughputMeasurement,
};
pub use client::{ApiClient, ResultTransport};
pub use runner::TestRunner;
pub use output::{OutputFormatter, OutputFormatterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    pub const DEFAULT_PING_SAMPLES: u32 = 10;
    pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_millis(100);
    pub const DEFAULT_DOWNLOAD_SIZE_MB: f64 = 5.0;
    pub const DEFAULT_UPLOAD_SIZE_MB: f64 = 3.0;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_HISTORY_LIMIT: u32 = 100;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}
