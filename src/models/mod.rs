//! Data models for configuration, measurements, and stored results

pub mod config;
pub mod metrics;

pub use config::Config;
pub use metrics::{
    HealthStatus, LatencyStatistic, ResultRecord, StoredResult, TestRun, ThroughputMeasurement,
};
