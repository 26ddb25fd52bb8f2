//! Measurement and result data models

use crate::error::{AppError, Result};
use crate::types::TestPhase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bits per decimal megabit, the unit used for all reported throughput
pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Aggregate latency statistic derived from a sequence of ping samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStatistic {
    /// Arithmetic mean of the round-trip samples (milliseconds)
    pub mean_ms: f64,

    /// Population standard deviation of the samples (milliseconds)
    pub jitter_ms: f64,
}

/// A single timed transfer converted to throughput
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThroughputMeasurement {
    /// Number of bytes moved over the network
    pub bytes_transferred: u64,

    /// Observed wall-clock duration of the transfer (seconds)
    pub elapsed_seconds: f64,

    /// Derived throughput in decimal megabits per second
    pub megabits_per_second: f64,
}

impl ThroughputMeasurement {
    /// Derive a throughput measurement from a byte count and an observed
    /// wall-clock duration. The duration must be positive; a zero elapsed
    /// time would make the throughput undefined.
    pub fn from_transfer(bytes_transferred: u64, elapsed: Duration) -> Result<Self> {
        let elapsed_seconds = elapsed.as_secs_f64();
        if elapsed_seconds <= 0.0 {
            return Err(AppError::invalid_input(
                "transfer duration must be positive to compute throughput",
            ));
        }

        let megabits = (bytes_transferred as f64 * 8.0) / BITS_PER_MEGABIT;
        Ok(Self {
            bytes_transferred,
            elapsed_seconds,
            megabits_per_second: megabits / elapsed_seconds,
        })
    }
}

/// Mutable orchestration state for one bandwidth test run.
///
/// Owned and mutated exclusively by the runner; observers receive cloned
/// snapshots after each mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRun {
    /// Current phase of the run
    pub phase: TestPhase,

    /// Measured download throughput (Mbps), 0 until the phase completes
    pub download_mbps: f64,

    /// Measured upload throughput (Mbps), 0 until the phase completes
    pub upload_mbps: f64,

    /// Mean round-trip latency (ms), 0 until the ping phase completes
    pub latency_ms: f64,

    /// Latency jitter (ms), 0 until the ping phase completes
    pub jitter_ms: f64,

    /// Error message from an aborted run
    pub error: Option<String>,
}

impl TestRun {
    /// Create a new idle test run
    pub fn new() -> Self {
        Self {
            phase: TestPhase::Idle,
            download_mbps: 0.0,
            upload_mbps: 0.0,
            latency_ms: 0.0,
            jitter_ms: 0.0,
            error: None,
        }
    }

    /// Reset all fields for a fresh run entering the ping phase
    pub fn start(&mut self) {
        *self = Self::new();
        self.phase = TestPhase::Ping;
    }

    /// Record the latency statistic produced by the ping phase
    pub fn record_latency(&mut self, statistic: LatencyStatistic) {
        self.latency_ms = statistic.mean_ms;
        self.jitter_ms = statistic.jitter_ms;
    }

    /// Abort the run: back to idle with the error recorded. Metrics from
    /// phases that never completed stay at their zero defaults.
    pub fn abort(&mut self, message: String) {
        self.phase = TestPhase::Idle;
        self.error = Some(message);
    }

    /// Check whether this run is currently executing
    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }
}

impl Default for TestRun {
    fn default() -> Self {
        Self::new()
    }
}

/// Result payload submitted to the backend when a run succeeds.
///
/// Field names follow the backend's wire contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Download speed in Mbps
    pub download_speed: f64,

    /// Upload speed in Mbps
    pub upload_speed: f64,

    /// Mean latency in milliseconds
    pub latency: f64,

    /// Jitter in milliseconds
    pub jitter: f64,

    /// Client address, filled in by the server if at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Client identifier string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ResultRecord {
    /// Build the submission payload from a completed run's measurements
    pub fn from_run(run: &TestRun, user_agent: String) -> Self {
        Self {
            download_speed: run.download_mbps,
            upload_speed: run.upload_mbps,
            latency: run.latency_ms,
            jitter: run.jitter_ms,
            ip_address: None,
            user_agent: Some(user_agent),
        }
    }
}

/// A result record as stored by the backend, with its server-assigned
/// identity. Read-only from the client's perspective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    /// Server-assigned identifier
    pub id: String,

    /// Server-assigned storage timestamp
    pub timestamp: DateTime<Utc>,

    pub download_speed: f64,
    pub upload_speed: f64,
    pub latency: f64,
    pub jitter: f64,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub user_agent: Option<String>,
}

/// Backend liveness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_from_transfer() {
        // 5 MiB in exactly two seconds
        let measurement =
            ThroughputMeasurement::from_transfer(5_242_880, Duration::from_secs(2)).unwrap();

        assert_eq!(measurement.bytes_transferred, 5_242_880);
        assert_eq!(measurement.elapsed_seconds, 2.0);
        assert!((measurement.megabits_per_second - 20.97152).abs() < 1e-9);
    }

    #[test]
    fn test_throughput_zero_elapsed_rejected() {
        let result = ThroughputMeasurement::from_transfer(1_000_000, Duration::ZERO);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_throughput_zero_bytes() {
        let measurement =
            ThroughputMeasurement::from_transfer(0, Duration::from_millis(500)).unwrap();
        assert_eq!(measurement.megabits_per_second, 0.0);
    }

    #[test]
    fn test_test_run_lifecycle() {
        let mut run = TestRun::new();
        assert_eq!(run.phase, TestPhase::Idle);
        assert!(!run.is_active());

        run.start();
        assert_eq!(run.phase, TestPhase::Ping);
        assert!(run.is_active());
        assert!(run.error.is_none());

        run.record_latency(LatencyStatistic {
            mean_ms: 12.5,
            jitter_ms: 1.25,
        });
        assert_eq!(run.latency_ms, 12.5);
        assert_eq!(run.jitter_ms, 1.25);
    }

    #[test]
    fn test_test_run_abort_keeps_completed_metrics() {
        let mut run = TestRun::new();
        run.start();
        run.record_latency(LatencyStatistic {
            mean_ms: 20.0,
            jitter_ms: 2.0,
        });
        run.phase = TestPhase::Download;
        run.download_mbps = 95.0;

        run.abort("Server error: 500".to_string());

        assert_eq!(run.phase, TestPhase::Idle);
        assert_eq!(run.error.as_deref(), Some("Server error: 500"));
        assert_eq!(run.download_mbps, 95.0);
        assert_eq!(run.upload_mbps, 0.0);
    }

    #[test]
    fn test_result_record_from_run() {
        let mut run = TestRun::new();
        run.start();
        run.latency_ms = 18.0;
        run.jitter_ms = 3.0;
        run.download_mbps = 88.2;
        run.upload_mbps = 41.7;

        let record = ResultRecord::from_run(&run, "bandwidth-tester/0.1.0".to_string());
        assert_eq!(record.download_speed, 88.2);
        assert_eq!(record.upload_speed, 41.7);
        assert_eq!(record.latency, 18.0);
        assert_eq!(record.jitter, 3.0);
        assert!(record.ip_address.is_none());
        assert_eq!(record.user_agent.as_deref(), Some("bandwidth-tester/0.1.0"));
    }

    #[test]
    fn test_result_record_serialization_field_names() {
        let record = ResultRecord {
            download_speed: 1.0,
            upload_speed: 2.0,
            latency: 3.0,
            jitter: 4.0,
            ip_address: None,
            user_agent: None,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["download_speed"], 1.0);
        assert_eq!(json["upload_speed"], 2.0);
        assert_eq!(json["latency"], 3.0);
        assert_eq!(json["jitter"], 4.0);
        // Unset optional fields are omitted entirely
        assert!(json.get("ip_address").is_none());
    }

    #[test]
    fn test_stored_result_deserialization() {
        let json = r#"{
            "id": "7d9c0f6a-8f7e-4f0e-9b9e-2f6a5f4c3b2a",
            "timestamp": "2024-05-01T12:30:00Z",
            "download_speed": 87.5,
            "upload_speed": 23.4,
            "latency": 14.2,
            "jitter": 2.1
        }"#;

        let stored: StoredResult = serde_json::from_str(json).unwrap();
        assert_eq!(stored.id, "7d9c0f6a-8f7e-4f0e-9b9e-2f6a5f4c3b2a");
        assert_eq!(stored.download_speed, 87.5);
        assert!(stored.ip_address.is_none());
        assert!(stored.user_agent.is_none());
    }
}
