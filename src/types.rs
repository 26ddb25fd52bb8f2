//! Type definitions and aliases

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// One named step of a bandwidth test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestPhase {
    /// No run active (also the reset target after an aborted run)
    Idle,
    /// Taking serial latency samples
    Ping,
    /// Timing the download transfer
    Download,
    /// Timing the upload transfer
    Upload,
    /// Submitting the result record to the backend
    Saving,
    /// Run finished successfully
    Complete,
}

impl TestPhase {
    /// Get the phase name as used in state snapshots
    pub fn name(&self) -> &'static str {
        match self {
            TestPhase::Idle => "idle",
            TestPhase::Ping => "ping",
            TestPhase::Download => "download",
            TestPhase::Upload => "upload",
            TestPhase::Saving => "saving",
            TestPhase::Complete => "complete",
        }
    }

    /// Get the progress message shown while this phase is running
    pub fn progress_message(&self) -> &'static str {
        match self {
            TestPhase::Idle => "Ready to start a test",
            TestPhase::Ping => "Testing latency and jitter...",
            TestPhase::Download => "Testing download speed...",
            TestPhase::Upload => "Testing upload speed...",
            TestPhase::Saving => "Saving results...",
            TestPhase::Complete => "Test complete!",
        }
    }

    /// Check whether a run is currently executing in this phase
    pub fn is_active(&self) -> bool {
        !matches!(self, TestPhase::Idle | TestPhase::Complete)
    }
}

impl std::fmt::Display for TestPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Which direction a throughput transfer moves data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Download,
    Upload,
}

impl std::fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferDirection::Download => write!(f, "download"),
            TransferDirection::Upload => write!(f, "upload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_names() {
        assert_eq!(TestPhase::Idle.name(), "idle");
        assert_eq!(TestPhase::Saving.name(), "saving");
        assert_eq!(TestPhase::Complete.to_string(), "complete");
    }

    #[test]
    fn test_phase_activity() {
        assert!(!TestPhase::Idle.is_active());
        assert!(!TestPhase::Complete.is_active());
        assert!(TestPhase::Ping.is_active());
        assert!(TestPhase::Download.is_active());
        assert!(TestPhase::Upload.is_active());
        assert!(TestPhase::Saving.is_active());
    }

    #[test]
    fn test_phase_serde_lowercase() {
        let json = serde_json::to_string(&TestPhase::Download).unwrap();
        assert_eq!(json, "\"download\"");
        let parsed: TestPhase = serde_json::from_str("\"saving\"").unwrap();
        assert_eq!(parsed, TestPhase::Saving);
    }
}
