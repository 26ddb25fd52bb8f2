//! Sequential orchestration of a bandwidth test run

use crate::{
    client::ResultTransport,
    error::{AppError, Result},
    models::{Config, ResultRecord, TestRun},
    stats::latency_statistic,
    transfer::{measure_transfer, mib_to_bytes, random_payload},
    types::TestPhase,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Channel half used to stream TestRun snapshots to an observer
pub type UpdateSender = mpsc::UnboundedSender<TestRun>;

/// Channel half an observer receives TestRun snapshots on
pub type UpdateReceiver = mpsc::UnboundedReceiver<TestRun>;

/// Runner settings captured from the application configuration
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Number of serial latency samples
    pub ping_samples: u32,
    /// Pause between latency samples
    pub ping_interval: Duration,
    /// Download payload size in MiB
    pub download_size_mb: f64,
    /// Upload payload size in MiB
    pub upload_size_mb: f64,
    /// Client identifier attached to the persisted result
    pub user_agent: String,
}

impl RunnerSettings {
    /// Capture runner settings from the application configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            ping_samples: config.ping_samples,
            ping_interval: config.ping_interval(),
            download_size_mb: config.download_size_mb,
            upload_size_mb: config.upload_size_mb,
            user_agent: config.user_agent(),
        }
    }
}

/// Drives the phases of a bandwidth test run in strict order:
/// ping, download, upload, saving, complete.
///
/// The runner is the sole mutator of its TestRun; after every mutation a
/// snapshot is sent to the observer channel. At most one run is active at
/// a time; a second start is rejected, not queued.
pub struct TestRunner {
    transport: Arc<dyn ResultTransport>,
    settings: RunnerSettings,
    run: Mutex<TestRun>,
    active: AtomicBool,
}

impl TestRunner {
    /// Create a new idle runner
    pub fn new(transport: Arc<dyn ResultTransport>, settings: RunnerSettings) -> Self {
        Self {
            transport,
            settings,
            run: Mutex::new(TestRun::new()),
            active: AtomicBool::new(false),
        }
    }

    /// Get a snapshot of the current run state
    pub fn snapshot(&self) -> TestRun {
        self.run.lock().expect("run state lock poisoned").clone()
    }

    /// Mutate the run state and stream the resulting snapshot
    fn update<F>(&self, updates: &UpdateSender, mutate: F) -> TestRun
    where
        F: FnOnce(&mut TestRun),
    {
        let snapshot = {
            let mut run = self.run.lock().expect("run state lock poisoned");
            mutate(&mut run);
            run.clone()
        };
        // The observer may have gone away; the run itself continues
        let _ = updates.send(snapshot.clone());
        snapshot
    }

    /// Execute one complete test run, streaming snapshots after every
    /// state change. Returns the final snapshot on success.
    ///
    /// A failure in any phase aborts the whole run: the error message is
    /// recorded on the state, the phase resets to idle, and metrics of
    /// phases that never completed stay at zero.
    pub async fn run(&self, updates: UpdateSender) -> Result<TestRun> {
        if self
            .active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::RunAlreadyInProgress);
        }

        let outcome = self.run_phases(&updates).await;

        let result = match outcome {
            Ok(snapshot) => Ok(snapshot),
            Err(error) => {
                self.update(&updates, |run| run.abort(error.to_string()));
                Err(error)
            }
        };

        self.active.store(false, Ordering::Release);
        result
    }

    async fn run_phases(&self, updates: &UpdateSender) -> Result<TestRun> {
        self.update(updates, |run| run.start());

        // Phase 1: serial latency sampling
        let statistic = latency_statistic(&self.collect_latency_samples().await?)?;
        self.update(updates, |run| run.record_latency(statistic));

        // Phase 2: timed download
        self.update(updates, |run| run.phase = TestPhase::Download);
        let download = self.timed_download().await?;
        self.update(updates, |run| {
            run.download_mbps = download.megabits_per_second;
        });

        // Phase 3: timed upload
        self.update(updates, |run| run.phase = TestPhase::Upload);
        let upload = self.timed_upload().await?;
        self.update(updates, |run| {
            run.upload_mbps = upload.megabits_per_second;
        });

        // Phase 4: persist the aggregate
        let snapshot = self.update(updates, |run| run.phase = TestPhase::Saving);
        let record = ResultRecord::from_run(&snapshot, self.settings.user_agent.clone());
        self.transport.submit_result(&record).await?;

        Ok(self.update(updates, |run| run.phase = TestPhase::Complete))
    }

    /// Take the configured number of round-trip samples, strictly one
    /// after another with a fixed pause in between. Concurrent pings
    /// would measure queuing rather than independent round-trip latency.
    async fn collect_latency_samples(&self) -> Result<Vec<f64>> {
        let mut samples = Vec::with_capacity(self.settings.ping_samples as usize);

        for taken in 0..self.settings.ping_samples {
            let start = Instant::now();
            self.transport.ping().await?;
            samples.push(start.elapsed().as_secs_f64() * 1000.0);

            if taken + 1 < self.settings.ping_samples {
                tokio::time::sleep(self.settings.ping_interval).await;
            }
        }

        Ok(samples)
    }

    async fn timed_download(&self) -> Result<crate::models::ThroughputMeasurement> {
        let byte_count = mib_to_bytes(self.settings.download_size_mb);
        measure_transfer(
            byte_count,
            self.transport.download_payload(self.settings.download_size_mb),
        )
        .await
    }

    async fn timed_upload(&self) -> Result<crate::models::ThroughputMeasurement> {
        let byte_count = mib_to_bytes(self.settings.upload_size_mb);
        // Payload generation stays outside the timed interval
        let payload = random_payload(byte_count as usize);
        measure_transfer(byte_count, async {
            self.transport.upload_payload(payload).await?;
            Ok(byte_count)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HealthStatus, StoredResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicU32;

    /// Transport double with per-operation failure switches
    struct MockTransport {
        fail_ping: bool,
        fail_download: bool,
        fail_upload: bool,
        fail_submit: bool,
        download_delay: Duration,
        submit_count: AtomicU32,
    }

    impl MockTransport {
        fn reliable() -> Self {
            Self {
                fail_ping: false,
                fail_download: false,
                fail_upload: false,
                fail_submit: false,
                download_delay: Duration::ZERO,
                submit_count: AtomicU32::new(0),
            }
        }

        fn submit_calls(&self) -> u32 {
            self.submit_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResultTransport for MockTransport {
        async fn ping(&self) -> Result<()> {
            if self.fail_ping {
                return Err(AppError::transfer_failed("ping unreachable"));
            }
            Ok(())
        }

        async fn download_payload(&self, size_mb: f64) -> Result<u64> {
            if self.fail_download {
                return Err(AppError::transfer_failed("download interrupted"));
            }
            if !self.download_delay.is_zero() {
                tokio::time::sleep(self.download_delay).await;
            }
            Ok(mib_to_bytes(size_mb))
        }

        async fn upload_payload(&self, _body: Vec<u8>) -> Result<()> {
            if self.fail_upload {
                return Err(AppError::transfer_failed(
                    "No response from server. Please check your connection.",
                ));
            }
            Ok(())
        }

        async fn submit_result(&self, record: &ResultRecord) -> Result<StoredResult> {
            self.submit_count.fetch_add(1, Ordering::SeqCst);
            if self.fail_submit {
                return Err(AppError::persistence_failed("Server error: 500"));
            }
            Ok(StoredResult {
                id: "stored-1".to_string(),
                timestamp: Utc::now(),
                download_speed: record.download_speed,
                upload_speed: record.upload_speed,
                latency: record.latency,
                jitter: record.jitter,
                ip_address: None,
                user_agent: record.user_agent.clone(),
            })
        }

        async fn list_results(&self, _skip: u32, _limit: u32) -> Result<Vec<StoredResult>> {
            Ok(Vec::new())
        }

        async fn get_result(&self, id: &str) -> Result<StoredResult> {
            Err(AppError::not_found(id))
        }

        async fn delete_result(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus {
                status: "healthy".to_string(),
                timestamp: Utc::now(),
            })
        }
    }

    fn fast_settings() -> RunnerSettings {
        RunnerSettings {
            ping_samples: 3,
            ping_interval: Duration::from_millis(1),
            download_size_mb: 0.25,
            upload_size_mb: 0.125,
            user_agent: "bandwidth-tester/test".to_string(),
        }
    }

    fn runner_with(transport: MockTransport) -> Arc<TestRunner> {
        Arc::new(TestRunner::new(Arc::new(transport), fast_settings()))
    }

    /// Collect the phases observed over the update channel, deduplicating
    /// consecutive snapshots within the same phase.
    fn observed_phases(mut updates: UpdateReceiver) -> Vec<TestPhase> {
        let mut phases = Vec::new();
        while let Ok(snapshot) = updates.try_recv() {
            if phases.last() != Some(&snapshot.phase) {
                phases.push(snapshot.phase);
            }
        }
        phases
    }

    #[tokio::test]
    async fn test_successful_run_walks_all_phases_in_order() {
        let runner = runner_with(MockTransport::reliable());
        let (tx, rx) = mpsc::unbounded_channel();

        let outcome = runner.run(tx).await.unwrap();

        assert_eq!(outcome.phase, TestPhase::Complete);
        assert!(outcome.error.is_none());
        assert!(outcome.latency_ms >= 0.0);
        assert!(outcome.download_mbps > 0.0);
        assert!(outcome.upload_mbps > 0.0);

        assert_eq!(
            observed_phases(rx),
            vec![
                TestPhase::Ping,
                TestPhase::Download,
                TestPhase::Upload,
                TestPhase::Saving,
                TestPhase::Complete,
            ]
        );
    }

    #[tokio::test]
    async fn test_ping_failure_aborts_before_any_transfer() {
        let transport = MockTransport {
            fail_ping: true,
            ..MockTransport::reliable()
        };
        let runner = runner_with(transport);
        let (tx, rx) = mpsc::unbounded_channel();

        let error = runner.run(tx).await.unwrap_err();
        assert!(matches!(error, AppError::TransferFailed(_)));

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, TestPhase::Idle);
        assert!(snapshot.error.is_some());
        assert_eq!(snapshot.latency_ms, 0.0);
        assert_eq!(snapshot.download_mbps, 0.0);

        assert_eq!(observed_phases(rx), vec![TestPhase::Ping, TestPhase::Idle]);
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_without_submitting() {
        let transport = Arc::new(MockTransport {
            fail_upload: true,
            ..MockTransport::reliable()
        });
        let runner = TestRunner::new(transport.clone(), fast_settings());
        let (tx, _rx) = mpsc::unbounded_channel();

        let error = runner.run(tx).await.unwrap_err();
        assert!(matches!(error, AppError::TransferFailed(_)));

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, TestPhase::Idle);
        assert!(snapshot.error.as_deref().unwrap().contains("No response"));
        // Completed phases keep their metrics; the failed one stays zero
        assert!(snapshot.download_mbps > 0.0);
        assert_eq!(snapshot.upload_mbps, 0.0);

        assert_eq!(transport.submit_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_failure_discards_measurements() {
        let transport = MockTransport {
            fail_submit: true,
            ..MockTransport::reliable()
        };
        let runner = runner_with(transport);
        let (tx, rx) = mpsc::unbounded_channel();

        let error = runner.run(tx).await.unwrap_err();
        assert!(matches!(error, AppError::PersistenceFailed(_)));

        let snapshot = runner.snapshot();
        assert_eq!(snapshot.phase, TestPhase::Idle);
        assert!(snapshot.error.as_deref().unwrap().contains("Server error"));

        let phases = observed_phases(rx);
        assert_eq!(phases.last(), Some(&TestPhase::Idle));
        assert!(phases.contains(&TestPhase::Saving));
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_while_active() {
        let transport = MockTransport {
            download_delay: Duration::from_millis(200),
            ..MockTransport::reliable()
        };
        let runner = runner_with(transport);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let first = {
            let runner = runner.clone();
            tokio::spawn(async move { runner.run(tx).await })
        };

        // Wait until the first run is inside the download phase
        loop {
            match rx.recv().await {
                Some(snapshot) if snapshot.phase == TestPhase::Download => break,
                Some(_) => continue,
                None => panic!("update channel closed before download phase"),
            }
        }

        let (tx2, _rx2) = mpsc::unbounded_channel();
        let second = runner.run(tx2).await;
        assert!(matches!(second, Err(AppError::RunAlreadyInProgress)));

        // The original run is unaffected and completes normally
        let outcome = first.await.unwrap().unwrap();
        assert_eq!(outcome.phase, TestPhase::Complete);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_runner_can_restart_after_abort() {
        let transport = MockTransport {
            fail_download: true,
            ..MockTransport::reliable()
        };
        let runner = runner_with(transport);

        let (tx, _rx) = mpsc::unbounded_channel();
        assert!(runner.run(tx).await.is_err());

        // The abort released the active flag; a new run may start
        let (tx, _rx) = mpsc::unbounded_channel();
        let second = runner.run(tx).await;
        assert!(second.is_err());
        assert!(!matches!(second, Err(AppError::RunAlreadyInProgress)));
    }
}
