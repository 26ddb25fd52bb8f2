//! Wall-clock transfer timing and upload payload generation

use crate::error::Result;
use crate::models::ThroughputMeasurement;
use rand::rngs::OsRng;
use rand::RngCore;
use std::future::Future;
use std::time::Instant;

/// Bytes per MiB, the unit payload sizes are requested in
pub const BYTES_PER_MIB: u64 = 1_048_576;

/// Convert a payload size in MiB to a byte count
pub fn mib_to_bytes(size_mb: f64) -> u64 {
    (size_mb * BYTES_PER_MIB as f64).round() as u64
}

/// Time a single network transfer of `byte_count` bytes and convert the
/// result to throughput.
///
/// The timestamps bracket the entire awaited transfer, including all
/// network and server round-trip time. The future must resolve to the
/// number of bytes actually moved; a count that does not match the
/// expectation is treated as an interrupted transfer. No retry happens
/// here; a failed transfer aborts the caller's run.
pub async fn measure_transfer<F>(byte_count: u64, transfer: F) -> Result<ThroughputMeasurement>
where
    F: Future<Output = Result<u64>>,
{
    let start = Instant::now();
    let moved = transfer.await?;
    let elapsed = start.elapsed();

    if moved != byte_count {
        return Err(crate::error::AppError::transfer_failed(format!(
            "incomplete transfer: expected {} bytes, moved {}",
            byte_count, moved
        )));
    }

    ThroughputMeasurement::from_transfer(moved, elapsed)
}

/// Generate an upload payload of random bytes.
///
/// Drawn from the operating system's CSPRNG so the body stays
/// incompressible if anything in transit applies compression. Generation
/// happens before the caller starts timing.
pub fn random_payload(byte_count: usize) -> Vec<u8> {
    let mut payload = vec![0u8; byte_count];
    OsRng.fill_bytes(&mut payload);
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::time::Duration;

    #[test]
    fn test_mib_to_bytes() {
        assert_eq!(mib_to_bytes(1.0), 1_048_576);
        assert_eq!(mib_to_bytes(5.0), 5_242_880);
        assert_eq!(mib_to_bytes(0.5), 524_288);
    }

    #[test]
    fn test_random_payload_size_and_content() {
        let payload = random_payload(4096);
        assert_eq!(payload.len(), 4096);
        // A zeroed buffer would mean the RNG never ran
        assert!(payload.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_random_payloads_differ() {
        let first = random_payload(256);
        let second = random_payload(256);
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_measure_transfer_brackets_elapsed_time() {
        let measurement = measure_transfer(1_048_576, async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(1_048_576)
        })
        .await
        .unwrap();

        assert_eq!(measurement.bytes_transferred, 1_048_576);
        assert!(measurement.elapsed_seconds >= 0.05);
        assert!(measurement.megabits_per_second > 0.0);
    }

    #[test]
    fn test_measure_transfer_without_runtime_timers() {
        let measurement =
            tokio_test::block_on(measure_transfer(8, async { Ok(8) })).unwrap();
        assert_eq!(measurement.bytes_transferred, 8);
        assert!(measurement.elapsed_seconds > 0.0);
    }

    #[tokio::test]
    async fn test_measure_transfer_rejects_partial_transfer() {
        let result = measure_transfer(1_000, async { Ok(999) }).await;
        assert!(matches!(result, Err(AppError::TransferFailed(_))));
    }

    #[tokio::test]
    async fn test_measure_transfer_propagates_failure() {
        let result = measure_transfer(1_000, async {
            Err(AppError::transfer_failed("connection reset"))
        })
        .await;
        assert!(matches!(result, Err(AppError::TransferFailed(_))));
    }
}
