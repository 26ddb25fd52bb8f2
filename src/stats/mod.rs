//! Latency statistics for bandwidth test runs

use crate::error::{AppError, Result};
use crate::models::LatencyStatistic;

/// Compute the latency statistic for an ordered sequence of round-trip
/// samples in milliseconds.
///
/// The mean is the arithmetic mean; jitter is the population standard
/// deviation (divisor = sample count, not count - 1). A single sample
/// trivially yields zero jitter.
pub fn latency_statistic(samples: &[f64]) -> Result<LatencyStatistic> {
    if samples.is_empty() {
        return Err(AppError::invalid_input(
            "latency statistic requires at least one sample",
        ));
    }

    let count = samples.len() as f64;
    let mean_ms = samples.iter().sum::<f64>() / count;

    let variance = samples
        .iter()
        .map(|&sample| (sample - mean_ms).powi(2))
        .sum::<f64>()
        / count;

    Ok(LatencyStatistic {
        mean_ms,
        jitter_ms: variance.sqrt(),
    })
}
