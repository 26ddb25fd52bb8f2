//! Colored terminal formatting

use super::formatter::{format_mbps, format_ms, history_row, OutputFormatter, HISTORY_COLUMNS};
use crate::models::{HealthStatus, StoredResult, TestRun};
use crate::types::TestPhase;
use colored::Colorize;

/// Speed classification used to pick metric colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricGrade {
    Good,
    Moderate,
    Poor,
}

impl MetricGrade {
    /// Classify a throughput value in Mbps
    fn for_throughput(mbps: f64) -> Self {
        if mbps >= 50.0 {
            Self::Good
        } else if mbps >= 10.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    /// Classify a latency or jitter value in milliseconds
    fn for_latency(ms: f64) -> Self {
        if ms < 50.0 {
            Self::Good
        } else if ms < 150.0 {
            Self::Moderate
        } else {
            Self::Poor
        }
    }

    fn paint(&self, text: String) -> String {
        match self {
            Self::Good => text.green().to_string(),
            Self::Moderate => text.yellow().to_string(),
            Self::Poor => text.red().to_string(),
        }
    }
}

/// Formatter that color-codes phases and metric values
pub struct ColoredFormatter;

impl ColoredFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> String {
        format!("{}\n{}", title.bold(), "=".repeat(title.len()))
    }

    fn format_phase_line(&self, phase: TestPhase) -> String {
        let label = format!("[{}]", phase.name());
        let label = match phase {
            TestPhase::Complete => label.green().bold(),
            TestPhase::Idle => label.red().bold(),
            _ => label.cyan().bold(),
        };
        format!("{} {}", label, phase.progress_message())
    }

    fn format_run_summary(&self, run: &TestRun) -> String {
        let download = MetricGrade::for_throughput(run.download_mbps)
            .paint(format_mbps(run.download_mbps));
        let upload =
            MetricGrade::for_throughput(run.upload_mbps).paint(format_mbps(run.upload_mbps));
        let latency = MetricGrade::for_latency(run.latency_ms).paint(format_ms(run.latency_ms));
        let jitter = MetricGrade::for_latency(run.jitter_ms).paint(format_ms(run.jitter_ms));

        let mut summary = String::new();
        summary.push_str(&format!("  {} {}\n", "Download:".bold(), download));
        summary.push_str(&format!("  {} {}\n", "Upload:  ".bold(), upload));
        summary.push_str(&format!("  {} {}\n", "Latency: ".bold(), latency));
        summary.push_str(&format!("  {} {}\n", "Jitter:  ".bold(), jitter));
        summary
    }

    fn format_history_table(&self, results: &[StoredResult]) -> String {
        if results.is_empty() {
            return "No stored results.".yellow().to_string();
        }

        let mut table = String::new();
        for (name, width) in HISTORY_COLUMNS {
            table.push_str(&format!("{:<width$}  ", name.bold(), width = width));
        }
        table.push('\n');
        table.push_str(&"-".repeat(HISTORY_COLUMNS.iter().map(|(_, w)| w + 2).sum::<usize>()));
        table.push('\n');

        for result in results {
            let row = history_row(result);
            for (cell, (_, width)) in row.iter().zip(HISTORY_COLUMNS.iter()) {
                table.push_str(&format!("{:<width$}  ", cell, width = *width));
            }
            table.push('\n');
        }

        table
    }

    fn format_stored_result(&self, result: &StoredResult) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} {}\n", "Result".bold(), result.id));
        output.push_str(&format!(
            "  Recorded: {}\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!(
            "  Download: {}\n",
            MetricGrade::for_throughput(result.download_speed)
                .paint(format_mbps(result.download_speed))
        ));
        output.push_str(&format!(
            "  Upload:   {}\n",
            MetricGrade::for_throughput(result.upload_speed).paint(format_mbps(result.upload_speed))
        ));
        output.push_str(&format!(
            "  Latency:  {}\n",
            MetricGrade::for_latency(result.latency).paint(format_ms(result.latency))
        ));
        output.push_str(&format!(
            "  Jitter:   {}\n",
            MetricGrade::for_latency(result.jitter).paint(format_ms(result.jitter))
        ));

        if let Some(ref ip_address) = result.ip_address {
            output.push_str(&format!("  Client:   {}\n", ip_address));
        }
        if let Some(ref user_agent) = result.user_agent {
            output.push_str(&format!("  Agent:    {}\n", user_agent));
        }

        output
    }

    fn format_health(&self, health: &HealthStatus) -> String {
        let status = if health.status == "healthy" {
            health.status.green().bold()
        } else {
            health.status.red().bold()
        };
        format!(
            "Backend status: {} (reported at {})",
            status,
            health.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
