//! Plain text formatting for test progress, summaries, and history

use crate::models::{HealthStatus, StoredResult, TestRun};
use crate::types::TestPhase;

/// Formats test progress and results for terminal display
pub trait OutputFormatter: Send + Sync {
    /// Format a section header
    fn format_header(&self, title: &str) -> String;

    /// Format the progress line shown when a run enters a phase
    fn format_phase_line(&self, phase: TestPhase) -> String;

    /// Format the metric block for a finished run
    fn format_run_summary(&self, run: &TestRun) -> String;

    /// Format a table of stored results, newest first
    fn format_history_table(&self, results: &[StoredResult]) -> String;

    /// Format a single stored result in full
    fn format_stored_result(&self, result: &StoredResult) -> String;

    /// Format a backend health response
    fn format_health(&self, health: &HealthStatus) -> String;
}

/// Render throughput with a stable precision
pub(crate) fn format_mbps(mbps: f64) -> String {
    format!("{:.2} Mbps", mbps)
}

/// Render a millisecond quantity with a stable precision
pub(crate) fn format_ms(ms: f64) -> String {
    format!("{:.1} ms", ms)
}

/// One row of the history table, already stringified
pub(crate) fn history_row(result: &StoredResult) -> [String; 6] {
    [
        result.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        format!("{:.2}", result.download_speed),
        format!("{:.2}", result.upload_speed),
        format!("{:.1}", result.latency),
        format!("{:.1}", result.jitter),
        result.id.clone(),
    ]
}

pub(crate) const HISTORY_COLUMNS: [(&str, usize); 6] = [
    ("Timestamp", 19),
    ("Down (Mbps)", 11),
    ("Up (Mbps)", 11),
    ("Latency", 8),
    ("Jitter", 8),
    ("Id", 36),
];

/// Plain text formatter without color codes
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> String {
        format!("{}\n{}", title, "=".repeat(title.len()))
    }

    fn format_phase_line(&self, phase: TestPhase) -> String {
        format!("[{}] {}", phase.name(), phase.progress_message())
    }

    fn format_run_summary(&self, run: &TestRun) -> String {
        let mut summary = String::new();
        summary.push_str(&format!("  Download: {}\n", format_mbps(run.download_mbps)));
        summary.push_str(&format!("  Upload:   {}\n", format_mbps(run.upload_mbps)));
        summary.push_str(&format!("  Latency:  {}\n", format_ms(run.latency_ms)));
        summary.push_str(&format!("  Jitter:   {}\n", format_ms(run.jitter_ms)));
        summary
    }

    fn format_history_table(&self, results: &[StoredResult]) -> String {
        if results.is_empty() {
            return "No stored results.".to_string();
        }

        let mut table = String::new();
        for (name, width) in HISTORY_COLUMNS {
            table.push_str(&format!("{:<width$}  ", name, width = width));
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
        output.push_str(&format!("Result {}\n", result.id));
        output.push_str(&format!(
            "  Recorded: {}\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("  Download: {}\n", format_mbps(result.download_speed)));
        output.push_str(&format!("  Upload:   {}\n", format_mbps(result.upload_speed)));
        output.push_str(&format!("  Latency:  {}\n", format_ms(result.latency)));
        output.push_str(&format!("  Jitter:   {}\n", format_ms(result.jitter)));

        if let Some(ref ip_address) = result.ip_address {
            output.push_str(&format!("  Client:   {}\n", ip_address));
        }
        if let Some(ref user_agent) = result.user_agent {
            output.push_str(&format!("  Agent:    {}\n", user_agent));
        }

        output
    }

    fn format_health(&self, health: &HealthStatus) -> String {
        format!(
            "Backend status: {} (reported at {})",
            health.status,
            health.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
