//! Structured logging for the bandwidth tester
//!
//! Console logging with per-run correlation ids, colored level tags, and
//! an optional JSON-lines mode for machine consumption in debug runs.

use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Debug level - detailed information for debugging
    Debug = 0,
    /// Info level - general application information
    Info = 1,
    /// Warning level - potentially harmful situations
    Warn = 2,
    /// Error level - error events but application can continue
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Colorize the level tag for console output
    fn colorize(&self, text: &str) -> String {
        use colored::Colorize;
        match self {
            LogLevel::Debug => text.cyan().to_string(),
            LogLevel::Info => text.green().to_string(),
            LogLevel::Warn => text.yellow().to_string(),
            LogLevel::Error => text.red().to_string(),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(AppError::parse(format!("Invalid log level: {}", s))),
        }
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Component that emitted the entry
    pub component: String,
    /// Correlation ID tying entries of one run together
    pub correlation_id: String,
    /// Additional structured fields
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, Value>,
}

impl LogEntry {
    /// Render the entry as a console line
    pub fn format_console(&self, use_color: bool) -> String {
        let level_tag = if use_color {
            self.level.colorize(self.level.as_str())
        } else {
            self.level.as_str().to_string()
        };

        let mut line = format!(
            "{} [{}] {} {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            level_tag,
            self.component,
            self.message
        );

        if !self.fields.is_empty() {
            let mut keys: Vec<&String> = self.fields.keys().collect();
            keys.sort();
            let rendered: Vec<String> = keys
                .iter()
                .map(|key| format!("{}={}", key, self.fields[*key]))
                .collect();
            line.push_str(&format!(" ({})", rendered.join(", ")));
        }

        line
    }

    /// Render the entry as a JSON line
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(AppError::from)
    }
}

/// Console logger with a minimum level and an optional JSON-lines mode
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    json_output: bool,
    correlation_id: String,
}

impl Logger {
    /// Create a new logger with a fresh correlation id
    pub fn new(min_level: LogLevel, use_color: bool) -> Self {
        Self {
            min_level,
            use_color,
            json_output: false,
            correlation_id: Uuid::new_v4().to_string(),
        }
    }

    /// Switch the logger to JSON-lines output
    pub fn with_json_output(mut self, json_output: bool) -> Self {
        self.json_output = json_output;
        self
    }

    /// Get this logger's correlation id
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// Emit an entry if it passes the minimum level
    pub fn log(&self, level: LogLevel, component: &str, message: &str, fields: HashMap<String, Value>) {
        if level < self.min_level {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
            component: component.to_string(),
            correlation_id: self.correlation_id.clone(),
            fields,
        };

        if self.json_output {
            if let Ok(json) = entry.to_json() {
                eprintln!("{}", json);
            }
        } else {
            eprintln!("{}", entry.format_console(self.use_color));
        }
    }

    pub fn debug(&self, component: &str, message: &str) {
        self.log(LogLevel::Debug, component, message, HashMap::new());
    }

    pub fn info(&self, component: &str, message: &str) {
        self.log(LogLevel::Info, component, message, HashMap::new());
    }

    pub fn warn(&self, component: &str, message: &str) {
        self.log(LogLevel::Warn, component, message, HashMap::new());
    }

    pub fn error(&self, component: &str, message: &str) {
        self.log(LogLevel::Error, component, message, HashMap::new());
    }

    /// Emit a debug entry with structured fields
    pub fn debug_with(&self, component: &str, message: &str, fields: HashMap<String, Value>) {
        self.log(LogLevel::Debug, component, message, fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level: LogLevel::Info,
            message: "phase complete".to_string(),
            component: "runner".to_string(),
            correlation_id: "11111111-2222-3333-4444-555555555555".to_string(),
            fields: HashMap::new(),
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_console_format_plain() {
        let line = sample_entry().format_console(false);
        assert!(line.contains("[INFO]"));
        assert!(line.contains("runner"));
        assert!(line.contains("phase complete"));
    }

    #[test]
    fn test_console_format_includes_fields() {
        let mut entry = sample_entry();
        entry.fields.insert("phase".to_string(), Value::from("download"));
        let line = entry.format_console(false);
        assert!(line.contains("phase=\"download\""));
    }

    #[test]
    fn test_json_round_trip() {
        let json = sample_entry().to_json().unwrap();
        let parsed: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.message, "phase complete");
        assert_eq!(parsed.level, LogLevel::Info);
    }

    #[test]
    fn test_logger_correlation_ids_are_unique() {
        let first = Logger::new(LogLevel::Info, false);
        let second = Logger::new(LogLevel::Info, false);
        assert_ne!(first.correlation_id(), second.correlation_id());
    }
}
