//! Error handling for the bandwidth tester

use thiserror::Error;

/// Custom error types for the bandwidth tester
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed local arguments (programmer error, not user-facing)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network/transport error during a ping, download, or upload
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// The result persistence step failed after measurements succeeded
    #[error("Failed to save result: {0}")]
    PersistenceFailed(String),

    /// A stored result lookup or delete matched nothing
    #[error("Result not found: {0}")]
    NotFound(String),

    /// A start request arrived while a run was already active
    #[error("A test run is already in progress")]
    RunAlreadyInProgress,

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Parsing errors (URLs, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new transfer failure error
    pub fn transfer_failed<S: Into<String>>(message: S) -> Self {
        Self::TransferFailed(message.into())
    }

    /// Create a new persistence failure error
    pub fn persistence_failed<S: Into<String>>(message: S) -> Self {
        Self::PersistenceFailed(message.into())
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a new timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::InvalidInput(_) => "INPUT",
            Self::TransferFailed(_) => "TRANSFER",
            Self::PersistenceFailed(_) => "PERSISTENCE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RunAlreadyInProgress => "RUN",
            Self::Timeout(_) => "TIMEOUT",
            Self::Parse(_) => "PARSE",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Check if error is recoverable (can retry)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::TransferFailed(_) | Self::PersistenceFailed(_) | Self::Timeout(_) => true,
            Self::RunAlreadyInProgress => true,
            Self::Config(_) | Self::InvalidInput(_) | Self::Parse(_) => false,
            Self::NotFound(_) | Self::Io(_) | Self::Internal(_) => false,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Config(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check your .env file or command line arguments.", msg)
            }
            Self::InvalidInput(msg) => {
                format!("Invalid input: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
            Self::TransferFailed(msg) => {
                format!("Transfer failed: {}\n\nSuggestion: Check your internet connection and that the backend is reachable, then run the test again.", msg)
            }
            Self::PersistenceFailed(msg) => {
                format!("Saving the result failed: {}\n\nThe measurements were discarded. Run the test again once the backend is healthy.", msg)
            }
            Self::NotFound(msg) => {
                format!("Not found: {}\n\nSuggestion: List stored results with --history to see valid ids.", msg)
            }
            Self::RunAlreadyInProgress => {
                "A test run is already in progress.\n\nWait for the current run to finish before starting another.".to_string()
            }
            Self::Timeout(msg) => {
                format!("Request timed out: {}\n\nSuggestion: Increase the timeout value using --timeout or check your network connection.", msg)
            }
            Self::Parse(msg) => {
                format!("Failed to parse data: {}\n\nSuggestion: Check the format of your input data or configuration values.", msg)
            }
            Self::Io(msg) => {
                format!("File operation failed: {}\n\nSuggestion: Check file permissions and disk space.", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::InvalidInput(_) | Self::Parse(_) => 1, // Invalid configuration/usage
            Self::TransferFailed(_) => 2,                                  // Network issues
            Self::Timeout(_) => 3,                                         // Timeout issues
            Self::PersistenceFailed(_) | Self::NotFound(_) => 4,           // Backend storage issues
            Self::Io(_) => 5,                                              // I/O issues
            Self::RunAlreadyInProgress => 6,                               // Run state issues
            Self::Internal(_) => 99,                                       // Internal/unexpected errors
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::InvalidInput(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::TransferFailed(_) | Self::PersistenceFailed(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Timeout(_) => {
                    format!("[{}] {}", category.blue().bold(), message.blue())
                }
                Self::NotFound(_) | Self::RunAlreadyInProgress => {
                    format!("[{}] {}", category.magenta().bold(), message.magenta())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

/// Build a user-readable description of a transport error, distinguishing
/// a server-side error response from a connection that got no response.
pub fn describe_transport_error(error: &reqwest::Error) -> String {
    if let Some(status) = error.status() {
        format!("Server error: {}", status)
    } else if error.is_connect() {
        "No response from server. Please check your connection.".to_string()
    } else {
        error.to_string()
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::parse(format!("URL parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON parse error: {}", error))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(error.to_string())
        } else {
            Self::transfer_failed(describe_transport_error(&error))
        }
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::parse(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::parse(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::parse(format!("Boolean parse error: {}", error))
    }
}

// Anyhow integration
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(error.to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for structured error logging and user feedback
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", error.format_for_console(self.use_color));

        if self.verbose {
            eprintln!();
            eprintln!("{}", error.user_friendly_message());

            if error.is_recoverable() {
                eprintln!();
                if self.use_color {
                    use colored::Colorize;
                    eprintln!("{}", "This error might be temporary. You can try running the command again.".green());
                } else {
                    eprintln!("This error might be temporary. You can try running the command again.");
                }
            }
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
