//! Command-line interface

use clap::Parser;

/// Bandwidth Tester - sequential latency, download, and upload measurement
#[derive(Parser, Debug, Clone)]
#[command(name = "bwt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the measurement backend
    #[arg(short = 'b', long, env = "API_BASE_URL")]
    pub base_url: Option<String>,

    /// Download payload size in MiB
    #[arg(short = 'd', long, value_name = "MIB")]
    pub download_size: Option<f64>,

    /// Upload payload size in MiB
    #[arg(short = 'u', long, value_name = "MIB")]
    pub upload_size: Option<f64>,

    /// Number of latency samples per run
    #[arg(short = 's', long)]
    pub samples: Option<u32>,

    /// Request timeout in seconds
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// List stored results instead of running a test
    #[arg(long)]
    pub history: bool,

    /// Maximum number of stored results to list
    #[arg(long, requires = "history")]
    pub limit: Option<u32>,

    /// Show a single stored result by id
    #[arg(long, value_name = "ID")]
    pub show: Option<String>,

    /// Delete a stored result by id
    #[arg(long, value_name = "ID")]
    pub delete: Option<String>,

    /// Check backend health and exit
    #[arg(long)]
    pub health: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

/// The action a CLI invocation resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run a full measurement cycle (the default)
    RunTest,
    /// List stored results
    History,
    /// Show one stored result
    Show(String),
    /// Delete one stored result
    Delete(String),
    /// Probe backend health
    Health,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        // Check for conflicting color flags
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        let exclusive_actions = [
            self.history,
            self.show.is_some(),
            self.delete.is_some(),
            self.health,
        ];
        if exclusive_actions.iter().filter(|&&set| set).count() > 1 {
            return Err(
                "Only one of --history, --show, --delete, or --health may be used at a time"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Resolve which action this invocation performs
    pub fn action(&self) -> Action {
        if self.history {
            Action::History
        } else if let Some(ref id) = self.show {
            Action::Show(id.clone())
        } else if let Some(ref id) = self.delete {
            Action::Delete(id.clone())
        } else if self.health {
            Action::Health
        } else {
            Action::RunTest
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true // Force color output when --color is specified
        } else if self.no_color {
            false // Disable color output when --no-color is specified
        } else {
            supports_color() // Use automatic detection
        }
    }
}

/// Detect whether the terminal supports colored output
fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => cfg!(windows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("bwt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_action_is_run() {
        let cli = cli_from(&[]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.action(), Action::RunTest);
    }

    #[test]
    fn test_history_action() {
        let cli = cli_from(&["--history", "--limit", "25"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.action(), Action::History);
        assert_eq!(cli.limit, Some(25));
    }

    #[test]
    fn test_show_and_delete_actions() {
        let cli = cli_from(&["--show", "abc-123"]);
        assert_eq!(cli.action(), Action::Show("abc-123".to_string()));

        let cli = cli_from(&["--delete", "abc-123"]);
        assert_eq!(cli.action(), Action::Delete("abc-123".to_string()));
    }

    #[test]
    fn test_conflicting_color_flags_rejected() {
        let cli = cli_from(&["--color", "--no-color"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_conflicting_actions_rejected() {
        let cli = cli_from(&["--history", "--health"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_limit_requires_history() {
        let result = Cli::try_parse_from(["bwt", "--limit", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_color_flags_override_detection() {
        let cli = cli_from(&["--color"]);
        assert!(cli.use_colors());

        let cli = cli_from(&["--no-color"]);
        assert!(!cli.use_colors());
    }
}
