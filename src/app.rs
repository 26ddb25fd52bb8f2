//! Main application orchestration and execution

use crate::{
    cli::{Action, Cli},
    client::{ApiClient, ResultTransport},
    config::{load_config, parser::display_config_summary},
    error::{AppError, Result},
    logging::{LogLevel, Logger},
    models::Config,
    output::{OutputFormatter, OutputFormatterFactory},
    runner::{RunnerSettings, TestRunner},
    types::TestPhase,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    transport: Arc<dyn ResultTransport>,
    formatter: Box<dyn OutputFormatter>,
    logger: Logger,
    action: Action,
}

impl App {
    /// Create a new application instance from parsed CLI arguments
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::config)?;

        let config = load_config(&cli)?;

        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };
        let logger = Logger::new(min_level, config.enable_color).with_json_output(config.debug);

        let transport: Arc<dyn ResultTransport> =
            Arc::new(ApiClient::new(&config.base_url, config.timeout())?);
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color);

        Ok(Self {
            config,
            transport,
            formatter,
            logger,
            action: cli.action(),
        })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        if self.config.debug {
            println!("{} v{}", crate::PKG_NAME, crate::VERSION);
            println!("Configuration:");
            println!("{}", display_config_summary(&self.config));
        }

        match self.action.clone() {
            Action::RunTest => self.run_test().await,
            Action::History => self.show_history().await,
            Action::Show(id) => self.show_result(&id).await,
            Action::Delete(id) => self.delete_result(&id).await,
            Action::Health => self.check_health().await,
        }
    }

    /// Execute one measurement cycle, printing progress as phases change
    async fn run_test(&self) -> Result<()> {
        println!("{}", self.formatter.format_header("Internet Bandwidth Test"));
        println!();

        let runner = Arc::new(TestRunner::new(
            self.transport.clone(),
            RunnerSettings::from_config(&self.config),
        ));

        let (updates, mut snapshots) = mpsc::unbounded_channel();
        let run_task = {
            let runner = runner.clone();
            tokio::spawn(async move { runner.run(updates).await })
        };

        let mut last_phase = TestPhase::Idle;
        while let Some(snapshot) = snapshots.recv().await {
            if snapshot.phase != last_phase && snapshot.phase.is_active() {
                println!("{}", self.formatter.format_phase_line(snapshot.phase));
            }
            if snapshot.phase == TestPhase::Complete {
                println!("{}", self.formatter.format_phase_line(TestPhase::Complete));
            }

            let mut fields: HashMap<String, Value> = HashMap::new();
            fields.insert("phase".to_string(), Value::from(snapshot.phase.name()));
            self.logger.debug_with("runner", "state update", fields);

            last_phase = snapshot.phase;
        }

        let outcome = run_task
            .await
            .map_err(|e| AppError::internal(format!("Runner task failed: {}", e)))?;

        match outcome {
            Ok(final_run) => {
                println!();
                print!("{}", self.formatter.format_run_summary(&final_run));
                println!();
                println!("Result saved.");
                Ok(())
            }
            Err(error) => {
                self.logger.error("runner", &error.to_string());
                Err(error)
            }
        }
    }

    /// Load and render the stored-result history
    async fn show_history(&self) -> Result<()> {
        println!("{}", self.formatter.format_header("Stored Results"));
        println!();

        let results = self.transport.list_results(0, self.config.history_limit).await?;
        self.logger.info(
            "history",
            &format!("fetched {} stored result(s)", results.len()),
        );
        println!("{}", self.formatter.format_history_table(&results));
        Ok(())
    }

    /// Fetch and render a single stored result
    async fn show_result(&self, id: &str) -> Result<()> {
        let result = self.transport.get_result(id).await?;
        print!("{}", self.formatter.format_stored_result(&result));
        Ok(())
    }

    /// Delete a stored result
    async fn delete_result(&self, id: &str) -> Result<()> {
        self.transport.delete_result(id).await?;
        println!("Deleted result {}.", id);
        Ok(())
    }

    /// Probe backend health
    async fn check_health(&self) -> Result<()> {
        let health = self.transport.health().await?;
        println!("{}", self.formatter.format_health(&health));
        Ok(())
    }
}
