//! Configuration assembly from defaults, environment, and CLI arguments

use crate::cli::Cli;
use crate::config::env::EnvManager;
use crate::error::Result;
use crate::models::Config;

/// Load the effective configuration.
///
/// Priority, lowest to highest: built-in defaults, `.env` file values,
/// process environment variables, command-line arguments.
pub fn load_config(cli: &Cli) -> Result<Config> {
    EnvManager::load_env_file(cli.debug)?;

    let mut config = Config::default();
    config.merge_from_env()?;
    apply_cli_overrides(&mut config, cli);

    config.validate()?;
    Ok(config)
}

/// Overlay CLI arguments onto the configuration
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }

    if let Some(download_size) = cli.download_size {
        config.download_size_mb = download_size;
    }

    if let Some(upload_size) = cli.upload_size {
        config.upload_size_mb = upload_size;
    }

    if let Some(samples) = cli.samples {
        config.ping_samples = samples;
    }

    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }

    if let Some(limit) = cli.limit {
        config.history_limit = limit;
    }

    config.enable_color = cli.use_colors();
    config.verbose = cli.verbose;
    config.debug = cli.debug;
}

/// Render a configuration summary for debug output
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("  Backend URL: {}\n", config.base_url));
    summary.push_str(&format!("  Download size: {} MiB\n", config.download_size_mb));
    summary.push_str(&format!("  Upload size: {} MiB\n", config.upload_size_mb));
    summary.push_str(&format!(
        "  Ping samples: {} ({} ms apart)\n",
        config.ping_samples, config.ping_interval_ms
    ));
    summary.push_str(&format!("  Timeout: {}s\n", config.timeout_seconds));
    summary.push_str(&format!("  History limit: {}\n", config.history_limit));
    summary.push_str(&format!("  Color output: {}\n", config.enable_color));

    summary
}
