//! Bandwidth Tester - Main CLI Application
//!
//! Runs a sequential latency/jitter, download, and upload measurement
//! cycle against an HTTP backend and manages the stored result history.

use bandwidth_tester::{
    app::App,
    error::{AppError, Result},
};
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = bandwidth_tester::cli::Cli::parse();
    let use_colors = cli.use_colors();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_colors));

        // Print suggestions for common errors
        print_error_suggestions(&e);

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: bandwidth_tester::cli::Cli) -> Result<()> {
    App::new(cli)?.run().await
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Verify the backend URL (must start with http:// or https://)");
            eprintln!("  - Payload sizes must be between 0 and 50 MiB");
        }
        AppError::TransferFailed(_) | AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check your internet connection");
            eprintln!("  - Verify the backend is running (try --health)");
            eprintln!("  - Increase the timeout with --timeout");
        }
        AppError::PersistenceFailed(_) => {
            eprintln!();
            eprintln!("Persistence troubleshooting:");
            eprintln!("  - The measurements completed but could not be saved");
            eprintln!("  - Check backend storage health (try --health)");
            eprintln!("  - Run the test again once the backend recovers");
        }
        AppError::NotFound(_) => {
            eprintln!();
            eprintln!("Use --history to list stored result ids.");
        }
        _ => {}
    }
}
