//! Food Delivery Broker - Command-line entry point
//! Parses flags, wires a reporter to the core, and maps outcomes to exit codes

mod args;
mod report;
mod telemetry;

use anyhow::Result;
use args::{Cli, OutputFormat};
use clap::{CommandFactory, Parser};
use colored::Colorize;
use fooddelivery_core::application::Orchestrator;
use fooddelivery_core::port::EventSink;
use fooddelivery_core::DeliveryError;
use report::{ConsoleReporter, JsonReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

async fn run(cli: Cli) -> Result<()> {
    // Validate before any agent starts
    let config = cli.delivery_config()?;

    let sink: Arc<dyn EventSink> = match cli.format {
        OutputFormat::Text => Arc::new(ConsoleReporter::new(std::io::stdout())),
        OutputFormat::Json => Arc::new(JsonReporter::new(std::io::stdout())),
    };

    let report = Orchestrator::new(config, sink).run().await?;
    info!(
        undelivered = report.undelivered(),
        anomalies = report.anomalies,
        "Run complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_logging();

    info!("Food delivery broker v{} starting...", fooddelivery_core::VERSION);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            if e.downcast_ref::<DeliveryError>().is_some_and(DeliveryError::is_config) {
                eprintln!();
                eprintln!("{}", Cli::command().render_help());
            }
            ExitCode::FAILURE
        }
    }
}
