//! `grove` binary entry point.

use clap::Parser;
use grove_kernel::infrastructure::{
    cli::Cli,
    config::Settings,
    journal::{self, JournalEvent},
    telemetry::TelemetryBuilder,
};
use grove_kernel::runner;
use std::time::Instant;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    TelemetryBuilder::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .with_log_level(settings.telemetry.log_level.clone())
        .with_format(settings.telemetry.log_format)
        .init()?;

    for warning in settings.warnings() {
        warn!("{warning}");
    }

    info!("Grove Starting...");
    journal::record(&JournalEvent::RunStarted {
        directory: settings.generator.directory.display().to_string(),
        commit_count: settings.generator.commit_count,
        seed: settings.seed,
        probabilities: settings.probabilities,
    });

    let started = Instant::now();
    match runner::run(&settings).await {
        Ok(report) => {
            info!(
                steps = report.steps,
                branches_created = report.branches_created,
                branches_deleted = report.branches_deleted,
                merges = report.merges,
                conflicted_merges = report.conflicted_merges,
                rebases = report.rebases,
                rebases_aborted = report.rebases_aborted,
                "Grove run complete"
            );
            journal::record(&JournalEvent::RunCompleted {
                report,
                elapsed_ms: started.elapsed().as_millis(),
            });
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {e:#}");
            journal::record(&JournalEvent::RunFailed {
                error: format!("{e:#}"),
                elapsed_ms: started.elapsed().as_millis(),
            });
            std::process::exit(1);
        }
    }
}
