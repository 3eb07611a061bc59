//! Command line entry point.

use clap::Parser;
use dcx::{DriverConfig, init_logging, run};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DriverConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        output = %config.output.display(),
        steps_per_slice = config.steps_per_slice,
        containers = config.containers,
        "Starting encoder"
    );

    let summary = run(&config).await?;
    info!(
        bytes = summary.bytes,
        steps = summary.steps,
        slices = summary.slices,
        calls = summary.calls,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "Encoding complete"
    );

    if let Some(divergence) = &summary.divergence {
        error!(%divergence, "Output differs from the recorded call log");
        anyhow::bail!("call log mismatch: {divergence}");
    }
    if config.compare.is_some() {
        info!("Call log verified");
    }

    Ok(())
}
