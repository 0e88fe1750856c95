// packages/engine/src/main.rs
//! Memelab brainstorm
//!
//! Runs the memecoin brainstorm stages against the configured backend and
//! prints the transcript. An optional first argument replaces the brief.

use anyhow::Result;
use memelab_engine::observability;
use memelab_engine::simulation::{stdout_transcript, Simulation};
use memelab_engine::utils::config::EngineConfig;
use memelab_engine::BuildInfo;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (file + MEMELAB__* environment)
    let config = EngineConfig::load()?;

    observability::init(&config.observability)?;

    info!("Starting memelab {}", BuildInfo::current());

    let brief = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.simulation.brief.clone());

    let simulation = Simulation::from_config(&config, stdout_transcript())?;
    let report = simulation.run(&brief).await?;

    info!(
        "Run {} completed {} stages",
        report.run_id,
        report.stages.len()
    );

    match report.image_url() {
        Some(url) => info!("Token image: {}", url),
        None => info!("No token image was published"),
    }

    if let Some(path) = &config.simulation.report_path {
        report.write_json(path)?;
    }

    Ok(())
}
