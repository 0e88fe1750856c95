// packages/engine/src/bin/seed_contexts.rs
//! Context seeder
//!
//! Creates the `contexts` table if needed and inserts `seeder.rows` random
//! rows into `seeder.db_path`.

use anyhow::Result;
use memelab_engine::observability;
use memelab_engine::seeder::seed;
use memelab_engine::utils::config::EngineConfig;
use memelab_engine::BuildInfo;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = EngineConfig::load()?;
    observability::init(&config.observability)?;

    info!("Starting seed-contexts {}", BuildInfo::current());

    let report = seed(&config.seeder).await?;

    info!(
        "Inserted {} rows into {} ({} rows total)",
        report.inserted,
        report.db_path.display(),
        report.total_rows
    );

    Ok(())
}
