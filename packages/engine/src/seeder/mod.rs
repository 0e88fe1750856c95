// packages/engine/src/seeder/mod.rs
//! Context seeder
//!
//! Fills a local SQLite file with randomized `contexts` rows:
//!
//! - **Schema**: Column table shared by CREATE and INSERT statements
//! - **Generator**: Random row synthesis from any `rand::Rng`
//! - **Store**: Connection handle, batched inserts, read-back
//!
//! ```text
//! create_schema() → insert_rows(n) → commit → close()
//! ```

pub mod generator;
pub mod schema;
pub mod store;

pub use generator::{generate_random_row, ContextRow};
pub use store::{ContextStore, StoredContext};

use crate::utils::config::SeederConfig;
use crate::utils::errors::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

/// Outcome of one seeding run
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub db_path: PathBuf,
    pub inserted: usize,
    pub total_rows: u64,
}

/// Run the whole pipeline: open, insert `config.rows` rows, close
pub async fn seed(config: &SeederConfig) -> Result<SeedReport> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = ContextStore::create_schema(&config.db_path).await?;
    let inserted = store.insert_rows(config.rows, &mut rng).await?;
    let total_rows = store.count_rows().await?;
    store.close().await?;

    info!(
        "Seeded {} rows into {:?} ({} total)",
        inserted, config.db_path, total_rows
    );

    Ok(SeedReport {
        db_path: config.db_path.clone(),
        inserted,
        total_rows,
    })
}
