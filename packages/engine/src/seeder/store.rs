// packages/engine/src/seeder/store.rs
//! SQLite store for generated context rows
//!
//! The store owns the connection for the whole seeding run. Closing it
//! consumes the handle, so no insert can reach a closed connection.

use crate::seeder::generator::{generate_random_row, ContextRow};
use crate::seeder::schema;
use crate::utils::errors::{EngineError, Result};
use rand::Rng;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A row read back from the table
#[derive(Debug, Clone, PartialEq)]
pub struct StoredContext {
    pub id: i64,
    pub row: ContextRow,
}

/// Handle to the `contexts` database
pub struct ContextStore {
    path: PathBuf,
    db: Mutex<Connection>,
}

impl ContextStore {
    /// Open (or create) the database and ensure the table exists
    pub async fn create_schema(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                EngineError::StorageFailed(format!("Failed to create directory: {}", e))
            })?;
        }

        let conn = Connection::open(&path).map_err(|e| {
            EngineError::StorageFailed(format!("Failed to open database: {}", e))
        })?;

        let store = Self {
            path,
            db: Mutex::new(conn),
        };

        store.init_schema().await?;

        info!("Context store ready at {:?}", store.path);

        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        let db = self.db.lock().await;

        db.execute(&schema::create_table_sql(), [])
            .map_err(|e| EngineError::StorageFailed(format!("Schema creation failed: {}", e)))?;

        Ok(())
    }

    /// Generate and insert `n` random rows, committed once
    pub async fn insert_rows<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<usize> {
        if n == 0 {
            return Err(EngineError::InvalidArgument(
                "row count must be positive".to_string(),
            ));
        }

        let rows: Vec<ContextRow> = (0..n).map(|_| generate_random_row(rng)).collect();
        self.insert_batch(&rows).await
    }

    /// Insert prepared rows in a single transaction
    pub async fn insert_batch(&self, rows: &[ContextRow]) -> Result<usize> {
        let mut db = self.db.lock().await;

        let tx = db.transaction().map_err(|e| {
            EngineError::StorageFailed(format!("Failed to begin transaction: {}", e))
        })?;

        {
            let mut stmt = tx.prepare(&schema::insert_sql()).map_err(|e| {
                EngineError::StorageFailed(format!("Insert preparation failed: {}", e))
            })?;

            for row in rows {
                stmt.execute(params![
                    row.state_vector,
                    row.temporal_index,
                    row.entropy,
                    row.synaptic_weight,
                    row.hash,
                    row.coordinates,
                    row.is_entangled,
                    row.timestamp,
                ])
                .map_err(|e| EngineError::StorageFailed(format!("Insert failed: {}", e)))?;

                debug!("Inserted context row {}", row.hash);
            }
        }

        tx.commit()
            .map_err(|e| EngineError::StorageFailed(format!("Commit failed: {}", e)))?;

        metrics::counter!("memelab_rows_inserted_total").increment(rows.len() as u64);

        Ok(rows.len())
    }

    /// Number of rows in the table
    pub async fn count_rows(&self) -> Result<u64> {
        let db = self.db.lock().await;

        let count: i64 = db.query_row(
            &format!("SELECT COUNT(*) FROM {}", schema::TABLE_NAME),
            [],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }

    /// Read every row back in insertion order
    pub async fn rows(&self) -> Result<Vec<StoredContext>> {
        let db = self.db.lock().await;

        let mut stmt = db.prepare(&schema::select_sql()).map_err(|e| {
            EngineError::StorageFailed(format!("Query preparation failed: {}", e))
        })?;

        let rows = stmt
            .query_map([], |r| {
                Ok(StoredContext {
                    id: r.get(0)?,
                    row: ContextRow {
                        state_vector: r.get(1)?,
                        temporal_index: r.get(2)?,
                        entropy: r.get(3)?,
                        synaptic_weight: r.get(4)?,
                        hash: r.get(5)?,
                        coordinates: r.get(6)?,
                        is_entangled: r.get(7)?,
                        timestamp: r.get(8)?,
                    },
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection
    pub async fn close(self) -> Result<()> {
        let conn = self.db.into_inner();

        conn.close().map_err(|(_, e)| {
            EngineError::StorageFailed(format!("Failed to close database: {}", e))
        })?;

        debug!("Context store closed");
        Ok(())
    }
}
