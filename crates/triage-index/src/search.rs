//! Read-only query handle over the LanceDB disease table.
//!
//! LanceDB's API is async; the pipeline is synchronous, so the handle
//! owns a small runtime and blocks on each query.

use std::path::Path;

use anyhow::{anyhow, Result};
use arrow_array::{Float32Array, Int32Array};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection};
use tokio::runtime::Runtime;
use tracing::debug;

use triage_core::traits::{IndexHit, VectorIndex};

pub struct LanceVectorIndex {
    db: Connection,
    table_name: String,
    runtime: Runtime,
}

impl LanceVectorIndex {
    /// Open the index directory and verify the table exists. Called
    /// once during warm-up; a missing or unreadable table is fatal
    /// there, never per-request.
    pub fn open(db_path: &Path, table_name: &str) -> Result<Self> {
        let runtime = Runtime::new()?;
        let db = runtime.block_on(connect(db_path.to_string_lossy().as_ref()).execute())?;
        let names = runtime.block_on(db.table_names().execute())?;
        if !names.iter().any(|n| n == table_name) {
            return Err(anyhow!(
                "table {:?} not found in {} (run triage-indexer first)",
                table_name,
                db_path.display()
            ));
        }
        Ok(Self { db, table_name: table_name.to_string(), runtime })
    }
}

impl VectorIndex for LanceVectorIndex {
    fn search(&self, vector: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        self.runtime.block_on(async {
            let table = self.db.open_table(&self.table_name).execute().await?;
            let mut stream =
                table.vector_search(vector.to_vec())?.limit(k).execute().await?;

            let mut hits = Vec::new();
            while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
                let ids = batch
                    .column_by_name("id")
                    .and_then(|c| c.as_any().downcast_ref::<Int32Array>())
                    .ok_or_else(|| anyhow!("index answer missing id column"))?;
                let distances = batch
                    .column_by_name("_distance")
                    .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
                    .ok_or_else(|| anyhow!("index answer missing _distance column"))?;
                for i in 0..batch.num_rows() {
                    // Negative ids would mean a corrupt table; skip them
                    // with the same stale-index tolerance as out-of-range ids.
                    let Ok(id) = usize::try_from(ids.value(i)) else { continue };
                    hits.push(IndexHit { id, distance: distances.value(i) });
                }
            }
            debug!(k, hits = hits.len(), "vector search");
            Ok(hits)
        })
    }
}
