//! Offline index construction: embeds every corpus record and writes
//! the LanceDB disease table the serving path queries.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arrow_array::{
    FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::{connect, Connection};
use serde::Deserialize;
use tracing::info;

use triage_core::traits::Embedder;

use crate::schema::build_arrow_schema;

/// One corpus entry as it appears in the source JSON array.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceRecord {
    pub text: String,
    pub disease: String,
    pub department: String,
}

pub struct LanceIndexWriter {
    db: Connection,
    table_name: String,
    dim: usize,
}

const BATCH_SIZE: usize = 256;

impl LanceIndexWriter {
    pub async fn connect(db_path: &Path, table_name: &str, dim: usize) -> Result<Self> {
        let db = connect(db_path.to_string_lossy().as_ref()).execute().await?;
        Ok(Self { db, table_name: table_name.to_string(), dim })
    }

    /// Embed and write all records, replacing any existing table.
    /// Record ids are assigned from the input order, so the caller must
    /// write the corpus metadata from the same slice in the same pass.
    pub async fn rebuild(&self, records: &[SourceRecord], embedder: &dyn Embedder) -> Result<()> {
        let existing = self.db.table_names().execute().await?;
        if existing.iter().any(|n| n == &self.table_name) {
            self.db.drop_table(&self.table_name, &[]).await?;
        }

        let pb = ProgressBar::new(records.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} records ({percent}%)")?
                .progress_chars("#>-"),
        );

        let mut batch: Vec<(i32, &SourceRecord, Vec<f32>)> = Vec::new();
        for (id, record) in records.iter().enumerate() {
            let vector = embedder.embed(&record.text)?;
            batch.push((id as i32, record, vector));
            pb.inc(1);
            if batch.len() >= BATCH_SIZE || id == records.len() - 1 {
                self.insert_batch(&batch).await?;
                batch.clear();
            }
        }
        pb.finish_and_clear();
        info!(records = records.len(), table = %self.table_name, "index rebuilt");
        Ok(())
    }

    async fn insert_batch(&self, rows: &[(i32, &SourceRecord, Vec<f32>)]) -> Result<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let record_batch = self.rows_to_record_batch(rows)?;
        let schema = record_batch.schema();
        let reader =
            Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
        if self.db.table_names().execute().await?.contains(&self.table_name) {
            self.db.open_table(&self.table_name).execute().await?.add(reader).execute().await?;
        } else {
            self.db.create_table(&self.table_name, reader).execute().await?;
        }
        Ok(())
    }

    fn rows_to_record_batch(&self, rows: &[(i32, &SourceRecord, Vec<f32>)]) -> Result<RecordBatch> {
        let schema = build_arrow_schema(self.dim);
        let mut ids = Vec::with_capacity(rows.len());
        let mut texts = Vec::with_capacity(rows.len());
        let mut diseases = Vec::with_capacity(rows.len());
        let mut departments = Vec::with_capacity(rows.len());
        let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(rows.len());
        for (id, record, vector) in rows {
            ids.push(*id);
            texts.push(record.text.clone());
            diseases.push(record.disease.clone());
            departments.push(record.department.clone());
            vectors.push(Some(vector.iter().map(|&x| Some(x)).collect()));
        }
        let record_batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int32Array::from(ids)),
                Arc::new(StringArray::from(texts)),
                Arc::new(StringArray::from(diseases)),
                Arc::new(StringArray::from(departments)),
                Arc::new(FixedSizeListArray::from_iter_primitive::<
                    arrow_array::types::Float32Type,
                    _,
                    _,
                >(vectors.into_iter(), self.dim as i32)),
            ],
        )?;
        Ok(record_batch)
    }
}
