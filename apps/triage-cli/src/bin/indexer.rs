//! Offline index build: reads a source corpus JSON array of
//! `{text, disease, department}` records, embeds every text, writes
//! the LanceDB disease table and the corpus metadata file the serving
//! path loads at warm-up. Both artifacts come from the same pass so
//! their id spaces stay aligned.

use std::env;
use std::fs;

use serde_json::json;
use tracing::info;

use triage_core::config::{expand_path, TriageConfig};
use triage_embed::get_default_embedder;
use triage_index::{LanceIndexWriter, SourceRecord};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = TriageConfig::load()?;

    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    let Some(source_path) = args.first() else {
        eprintln!("Usage: {prog} <source_corpus.json>");
        std::process::exit(1);
    };
    let source_path = expand_path(source_path);

    let raw = fs::read_to_string(&source_path)?;
    let records: Vec<SourceRecord> = serde_json::from_str(&raw)?;
    info!(records = records.len(), source = %source_path.display(), "source corpus loaded");

    let embedder = get_default_embedder(config.models.embedding_dim)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let writer = LanceIndexWriter::connect(
            &expand_path(&config.data.lancedb_index_dir),
            &config.data.lancedb_table,
            config.models.embedding_dim,
        )
        .await?;
        writer.rebuild(&records, embedder.as_ref()).await
    })?;

    // Metadata arrays in the same order the ids were assigned
    let metadata = json!({
        "texts": records.iter().map(|r| r.text.as_str()).collect::<Vec<_>>(),
        "diseases": records.iter().map(|r| r.disease.as_str()).collect::<Vec<_>>(),
        "departments": records.iter().map(|r| r.department.as_str()).collect::<Vec<_>>(),
    });
    let metadata_path = expand_path(&config.data.corpus_metadata);
    if let Some(parent) = metadata_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&metadata_path, serde_json::to_string_pretty(&metadata)?)?;
    info!(path = %metadata_path.display(), "corpus metadata written");

    println!("Indexed {} records into {}", records.len(), config.data.lancedb_index_dir);
    Ok(())
}
