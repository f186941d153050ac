//! Startup loaders for the read-only artifacts: corpus metadata,
//! symptom mapping table, stopword list. All three are loaded exactly
//! once during warm-up and never mutated afterwards.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::CorpusStore;

/// On-disk shape of the corpus metadata produced by the offline
/// indexer: three parallel arrays sharing the index id space.
#[derive(Debug, Deserialize)]
struct CorpusMetadata {
    texts: Vec<String>,
    diseases: Vec<String>,
    departments: Vec<String>,
}

pub fn load_corpus(path: &Path) -> Result<CorpusStore> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Corpus(format!("read {}: {}", path.display(), e)))?;
    let meta: CorpusMetadata = serde_json::from_str(&raw)
        .map_err(|e| Error::Corpus(format!("parse {}: {}", path.display(), e)))?;
    let store = CorpusStore::new(meta.texts, meta.diseases, meta.departments)?;
    info!(records = store.len(), path = %path.display(), "corpus metadata loaded");
    Ok(store)
}

/// Load the symptom mapping table, preserving source order.
///
/// The file is a single JSON object; `serde_json`'s `preserve_order`
/// feature keeps the entry order, which matters for first-seen
/// deduplication downstream.
pub fn load_symptom_mappings(path: &Path) -> Result<Vec<(String, String)>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Corpus(format!("read {}: {}", path.display(), e)))?;
    let value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| Error::Corpus(format!("parse {}: {}", path.display(), e)))?;
    let object = value
        .as_object()
        .ok_or_else(|| Error::Corpus(format!("{}: expected a JSON object", path.display())))?;

    let mut entries = Vec::with_capacity(object.len());
    for (key, canonical) in object {
        let canonical = canonical.as_str().ok_or_else(|| {
            Error::Corpus(format!("{}: value for key {:?} is not a string", path.display(), key))
        })?;
        entries.push((key.clone(), canonical.to_string()));
    }
    if entries.is_empty() {
        return Err(Error::Corpus(format!("{}: empty symptom mapping table", path.display())));
    }
    info!(entries = entries.len(), "symptom mapping table loaded");
    Ok(entries)
}

/// Load the stopword list from a line-oriented text file; blank lines
/// are skipped, tokens are expected lowercase already.
pub fn load_stopwords(path: &Path) -> Result<BTreeSet<String>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| Error::Corpus(format!("read {}: {}", path.display(), e)))?;
    let stopwords: BTreeSet<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    info!(tokens = stopwords.len(), "stopword list loaded");
    Ok(stopwords)
}
