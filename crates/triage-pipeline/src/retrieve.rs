//! Hybrid retrieval: vector similarity fused with lexical token
//! overlap into one ranked list.

use std::collections::BTreeSet;

use tracing::warn;

use triage_core::error::{Error, Result, Stage};
use triage_core::traits::{Embedder, Lemmatizer, VectorIndex};
use triage_core::types::{CorpusStore, RetrievalResult, ScoreWeights};
use triage_text::normalize::{normalize, token_overlap};

pub struct Retriever<'a> {
    pub corpus: &'a CorpusStore,
    pub index: &'a dyn VectorIndex,
    pub embedder: &'a dyn Embedder,
    pub lemmatizer: &'a dyn Lemmatizer,
    pub stopwords: &'a BTreeSet<String>,
}

impl Retriever<'_> {
    /// Returns at most `k` results, sorted non-increasing by
    /// `final_score`; ties keep the index-search order (stable sort).
    pub fn retrieve(
        &self,
        query: &str,
        k: usize,
        weights: ScoreWeights,
    ) -> Result<Vec<RetrievalResult>> {
        let vector = self
            .embedder
            .embed(query)
            .map_err(|e| Error::unavailable(Stage::Embedding, e))?;
        let hits = self
            .index
            .search(&vector, k)
            .map_err(|e| Error::unavailable(Stage::Index, e))?;

        let query_tokens = normalize(self.lemmatizer, query, self.stopwords)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(record) = self.corpus.get(hit.id) else {
                // Stale or mismatched index; degrade, don't crash.
                warn!(id = hit.id, corpus = self.corpus.len(), "index id beyond corpus, dropped");
                continue;
            };
            let doc_tokens = normalize(self.lemmatizer, record.text, self.stopwords)?;
            // Bounded in (0, 1], positive without a zero guard.
            let similarity = 1.0 / (1.0 + hit.distance);
            let overlap = token_overlap(&query_tokens, &doc_tokens);
            let final_score = weights.semantic * similarity + weights.overlap * overlap;
            results.push(RetrievalResult {
                text: record.text.to_string(),
                disease: record.disease.to_string(),
                department: record.department.to_string(),
                similarity,
                overlap,
                final_score,
            });
        }

        results.sort_by(|a, b| {
            b.final_score.partial_cmp(&a.final_score).unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }
}
