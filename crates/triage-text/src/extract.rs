//! Dictionary-based symptom extraction.
//!
//! Maps free text to canonical symptom names via an ordered lookup
//! table, with a pain-descriptor disambiguation rule and a lemma
//! fallback when nothing in the table matches.

use std::collections::BTreeSet;

use tracing::debug;

use triage_core::config::Disambiguation;
use triage_core::error::{Error, Result};
use triage_core::traits::Lemmatizer;

use crate::normalize::{lemma_tokens, turkish_lowercase};

pub struct SymptomExtractor {
    entries: Vec<(String, String)>,
    generic: String,
    specific: BTreeSet<String>,
    stopwords: BTreeSet<String>,
}

impl SymptomExtractor {
    pub fn new(
        entries: Vec<(String, String)>,
        disambiguation: &Disambiguation,
        stopwords: BTreeSet<String>,
    ) -> Self {
        Self {
            entries,
            generic: disambiguation.generic.clone(),
            specific: disambiguation.specific.iter().cloned().collect(),
            stopwords,
        }
    }

    /// Extract canonical symptom names from `raw`. Never returns an
    /// empty list; if neither the table nor the lemma fallback yields
    /// anything the result is `EmptyInput` and retrieval must not run.
    ///
    /// Every table key is always evaluated; table order only controls
    /// first-seen deduplication, not match priority.
    pub fn extract(&self, lemmatizer: &dyn Lemmatizer, raw: &str) -> Result<Vec<String>> {
        let lowered = turkish_lowercase(raw);
        let lemmas = lemma_tokens(lemmatizer, raw, &self.stopwords)?;

        let mut found: Vec<String> = Vec::new();
        for (key, canonical) in &self.entries {
            let parts: Vec<&str> = key.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }
            // A multi-word key matches only if every part matches on
            // its own; parts may appear non-adjacently in the input.
            let matched = parts
                .iter()
                .all(|part| lowered.contains(part) || lemmas.iter().any(|l| l.contains(part)));
            if matched && !found.iter().any(|c| c == canonical) {
                found.push(canonical.clone());
            }
        }

        // A region-specific pain descriptor supersedes the generic one.
        if found.iter().any(|c| self.specific.contains(c)) {
            found.retain(|c| c != &self.generic);
        }

        if !found.is_empty() {
            debug!(symptoms = ?found, "dictionary extraction");
            return Ok(found);
        }

        // Degenerate "symptom list": the lemma tokens themselves,
        // first occurrence wins.
        let mut fallback: Vec<String> = Vec::new();
        for token in lemmas {
            if !fallback.contains(&token) {
                fallback.push(token);
            }
        }
        if fallback.is_empty() {
            return Err(Error::EmptyInput);
        }
        debug!(tokens = ?fallback, "lemma fallback extraction");
        Ok(fallback)
    }
}

/// Render the extracted symptoms as the retrieval query string.
pub fn joined_query(symptoms: &[String]) -> String {
    symptoms.join(", ")
}
