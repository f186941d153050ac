//! Domain types shared by the triage pipeline crates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Read-only corpus of disease descriptions, loaded once at startup.
///
/// Three parallel arrays indexed by the same dense 0-based id space
/// the vector index uses. `id < len()` always holds for stored records.
#[derive(Debug, Clone)]
pub struct CorpusStore {
    texts: Vec<String>,
    diseases: Vec<String>,
    departments: Vec<String>,
}

/// Borrowed view of one corpus entry.
#[derive(Debug, Clone, Copy)]
pub struct CorpusRecord<'a> {
    pub text: &'a str,
    pub disease: &'a str,
    pub department: &'a str,
}

impl CorpusStore {
    pub fn new(
        texts: Vec<String>,
        diseases: Vec<String>,
        departments: Vec<String>,
    ) -> Result<Self> {
        if texts.len() != diseases.len() || texts.len() != departments.len() {
            return Err(Error::Corpus(format!(
                "parallel array length mismatch: {} texts, {} diseases, {} departments",
                texts.len(),
                diseases.len(),
                departments.len()
            )));
        }
        Ok(Self { texts, diseases, departments })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// `None` for ids beyond the corpus bounds; callers drop those
    /// results instead of failing the request (stale index tolerance).
    pub fn get(&self, id: usize) -> Option<CorpusRecord<'_>> {
        if id >= self.texts.len() {
            return None;
        }
        Some(CorpusRecord {
            text: &self.texts[id],
            disease: &self.diseases[id],
            department: &self.departments[id],
        })
    }
}

/// One scored retrieval candidate. Derived per request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    pub disease: String,
    pub department: String,
    /// `1 / (1 + distance)`, always in `(0, 1]`.
    pub similarity: f32,
    /// Query-side token overlap, in `[0, 1]`.
    pub overlap: f32,
    pub final_score: f32,
}

/// Weights for the hybrid score fusion. Not forced to sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub semantic: f32,
    pub overlap: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { semantic: 0.7, overlap: 0.3 }
    }
}

/// Structured opinion from the diagnostic reasoner.
///
/// Every field defaults so a partially filled reply still parses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnosis {
    #[serde(default)]
    pub patient_symptoms: Vec<String>,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub symptoms_to_ask: Vec<String>,
    #[serde(default)]
    pub disease_probabilities: Vec<DiseaseProbability>,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseProbability {
    pub disease: String,
    pub probability: f32,
}

/// Reasoner output after the parse/repair step. Callers branch on the
/// tag, never on an error type; `Unparsed` carries the raw reply so
/// retrieval-only partial results stay useful.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReasonerAnswer {
    Parsed(Diagnosis),
    Unparsed(String),
}

/// Full pipeline output for one request.
#[derive(Debug, Clone, Serialize)]
pub struct TriageResponse {
    pub answer: Option<ReasonerAnswer>,
    pub retrieved_docs: Vec<RetrievalResult>,
    pub normalized_symptoms: Vec<String>,
    pub should_skip_questions: bool,
}
