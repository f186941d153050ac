//! HTTP client for the Zemberek morphological analysis service.
//!
//! Request/response shapes mirror Zemberek's sentence analysis
//! contract: one result per recognized word, each carrying the best
//! analysis with its lemma list.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use triage_core::traits::Lemmatizer;

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    sentence: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    results: Vec<WordAnalysis>,
}

#[derive(Deserialize)]
struct WordAnalysis {
    best: Option<BestAnalysis>,
}

#[derive(Deserialize)]
struct BestAnalysis {
    #[serde(default)]
    lemmas: Vec<String>,
}

pub struct ZemberekClient {
    client: Client,
    endpoint: String,
}

impl ZemberekClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().build()?;
        let endpoint = format!("{}/analyze_sentence", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }
}

impl Lemmatizer for ZemberekClient {
    fn lemmas(&self, sentence: &str) -> anyhow::Result<Vec<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { sentence })
            .send()?
            .error_for_status()?;
        let body: AnalyzeResponse = response.json()?;

        let mut lemmas = Vec::new();
        for word in body.results {
            if let Some(best) = word.best {
                // Zemberek reports "UNK" for words it cannot analyze;
                // those are omitted per the lemmatizer contract.
                lemmas.extend(best.lemmas.into_iter().filter(|l| l != "UNK"));
            }
        }
        debug!(count = lemmas.len(), "zemberek lemmas");
        Ok(lemmas)
    }
}
