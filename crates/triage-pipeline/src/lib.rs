//! triage-pipeline
//!
//! The request-scoped triage pipeline: symptom extraction -> hybrid
//! retrieval -> confidence gate -> optional diagnostic reasoner. All
//! read-only artifacts live in one immutable [`Pipeline`] built by a
//! warm-up phase; concurrent requests share it by reference without
//! coordination.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod context;
pub mod gate;
pub mod reasoner;
pub mod retrieve;

use std::collections::BTreeSet;

use tracing::{info, warn};

use triage_core::config::{expand_path, TriageConfig};
use triage_core::corpus::{load_corpus, load_stopwords, load_symptom_mappings};
use triage_core::error::{Error, Result};
use triage_core::traits::{Embedder, Lemmatizer, Reasoner, VectorIndex};
use triage_core::types::{
    CorpusStore, ReasonerAnswer, RetrievalResult, ScoreWeights, TriageResponse,
};
use triage_text::extract::{joined_query, SymptomExtractor};
use triage_text::ZemberekClient;

use crate::reasoner::{parse_answer, user_prompt, OpenAiReasoner, SYSTEM_PROMPT};
use crate::retrieve::Retriever;

/// Request-independent scalars of the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineParams {
    pub weights: ScoreWeights,
    pub retrieval_k: usize,
    pub confidence_threshold: f32,
    pub temperature: f32,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            retrieval_k: 5,
            confidence_threshold: 0.7,
            temperature: 0.2,
        }
    }
}

pub struct Pipeline {
    corpus: CorpusStore,
    index: Box<dyn VectorIndex>,
    embedder: Box<dyn Embedder>,
    lemmatizer: Box<dyn Lemmatizer>,
    reasoner: Option<Box<dyn Reasoner>>,
    extractor: SymptomExtractor,
    stopwords: BTreeSet<String>,
    params: PipelineParams,
}

impl Pipeline {
    /// Fully injected constructor; `warm_up` builds the production
    /// collaborators, tests substitute their own.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        corpus: CorpusStore,
        index: Box<dyn VectorIndex>,
        embedder: Box<dyn Embedder>,
        lemmatizer: Box<dyn Lemmatizer>,
        reasoner: Option<Box<dyn Reasoner>>,
        extractor: SymptomExtractor,
        stopwords: BTreeSet<String>,
        params: PipelineParams,
    ) -> Self {
        Self { corpus, index, embedder, lemmatizer, reasoner, extractor, stopwords, params }
    }

    /// Explicit warm-up phase: load every read-only artifact and
    /// connect every collaborator before the first request. Any
    /// failure here is fatal and reported distinctly from per-request
    /// failures.
    pub fn warm_up(config: &TriageConfig) -> anyhow::Result<Self> {
        let corpus = load_corpus(&expand_path(&config.data.corpus_metadata))?;
        let mappings = load_symptom_mappings(&expand_path(&config.data.symptom_mappings))?;
        let stopwords = load_stopwords(&expand_path(&config.data.stopwords))?;

        let index = triage_index::LanceVectorIndex::open(
            &expand_path(&config.data.lancedb_index_dir),
            &config.data.lancedb_table,
        )?;
        let embedder = triage_embed::get_default_embedder(config.models.embedding_dim)?;
        let lemmatizer = ZemberekClient::new(&config.zemberek.url)?;

        let reasoner: Option<Box<dyn Reasoner>> =
            match OpenAiReasoner::new(&config.openai.base_url, &config.models.llm) {
                Ok(r) => Some(Box::new(r)),
                Err(e) => {
                    warn!(error = %e, "reasoner not configured, serving retrieval only");
                    None
                }
            };

        let extractor =
            SymptomExtractor::new(mappings, &config.disambiguation, stopwords.clone());

        info!(
            records = corpus.len(),
            k = config.parameters.retrieval_k,
            "pipeline warm-up complete"
        );
        Ok(Self::new(
            corpus,
            Box::new(index),
            embedder,
            Box::new(lemmatizer),
            reasoner,
            extractor,
            stopwords,
            PipelineParams {
                weights: config.weights(),
                retrieval_k: config.parameters.retrieval_k,
                confidence_threshold: config.parameters.confidence_threshold,
                temperature: config.parameters.temperature,
            },
        ))
    }

    fn retriever(&self) -> Retriever<'_> {
        Retriever {
            corpus: &self.corpus,
            index: self.index.as_ref(),
            embedder: self.embedder.as_ref(),
            lemmatizer: self.lemmatizer.as_ref(),
            stopwords: &self.stopwords,
        }
    }

    /// Run one symptom description through the whole pipeline.
    ///
    /// Reasoner failures degrade to a `None` answer: the ranked
    /// retrieval results are still valid and returned, partial success
    /// over total failure. Everything before the reasoner surfaces its
    /// error with the originating stage identified.
    pub fn ask(&self, symptoms_text: &str, skip_reasoner: bool) -> Result<TriageResponse> {
        let symptoms = self.extractor.extract(self.lemmatizer.as_ref(), symptoms_text)?;
        let query = joined_query(&symptoms);
        let docs =
            self.retriever().retrieve(&query, self.params.retrieval_k, self.params.weights)?;
        let should_skip = gate::decide(&docs, self.params.confidence_threshold);

        let answer = if skip_reasoner {
            None
        } else {
            match self.consult_reasoner(&docs, &query) {
                Ok(mut answer) => {
                    // The gate's decision takes precedence over whatever
                    // follow-up questions the reasoner proposed.
                    if should_skip {
                        if let ReasonerAnswer::Parsed(diagnosis) = &mut answer {
                            diagnosis.symptoms_to_ask.clear();
                        }
                    }
                    Some(answer)
                }
                Err(e) => {
                    warn!(error = %e, "reasoner stage failed, returning retrieval-only response");
                    None
                }
            }
        };

        Ok(TriageResponse {
            answer,
            retrieved_docs: docs,
            normalized_symptoms: symptoms,
            should_skip_questions: should_skip,
        })
    }

    fn consult_reasoner(&self, docs: &[RetrievalResult], query: &str) -> Result<ReasonerAnswer> {
        let reasoner = self.reasoner.as_deref().ok_or_else(|| {
            Error::unavailable(
                triage_core::error::Stage::Reasoner,
                "no reasoner configured (OPENAI_API_TOKEN not set)",
            )
        })?;
        let rendered = context::format_context(docs);
        let prompt = user_prompt(&rendered, query);
        let reply = reasoner
            .complete(SYSTEM_PROMPT, &prompt, self.params.temperature)
            .map_err(|e| Error::unavailable(triage_core::error::Stage::Reasoner, e))?;
        Ok(parse_answer(&reply))
    }
}
