use std::collections::BTreeSet;

use triage_core::config::Disambiguation;
use triage_core::error::Error;
use triage_core::traits::{Lemmatizer, Reasoner};
use triage_core::types::{CorpusStore, ReasonerAnswer};
use triage_embed::FakeEmbedder;
use triage_index::FlatMemoryIndex;
use triage_pipeline::{Pipeline, PipelineParams};
use triage_text::SymptomExtractor;

struct EchoLemmatizer;

impl Lemmatizer for EchoLemmatizer {
    fn lemmas(&self, sentence: &str) -> anyhow::Result<Vec<String>> {
        Ok(sentence.split_whitespace().map(str::to_string).collect())
    }
}

/// Returns a fixed reply regardless of the prompts.
struct FixedReasoner(&'static str);

impl Reasoner for FixedReasoner {
    fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> anyhow::Result<String> {
        Ok(self.0.to_string())
    }
}

struct FailingReasoner;

impl Reasoner for FailingReasoner {
    fn complete(&self, _system: &str, _user: &str, _temperature: f32) -> anyhow::Result<String> {
        anyhow::bail!("timeout")
    }
}

const TEXTS: [&str; 2] = [
    "baş ağrısı, mide bulantısı",
    "öksürük, ateş, boğaz ağrısı",
];

fn pipeline(reasoner: Option<Box<dyn Reasoner>>) -> Pipeline {
    let texts: Vec<String> = TEXTS.iter().map(|s| (*s).to_string()).collect();
    let corpus = CorpusStore::new(
        texts.clone(),
        vec!["Migren".into(), "Grip".into()],
        vec!["Nöroloji".into(), "Enfeksiyon Hastalıkları".into()],
    )
    .expect("corpus");

    let embedder = FakeEmbedder::new(32);
    let index = FlatMemoryIndex::from_texts(&embedder, &texts).expect("index");

    let stopwords: BTreeSet<String> =
        ["ve", "var"].iter().map(|s| (*s).to_string()).collect();
    let mappings = vec![
        ("baş ağr".to_string(), "baş ağrısı".to_string()),
        ("mide bulant".to_string(), "mide bulantısı".to_string()),
    ];
    let extractor =
        SymptomExtractor::new(mappings, &Disambiguation::default(), stopwords.clone());

    Pipeline::new(
        corpus,
        Box::new(index),
        Box::new(FakeEmbedder::new(32)),
        Box::new(EchoLemmatizer),
        reasoner,
        extractor,
        stopwords,
        PipelineParams::default(),
    )
}

#[test]
fn retrieval_only_request_returns_docs_and_symptoms() {
    let pipeline = pipeline(None);
    let response = pipeline.ask("Başım ağrıyor ve midem bulanıyor", true).expect("ask");

    assert!(response.answer.is_none());
    assert_eq!(response.normalized_symptoms[0], "baş ağrısı");
    assert!(!response.retrieved_docs.is_empty());
}

#[test]
fn confident_match_clears_proposed_questions() {
    let reply = r#"{
        "patient_symptoms": ["baş ağrısı", "mide bulantısı"],
        "departments": ["Nöroloji"],
        "symptoms_to_ask": ["ışığa hassasiyet", "kusma"],
        "disease_probabilities": [{"disease": "Migren", "probability": 0.9}],
        "explanation": "Migren ile uyumlu."
    }"#;
    let pipeline = pipeline(Some(Box::new(FixedReasoner(reply))));

    // The extracted query reproduces corpus record 0 exactly, so the
    // top result scores 1.0 and the gate fires.
    let response = pipeline.ask("baş ağrısı ve mide bulantısı var", false).expect("ask");

    assert!(response.should_skip_questions);
    match response.answer.expect("answer") {
        ReasonerAnswer::Parsed(d) => {
            assert!(d.symptoms_to_ask.is_empty(), "gate decision overrides the reasoner");
            assert_eq!(d.departments, vec!["Nöroloji"]);
        }
        ReasonerAnswer::Unparsed(_) => panic!("expected parsed answer"),
    }
}

#[test]
fn reasoner_failure_degrades_to_retrieval_only() {
    let pipeline = pipeline(Some(Box::new(FailingReasoner)));
    let response = pipeline.ask("Başım ağrıyor", false).expect("ask");

    assert!(response.answer.is_none());
    assert!(!response.retrieved_docs.is_empty());
}

#[test]
fn missing_reasoner_also_degrades() {
    let pipeline = pipeline(None);
    let response = pipeline.ask("Başım ağrıyor", false).expect("ask");
    assert!(response.answer.is_none());
    assert!(!response.retrieved_docs.is_empty());
}

#[test]
fn stopword_only_input_fails_before_retrieval() {
    let pipeline = pipeline(None);
    let err = pipeline.ask("ve var", true).unwrap_err();
    assert!(matches!(err, Error::EmptyInput));
}
