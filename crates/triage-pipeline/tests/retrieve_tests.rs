use std::collections::BTreeSet;

use triage_core::traits::Lemmatizer;
use triage_core::types::{CorpusStore, ScoreWeights};
use triage_embed::FakeEmbedder;
use triage_index::FlatMemoryIndex;
use triage_pipeline::retrieve::Retriever;

struct EchoLemmatizer;

impl Lemmatizer for EchoLemmatizer {
    fn lemmas(&self, sentence: &str) -> anyhow::Result<Vec<String>> {
        Ok(sentence.split_whitespace().map(str::to_string).collect())
    }
}

const TEXTS: [&str; 3] = [
    "baş ağrısı, mide bulantısı, ışığa hassasiyet",
    "öksürük, ateş, boğaz ağrısı",
    "karın ağrısı, ishal, kusma",
];

fn corpus() -> CorpusStore {
    CorpusStore::new(
        TEXTS.iter().map(|s| (*s).to_string()).collect(),
        vec!["Migren".into(), "Grip".into(), "Gastroenterit".into()],
        vec!["Nöroloji".into(), "Enfeksiyon Hastalıkları".into(), "Gastroenteroloji".into()],
    )
    .expect("corpus")
}

fn index(embedder: &FakeEmbedder, texts: &[&str]) -> FlatMemoryIndex {
    let texts: Vec<String> = texts.iter().map(|s| (*s).to_string()).collect();
    FlatMemoryIndex::from_texts(embedder, &texts).expect("index")
}

#[test]
fn self_match_ranks_first_with_full_overlap() {
    let embedder = FakeEmbedder::new(64);
    let corpus = corpus();
    let index = index(&embedder, &TEXTS);
    let stopwords = BTreeSet::new();
    let retriever = Retriever {
        corpus: &corpus,
        index: &index,
        embedder: &embedder,
        lemmatizer: &EchoLemmatizer,
        stopwords: &stopwords,
    };

    let results = retriever
        .retrieve(TEXTS[0], 3, ScoreWeights::default())
        .expect("retrieve");

    assert_eq!(results[0].disease, "Migren");
    assert!((results[0].overlap - 1.0).abs() < f32::EPSILON);
    assert!((results[0].similarity - 1.0).abs() < 1e-5);
}

#[test]
fn results_are_bounded_sorted_and_in_range() {
    let embedder = FakeEmbedder::new(64);
    let corpus = corpus();
    let index = index(&embedder, &TEXTS);
    let stopwords = BTreeSet::new();
    let retriever = Retriever {
        corpus: &corpus,
        index: &index,
        embedder: &embedder,
        lemmatizer: &EchoLemmatizer,
        stopwords: &stopwords,
    };

    let results = retriever
        .retrieve("ateş ve öksürük", 2, ScoreWeights::default())
        .expect("retrieve");

    assert!(results.len() <= 2);
    for pair in results.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score);
    }
    for r in &results {
        assert!(r.similarity > 0.0 && r.similarity <= 1.0);
        assert!((0.0..=1.0).contains(&r.overlap));
        let expected = 0.7 * r.similarity + 0.3 * r.overlap;
        assert!((r.final_score - expected).abs() < 1e-6);
    }
}

#[test]
fn weights_select_the_signal() {
    let embedder = FakeEmbedder::new(64);
    let corpus = corpus();
    let index = index(&embedder, &TEXTS);
    let stopwords = BTreeSet::new();
    let retriever = Retriever {
        corpus: &corpus,
        index: &index,
        embedder: &embedder,
        lemmatizer: &EchoLemmatizer,
        stopwords: &stopwords,
    };

    let semantic_only = retriever
        .retrieve("karın ağrısı, kusma", 3, ScoreWeights { semantic: 1.0, overlap: 0.0 })
        .expect("retrieve");
    for r in &semantic_only {
        assert!((r.final_score - r.similarity).abs() < 1e-6);
    }

    let overlap_only = retriever
        .retrieve("karın ağrısı, kusma", 3, ScoreWeights { semantic: 0.0, overlap: 1.0 })
        .expect("retrieve");
    for r in &overlap_only {
        assert!((r.final_score - r.overlap).abs() < 1e-6);
    }
}

#[test]
fn fused_score_is_monotone_in_both_signals() {
    let embedder = FakeEmbedder::new(64);
    let corpus = corpus();
    let index = index(&embedder, &TEXTS);
    let stopwords = BTreeSet::new();
    let retriever = Retriever {
        corpus: &corpus,
        index: &index,
        embedder: &embedder,
        lemmatizer: &EchoLemmatizer,
        stopwords: &stopwords,
    };

    // Querying with a record's own text makes that record dominate the
    // others on both similarity and overlap, so with positive weights
    // its fused score must be strictly larger.
    let results = retriever
        .retrieve(TEXTS[0], 3, ScoreWeights::default())
        .expect("retrieve");

    let top = &results[0];
    for other in &results[1..] {
        assert!(top.similarity >= other.similarity);
        assert!(top.overlap >= other.overlap);
        assert!(top.final_score > other.final_score);
    }
}

#[test]
fn out_of_range_index_ids_are_dropped_not_fatal() {
    let embedder = FakeEmbedder::new(64);
    // Index knows three records, corpus only two: a stale index
    let corpus = CorpusStore::new(
        vec![TEXTS[0].to_string(), TEXTS[1].to_string()],
        vec!["Migren".into(), "Grip".into()],
        vec!["Nöroloji".into(), "Enfeksiyon Hastalıkları".into()],
    )
    .expect("corpus");
    let index = index(&embedder, &TEXTS);
    let stopwords = BTreeSet::new();
    let retriever = Retriever {
        corpus: &corpus,
        index: &index,
        embedder: &embedder,
        lemmatizer: &EchoLemmatizer,
        stopwords: &stopwords,
    };

    let results = retriever
        .retrieve(TEXTS[2], 3, ScoreWeights::default())
        .expect("retrieve");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.disease != "Gastroenterit"));
}
