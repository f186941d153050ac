//! Seams for the external collaborators. All methods are synchronous
//! blocking calls from the pipeline's perspective; timeout and retry
//! policy live on the other side of these traits.

/// Morphological analysis: one best lemma per recognized word, word
/// order preserved. Words without a recognized lemma are omitted.
pub trait Lemmatizer: Send + Sync {
    fn lemmas(&self, sentence: &str) -> anyhow::Result<Vec<String>>;
}

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Nearest-neighbour hit from the similarity index. `id` references the
/// corpus store's index space; `distance` is a non-negative
/// dissimilarity (squared L2 here).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub id: usize,
    pub distance: f32,
}

/// Similarity index over the corpus embeddings. No ordering guarantee
/// is assumed from implementations; the retriever re-sorts regardless.
pub trait VectorIndex: Send + Sync {
    fn search(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<IndexHit>>;
}

/// The hosted language model, reduced to "given prompts, return text".
pub trait Reasoner: Send + Sync {
    fn complete(&self, system: &str, user: &str, temperature: f32) -> anyhow::Result<String>;
}
