//! Brute-force squared-L2 index over in-memory vectors. Backs tests
//! and small corpora where a LanceDB directory is overkill.

use anyhow::{anyhow, Result};

use triage_core::traits::{Embedder, IndexHit, VectorIndex};

pub struct FlatMemoryIndex {
    vectors: Vec<Vec<f32>>,
}

impl FlatMemoryIndex {
    pub fn new(vectors: Vec<Vec<f32>>) -> Self {
        Self { vectors }
    }

    pub fn from_texts(embedder: &dyn Embedder, texts: &[String]) -> Result<Self> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(embedder.embed(text)?);
        }
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

impl VectorIndex for FlatMemoryIndex {
    fn search(&self, vector: &[f32], k: usize) -> Result<Vec<IndexHit>> {
        if let Some(stored) = self.vectors.first() {
            if stored.len() != vector.len() {
                return Err(anyhow!(
                    "query dim {} does not match index dim {}",
                    vector.len(),
                    stored.len()
                ));
            }
        }
        let mut hits: Vec<IndexHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, stored)| IndexHit { id, distance: squared_l2(vector, stored) })
            .collect();
        hits.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }
}
