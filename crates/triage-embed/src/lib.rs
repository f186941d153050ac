//! triage-embed
//!
//! Local sentence embeddings for the retrieval pipeline. The real
//! embedder runs a multilingual-e5 checkpoint (XLM-RoBERTa
//! architecture) through candle with masked mean pooling; a
//! hash-based fake embedder is available for tests and offline runs
//! via `APP_USE_FAKE_EMBEDDINGS=1`.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod device;
pub mod pool;
pub mod tokenize;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;
use tracing::{info, warn};

use triage_core::traits::Embedder;

const MAX_LEN: usize = 256;

pub struct E5Embedder {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
}

impl E5Embedder {
    pub fn new() -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir()?;
        info!(dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
        let dim = config.hidden_size;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> =
            weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        info!(dim, "embedding model ready");
        Ok(Self { model, tokenizer, device, dim })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize::tokenize_on_device(&self.tokenizer, text, MAX_LEN, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_LEN), DType::I64, &self.device)?;
        let hidden =
            self.model.forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;
        let pooled = pool::masked_mean_l2(&hidden, &attention_mask)?;
        let vector: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if vector.len() != self.dim {
            return Err(anyhow!("embedding dim {} != model dim {}", vector.len(), self.dim));
        }
        Ok(vector)
    }
}

impl Embedder for E5Embedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_one(text)
    }
}

/// Deterministic hash-bucket embedder: stable across runs, L2
/// normalized, identical texts embed identically. Good enough for
/// tests and wiring checks, useless for real similarity.
pub struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Build the embedder for `expected_dim`. `APP_USE_FAKE_EMBEDDINGS=1`
/// substitutes the hash embedder; otherwise the model is loaded and
/// must agree with the dimension the index was built with.
pub fn get_default_embedder(expected_dim: usize) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        warn!("using FakeEmbedder");
        return Ok(Box::new(FakeEmbedder::new(expected_dim)));
    }
    let model = E5Embedder::new()?;
    if model.dim() != expected_dim {
        return Err(anyhow!(
            "model dim {} does not match configured embedding_dim {}",
            model.dim(),
            expected_dim
        ));
    }
    Ok(Box::new(model))
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("APP_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    let default = Path::new("models/multilingual-e5-base");
    if default.exists() {
        return Ok(default.to_path_buf());
    }
    Err(anyhow!(
        "Could not locate embedding model directory (set APP_MODEL_DIR or place the checkpoint under models/multilingual-e5-base)"
    ))
}
