//! Configuration for the triage pipeline.
//!
//! Figment merges `config.toml` + `config.<env>.toml` (selected by
//! `RUST_ENV`) + `APP_*` environment variables into one typed
//! [`TriageConfig`]. Helpers expand `~` and `${VAR}` in user paths.

use std::env;
use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TriageConfig {
    #[serde(default)]
    pub data: DataPaths,
    #[serde(default)]
    pub models: Models,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub disambiguation: Disambiguation,
    #[serde(default)]
    pub zemberek: ZemberekConfig,
    #[serde(default)]
    pub openai: OpenAiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub corpus_metadata: String,
    pub lancedb_index_dir: String,
    pub lancedb_table: String,
    pub symptom_mappings: String,
    pub stopwords: String,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            corpus_metadata: "data/corpus_metadata.json".to_string(),
            lancedb_index_dir: "data/indexes/lancedb".to_string(),
            lancedb_table: "diseases".to_string(),
            symptom_mappings: "data/symptom_mappings.json".to_string(),
            stopwords: "data/stopwords_tr.txt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Models {
    /// Embedding dimension the index was built with; the embedder must
    /// agree or warm-up fails.
    pub embedding_dim: usize,
    pub llm: String,
}

impl Default for Models {
    fn default() -> Self {
        Self { embedding_dim: 768, llm: "gpt-4o-mini".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameters {
    pub retrieval_k: usize,
    pub semantic_weight: f32,
    pub overlap_weight: f32,
    pub temperature: f32,
    pub confidence_threshold: f32,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            retrieval_k: 5,
            semantic_weight: 0.7,
            overlap_weight: 0.3,
            temperature: 0.2,
            confidence_threshold: 0.7,
        }
    }
}

/// Region-specific pain descriptors supersede the generic catch-all
/// during symptom extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct Disambiguation {
    pub generic: String,
    pub specific: Vec<String>,
}

impl Default for Disambiguation {
    fn default() -> Self {
        Self {
            generic: "ağrı".to_string(),
            specific: [
                "baş ağrısı",
                "karın ağrısı",
                "göğüs ağrısı",
                "boğaz ağrısı",
                "eklem ağrısı",
                "kas ağrısı",
                "sırt ağrısı",
                "kulak ağrısı",
            ]
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZemberekConfig {
    pub url: String,
}

impl Default for ZemberekConfig {
    fn default() -> Self {
        Self { url: "http://localhost:6789".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self { base_url: "https://api.openai.com/v1".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 5000 }
    }
}

impl TriageConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config: TriageConfig = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.parameters.retrieval_k == 0 {
            return Err(Error::InvalidConfig("parameters.retrieval_k must be > 0".to_string()));
        }
        if self.parameters.semantic_weight < 0.0 || self.parameters.overlap_weight < 0.0 {
            return Err(Error::InvalidConfig("score weights must be non-negative".to_string()));
        }
        if self.models.embedding_dim == 0 {
            return Err(Error::InvalidConfig("models.embedding_dim must be > 0".to_string()));
        }
        Ok(())
    }

    pub fn weights(&self) -> crate::types::ScoreWeights {
        crate::types::ScoreWeights {
            semantic: self.parameters.semantic_weight,
            overlap: self.parameters.overlap_weight,
        }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
