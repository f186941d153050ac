use std::fmt;

use thiserror::Error;

/// Pipeline stage that talks to an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lemmatization,
    Embedding,
    Index,
    Reasoner,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lemmatization => "lemmatization",
            Stage::Embedding => "embedding",
            Stage::Index => "index",
            Stage::Reasoner => "reasoner",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Corpus load failed: {0}")]
    Corpus(String),

    /// A collaborator was unreachable or answered with garbage.
    /// Never retried here; retry policy belongs to the caller.
    #[error("{stage} dependency unavailable: {detail}")]
    DependencyUnavailable { stage: Stage, detail: String },

    /// Normalization yielded zero usable tokens and there is nothing
    /// to fall back to. Retrieval must not run on an empty query.
    #[error("input contains no usable tokens")]
    EmptyInput,
}

impl Error {
    pub fn unavailable(stage: Stage, err: impl fmt::Display) -> Self {
        Error::DependencyUnavailable { stage, detail: err.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
