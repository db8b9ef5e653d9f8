use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown node `{0}`")]
    UnknownNode(String),

    #[error("unknown link `{0}`")]
    UnknownLink(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read model from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write model to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode model: {0}")]
    Encode(#[from] serde_json::Error),
}
