//! Error types for the tabfit-ml crate.

use thiserror::Error;

/// Top-level error type for ML operations.
#[derive(Debug, Error)]
pub enum MlError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Unknown label: {0:?} was not seen when the encoder was fitted")]
    UnknownLabel(String),

    #[error("Unknown code: {code} is outside the encoder vocabulary of {n_classes} classes")]
    UnknownCode { code: usize, n_classes: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("K-means error: {0}")]
    KMeans(#[from] linfa_clustering::KMeansError),

    #[error("Nearest-neighbour query error: {0}")]
    NearestNeighbour(#[from] linfa_nn::NnError),

    #[error("Nearest-neighbour index error: {0}")]
    IndexBuild(#[from] linfa_nn::BuildError),
}

impl MlError {
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    pub fn missing_column(name: impl Into<String>) -> Self {
        Self::MissingColumn(name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<figment::Error> for MlError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}
