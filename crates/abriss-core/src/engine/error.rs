use thiserror::Error;

use crate::core::io::fasta::FastaError;
use crate::core::store::StoreError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No features found for sequence '{identifier}'")]
    Resolution { identifier: String },

    #[error("Conflicting features for sequence '{identifier}': {message}")]
    FeatureConflict { identifier: String, message: String },

    #[error("Duplicate sequence identifier '{identifier}' in input")]
    DuplicateIdentifier { identifier: String },

    #[error("Backend '{backend}' failed: {message}")]
    Backend { backend: String, message: String },

    #[error("Feature table error: {0}")]
    FeatureTable(#[from] csv::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Fasta(#[from] FastaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
