//! Store error model.

use std::path::PathBuf;

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error("failed to open ledger database at {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A persisted record no longer decodes.
    #[error("record `{key}` is corrupt: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode record `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("quotation number sequence exhausted")]
    SequenceExhausted,
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Why an import was refused. The ledger is unchanged in every case except
/// [`ImportError::Store`], where a backend write failed part-way.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import data is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("import data must be a JSON object")]
    NotAnObject,

    #[error("import data has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
