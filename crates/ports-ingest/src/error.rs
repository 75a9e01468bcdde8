//! Ingestion error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ingestion runs
pub type IngestResult<T> = std::result::Result<T, IngestError>;

/// Result type alias for store lookups
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors produced while reading a ports document into the store
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("ports file does not exist: {}", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("error opening ports file {}: {source}", path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading ports file: {source}")]
    SourceRead {
        #[source]
        source: std::io::Error,
    },

    #[error("error decoding ports JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("port consumer hung up before the document was fully read")]
    ConsumerClosed,

    #[error("ingestion task failed: {0}")]
    Task(String),

    /// Stage context wrapped around a reader failure
    #[error("reading ports: {source}")]
    Read {
        #[source]
        source: Box<IngestError>,
    },
}

impl IngestError {
    /// The underlying failure with any stage context removed
    pub fn root(&self) -> &IngestError {
        match self {
            IngestError::Read { source } => source.root(),
            other => other,
        }
    }
}

/// Store lookup failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("port not found: {0}")]
    NotFound(String),
}

/// Construction-time errors: missing collaborators or settings
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("file path is required for FileReader")]
    NoFilePath,

    #[error("a port source is required")]
    NoSource,

    #[error("a port repository is required")]
    NoRepository,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_stage_context() {
        let err = IngestError::Read {
            source: Box::new(IngestError::SourceNotFound {
                path: PathBuf::from("ports.json"),
            }),
        };

        assert!(matches!(err.root(), IngestError::SourceNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "reading ports: ports file does not exist: ports.json"
        );
    }

    #[test]
    fn test_root_of_unwrapped_error_is_itself() {
        let err = IngestError::ConsumerClosed;
        assert!(matches!(err.root(), IngestError::ConsumerClosed));
    }
}
