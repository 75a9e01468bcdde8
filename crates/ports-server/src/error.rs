//! Server-specific error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ports_ingest::IngestError;
use thiserror::Error;

/// Errors a handler can return
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Ingestion failed: {0}")]
    Ingest(#[from] IngestError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Callers only learn success or failure; the details go to the log.
        match self {
            AppError::Ingest(ref e) => {
                tracing::error!(error = %e, "Error handling request");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ingest_errors_are_opaque_500s() {
        let err = AppError::from(IngestError::SourceNotFound {
            path: PathBuf::from("/secret/location/ports.json"),
        });

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
