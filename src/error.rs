//! Error types for the chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for filechat operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chat service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Required environment configuration is absent
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    /// Text file is not valid UTF-8
    #[error("File '{filename}' is not valid UTF-8 text")]
    Decoding { filename: String },

    /// PDF could not be parsed
    #[error("Failed to load '{filename}': {message}")]
    Load { filename: String, message: String },

    /// File is neither text nor PDF
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Question submitted before any file was uploaded
    #[error("No documents uploaded; upload at least one file before asking")]
    NoDocuments,

    /// Files were uploaded but produced no indexable text
    #[error("Uploaded documents contain no indexable text")]
    EmptyCorpus,

    /// Unknown session id
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Embedding service failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Chat completion service failure
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a load error for a file
    pub fn load(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::MissingConfiguration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "missing_configuration",
                msg.clone(),
            ),
            Error::Decoding { .. } => (StatusCode::BAD_REQUEST, "decoding_error", self.to_string()),
            Error::Load { .. } => (StatusCode::BAD_REQUEST, "load_error", self.to_string()),
            Error::UnsupportedFileType(_) => {
                (StatusCode::BAD_REQUEST, "unsupported_type", self.to_string())
            }
            Error::NoDocuments => (StatusCode::CONFLICT, "no_documents", self.to_string()),
            Error::EmptyCorpus => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_corpus",
                self.to_string(),
            ),
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            Error::Embedding(msg) => (StatusCode::BAD_GATEWAY, "embedding_error", msg.clone()),
            Error::Generation(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "generation_error", msg.clone())
            }
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Json(err) => (StatusCode::BAD_REQUEST, "json_error", err.to_string()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
