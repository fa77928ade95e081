//! API routes for the chat server

pub mod ask;
pub mod files;
pub mod sessions;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id", get(sessions::get_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        .route("/sessions/:id/transcript", get(sessions::get_transcript))
        // File upload - with larger body limit for multipart uploads
        .route(
            "/sessions/:id/files",
            post(files::upload_files).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions
        .route("/sessions/:id/ask", post(ask::ask))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "filechat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document-grounded Q&A over uploaded text and PDF files",
        "endpoints": {
            "POST /api/sessions": "Create a chat session",
            "GET /api/sessions/:id": "Session summary (files and transcript)",
            "DELETE /api/sessions/:id": "Drop a session",
            "POST /api/sessions/:id/files": "Upload .txt/.pdf files (multipart)",
            "POST /api/sessions/:id/ask": "Ask a question about the uploaded files",
            "GET /api/sessions/:id/transcript": "Conversation transcript"
        },
        "features": {
            "grounded_answers": "The model answers only from retrieved document content",
            "per_file_isolation": "One bad file does not abort an upload batch",
            "index_reuse": "The corpus is re-embedded only when the upload set changes"
        }
    }))
}
