//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::response::{FileSummary, SessionResponse, TranscriptResponse};

/// POST /api/sessions - Create a new chat session
pub async fn create_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(state.create_session())
}

/// GET /api/sessions/:id - Session summary
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    let session = state.session(&id)?;
    let session = session.lock().await;

    Ok(Json(SessionResponse {
        id: session.id,
        created_at: session.created_at,
        files: session.files().iter().map(FileSummary::from).collect(),
        transcript: session.transcript.turns().to_vec(),
    }))
}

/// DELETE /api/sessions/:id - Drop a session
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.remove_session(&id)?;
    tracing::info!("Deleted session {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/sessions/:id/transcript - Ordered conversation turns
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>> {
    let session = state.session(&id)?;
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        turns: session.transcript.turns().to_vec(),
    }))
}
