//! API response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chat::ConversationTurn;
use super::document::SourceFile;

/// Summary of one ingested file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: Uuid,
    pub filename: String,
    pub segments: usize,
    pub chunks: usize,
}

impl From<&SourceFile> for FileSummary {
    fn from(file: &SourceFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            segments: file.segments,
            chunks: file.chunks,
        }
    }
}

/// Per-file failure in an upload batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadError {
    pub filename: String,
    pub error: String,
}

/// Per-file skip (duplicate content) in an upload batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub filename: String,
    pub reason: String,
}

/// Response for POST /api/sessions/:id/files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// True when at least one file was ingested
    pub success: bool,
    /// Files ingested by this request
    pub files: Vec<FileSummary>,
    /// Files skipped as duplicates
    pub skipped: Vec<SkippedFile>,
    /// Files that failed, with reasons
    pub errors: Vec<UploadError>,
    /// Chunks created by this request
    pub total_chunks_created: usize,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// Request for POST /api/sessions/:id/ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
}

/// Response for POST /api/sessions/:id/ask
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer
    pub answer: String,
    /// Source filenames of the retrieved context chunks, best match first
    pub sources: Vec<String>,
    /// Number of turns in the transcript after this exchange
    pub transcript_len: usize,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// Response for session creation and lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub files: Vec<FileSummary>,
    pub transcript: Vec<ConversationTurn>,
}

/// Response for GET /api/sessions/:id/transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub turns: Vec<ConversationTurn>,
}
