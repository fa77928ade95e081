//! File upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::session::IngestOutcome;
use crate::types::document::{FileKind, UploadedFile};
use crate::types::response::{FileSummary, SkippedFile, UploadError, UploadResponse};

/// POST /api/sessions/:id/files - Upload and ingest files
///
/// Files are processed independently: one undecodable or malformed file is
/// reported in `errors` without aborting the rest of the batch.
pub async fn upload_files(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let session = state.session(&id)?;
    let mut session = session.lock().await;

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();
    let mut total_chunks = 0usize;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::internal(format!("Failed to read multipart field: {e}")))?
    {
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("file_{}", Uuid::new_v4()));
        let content_type = field.content_type().map(|s| s.to_string());

        let data = match field.bytes().await {
            Ok(d) => d,
            Err(e) => {
                errors.push(UploadError {
                    filename,
                    error: format!("Failed to read file: {e}"),
                });
                continue;
            }
        };

        tracing::info!("Processing file: {} ({} bytes)", filename, data.len());

        let Some(kind) = FileKind::detect(content_type.as_deref(), &filename) else {
            errors.push(UploadError {
                error: Error::UnsupportedFileType(filename.clone()).to_string(),
                filename,
            });
            continue;
        };

        let file = UploadedFile::new(filename.clone(), kind, data.to_vec());
        match session.ingest(&file, state.chunker()) {
            Ok(IngestOutcome::Ingested(record)) => {
                total_chunks += record.chunks;
                files.push(FileSummary::from(&record));
            }
            Ok(IngestOutcome::Duplicate { filename, original }) => {
                tracing::info!("Skipped '{}': duplicate of '{}'", filename, original);
                skipped.push(SkippedFile {
                    filename,
                    reason: format!("duplicate of '{original}'"),
                });
            }
            Err(e) => {
                tracing::error!("Failed to ingest {}: {}", filename, e);
                errors.push(UploadError {
                    filename,
                    error: e.to_string(),
                });
            }
        }
    }

    let processing_time_ms = start.elapsed().as_millis() as u64;

    Ok(Json(UploadResponse {
        success: !files.is_empty(),
        files,
        skipped,
        errors,
        total_chunks_created: total_chunks,
        processing_time_ms,
    }))
}
