//! Per-session context: upload registry, chunk corpus, lazy index, transcript
//!
//! A `Session` is created explicitly and passed to the pipeline; there is
//! no process-wide conversation state.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::{DocumentLoader, RecursiveChunker};
use crate::providers::EmbeddingProvider;
use crate::retrieval::CorpusIndex;
use crate::types::chat::Transcript;
use crate::types::document::{Chunk, SourceFile, UploadedFile};

/// Result of ingesting one file into a session
#[derive(Debug)]
pub enum IngestOutcome {
    /// File was loaded, chunked, and added to the corpus
    Ingested(SourceFile),
    /// Identical content already exists in this session
    Duplicate {
        filename: String,
        /// Filename of the earlier upload with the same content
        original: String,
    },
}

/// One chat session: the uploaded corpus and its conversation.
///
/// The corpus index is built lazily on the first question and reused until
/// the upload set changes (tracked by an order-sensitive fingerprint over
/// each file's name and content hash).
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub transcript: Transcript,
    files: Vec<SourceFile>,
    chunks: Vec<Chunk>,
    index: Option<CorpusIndex>,
    indexed_fingerprint: Option<String>,
}

impl Session {
    /// Create a session with a greeting transcript and no documents
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            transcript: Transcript::new(),
            files: Vec::new(),
            chunks: Vec::new(),
            index: None,
            indexed_fingerprint: None,
        }
    }

    /// Files ingested so far, in upload order
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// Whether at least one file has been ingested
    pub fn has_documents(&self) -> bool {
        !self.files.is_empty()
    }

    /// Total chunks in the corpus
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Load, chunk, and register one uploaded file.
    ///
    /// A file whose content hash already exists in the session is skipped
    /// as a duplicate. Loader failures propagate without touching the
    /// session.
    pub fn ingest(
        &mut self,
        file: &UploadedFile,
        chunker: &RecursiveChunker,
    ) -> Result<IngestOutcome> {
        let content_hash = file.content_hash();

        if let Some(existing) = self.files.iter().find(|f| f.content_hash == content_hash) {
            return Ok(IngestOutcome::Duplicate {
                filename: file.filename.clone(),
                original: existing.filename.clone(),
            });
        }

        let segments = DocumentLoader::load(file)?;
        let new_chunks = chunker.split_segments(&segments);

        let record = SourceFile::new(
            file.filename.clone(),
            file.kind,
            content_hash,
            segments.len(),
            new_chunks.len(),
        );

        tracing::info!(
            "Ingested '{}': {} segment(s), {} chunk(s)",
            file.filename,
            record.segments,
            record.chunks
        );

        self.chunks.extend(new_chunks);
        self.files.push(record.clone());

        Ok(IngestOutcome::Ingested(record))
    }

    /// Order-sensitive identity of the current upload set
    fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for file in &self.files {
            hasher.update(file.filename.as_bytes());
            hasher.update([0u8]);
            hasher.update(file.content_hash.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Return the corpus index, building it only when the upload set has
    /// changed since the last build.
    pub async fn ensure_index(
        &mut self,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<&CorpusIndex> {
        let fingerprint = self.fingerprint();
        let fresh = self.index.is_some()
            && self.indexed_fingerprint.as_deref() == Some(fingerprint.as_str());

        if !fresh {
            tracing::info!(
                "Building corpus index: {} chunk(s) from {} file(s)",
                self.chunks.len(),
                self.files.len()
            );
            let index = CorpusIndex::build(embedder, &self.chunks).await?;
            self.index = Some(index);
            self.indexed_fingerprint = Some(fingerprint);
        }

        self.index
            .as_ref()
            .ok_or_else(|| Error::internal("corpus index unavailable after build"))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
