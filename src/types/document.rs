//! Uploaded files, extracted segments, and retrieval chunks

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Supported file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Plain text file
    Text,
    /// PDF document
    Pdf,
}

impl FileKind {
    /// Detect the kind from the multipart part's MIME type, falling back
    /// to the filename extension. Returns None for anything else.
    pub fn detect(content_type: Option<&str>, filename: &str) -> Option<Self> {
        if let Some(mime) = content_type {
            let mime = mime.split(';').next().unwrap_or(mime).trim();
            match mime {
                "application/pdf" => return Some(Self::Pdf),
                "text/plain" => return Some(Self::Text),
                _ => {}
            }
        }

        let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Text),
            _ => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "Text File",
            Self::Pdf => "PDF",
        }
    }
}

/// A file as received from one upload request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as uploaded
    pub filename: String,
    /// Detected kind
    pub kind: FileKind,
    /// Raw bytes
    pub data: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, kind: FileKind, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            kind,
            data,
        }
    }

    /// Content hash over the raw bytes, used for duplicate detection
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.data);
        format!("{:x}", hasher.finalize())
    }
}

/// A unit of extracted text tagged with its source filename.
///
/// PDF files yield one segment per page; text files yield exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Extracted text
    pub text: String,
    /// Originating filename
    pub source: String,
}

impl Segment {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
        }
    }
}

/// A bounded-length slice of a segment, the unit of embedding and retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub text: String,
    /// Originating filename, inherited from the parent segment
    pub source: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            source: source.into(),
        }
    }
}

/// Registry record for a file ingested into a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Unique file ID
    pub id: Uuid,
    /// Filename as uploaded
    pub filename: String,
    /// Detected kind
    pub kind: FileKind,
    /// Content hash of the raw bytes
    pub content_hash: String,
    /// Number of segments the loader produced
    pub segments: usize,
    /// Number of chunks the chunker produced
    pub chunks: usize,
    /// Ingestion timestamp
    pub ingested_at: chrono::DateTime<chrono::Utc>,
}

impl SourceFile {
    pub fn new(
        filename: String,
        kind: FileKind,
        content_hash: String,
        segments: usize,
        chunks: usize,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename,
            kind,
            content_hash,
            segments,
            chunks,
            ingested_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_mime_type() {
        assert_eq!(
            FileKind::detect(Some("application/pdf"), "notes.txt"),
            Some(FileKind::Pdf)
        );
        assert_eq!(
            FileKind::detect(Some("text/plain; charset=utf-8"), "report.pdf"),
            Some(FileKind::Text)
        );
    }

    #[test]
    fn detect_falls_back_to_extension() {
        assert_eq!(FileKind::detect(None, "report.PDF"), Some(FileKind::Pdf));
        assert_eq!(FileKind::detect(None, "notes.txt"), Some(FileKind::Text));
        assert_eq!(
            FileKind::detect(Some("application/octet-stream"), "notes.txt"),
            Some(FileKind::Text)
        );
    }

    #[test]
    fn detect_rejects_unknown_types() {
        assert_eq!(FileKind::detect(None, "slides.pptx"), None);
        assert_eq!(FileKind::detect(Some("image/png"), "photo"), None);
    }

    #[test]
    fn content_hash_is_stable_per_content() {
        let a = UploadedFile::new("a.txt", FileKind::Text, b"same bytes".to_vec());
        let b = UploadedFile::new("b.txt", FileKind::Text, b"same bytes".to_vec());
        let c = UploadedFile::new("c.txt", FileKind::Text, b"other bytes".to_vec());
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }
}
