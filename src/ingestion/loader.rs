//! Uploaded-file loader: text and PDF to source-tagged segments

use crate::error::{Error, Result};
use crate::types::document::{FileKind, Segment, UploadedFile};

/// Converts uploaded files into ordered, source-tagged text segments.
///
/// Text files decode to exactly one segment; PDFs yield one segment per
/// page. Parsing happens entirely in memory.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load one file into its segments
    pub fn load(file: &UploadedFile) -> Result<Vec<Segment>> {
        match file.kind {
            FileKind::Text => Self::load_text(file),
            FileKind::Pdf => Self::load_pdf(file),
        }
    }

    /// Load several files independently, concatenating their segments in
    /// upload order. The first failure aborts.
    pub fn load_all(files: &[UploadedFile]) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        for file in files {
            segments.extend(Self::load(file)?);
        }
        Ok(segments)
    }

    fn load_text(file: &UploadedFile) -> Result<Vec<Segment>> {
        let text = String::from_utf8(file.data.clone()).map_err(|_| Error::Decoding {
            filename: file.filename.clone(),
        })?;

        Ok(vec![Segment::new(text, &file.filename)])
    }

    fn load_pdf(file: &UploadedFile) -> Result<Vec<Segment>> {
        let pages = pdf_extract::extract_text_from_mem_by_pages(&file.data)
            .map_err(|e| Error::load(&file.filename, e.to_string()))?;

        tracing::debug!("Extracted {} page(s) from '{}'", pages.len(), file.filename);

        Ok(pages
            .into_iter()
            .map(|page| Segment::new(page, &file.filename))
            .collect())
    }
}
