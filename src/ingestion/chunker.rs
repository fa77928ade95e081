//! Recursive character chunking with source propagation

use crate::types::document::{Chunk, Segment};

/// Separator priority: paragraph, line, word, character
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Recursive character splitter.
///
/// Splits text on the first separator present in the priority list,
/// recurses into oversized pieces with the remaining separators, then
/// greedily merges adjacent pieces back up to `chunk_size` characters.
/// Separators are kept and nothing is trimmed, so with `chunk_overlap = 0`
/// concatenating the chunks of a text reproduces it exactly. Sizes are
/// measured in characters and all cuts respect UTF-8 boundaries.
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a chunker. `chunk_size` is clamped to at least 1 and the
    /// overlap must leave room for new content in every chunk.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    /// Chunk every segment, in order. Each chunk inherits its segment's
    /// source unchanged.
    pub fn split_segments(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for segment in segments {
            for piece in self.split_text(&segment.text) {
                chunks.push(Chunk::new(piece, segment.source.clone()));
            }
        }
        chunks
    }

    /// Split one text into chunks of at most `chunk_size` characters
    pub fn split_text(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, &DEFAULT_SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        // First separator in the priority list that occurs in the text;
        // the empty separator always applies.
        let Some(sep_idx) = separators
            .iter()
            .position(|s| s.is_empty() || text.contains(s))
        else {
            return self.split_fixed(text);
        };
        let separator = separators[sep_idx];
        if separator.is_empty() {
            return self.split_fixed(text);
        }
        let remaining = &separators[sep_idx + 1..];

        let mut final_chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for part in split_keep_separator(text, separator) {
            if char_len(part) <= self.chunk_size {
                pending.push(part.to_string());
            } else {
                // Flush accumulated small parts before descending, so the
                // output stays in document order.
                if !pending.is_empty() {
                    final_chunks.extend(self.merge(std::mem::take(&mut pending)));
                }
                final_chunks.extend(self.split_recursive(part, remaining));
            }
        }

        if !pending.is_empty() {
            final_chunks.extend(self.merge(pending));
        }

        final_chunks
    }

    /// Greedily merge adjacent pieces (each already within bounds) up to
    /// `chunk_size`, carrying `chunk_overlap` trailing characters of each
    /// emitted chunk into the next one.
    fn merge(&self, pieces: Vec<String>) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_len = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);

            if current_len > 0 && current_len + piece_len > self.chunk_size {
                let emitted = std::mem::take(&mut current);
                current_len = 0;

                if self.chunk_overlap > 0 {
                    // Borrow only as much overlap as the next chunk can hold.
                    let budget = self.chunk_size.saturating_sub(piece_len);
                    let keep = self.chunk_overlap.min(budget);
                    if keep > 0 {
                        let tail = char_tail(&emitted, keep);
                        current_len = char_len(tail);
                        current = tail.to_string();
                    }
                }

                chunks.push(emitted);
            }

            current.push_str(&piece);
            current_len += piece_len;
        }

        if current_len > 0 {
            chunks.push(current);
        }

        chunks
    }

    /// Character-level fallback: fixed windows sliding by
    /// `chunk_size - chunk_overlap` characters.
    fn split_fixed(&self, text: &str) -> Vec<String> {
        let stride = self.chunk_size - self.chunk_overlap;
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let total = offsets.len();

        let mut out = Vec::new();
        let mut start = 0;
        while start < total {
            let end = (start + self.chunk_size).min(total);
            let byte_start = offsets[start];
            let byte_end = if end == total { text.len() } else { offsets[end] };
            out.push(text[byte_start..byte_end].to_string());
            if end == total {
                break;
            }
            start += stride;
        }
        out
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Last `n` characters of `s`, on a UTF-8 boundary
fn char_tail(s: &str, n: usize) -> &str {
    let len = char_len(s);
    if n >= len {
        return s;
    }
    match s.char_indices().nth(len - n) {
        Some((byte, _)) => &s[byte..],
        None => s,
    }
}

/// Split on `sep`, keeping the separator attached to the preceding piece
fn split_keep_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut search = 0;

    while let Some(pos) = text[search..].find(sep) {
        let end = search + pos + sep.len();
        parts.push(&text[start..end]);
        start = end;
        search = end;
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}
