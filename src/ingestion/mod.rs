//! Document ingestion: loading uploaded files and chunking their text

mod chunker;
mod loader;

pub use chunker::{RecursiveChunker, DEFAULT_SEPARATORS};
pub use loader::DocumentLoader;
