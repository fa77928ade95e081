//! filechat: document-grounded Q&A chat over uploaded files
//!
//! Upload plain-text or PDF files into a session, ask natural-language
//! questions, and get answers grounded in the most similar passage. The
//! pipeline is load -> chunk -> embed -> index -> retrieve -> prompt ->
//! generate, with embeddings and generation served by Azure OpenAI
//! deployments and an in-memory cosine index per session.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod session;
pub mod types;

pub use config::ChatConfig;
pub use error::{Error, Result};
pub use session::Session;
pub use types::{
    chat::{ConversationTurn, Role, Transcript},
    document::{Chunk, FileKind, Segment, UploadedFile},
};
