//! Core types: documents, chunks, and conversation state

pub mod chat;
pub mod document;
pub mod response;

pub use chat::{ConversationTurn, Role, Transcript};
pub use document::{Chunk, FileKind, Segment, SourceFile, UploadedFile};
