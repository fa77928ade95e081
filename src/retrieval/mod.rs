//! Similarity retrieval over the session corpus

mod index;

pub use index::{CorpusIndex, SearchHit};
