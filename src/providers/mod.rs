//! Provider abstractions for embeddings and chat completion
//!
//! Both external services sit behind traits so the pipeline can be
//! exercised with deterministic mocks in tests.

pub mod azure;
pub mod embedding;
pub mod llm;

#[cfg(test)]
pub(crate) mod mock;

pub use azure::AzureOpenAiClient;
pub use embedding::EmbeddingProvider;
pub use llm::ChatProvider;
