//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Submit a fully-rendered prompt and return the generated text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// The model/deployment being used
    fn model(&self) -> &str;
}
