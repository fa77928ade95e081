//! Azure OpenAI client for embeddings and chat completion, with retry

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::AzureConfig;
use crate::error::{Error, Result};

use super::embedding::EmbeddingProvider;
use super::llm::ChatProvider;

/// Client for one Azure OpenAI resource, covering both the embeddings and
/// the chat-completions deployments. Transient failures are retried with
/// exponential backoff up to `max_retries`.
pub struct AzureOpenAiClient {
    client: Client,
    config: AzureConfig,
}

#[derive(Serialize)]
struct EmbeddingsRequest {
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a new client. Fails with `MissingConfiguration` when the
    /// endpoint, key, or chat deployment is absent.
    pub fn new(config: &AzureConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder().pool_max_idle_per_host(5);
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.config.api_version
        )
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.config.max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| Error::internal("retry loop finished without a result")))
    }

    async fn request_embeddings(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let url = self.deployment_url(&self.config.embedding_deployment, "embeddings");
        let expected = texts.len();

        self.retry_request(|| {
            let url = url.clone();
            let input = texts.clone();
            let client = self.client.clone();
            let api_key = self.config.api_key.clone();

            async move {
                let response = client
                    .post(&url)
                    .header("api-key", api_key)
                    .json(&EmbeddingsRequest { input })
                    .send()
                    .await
                    .map_err(|e| Error::embedding(format!("request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::embedding(format!("HTTP {status} - {body}")));
                }

                let parsed: EmbeddingsResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::embedding(format!("invalid response: {e}")))?;

                if parsed.data.len() != expected {
                    return Err(Error::embedding(format!(
                        "expected {} embeddings, got {}",
                        expected,
                        parsed.data.len()
                    )));
                }

                // The service reports an index per item; restore input order.
                let mut data = parsed.data;
                data.sort_by_key(|d| d.index);
                Ok(data.into_iter().map(|d| d.embedding).collect())
            }
        })
        .await
    }
}

#[async_trait]
impl EmbeddingProvider for AzureOpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.request_embeddings(vec![text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::embedding("service returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.request_embeddings(texts.to_vec()).await
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

#[async_trait]
impl ChatProvider for AzureOpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.deployment_url(&self.config.chat_deployment, "chat/completions");

        tracing::info!("Generating answer with deployment: {}", self.config.chat_deployment);

        self.retry_request(|| {
            let url = url.clone();
            let prompt = prompt.to_string();
            let client = self.client.clone();
            let api_key = self.config.api_key.clone();
            let temperature = self.config.temperature;
            let max_tokens = self.config.max_tokens;

            async move {
                let request = ChatRequest {
                    messages: vec![ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    temperature,
                    max_tokens,
                };

                let response = client
                    .post(&url)
                    .header("api-key", api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::generation(format!("request failed: {e}")))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::generation(format!("HTTP {status} - {body}")));
                }

                let parsed: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::generation(format!("invalid response: {e}")))?;

                parsed
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .ok_or_else(|| Error::generation("service returned no choices"))
            }
        })
        .await
    }

    fn name(&self) -> &str {
        "azure-openai"
    }

    fn model(&self) -> &str {
        &self.config.chat_deployment
    }
}
