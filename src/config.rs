//! Configuration for the chat service

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Azure OpenAI configuration
    pub azure: AzureConfig,
}

impl ChatConfig {
    /// Build a configuration with the Azure section sourced from the
    /// environment and everything else at its defaults.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            azure: AzureConfig::from_env()?,
            ..Self::default()
        })
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between adjacent chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 150,
            chunk_overlap: 0,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks to retrieve per question
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 1 }
    }
}

/// Azure OpenAI configuration
///
/// Credentials and deployment names come from the environment; the rest
/// carries generation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Resource endpoint, e.g. "https://my-resource.openai.azure.com"
    pub endpoint: String,
    /// API key
    pub api_key: String,
    /// Chat completions deployment name
    pub chat_deployment: String,
    /// Embeddings deployment name
    pub embedding_deployment: String,
    /// API version query parameter
    pub api_version: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum tokens per answer (None = service default)
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds (None = transport default)
    pub timeout_secs: Option<u64>,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            chat_deployment: "gpt-4o".to_string(),
            embedding_deployment: "text-embedding-3-large".to_string(),
            api_version: "2023-06-01-preview".to_string(),
            temperature: 0.2,
            max_tokens: None,
            timeout_secs: None,
            max_retries: 2,
        }
    }
}

impl AzureConfig {
    /// Read the Azure configuration from the environment.
    ///
    /// `AZURE_OPENAI_API_KEY`, `AZURE_OPENAI_ENDPOINT`, and
    /// `AZURE_OPENAI_MODEL_DEPLOYMENT` are required; the embedding
    /// deployment and API version fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            api_key: require_env("AZURE_OPENAI_API_KEY")?,
            endpoint: require_env("AZURE_OPENAI_ENDPOINT")?,
            chat_deployment: require_env("AZURE_OPENAI_MODEL_DEPLOYMENT")?,
            embedding_deployment: std::env::var("AZURE_OPENAI_EMBEDDING_DEPLOYMENT")
                .unwrap_or_else(|_| defaults.embedding_deployment.clone()),
            api_version: std::env::var("AZURE_OPENAI_API_VERSION")
                .unwrap_or_else(|_| defaults.api_version.clone()),
            ..defaults
        })
    }

    /// Validate that the fields a client needs are present.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::MissingConfiguration(
                "AZURE_OPENAI_API_KEY".to_string(),
            ));
        }
        if self.endpoint.is_empty() {
            return Err(Error::MissingConfiguration(
                "AZURE_OPENAI_ENDPOINT".to_string(),
            ));
        }
        if self.chat_deployment.is_empty() {
            return Err(Error::MissingConfiguration(
                "AZURE_OPENAI_MODEL_DEPLOYMENT".to_string(),
            ));
        }
        Ok(())
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::MissingConfiguration(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_pipeline() {
        let config = ChatConfig::default();
        assert_eq!(config.chunking.chunk_size, 150);
        assert_eq!(config.chunking.chunk_overlap, 0);
        assert_eq!(config.retrieval.top_k, 1);
        assert_eq!(config.azure.max_retries, 2);
        assert!((config.azure.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn validate_rejects_empty_credentials() {
        let config = AzureConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfiguration(_)));
    }

    #[test]
    fn validate_accepts_complete_config() {
        let config = AzureConfig {
            endpoint: "https://example.openai.azure.com".to_string(),
            api_key: "key".to_string(),
            ..AzureConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
