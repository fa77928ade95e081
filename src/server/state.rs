//! Application state for the chat server

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::ingestion::RecursiveChunker;
use crate::providers::{AzureOpenAiClient, ChatProvider, EmbeddingProvider};
use crate::session::Session;
use crate::types::response::SessionResponse;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Embedding provider
    embedder: Arc<dyn EmbeddingProvider>,
    /// Chat completion provider
    chat: Arc<dyn ChatProvider>,
    /// Chunker built from the chunking config
    chunker: RecursiveChunker,
    /// Live sessions. Each sits behind its own async mutex so at most one
    /// question is in flight per session.
    sessions: DashMap<Uuid, Arc<Mutex<Session>>>,
}

impl AppState {
    /// Create state with both providers backed by one Azure OpenAI client.
    /// Fails when the Azure configuration is incomplete.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Arc::new(AzureOpenAiClient::new(&config.azure)?);
        tracing::info!(
            "Azure OpenAI client initialized (chat: {}, embeddings: {})",
            config.azure.chat_deployment,
            config.azure.embedding_deployment
        );

        let embedder: Arc<dyn EmbeddingProvider> = client.clone();
        let chat: Arc<dyn ChatProvider> = client;
        Ok(Self::with_providers(config, embedder, chat))
    }

    /// Create state with explicit providers
    pub fn with_providers(
        config: ChatConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        chat: Arc<dyn ChatProvider>,
    ) -> Self {
        let chunker = RecursiveChunker::new(
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                embedder,
                chat,
                chunker,
                sessions: DashMap::new(),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Get the embedding provider
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedder
    }

    /// Get the chat completion provider
    pub fn chat(&self) -> &Arc<dyn ChatProvider> {
        &self.inner.chat
    }

    /// Get the chunker
    pub fn chunker(&self) -> &RecursiveChunker {
        &self.inner.chunker
    }

    /// Create a new session and return its initial snapshot
    pub fn create_session(&self) -> SessionResponse {
        let session = Session::new();
        let snapshot = SessionResponse {
            id: session.id,
            created_at: session.created_at,
            files: Vec::new(),
            transcript: session.transcript.turns().to_vec(),
        };

        self.inner
            .sessions
            .insert(session.id, Arc::new(Mutex::new(session)));
        tracing::info!("Created session {}", snapshot.id);

        snapshot
    }

    /// Look up a session by id
    pub fn session(&self, id: &Uuid) -> Result<Arc<Mutex<Session>>> {
        self.inner
            .sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::SessionNotFound(*id))
    }

    /// Remove a session
    pub fn remove_session(&self, id: &Uuid) -> Result<()> {
        self.inner
            .sessions
            .remove(id)
            .map(|_| ())
            .ok_or(Error::SessionNotFound(*id))
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.inner.sessions.len()
    }
}
