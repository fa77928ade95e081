//! Chat server binary
//!
//! Run with: cargo run --bin filechat-server

use filechat::{config::ChatConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filechat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration; credentials come from the environment
    let config = ChatConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat deployment: {}", config.azure.chat_deployment);
    tracing::info!(
        "  - Embedding deployment: {}",
        config.azure.embedding_deployment
    );
    tracing::info!(
        "  - Chunk size: {} (overlap: {})",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    let server = ChatServer::new(config)?;

    println!("File Q&A chat server");
    println!("  API:    http://{}/api", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST   /api/sessions                 - Create a session");
    println!("  POST   /api/sessions/:id/files       - Upload .txt/.pdf files");
    println!("  POST   /api/sessions/:id/ask         - Ask about the uploaded files");
    println!("  GET    /api/sessions/:id/transcript  - Conversation transcript");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
