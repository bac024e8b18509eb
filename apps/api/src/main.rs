mod assistant;
mod config;
mod documents;
mod editors;
mod errors;
mod export;
mod llm_client;
mod markup;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::documents::{DocumentStore, Session};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{FileKv, KvStore, MemoryKv, RedisKv};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    let kv = build_kv_store(&config).await?;

    // Migrate storage and load the active document
    let session = Session::bootstrap(DocumentStore::new(kv.clone()))
        .await
        .context("Failed to load the active resume")?;
    info!("Active resume: {}", session.active());

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone(), kv);
    info!(
        "LLM client initialized (model: {}, environment key: {})",
        llm_client::MODEL,
        config.anthropic_api_key.is_some()
    );

    let state = AppState::new(session, llm, config.clone());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Opens the configured key-value backend.
async fn build_kv_store(config: &Config) -> Result<Arc<dyn KvStore>> {
    let kv: Arc<dyn KvStore> = match config.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage; nothing survives a restart");
            Arc::new(MemoryKv::new())
        }
        StorageBackend::File => {
            Arc::new(FileKv::open(config.storage_dir.clone()).await?)
        }
        StorageBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is required for the redis backend")?;
            let kv = RedisKv::connect(url).await?;
            info!("Redis storage initialized");
            Arc::new(kv)
        }
    };
    Ok(kv)
}
