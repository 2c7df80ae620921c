use tracing_subscriber::EnvFilter;

use docs_qa::api::build_router;
use docs_qa::config::Config;
use docs_qa::ingest::build_or_load;
use docs_qa::state::{build_http_client, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG may come from .env
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Data directory: {}", config.data_dir.display());
    tracing::info!("Vector store: {}", config.vector_path().display());
    tracing::info!(
        "Models: chat={} embeddings={} ({})",
        config.llm.chat_model,
        config.llm.embedding_model,
        config.llm.base_url
    );

    let http_client = build_http_client()?;
    let index = build_or_load(&config, &http_client).await?;
    tracing::info!(
        "Index ready: {} documents, {} chunks stored{}",
        index.document_count,
        index.vectors.len(),
        if index.reused { " (reused)" } else { "" }
    );

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, http_client, index);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
