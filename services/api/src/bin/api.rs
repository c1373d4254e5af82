//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{HttpPdfFetcher, InMemoryDocumentStore, OpenAiQaAdapter, PdfExtractAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, spawn_document_sweeper, state::AppState, sweep_interval},
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let openai_config = OpenAIConfig::new()
        .with_api_key(config.llm_api_key()?)
        .with_api_base(&config.llm_base_url);
    let openai_client = Client::with_config(openai_config);
    info!(
        "Answering with model '{}' via {}",
        config.qa_model, config.llm_base_url
    );

    let qa_adapter = Arc::new(OpenAiQaAdapter::new(
        openai_client,
        config.qa_model.clone(),
        config.llm_timeout,
    ));
    let fetcher = Arc::new(HttpPdfFetcher::new(
        config.fetch_timeout,
        config.max_upload_bytes,
    )?);
    let extractor = Arc::new(PdfExtractAdapter::new());
    let store = Arc::new(InMemoryDocumentStore::new());

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store: store.clone(),
        config: config.clone(),
        extractor,
        fetcher,
        qa_adapter,
    });

    // --- 4. Start Background Tasks ---
    let shutdown = CancellationToken::new();
    let sweeper = spawn_document_sweeper(
        store,
        config.document_ttl,
        sweep_interval(config.document_ttl),
        shutdown.clone(),
    );

    // --- 5. Create the Web Router ---
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received.");
                signal_token.cancel();
            }
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        error!("Document sweeper ended abnormally: {}", e);
    }
    info!("Server stopped.");

    Ok(())
}
