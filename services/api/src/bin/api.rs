//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DemoCompletionAdapter, FileSlotAdapter, OpenAiChatAdapter, PgSlotAdapter},
    config::Config,
    error::ApiError,
    web::{router, AppState, ApiDoc},
};
use async_openai::{config::OpenAIConfig, Client};
use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use thought_partner_core::ports::{CompletionService, ProjectRepository};
use thought_partner_core::store::ProjectStore;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Persistence Slot ---
    let repository: Arc<dyn ProjectRepository> = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await?;
            let adapter = PgSlotAdapter::new(db_pool, config.storage_key.clone());
            info!("Running database migrations...");
            adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Arc::new(adapter)
        }
        None => {
            let adapter = FileSlotAdapter::new(&config.storage_dir, &config.storage_key);
            info!("Storing the project in {}", adapter.path().display());
            Arc::new(adapter)
        }
    };
    let store = ProjectStore::open(repository).await;

    // --- 3. Initialize the Completion Adapter ---
    let completion: Arc<dyn CompletionService> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            Arc::new(OpenAiChatAdapter::new(
                openai_client,
                config.chat_model.clone(),
                config.chat_temperature,
                config.chat_max_tokens,
            ))
        }
        None => {
            warn!("OPENAI_API_KEY is not set. Using the offline demo responder.");
            Arc::new(DemoCompletionAdapter::new())
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, completion));

    let allowed_origin = config.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        ApiError::Internal(format!(
            "Invalid ALLOWED_ORIGIN '{}': {}",
            config.allowed_origin, e
        ))
    })?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    // --- 5. Create the Web Router ---
    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
