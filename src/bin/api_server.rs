// src/bin/api_server.rs

use anyhow::{Context, Result};
use dog_registry::infra::config::AppConfig;
use dog_registry::transport;
use dog_registry::{Dog, RecordService, SqlStore};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env().context("failed to load application configuration")?;

    // --- Store Initialization ---
    info!("initializing record store");
    let store = SqlStore::connect(&config.database_url, config.db_max_connections)
        .await
        .context("failed to connect to the database")?;

    // --- Service Initialization ---
    let records = RecordService::new(store.clone());
    let seed = if config.seed_sample_data {
        Dog::seed()
    } else {
        Vec::new()
    };
    let seeded = records
        .init::<Dog>(&seed)
        .await
        .context("failed to initialize the dogs table")?;
    info!(seeded, "record service initialized");

    let app_state = transport::http::AppState::new(records);

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    info!(address = %addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    store.close().await;
    info!("graceful shutdown complete");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dog_registry=debug,api_server=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "unable to install Ctrl+C signal handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
