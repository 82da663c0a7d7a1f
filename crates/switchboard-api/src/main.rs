use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use switchboard_api::{
    build_router,
    config::{Config, StorageBackend},
    notify::BroadcastNotifier,
    state::AppState,
};
use switchboard_persist::{Backend, PersistClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Switchboard API server");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Initialize persistence client
    let backend = match config.storage.backend {
        StorageBackend::Mongodb => {
            tracing::info!("Connecting to MongoDB");
            Backend::MongoDb
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Backend::Memory
        }
    };
    let persist_client = PersistClient::builder()
        .backend(backend)
        .mongodb_uri(&config.mongodb_uri)
        .database(&config.mongodb.database)
        .pool_size(config.mongodb.pool_size)
        .timeout(Duration::from_millis(config.mongodb.timeout_ms))
        .thread_window(config.thread_window())
        .canned_reply(&config.messaging.canned_reply)
        .build()
        .await?;

    tracing::info!("Storage ready");

    let notifier = Arc::new(BroadcastNotifier::new(config.messaging.notification_buffer));

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), persist_client, notifier));
    tracing::info!(
        bcrypt_cost = state.passwords.cost(),
        token_ttl_days = config.auth.token_ttl_days,
        "Auth configured"
    );

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);
    tracing::info!("API docs: http://{}/api/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
