use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use stockchart::config::Config;
use stockchart::services::{MemoryStore, SqliteStore, StockRepository};
use stockchart::{api, AppState};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stockchart=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting stockchart server on {}:{}", config.host, config.port);

    let repository: Arc<dyn StockRepository> = match &config.database_path {
        Some(path) => {
            info!("Using SQLite database at {}", path);
            Arc::new(SqliteStore::new(path)?)
        }
        None => {
            warn!("DATABASE_PATH not set, data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, repository)?;

    // Drop expired chart responses
    {
        let chart_cache = state.chart_cache.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(300)).await;
                chart_cache.cleanup();
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("stockchart server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
