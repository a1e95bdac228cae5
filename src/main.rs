use std::sync::Arc;

use upkeep_api::config;
use upkeep_api::routes::{app, AppState};
use upkeep_api::services::AssetService;
use upkeep_api::store::{AssetStore, MemoryAssetStore, PgAssetStore};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Upkeep API in {:?} mode", config.environment);

    let store: Arc<dyn AssetStore> = match config.database.backend.as_str() {
        "memory" => {
            tracing::warn!("using in-memory store; data will not survive restarts");
            Arc::new(MemoryAssetStore::new())
        }
        _ => {
            let pg = PgAssetStore::connect()
                .await
                .unwrap_or_else(|e| panic!("failed to connect to database: {}", e));
            pg.migrate()
                .await
                .unwrap_or_else(|e| panic!("failed to prepare schema: {}", e));
            Arc::new(pg)
        }
    };

    let state = AppState {
        service: AssetService::new(store),
    };
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("UPKEEP_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(8080);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Upkeep API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
