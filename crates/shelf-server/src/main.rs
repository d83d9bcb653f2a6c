mod auth;
mod config;
mod error;
mod routes;
mod store;

use std::sync::Arc;

use config::AppConfig;
use routes::{app_router, AppState};
use store::ScriptStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Only load .env in development; production uses platform-native env injection.
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shelf_server=info".parse().expect("valid directive")),
        )
        .init();

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!("Starting shelf-server with config: {:?}", config);

    let store = Arc::new(ScriptStore::open(&config.db_path)?);
    let bind_addr = config.bind_addr.clone();
    let router = app_router(AppState { config, store });

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("shelf-server listening on {}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
