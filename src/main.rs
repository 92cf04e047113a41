use crate::config::AppConfig;
use crate::state::AppState;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod analysis;
mod bands;
mod chart;
mod config;
mod data;
mod error;
mod resolver;
mod routes;
mod snapshot;
mod state;
mod view;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let addr = config.addr();

    let app = routes::router(Arc::new(AppState::from_config(config)));

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
