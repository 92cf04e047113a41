use crate::state::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod crypto;
pub mod market;
pub mod view;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/crypto", post(crypto::analyze))
        .route("/api/market/{symbol}", get(market::market))
        .route("/api/chart/{symbol}", get(market::chart))
        .route("/api/view", get(view::current).post(view::select))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
