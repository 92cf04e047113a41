use crate::error::ApiError;
use crate::routes::market::MarketReport;
use crate::state::AppState;
use crate::view::select_symbol;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct Body {
    #[serde(default)]
    symbol: String,
}

#[derive(Serialize)]
pub struct Selection {
    /// False when a newer selection finished first and this result was dropped.
    committed: bool,
    #[serde(flatten)]
    report: MarketReport,
}

pub async fn current(State(state): State<Arc<AppState>>) -> Json<MarketReport> {
    let market = state.view.lock().await.market().clone();
    Json(MarketReport::new(market, &state))
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Body>, JsonRejection>,
) -> Result<Json<Selection>, ApiError> {
    let Json(payload) = payload?;
    if payload.symbol.trim().is_empty() {
        return Err(ApiError::BadRequest("symbol is required".to_string()));
    }

    let committed = select_symbol(
        &state.view,
        state.market.as_ref(),
        &state.resolver,
        &state.config.bands,
        &payload.symbol,
    )
    .await;

    let market = state.view.lock().await.market().clone();
    Ok(Json(Selection {
        committed,
        report: MarketReport::new(market, &state),
    }))
}
