use crate::error::ApiError;
use crate::state::AppState;
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
pub struct Analysis {
    analysis: String,
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Body>, JsonRejection>,
) -> Result<Json<Analysis>, ApiError> {
    let Json(payload) = payload?;
    let symbol = payload.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(ApiError::BadRequest("symbol is required".to_string()));
    }

    let analyst = state
        .analyst
        .as_ref()
        .ok_or(ApiError::Unconfigured("analysis backend"))?;

    tracing::info!("Analysis requested for {}", symbol);
    let analysis = analyst
        .analyze(&symbol)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(Analysis { analysis }))
}
