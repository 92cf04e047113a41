use crate::chart::{layout, render_svg, DrawPlan};
use crate::state::AppState;
use crate::view::{load_market, MarketView};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct MarketReport {
    pub market: MarketView,
    pub chart: DrawPlan,
}

impl MarketReport {
    pub fn new(market: MarketView, state: &AppState) -> Self {
        let chart = match market.snapshot() {
            Some(snapshot) => layout(&snapshot.candles, &state.config.canvas),
            None => DrawPlan::NoData,
        };
        MarketReport { market, chart }
    }
}

fn status_for(market: &MarketView) -> StatusCode {
    match market {
        MarketView::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    }
}

async fn fetch(state: &AppState, symbol: &str) -> MarketView {
    load_market(
        state.market.as_ref(),
        &state.resolver,
        &state.config.bands,
        symbol,
    )
    .await
}

pub async fn market(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> (StatusCode, Json<MarketReport>) {
    let market = fetch(&state, &symbol).await;
    let status = status_for(&market);
    (status, Json(MarketReport::new(market, &state)))
}

pub async fn chart(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    let market = fetch(&state, &symbol).await;
    let report = MarketReport::new(market, &state);
    let svg = render_svg(&report.chart, &state.config.canvas);

    (
        status_for(&report.market),
        [(header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
}
