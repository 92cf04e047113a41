use crate::data::{Candle, MarketSource};
use serde::Serialize;

pub const OHLC_DAYS: u32 = 1;
pub const FALLBACK_DAYS: u32 = 2;
pub const FALLBACK_POINTS: usize = 48;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct PriceInfo {
    pub price: f64,
    #[serde(rename = "change24h")]
    pub change_24h: f64,
}

impl PriceInfo {
    /// Last close, and the move from the first open to the last close in percent.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let first = candles.first()?;
        let last = candles.last()?;

        let change_24h = if first.open > 0.0 {
            (last.close - first.open) / first.open * 100.0
        } else {
            0.0
        };

        Some(PriceInfo {
            price: last.close,
            change_24h,
        })
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Fidelity {
    Ohlc,
    /// Built from the price series: flat candles, no wicks.
    Degraded,
}

#[derive(Serialize, Debug, Clone)]
pub struct Snapshot {
    pub id: String,
    pub candles: Vec<Candle>,
    pub info: PriceInfo,
    pub fidelity: Fidelity,
}

/// Fetches candles for `id`, falling back to the price series when the OHLC
/// endpoint gives nothing. `None` means neither source produced a point.
pub async fn build_snapshot(source: &dyn MarketSource, id: &str) -> Option<Snapshot> {
    let mut fidelity = Fidelity::Ohlc;
    let mut candles = match source.ohlc(id, OHLC_DAYS).await {
        Ok(candles) => candles,
        Err(e) => {
            tracing::warn!("OHLC request for {} failed: {}", id, e);
            vec![]
        }
    };

    if candles.is_empty() {
        tracing::info!("No OHLC candles for {}, using price series", id);
        fidelity = Fidelity::Degraded;
        candles = match source.price_series(id, FALLBACK_DAYS).await {
            Ok(points) => {
                let skip = points.len().saturating_sub(FALLBACK_POINTS);
                points
                    .iter()
                    .skip(skip)
                    .map(|p| Candle::flat(p.time, p.price))
                    .collect()
            }
            Err(e) => {
                tracing::warn!("Price series request for {} failed: {}", id, e);
                vec![]
            }
        };
    }

    let Some(info) = PriceInfo::from_candles(&candles) else {
        tracing::warn!("No market data available for {}", id);
        return None;
    };

    Some(Snapshot {
        id: id.to_string(),
        candles,
        info,
        fidelity,
    })
}
