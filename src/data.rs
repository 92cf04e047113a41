use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod coingecko;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// Milliseconds since epoch.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// A candle built from a single price sample, open = high = low = close.
    pub fn flat(time: i64, price: f64) -> Self {
        Candle {
            time,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub time: i64,
    pub price: f64,
}

/// One hit of a provider symbol search.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CoinRef {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned HTTP {0}")]
    Status(u16),
    #[error("malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Provider boundary. Implementations translate the provider's response shapes
/// into `Candle`/`PricePoint`/`CoinRef` and nothing above this trait sees them.
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<CoinRef>, SourceError>;

    /// OHLC candles over the last `days`, oldest first.
    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<Candle>, SourceError>;

    /// Price-only samples over the last `days`, oldest first.
    async fn price_series(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, SourceError>;
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// In-memory market used by the tests. Ids missing from a map return an
    /// empty payload; ids listed in `failing` return a status error.
    #[derive(Default)]
    pub struct FakeMarket {
        pub search_hits: Vec<CoinRef>,
        pub candles: HashMap<String, Vec<Candle>>,
        pub prices: HashMap<String, Vec<PricePoint>>,
        pub failing: Vec<String>,
        pub search_fails: bool,
        pub ohlc_fails: bool,
        gates: HashMap<String, Arc<Notify>>,
        pub search_calls: AtomicUsize,
        pub ohlc_calls: AtomicUsize,
        pub price_calls: AtomicUsize,
    }

    impl FakeMarket {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_candles(mut self, id: &str, candles: Vec<Candle>) -> Self {
            self.candles.insert(id.to_string(), candles);
            self
        }

        pub fn with_prices(mut self, id: &str, prices: Vec<PricePoint>) -> Self {
            self.prices.insert(id.to_string(), prices);
            self
        }

        pub fn with_search(mut self, hits: Vec<CoinRef>) -> Self {
            self.search_hits = hits;
            self
        }

        pub fn failing(mut self, id: &str) -> Self {
            self.failing.push(id.to_string());
            self
        }

        /// Holds `ohlc(id)` until the returned handle is notified.
        pub fn gate(&mut self, id: &str) -> Arc<Notify> {
            let notify = Arc::new(Notify::new());
            self.gates.insert(id.to_string(), Arc::clone(&notify));
            notify
        }

        pub fn ohlc_count(&self) -> usize {
            self.ohlc_calls.load(Ordering::SeqCst)
        }

        pub fn price_count(&self) -> usize {
            self.price_calls.load(Ordering::SeqCst)
        }

        pub fn search_count(&self) -> usize {
            self.search_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketSource for FakeMarket {
        async fn search(&self, _query: &str) -> Result<Vec<CoinRef>, SourceError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            if self.search_fails {
                return Err(SourceError::Status(500));
            }
            Ok(self.search_hits.clone())
        }

        async fn ohlc(&self, id: &str, _days: u32) -> Result<Vec<Candle>, SourceError> {
            self.ohlc_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gates.get(id) {
                gate.notified().await;
            }
            if self.ohlc_fails || self.failing.iter().any(|f| f == id) {
                return Err(SourceError::Status(503));
            }
            Ok(self.candles.get(id).cloned().unwrap_or_default())
        }

        async fn price_series(&self, id: &str, _days: u32) -> Result<Vec<PricePoint>, SourceError> {
            self.price_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing.iter().any(|f| f == id) {
                return Err(SourceError::Status(503));
            }
            Ok(self.prices.get(id).cloned().unwrap_or_default())
        }
    }
}
