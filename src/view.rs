use crate::bands::{bands, BandFactors, Bands};
use crate::data::MarketSource;
use crate::resolver::SymbolResolver;
use crate::snapshot::{build_snapshot, Snapshot};
use serde::Serialize;
use tokio::sync::Mutex;

/// Identifies one symbol selection. Only the most recently issued token may
/// commit a result.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

#[derive(Serialize, Debug, Clone)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarketView {
    Idle,
    Loading {
        symbol: String,
    },
    NotFound {
        symbol: String,
    },
    Unavailable {
        symbol: String,
        id: String,
    },
    Ready {
        symbol: String,
        snapshot: Snapshot,
        bands: Option<Bands>,
    },
}

impl MarketView {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            MarketView::Ready { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }
}

/// State of the single dashboard: which symbol is selected and what is shown
/// for it.
#[derive(Debug)]
pub struct DashboardView {
    current: RequestToken,
    market: MarketView,
}

impl DashboardView {
    pub fn new() -> Self {
        DashboardView {
            current: RequestToken(0),
            market: MarketView::Idle,
        }
    }

    /// Starts a new selection and supersedes any in flight.
    pub fn begin(&mut self, symbol: &str) -> RequestToken {
        self.current = RequestToken(self.current.0 + 1);
        self.market = MarketView::Loading {
            symbol: symbol.trim().to_uppercase(),
        };
        self.current
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == token
    }

    /// Stores `market` if `token` is still the latest selection. Stale results
    /// are dropped and `false` is returned.
    pub fn commit(&mut self, token: RequestToken, market: MarketView) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.market = market;
        true
    }

    pub fn market(&self) -> &MarketView {
        &self.market
    }
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve, fetch and derive bands for `symbol`. Never fails: every outcome is
/// a displayable `MarketView`.
pub async fn load_market(
    source: &dyn MarketSource,
    resolver: &SymbolResolver,
    factors: &BandFactors,
    symbol: &str,
) -> MarketView {
    let symbol = symbol.trim().to_uppercase();

    let Some(id) = resolver.resolve(source, &symbol).await else {
        return MarketView::NotFound { symbol };
    };

    match build_snapshot(source, &id).await {
        Some(snapshot) => {
            let bands = bands(Some(snapshot.info.price), factors);
            MarketView::Ready {
                symbol,
                snapshot,
                bands,
            }
        }
        None => MarketView::Unavailable { symbol, id },
    }
}

/// Runs a selection against the shared view. The lock is held only to begin
/// and to commit, never across the network calls.
pub async fn select_symbol(
    view: &Mutex<DashboardView>,
    source: &dyn MarketSource,
    resolver: &SymbolResolver,
    factors: &BandFactors,
    symbol: &str,
) -> bool {
    let token = view.lock().await.begin(symbol);
    let market = load_market(source, resolver, factors, symbol).await;

    let committed = view.lock().await.commit(token, market);
    if !committed {
        tracing::debug!("Dropped stale result for {}", symbol);
    }
    committed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fake::FakeMarket;
    use crate::data::Candle;
    use crate::snapshot::Fidelity;
    use std::sync::Arc;

    fn resolver() -> SymbolResolver {
        SymbolResolver::with_table([("AAA", "coin-a"), ("BBB", "coin-b")])
    }

    fn ready_symbol(view: &MarketView) -> Option<&str> {
        match view {
            MarketView::Ready { symbol, .. } => Some(symbol.as_str()),
            _ => None,
        }
    }

    #[test]
    fn stale_token_cannot_commit() {
        let mut view = DashboardView::new();
        let a = view.begin("aaa");
        let b = view.begin("bbb");

        assert!(!view.is_current(a));
        assert!(view.commit(
            b,
            MarketView::NotFound {
                symbol: "BBB".to_string()
            }
        ));
        assert!(!view.commit(
            a,
            MarketView::NotFound {
                symbol: "AAA".to_string()
            }
        ));
        assert!(matches!(view.market(), MarketView::NotFound { symbol } if symbol == "BBB"));
    }

    #[test]
    fn begin_shows_loading() {
        let mut view = DashboardView::new();
        assert!(matches!(view.market(), MarketView::Idle));

        view.begin(" sol ");
        assert!(matches!(view.market(), MarketView::Loading { symbol } if symbol == "SOL"));
    }

    #[tokio::test]
    async fn load_market_ready_with_bands() {
        let market = FakeMarket::new().with_candles("coin-a", vec![Candle::flat(0, 100.0)]);

        let view = load_market(&market, &resolver(), &BandFactors::default(), "aaa").await;

        let MarketView::Ready {
            symbol,
            snapshot,
            bands,
        } = view
        else {
            panic!("expected ready view");
        };
        assert_eq!(symbol, "AAA");
        assert_eq!(snapshot.fidelity, Fidelity::Ohlc);
        assert!((bands.unwrap().take_profit - 100.4).abs() < 1e-9);
    }

    #[tokio::test]
    async fn load_market_not_found_and_unavailable() {
        let market = FakeMarket::new();

        let missing = load_market(&market, &resolver(), &BandFactors::default(), "zzz").await;
        assert!(matches!(missing, MarketView::NotFound { .. }));

        let empty = load_market(&market, &resolver(), &BandFactors::default(), "bbb").await;
        assert!(matches!(empty, MarketView::Unavailable { id, .. } if id == "coin-b"));
    }

    #[tokio::test]
    async fn late_result_for_old_symbol_is_discarded() {
        let mut market = FakeMarket::new()
            .with_candles("coin-a", vec![Candle::flat(0, 1.0)])
            .with_candles("coin-b", vec![Candle::flat(0, 2.0)]);
        let release_a = market.gate("coin-a");

        let market = Arc::new(market);
        let view = Arc::new(Mutex::new(DashboardView::new()));
        let resolver = Arc::new(resolver());

        let slow = {
            let (market, view, resolver) = (market.clone(), view.clone(), resolver.clone());
            tokio::spawn(async move {
                select_symbol(&view, market.as_ref(), &resolver, &BandFactors::default(), "AAA")
                    .await
            })
        };

        // Wait until the A request is parked inside the provider.
        while market.ohlc_count() == 0 {
            tokio::task::yield_now().await;
        }

        let fast =
            select_symbol(&view, market.as_ref(), &resolver, &BandFactors::default(), "BBB").await;
        assert!(fast);

        release_a.notify_one();
        assert!(!slow.await.unwrap());

        let view = view.lock().await;
        assert_eq!(ready_symbol(view.market()), Some("BBB"));
        assert_eq!(view.market().snapshot().unwrap().info.price, 2.0);
    }
}
