use crate::data::{CoinRef, MarketSource};
use std::collections::HashMap;

/// Tickers resolved without asking the provider.
pub const KNOWN_SYMBOLS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("DOT", "polkadot"),
    ("AVAX", "avalanche-2"),
    ("LINK", "chainlink"),
    ("LTC", "litecoin"),
    ("TRX", "tron"),
    ("ATOM", "cosmos"),
    ("XLM", "stellar"),
    ("TON", "the-open-network"),
    ("SUI", "sui"),
    ("SHIB", "shiba-inu"),
    ("PEPE", "pepe"),
    ("USDT", "tether"),
    ("USDC", "usd-coin"),
];

pub struct SymbolResolver {
    table: HashMap<String, String>,
}

impl SymbolResolver {
    pub fn new() -> Self {
        Self::with_table(KNOWN_SYMBOLS.iter().copied())
    }

    pub fn with_table<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        SymbolResolver {
            table: entries
                .into_iter()
                .map(|(symbol, id)| (symbol.to_uppercase(), id.to_string()))
                .collect(),
        }
    }

    /// Maps a ticker to the provider's identifier. Resolution is best-effort:
    /// search failures and empty results both come back as `None`.
    pub async fn resolve(&self, source: &dyn MarketSource, symbol: &str) -> Option<String> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return None;
        }

        if let Some(id) = self.table.get(&symbol) {
            return Some(id.clone());
        }

        match source.search(&symbol).await {
            Ok(hits) => {
                let id = pick_match(&symbol, &hits).map(|hit| hit.id.clone());
                if id.is_none() {
                    tracing::info!("No search results for {}", symbol);
                }
                id
            }
            Err(e) => {
                tracing::warn!("Symbol search for {} failed: {}", symbol, e);
                None
            }
        }
    }
}

impl Default for SymbolResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the search hit for `query`: a hit whose symbol is byte-for-byte equal
/// wins, then one equal ignoring case, then the provider's first hit.
pub fn pick_match<'a>(query: &str, hits: &'a [CoinRef]) -> Option<&'a CoinRef> {
    hits.iter()
        .find(|hit| hit.symbol == query)
        .or_else(|| hits.iter().find(|hit| hit.symbol.eq_ignore_ascii_case(query)))
        .or_else(|| hits.first())
}
