use crate::data::{Candle, CoinRef, MarketSource, PricePoint, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

const API_KEY_HEADER: &str = "x-cg-demo-api-key";

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<CoinRef>,
}

// [time, open, high, low, close]
type OhlcRow = (f64, f64, f64, f64, f64);

#[derive(Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

pub struct CoinGecko {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGecko {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        CoinGecko {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered {}", url, status);
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl MarketSource for CoinGecko {
    async fn search(&self, query: &str) -> Result<Vec<CoinRef>, SourceError> {
        let body: SearchResponse = self.get_json("/search", &[("query", query)]).await?;
        Ok(body.coins)
    }

    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<Candle>, SourceError> {
        let days = days.to_string();
        let rows: Vec<OhlcRow> = self
            .get_json(
                &format!("/coins/{}/ohlc", id),
                &[("vs_currency", "usd"), ("days", days.as_str())],
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(time, open, high, low, close)| Candle {
                time: time as i64,
                open,
                high,
                low,
                close,
            })
            .collect())
    }

    async fn price_series(&self, id: &str, days: u32) -> Result<Vec<PricePoint>, SourceError> {
        let days = days.to_string();
        let chart: MarketChart = self
            .get_json(
                &format!("/coins/{}/market_chart", id),
                &[("vs_currency", "usd"), ("days", days.as_str())],
            )
            .await?;

        Ok(chart
            .prices
            .into_iter()
            .map(|(time, price)| PricePoint {
                time: time as i64,
                price,
            })
            .collect())
    }
}
