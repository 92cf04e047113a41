use crate::bands::BandFactors;
use crate::chart::Canvas;
use crate::{analysis, data::coingecko};
use std::env;

/// Service configuration, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,

    pub market_base_url: String,
    pub market_api_key: Option<String>,

    /// Analysis is disabled when no key is set.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,

    pub bands: BandFactors,
    pub canvas: Canvas,
}

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    fn opt(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn str(&self, name: &str, default: &str) -> String {
        self.opt(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: std::str::FromStr>(&self, name: &str, default: T) -> T {
        match self.opt(name) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring unparsable {}={}", name, raw);
                default
            }),
            None => default,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = Lookup(lookup);

        let defaults = BandFactors::default();
        let mut bands = BandFactors {
            aggressive_buy: env.parsed("BAND_AGGRESSIVE_BUY", defaults.aggressive_buy),
            conservative_buy: env.parsed("BAND_CONSERVATIVE_BUY", defaults.conservative_buy),
            take_profit: env.parsed("BAND_TAKE_PROFIT", defaults.take_profit),
            hard_stop: env.parsed("BAND_HARD_STOP", defaults.hard_stop),
        };
        if let Err(e) = bands.validate() {
            tracing::warn!("Band factors rejected ({}), using defaults", e);
            bands = defaults;
        }

        let default_canvas = Canvas::default();
        let mut canvas = Canvas {
            width: env.parsed("CHART_WIDTH", default_canvas.width),
            height: env.parsed("CHART_HEIGHT", default_canvas.height),
            ticks: env.parsed("CHART_TICKS", default_canvas.ticks),
            ..default_canvas
        };
        if let Err(e) = canvas.validate() {
            tracing::warn!("Chart canvas rejected ({}), using defaults", e);
            canvas = default_canvas;
        }

        AppConfig {
            bind: env.str("BIND", "0.0.0.0"),
            port: env.parsed("PORT", 3000),
            market_base_url: env.str("MARKET_BASE_URL", coingecko::DEFAULT_BASE_URL),
            market_api_key: env.opt("MARKET_API_KEY"),
            llm_api_key: env.opt("LLM_API_KEY"),
            llm_base_url: env.str("LLM_BASE_URL", analysis::DEFAULT_BASE_URL),
            llm_model: env.str("LLM_MODEL", analysis::DEFAULT_MODEL),
            bands,
            canvas,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
