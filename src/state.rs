use crate::analysis::{Analyst, ChatCompletions};
use crate::config::AppConfig;
use crate::data::{coingecko::CoinGecko, MarketSource};
use crate::resolver::SymbolResolver;
use crate::view::DashboardView;
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct AppState {
    pub config: AppConfig,
    pub market: Arc<dyn MarketSource>,
    pub analyst: Option<Arc<dyn Analyst>>,
    pub resolver: SymbolResolver,
    pub view: Mutex<DashboardView>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        market: Arc<dyn MarketSource>,
        analyst: Option<Arc<dyn Analyst>>,
    ) -> Self {
        AppState {
            config,
            market,
            analyst,
            resolver: SymbolResolver::new(),
            view: Mutex::new(DashboardView::new()),
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        let market = Arc::new(CoinGecko::new(
            &config.market_base_url,
            config.market_api_key.clone(),
        ));

        let analyst = config.llm_api_key.clone().map(|key| {
            Arc::new(ChatCompletions::new(
                &config.llm_base_url,
                key,
                config.llm_model.clone(),
            )) as Arc<dyn Analyst>
        });
        if analyst.is_none() {
            tracing::warn!("LLM_API_KEY not set, /api/crypto will answer 503");
        }

        Self::new(config, market, analyst)
    }
}
