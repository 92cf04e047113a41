use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const SYSTEM_PROMPT: &str = "You are a crypto market analyst writing short, practical notes \
for intraday scalpers. Be concrete, avoid hype, and never promise returns.";

pub fn build_prompt(symbol: &str, today: NaiveDate) -> String {
    let symbol = symbol.trim().to_uppercase();
    format!(
        "Give a scalping-oriented analysis of {symbol} as of {today}.\n\
         Cover, in order:\n\
         1. Current market sentiment and the main drivers for {symbol}.\n\
         2. Short-term support and resistance zones worth watching.\n\
         3. An aggressive entry, a conservative entry, a take-profit and a hard stop, \
         each as a percentage offset from the current price.\n\
         4. The main risks that would invalidate the setup.\n\
         Keep it under 250 words. This is not financial advice.",
        today = today.format("%Y-%m-%d")
    )
}

#[async_trait]
pub trait Analyst: Send + Sync {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<String>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` client.
pub struct ChatCompletions {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletions {
    pub fn new(base_url: &str, api_key: String, model: String) -> Self {
        ChatCompletions {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Analyst for ChatCompletions {
    async fn analyze(&self, symbol: &str) -> anyhow::Result<String> {
        let prompt = build_prompt(symbol, chrono::Utc::now().date_naive());
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.4,
        };

        tracing::debug!("Requesting analysis for {} from {}", symbol, self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("analysis request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("analysis provider returned {}: {}", status, body);
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("malformed analysis response")?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow!("analysis response had no text"))
    }
}
