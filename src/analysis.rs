//! AI market analysis
//!
//! Builds a plain-text prompt from the tail of a candle series and asks
//! the OpenAI chat-completions API for a free-text read: trend, entry,
//! stop-loss, take-profit. The model's answer is opaque display content;
//! nothing here parses or validates it. One call, no retries.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{MarketError, Result};
use crate::types::CandleSeries;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Non-secret placeholder shipped as the credential default. Any run
/// that still carries it gets a configuration hint instead of a 401.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_OPENAI_API_KEY_HERE";

/// Chat-completions client.
pub struct Analyzer {
    api_key: String,
    model: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

impl Analyzer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    /// Ask the model for a market read on the last `tail` candles.
    ///
    /// All failures map to [`MarketError::Analysis`] and surface as a
    /// non-fatal message in the dashboard.
    pub async fn analyze(&self, series: &CandleSeries, tail: usize) -> Result<String> {
        if self.api_key.is_empty() || self.api_key == PLACEHOLDER_API_KEY {
            return Err(MarketError::Analysis(
                "OPENAI_API_KEY is not configured".into(),
            ));
        }
        if series.is_empty() {
            return Err(MarketError::Analysis(
                "no candle data available to analyze".into(),
            ));
        }

        let prompt = build_prompt(series, tail);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let request = reqwest::Client::new()
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body);

        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(self.timeout);
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout;

        let response = request
            .send()
            .await
            .map_err(|e| MarketError::Analysis(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(MarketError::Analysis(format!("HTTP {status}: {text}")));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Analysis(format!("bad completion response: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| MarketError::Analysis("completion returned no choices".into()))
    }
}

/// Render the tail slice of a series as a prompt asking for trend,
/// entry, stop-loss and take-profit with brief technical reasoning.
pub fn build_prompt(series: &CandleSeries, tail: usize) -> String {
    let mut rows = String::new();
    for c in series.tail(tail) {
        rows.push_str(&format!(
            "{} open={:.2} high={:.2} low={:.2} close={:.2}\n",
            c.timestamp.format("%Y-%m-%d %H:%M UTC"),
            c.open,
            c.high,
            c.low,
            c.close,
        ));
    }

    format!(
        "Here is recent {symbol} price data from {exchange}, {label} candles:\n\n\
         {rows}\n\
         Analyze this with:\n\
         - Price trend (bullish, bearish, or sideways)\n\
         - Entry point (ideal entry price)\n\
         - Stop Loss (SL)\n\
         - Take Profit (TP)\n\
         - Brief technical reasoning",
        symbol = series.symbol,
        exchange = series.exchange,
        label = series.granularity.label(),
        rows = rows,
    )
}
