//! Configuration management for the dashboard worker

use crate::analysis::PLACEHOLDER_API_KEY;
use crate::error::{MarketError, Result};
use crate::types::Exchange;
use worker::Env;

/// Worker configuration, loaded from Cloudflare vars and secrets.
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment (production, staging, development)
    pub environment: String,

    /// Default upstream exchange (overridable per request)
    pub exchange: Exchange,

    /// OpenAI credential. Secret with a non-secret placeholder default;
    /// the analyzer refuses to call out while the placeholder is set.
    pub openai_api_key: String,

    /// Chat model used for analysis
    pub openai_model: String,

    /// Candle cache freshness window
    pub cache_ttl_seconds: i64,

    /// Upstream HTTP timeout
    pub request_timeout_seconds: u64,

    /// How many recent candles go into the analysis prompt
    pub analysis_tail: usize,
}

impl Config {
    /// Load configuration from Cloudflare environment variables
    pub fn from_env(env: &Env) -> Result<Self> {
        let config = Self {
            environment: env
                .var("ENVIRONMENT")
                .map_or_else(|_| "production".to_string(), |v| v.to_string()),

            exchange: env
                .var("EXCHANGE")
                .ok()
                .and_then(|v| Exchange::parse(&v.to_string()))
                .unwrap_or(Exchange::Coinbase),

            openai_api_key: env
                .secret("OPENAI_API_KEY")
                .map_or_else(|_| PLACEHOLDER_API_KEY.to_string(), |s| s.to_string()),

            openai_model: env
                .var("OPENAI_MODEL")
                .map_or_else(|_| "gpt-5-mini".to_string(), |v| v.to_string()),

            cache_ttl_seconds: env
                .var("CACHE_TTL_SECONDS")
                .map(|v| v.to_string().parse().unwrap_or(300))
                .unwrap_or(300),

            request_timeout_seconds: env
                .var("REQUEST_TIMEOUT_SECONDS")
                .map(|v| v.to_string().parse().unwrap_or(10))
                .unwrap_or(10),

            analysis_tail: env
                .var("ANALYSIS_TAIL")
                .map(|v| v.to_string().parse().unwrap_or(10))
                .unwrap_or(10),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_seconds <= 0 {
            return Err(MarketError::Config(
                "cache_ttl_seconds must be positive".into(),
            ));
        }
        if self.request_timeout_seconds == 0 {
            return Err(MarketError::Config(
                "request_timeout_seconds must be positive".into(),
            ));
        }
        if self.analysis_tail == 0 {
            return Err(MarketError::Config("analysis_tail must be positive".into()));
        }
        Ok(())
    }
}
