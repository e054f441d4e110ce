//! Crypto Analyzer - Candlestick Dashboard for Cloudflare Workers
//!
//! Serves an interactive candlestick chart for a fixed catalog of
//! crypto instruments, normalizing candle data from Coinbase Exchange
//! or Bitpanda public APIs, and forwards a slice of recent candles to
//! the OpenAI API for a free-text market read on demand.
//!
//! # Architecture
//! - Main entry point routes dashboard and JSON API requests
//! - Per-isolate TTL cache bounds upstream API call volume
//! - Exchange client absorbs the two upstream response shapes
//!
//! All handler failures are converted to structured `{kind, message}`
//! JSON payloads; nothing propagates as a worker fault.

#![allow(clippy::needless_pass_by_value)] // Worker framework patterns
#![allow(clippy::cast_precision_loss)] // Float casts OK for display
#![allow(clippy::doc_markdown)] // Doc style flexibility

mod analysis;
mod cache;
mod client;
mod config;
mod dashboard;
mod error;
mod types;

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use worker::{Context, Env, Request, Response, Router, console_log, event};

pub use analysis::{Analyzer, build_prompt};
pub use cache::{CacheKey, CandleCache};
pub use client::MarketClient;
pub use config::Config;
pub use error::MarketError;
pub use types::{Candle, CandleSeries, Exchange, Granularity, INSTRUMENTS, Instrument};

/// Result type alias for worker operations
type WResult<T> = std::result::Result<T, worker::Error>;

thread_local! {
    // Workers isolates are single-threaded; one cache per isolate,
    // lost on recycle (a redundant refetch, not a correctness issue).
    static CACHE: RefCell<Option<CandleCache>> = const { RefCell::new(None) };
}

/// Main Worker entry point
#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> WResult<Response> {
    console_error_panic_hook::set_once();

    let router = Router::new();

    router
        // Health check
        .get_async("/health", |_req, ctx| async move {
            let config = match Config::from_env(&ctx.env) {
                Ok(c) => c,
                Err(e) => return Response::error(format!("Config error: {e}"), 500),
            };

            Response::from_json(&serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "environment": config.environment,
                "exchange": config.exchange.as_str(),
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }))
        })
        // Dashboard UI
        .get("/", |_req, _ctx| {
            Response::from_html(dashboard::dashboard_html())
        })
        .get("/dashboard", |_req, _ctx| {
            Response::from_html(dashboard::dashboard_html())
        })
        // Static instrument catalog + granularities for the selectors
        .get_async("/api/instruments", |_req, ctx| async move {
            let exchange = Config::from_env(&ctx.env).map(|c| c.exchange).unwrap_or(Exchange::Coinbase);

            let instruments: Vec<_> = INSTRUMENTS
                .iter()
                .map(|i| {
                    serde_json::json!({
                        "name": i.name,
                        "symbol": i.symbol_for(exchange),
                    })
                })
                .collect();
            let granularities: Vec<_> = Granularity::ALL
                .iter()
                .map(|g| serde_json::json!({ "id": g.as_str(), "label": g.label() }))
                .collect();

            Response::from_json(&serde_json::json!({
                "exchange": exchange.as_str(),
                "instruments": instruments,
                "granularities": granularities,
            }))
        })
        // Normalized candle series (cache-first)
        .get_async("/api/candles", |req, ctx| async move {
            match candles_payload(&req, &ctx.env).await {
                Ok(payload) => Response::from_json(&payload),
                Err(e) => {
                    console_log!("candle fetch failed: {}", e);
                    Response::from_json(&error_payload(&e))
                }
            }
        })
        // AI analysis of the recent tail slice
        .post_async("/api/analyze", |mut req, ctx| async move {
            match analyze_payload(&mut req, &ctx.env).await {
                Ok(payload) => Response::from_json(&payload),
                Err(e) => {
                    console_log!("analysis failed: {}", e);
                    Response::from_json(&error_payload(&e))
                }
            }
        })
        // Fallback
        .run(req, env)
        .await
}

/// Structured non-fatal failure payload. Callers can distinguish
/// "no data" (empty candles, no error) from failures without string
/// matching.
fn error_payload(e: &MarketError) -> serde_json::Value {
    serde_json::json!({
        "error": { "kind": e.kind(), "message": e.to_string() },
        "candles": [],
    })
}

/// Parse common fetch parameters shared by the candle and analyze
/// endpoints. Missing symbol falls back to the catalog's first entry
/// for the selected exchange.
fn fetch_params(
    config: &Config,
    params: &HashMap<String, String>,
) -> std::result::Result<(Exchange, String, Granularity), MarketError> {
    let exchange = match params.get("exchange") {
        Some(raw) => Exchange::parse(raw)
            .ok_or_else(|| MarketError::BadRequest(format!("unknown exchange: {raw}")))?,
        None => config.exchange,
    };

    let symbol = match params.get("symbol") {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => INSTRUMENTS[0].symbol_for(exchange).to_string(),
    };

    let granularity = match params.get("granularity") {
        Some(raw) => Granularity::parse(raw)
            .ok_or_else(|| MarketError::BadRequest(format!("unknown granularity: {raw}")))?,
        None => Granularity::OneHour,
    };

    Ok((exchange, symbol, granularity))
}

/// Cache-first series lookup. Returns the series and whether it came
/// from the cache.
async fn load_series(
    config: &Config,
    exchange: Exchange,
    symbol: &str,
    granularity: Granularity,
) -> std::result::Result<(CandleSeries, bool), MarketError> {
    let key = CacheKey {
        exchange,
        symbol: symbol.to_string(),
        granularity,
    };
    let now = Utc::now();

    let cached = CACHE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let cache = slot.get_or_insert_with(|| CandleCache::new(config.cache_ttl_seconds));
        cache.get(&key, now).cloned()
    });
    if let Some(series) = cached {
        return Ok((series, true));
    }

    let client = MarketClient::new(Duration::from_secs(config.request_timeout_seconds));
    let series = client.fetch(exchange, symbol, granularity).await?;

    CACHE.with(|slot| {
        let mut slot = slot.borrow_mut();
        let cache = slot.get_or_insert_with(|| CandleCache::new(config.cache_ttl_seconds));
        cache.insert(key, series.clone(), Utc::now());
    });

    Ok((series, false))
}

/// Handle `GET /api/candles`.
async fn candles_payload(
    req: &Request,
    env: &Env,
) -> std::result::Result<serde_json::Value, MarketError> {
    let config = Config::from_env(env)?;
    let params = query_params(req)?;
    let (exchange, symbol, granularity) = fetch_params(&config, &params)?;

    let (series, cached) = load_series(&config, exchange, &symbol, granularity).await?;

    let candles: Vec<_> = series
        .candles()
        .iter()
        .map(|c| {
            serde_json::json!({
                "time": c.timestamp.to_rfc3339(),
                "open": c.open,
                "high": c.high,
                "low": c.low,
                "close": c.close,
                "volume": c.volume,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "exchange": series.exchange.as_str(),
        "symbol": series.symbol,
        "granularity": series.granularity.as_str(),
        "count": series.len(),
        "skipped": series.skipped(),
        "last_price": series.last_close(),
        "cached": cached,
        "candles": candles,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Handle `POST /api/analyze`.
async fn analyze_payload(
    req: &mut Request,
    env: &Env,
) -> std::result::Result<serde_json::Value, MarketError> {
    let config = Config::from_env(env)?;

    let body: serde_json::Value = req.json().await.unwrap_or(serde_json::Value::Null);
    let mut params = HashMap::new();
    for field in ["exchange", "symbol", "granularity"] {
        if let Some(value) = body.get(field).and_then(serde_json::Value::as_str) {
            params.insert(field.to_string(), value.to_string());
        }
    }
    let (exchange, symbol, granularity) = fetch_params(&config, &params)?;

    let (series, cached) = load_series(&config, exchange, &symbol, granularity).await?;

    let analyzer = Analyzer::new(
        config.openai_api_key.clone(),
        config.openai_model.clone(),
        Duration::from_secs(config.request_timeout_seconds),
    );
    let analysis = analyzer.analyze(&series, config.analysis_tail).await?;

    Ok(serde_json::json!({
        "exchange": series.exchange.as_str(),
        "symbol": series.symbol,
        "granularity": series.granularity.as_str(),
        "candles_analyzed": series.tail(config.analysis_tail).len(),
        "cached_series": cached,
        "analysis": analysis,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn query_params(req: &Request) -> std::result::Result<HashMap<String, String>, MarketError> {
    let url = req.url()?;
    Ok(url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            environment: "test".into(),
            exchange: Exchange::Coinbase,
            openai_api_key: analysis::PLACEHOLDER_API_KEY.into(),
            openai_model: "gpt-5-mini".into(),
            cache_ttl_seconds: 300,
            request_timeout_seconds: 10,
            analysis_tail: 10,
        }
    }

    #[test]
    fn test_fetch_params_defaults() {
        let config = test_config();
        let (exchange, symbol, granularity) = fetch_params(&config, &HashMap::new()).unwrap();
        assert_eq!(exchange, Exchange::Coinbase);
        assert_eq!(symbol, "BTC-USD");
        assert_eq!(granularity, Granularity::OneHour);
    }

    #[test]
    fn test_fetch_params_exchange_override_switches_default_symbol() {
        let config = test_config();
        let params = HashMap::from([("exchange".to_string(), "bitpanda".to_string())]);
        let (exchange, symbol, _) = fetch_params(&config, &params).unwrap();
        assert_eq!(exchange, Exchange::Bitpanda);
        assert_eq!(symbol, "BTC_EUR");
    }

    #[test]
    fn test_fetch_params_rejects_unknown_granularity() {
        let config = test_config();
        let params = HashMap::from([("granularity".to_string(), "7m".to_string())]);
        let err = fetch_params(&config, &params).unwrap_err();
        assert_eq!(err.kind(), "bad_request");
    }

    #[test]
    fn test_error_payload_is_structured() {
        let payload = error_payload(&MarketError::Upstream {
            status: 500,
            message: "boom".into(),
        });
        assert_eq!(payload["error"]["kind"], "upstream");
        assert!(payload["candles"].as_array().unwrap().is_empty());
    }
}
