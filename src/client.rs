//! Exchange market data client
//!
//! Fetches public candle data and normalizes the two upstream response
//! shapes into the canonical [`CandleSeries`]:
//!
//! - Coinbase Exchange: JSON array of positional arrays
//!   `[time, low, high, open, close, volume]`, epoch seconds.
//! - Bitpanda: JSON object with a `data` array of keyed records,
//!   string-typed numerics and ISO-8601 timestamps.
//!
//! One GET per fetch, bounded timeout, no retries. Records that fail
//! numeric or timestamp coercion are dropped and counted, never
//! substituted with defaults.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{MarketError, Result};
use crate::types::{Candle, CandleSeries, Exchange, Granularity};

const COINBASE_BASE_URL: &str = "https://api.exchange.coinbase.com";
const BITPANDA_BASE_URL: &str = "https://api.exchange.bitpanda.com/public/v1";

/// How many buckets of history to request from exchanges that require
/// an explicit time window (Bitpanda). Matches the ~300 candles
/// Coinbase returns by default.
const HISTORY_BUCKETS: i64 = 300;

/// Public market data client for both supported exchanges.
pub struct MarketClient {
    timeout: Duration,
}

/// Bitpanda-style response envelope. An empty or missing `data` array
/// is the uniform "no data" signal, not an error.
#[derive(Debug, Deserialize)]
struct KeyedResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl MarketClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Fetch one candle series. Issues a single HTTP GET; a non-2xx
    /// status maps to [`MarketError::Upstream`], transport failures to
    /// [`MarketError::Transport`]. A well-formed response with no
    /// records yields an empty series.
    pub async fn fetch(
        &self,
        exchange: Exchange,
        symbol: &str,
        granularity: Granularity,
    ) -> Result<CandleSeries> {
        if symbol.trim().is_empty() {
            return Err(MarketError::BadRequest("symbol must not be empty".into()));
        }

        let url = candles_url(exchange, symbol, granularity, Utc::now());
        let body = self.get_text(&url).await?;

        let (candles, skipped) = match exchange {
            Exchange::Coinbase => decode_positional(&body)?,
            Exchange::Bitpanda => decode_keyed(&body)?,
        };

        if skipped > 0 {
            worker::console_log!(
                "{exchange} {symbol} {granularity}: dropped {skipped} malformed candle(s)"
            );
        }

        Ok(CandleSeries::new(
            exchange,
            symbol,
            granularity,
            candles,
            skipped,
        ))
    }

    /// Perform the GET and return the body on a success status.
    async fn get_text(&self, url: &str) -> Result<String> {
        let request = reqwest::Client::new()
            .get(url)
            .header("Content-Type", "application/json");

        // reqwest exposes per-request timeouts on native targets only;
        // on wasm32 the Workers runtime bounds the fetch itself.
        #[cfg(not(target_arch = "wasm32"))]
        let request = request.timeout(self.timeout);
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout;

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".into());
            return Err(MarketError::Upstream {
                status: status.as_u16(),
                message: truncate(&message, 200),
            });
        }

        response.text().await.map_err(MarketError::from)
    }
}

/// Build the candle endpoint URL for an exchange.
///
/// Bitpanda requires an explicit window; it gets `HISTORY_BUCKETS`
/// granularity-widths ending at `now`.
fn candles_url(
    exchange: Exchange,
    symbol: &str,
    granularity: Granularity,
    now: DateTime<Utc>,
) -> String {
    match exchange {
        Exchange::Coinbase => format!(
            "{COINBASE_BASE_URL}/products/{symbol}/candles?granularity={}",
            granularity.seconds()
        ),
        Exchange::Bitpanda => {
            let (unit, period) = granularity.bitpanda_unit_period();
            let span = chrono::Duration::seconds(i64::from(granularity.seconds()) * HISTORY_BUCKETS);
            let from = (now - span).to_rfc3339_opts(SecondsFormat::Secs, true);
            let to = now.to_rfc3339_opts(SecondsFormat::Secs, true);
            format!(
                "{BITPANDA_BASE_URL}/candlesticks/{symbol}?unit={unit}&period={period}&from={from}&to={to}"
            )
        }
    }
}

/// Decode the positional-array shape. Returns the parsed candles and
/// the count of records dropped.
fn decode_positional(body: &str) -> Result<(Vec<Candle>, usize)> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| MarketError::Parse(format!("positional candle response: {e}")))?;

    let mut skipped = 0;
    let candles = rows
        .iter()
        .filter_map(|row| {
            let candle = positional_candle(row);
            if candle.is_none() {
                skipped += 1;
            }
            candle
        })
        .collect();

    Ok((candles, skipped))
}

/// One positional record: `[time, low, high, open, close, volume]`.
/// Volume is optional; the four prices and the timestamp are not.
fn positional_candle(row: &[Value]) -> Option<Candle> {
    if row.len() < 5 {
        return None;
    }
    let timestamp = DateTime::from_timestamp(coerce_i64(&row[0])?, 0)?;
    Some(Candle {
        timestamp,
        low: coerce_f64(&row[1])?,
        high: coerce_f64(&row[2])?,
        open: coerce_f64(&row[3])?,
        close: coerce_f64(&row[4])?,
        volume: row.get(5).and_then(coerce_f64),
    })
}

/// Decode the keyed-object shape (`data` array with string-typed
/// numeric fields and an ISO-8601 `time`).
fn decode_keyed(body: &str) -> Result<(Vec<Candle>, usize)> {
    let response: KeyedResponse = serde_json::from_str(body)
        .map_err(|e| MarketError::Parse(format!("keyed candle response: {e}")))?;

    let mut skipped = 0;
    let candles = response
        .data
        .iter()
        .filter_map(|record| {
            let candle = keyed_candle(record);
            if candle.is_none() {
                skipped += 1;
            }
            candle
        })
        .collect();

    Ok((candles, skipped))
}

fn keyed_candle(record: &Value) -> Option<Candle> {
    let timestamp = DateTime::parse_from_rfc3339(record.get("time")?.as_str()?)
        .ok()?
        .with_timezone(&Utc);
    Some(Candle {
        timestamp,
        open: coerce_f64(record.get("open")?)?,
        high: coerce_f64(record.get("high")?)?,
        low: coerce_f64(record.get("low")?)?,
        close: coerce_f64(record.get("close")?)?,
        volume: record.get("volume").and_then(coerce_f64),
    })
}

/// Accept a JSON number or a numeric string. Upstreams disagree on
/// which they emit, sometimes within one API.
fn coerce_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn coerce_i64(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &s[..end])
    }
}
