//! Common types for the market data pipeline
//!
//! Canonical candle representation shared by the exchange client,
//! the cache, the analysis prompt and the dashboard API.

use chrono::{DateTime, Utc};

/// One OHLC observation in the canonical shape.
///
/// Prices are floats in the quote currency; volume is absent for
/// sources that do not report it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    /// When the candle opened
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Supported candle widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    OneHour,
    FourHours,
    OneDay,
}

impl Granularity {
    /// All granularities the dashboard offers.
    pub const ALL: [Granularity; 3] = [
        Granularity::OneHour,
        Granularity::FourHours,
        Granularity::OneDay,
    ];

    /// Coinbase Exchange `granularity` query value (bucket width in seconds)
    pub fn seconds(self) -> u32 {
        match self {
            Granularity::OneHour => 3_600,
            Granularity::FourHours => 14_400,
            Granularity::OneDay => 86_400,
        }
    }

    /// Bitpanda `unit` + `period` query pair
    pub fn bitpanda_unit_period(self) -> (&'static str, u32) {
        match self {
            Granularity::OneHour => ("HOURS", 1),
            Granularity::FourHours => ("HOURS", 4),
            Granularity::OneDay => ("DAYS", 1),
        }
    }

    /// Short identifier used in query strings and cache keys
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::OneHour => "1h",
            Granularity::FourHours => "4h",
            Granularity::OneDay => "1d",
        }
    }

    /// Human label for the UI
    pub fn label(self) -> &'static str {
        match self {
            Granularity::OneHour => "1 Hour",
            Granularity::FourHours => "4 Hours",
            Granularity::OneDay => "1 Day",
        }
    }

    /// Parse the short identifier (`1h`, `4h`, `1d`)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "1h" => Some(Granularity::OneHour),
            "4h" => Some(Granularity::FourHours),
            "1d" => Some(Granularity::OneDay),
            _ => None,
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upstream data source. Selects the endpoint URL and the response
/// shape the client decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    /// Positional-array candles: `[time, low, high, open, close, volume]`
    Coinbase,
    /// Keyed candles under a top-level `data` array, string-typed numerics
    Bitpanda,
}

impl Exchange {
    pub fn as_str(self) -> &'static str {
        match self {
            Exchange::Coinbase => "coinbase",
            Exchange::Bitpanda => "bitpanda",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "coinbase" => Some(Exchange::Coinbase),
            "bitpanda" => Some(Exchange::Bitpanda),
            _ => None,
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tradable asset in the fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Instrument {
    /// Display name for the UI
    pub name: &'static str,
    /// Coinbase Exchange product id
    pub coinbase_id: &'static str,
    /// Bitpanda instrument code
    pub bitpanda_code: &'static str,
}

impl Instrument {
    /// The symbol understood by the given exchange.
    pub fn symbol_for(&self, exchange: Exchange) -> &'static str {
        match exchange {
            Exchange::Coinbase => self.coinbase_id,
            Exchange::Bitpanda => self.bitpanda_code,
        }
    }
}

/// Static instrument catalog. No dynamic discovery.
pub const INSTRUMENTS: [Instrument; 5] = [
    Instrument {
        name: "Bitcoin (BTC/USD)",
        coinbase_id: "BTC-USD",
        bitpanda_code: "BTC_EUR",
    },
    Instrument {
        name: "Ethereum (ETH/USD)",
        coinbase_id: "ETH-USD",
        bitpanda_code: "ETH_EUR",
    },
    Instrument {
        name: "Solana (SOL/USD)",
        coinbase_id: "SOL-USD",
        bitpanda_code: "SOL_EUR",
    },
    Instrument {
        name: "Cardano (ADA/USD)",
        coinbase_id: "ADA-USD",
        bitpanda_code: "ADA_EUR",
    },
    Instrument {
        name: "Dogecoin (DOGE/USD)",
        coinbase_id: "DOGE-USD",
        bitpanda_code: "DOGE_EUR",
    },
];

/// Ordered candle series for one `(exchange, symbol, granularity)` query.
///
/// Construction normalizes the input: candles are sorted ascending by
/// timestamp and equal timestamps are collapsed last-write-wins, so
/// consumers always see strictly increasing timestamps. `skipped` counts
/// upstream records dropped during decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    pub exchange: Exchange,
    pub symbol: String,
    pub granularity: Granularity,
    candles: Vec<Candle>,
    skipped: usize,
}

impl CandleSeries {
    /// Build a series from decoded candles, normalizing order.
    ///
    /// Upstream order is not trusted: Coinbase returns newest-first,
    /// Bitpanda oldest-first.
    pub fn new(
        exchange: Exchange,
        symbol: impl Into<String>,
        granularity: Granularity,
        mut candles: Vec<Candle>,
        skipped: usize,
    ) -> Self {
        // Stable sort keeps upstream order within equal timestamps, so
        // the dedup below keeps the record that appeared later upstream.
        candles.sort_by_key(|c| c.timestamp);
        candles.dedup_by(|later, earlier| {
            if later.timestamp == earlier.timestamp {
                *earlier = *later;
                true
            } else {
                false
            }
        });

        Self {
            exchange,
            symbol: symbol.into(),
            granularity,
            candles,
            skipped,
        }
    }

    /// Read-only view of the candles, oldest first.
    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Empty means "no data available", an explicit signal rather than
    /// a failure.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Records dropped during decoding because a field failed coercion.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Close price of the most recent candle.
    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }

    /// Last `n` candles in chronological order. Returns fewer (possibly
    /// zero) when the series is shorter; never pads, never errors.
    pub fn tail(&self, n: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(n);
        &self.candles[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn candle(ts: i64, close: f64) -> Candle {
        Candle {
            timestamp: Utc.timestamp_opt(ts, 0).unwrap(),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: Some(10.0),
        }
    }

    fn series(candles: Vec<Candle>) -> CandleSeries {
        CandleSeries::new(
            Exchange::Coinbase,
            "BTC-USD",
            Granularity::OneHour,
            candles,
            0,
        )
    }

    #[test]
    fn test_series_sorts_ascending() {
        let s = series(vec![candle(300, 3.0), candle(100, 1.0), candle(200, 2.0)]);
        let ts: Vec<i64> = s
            .candles()
            .iter()
            .map(|c| c.timestamp.timestamp())
            .collect();
        assert_eq!(ts, vec![100, 200, 300]);
    }

    #[test]
    fn test_series_dedup_last_write_wins() {
        let s = series(vec![candle(100, 1.0), candle(200, 2.0), candle(100, 9.0)]);
        assert_eq!(s.len(), 2);
        // The later upstream record for t=100 survives
        assert_eq!(s.candles()[0].close, 9.0);
    }

    #[test]
    fn test_tail_bounds() {
        let s = series(vec![candle(100, 1.0), candle(200, 2.0), candle(300, 3.0)]);

        assert!(s.tail(0).is_empty());
        assert_eq!(s.tail(2).len(), 2);
        assert_eq!(s.tail(2)[0].close, 2.0); // chronological order preserved
        assert_eq!(s.tail(10).len(), 3); // shorter series: fewer, no padding
    }

    #[test]
    fn test_empty_series_signals_no_data() {
        let s = series(vec![]);
        assert!(s.is_empty());
        assert!(s.last_close().is_none());
        assert!(s.tail(5).is_empty());
    }

    #[test]
    fn test_last_close_uses_newest_candle() {
        let s = series(vec![candle(200, 2.0), candle(100, 1.0)]);
        assert_eq!(s.last_close(), Some(2.0));
    }

    #[test]
    fn test_granularity_roundtrip() {
        for g in Granularity::ALL {
            assert_eq!(Granularity::parse(g.as_str()), Some(g));
        }
        assert_eq!(Granularity::parse("1H"), Some(Granularity::OneHour));
        assert!(Granularity::parse("5m").is_none());
    }

    #[test]
    fn test_granularity_exchange_params() {
        assert_eq!(Granularity::OneHour.seconds(), 3600);
        assert_eq!(Granularity::FourHours.seconds(), 14400);
        assert_eq!(Granularity::OneDay.bitpanda_unit_period(), ("DAYS", 1));
        assert_eq!(Granularity::FourHours.bitpanda_unit_period(), ("HOURS", 4));
    }

    #[test]
    fn test_instrument_symbols() {
        let btc = &INSTRUMENTS[0];
        assert_eq!(btc.symbol_for(Exchange::Coinbase), "BTC-USD");
        assert_eq!(btc.symbol_for(Exchange::Bitpanda), "BTC_EUR");
    }

    #[test]
    fn test_exchange_parse() {
        assert_eq!(Exchange::parse("Coinbase"), Some(Exchange::Coinbase));
        assert_eq!(Exchange::parse("bitpanda"), Some(Exchange::Bitpanda));
        assert!(Exchange::parse("kraken").is_none());
    }
}
