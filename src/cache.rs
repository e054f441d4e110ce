//! Bounded-staleness cache for fetched candle series
//!
//! Explicit replacement for implicit framework memoization: a map from
//! the exact `(exchange, symbol, granularity)` tuple to the fetched
//! series plus its fetch time. The caller checks expiry and decides
//! whether to refetch; inserts replace unconditionally, so the last
//! completed fetch wins. Entries expire independently.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::types::{CandleSeries, Exchange, Granularity};

/// Exact parameter tuple identifying one cached series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub exchange: Exchange,
    pub symbol: String,
    pub granularity: Granularity,
}

struct CacheEntry {
    series: CandleSeries,
    fetched_at: DateTime<Utc>,
}

/// TTL cache keyed by fetch parameters.
pub struct CandleCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl CandleCache {
    /// Create a cache whose entries stay fresh for `ttl_seconds`.
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds),
            entries: HashMap::new(),
        }
    }

    /// Fresh series for `key`, if one was fetched within the TTL window
    /// as of `now`. Expired entries are treated as absent.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<&CandleSeries> {
        let entry = self.entries.get(key)?;
        if now - entry.fetched_at >= self.ttl {
            return None;
        }
        Some(&entry.series)
    }

    /// Store a freshly fetched series, replacing any previous entry for
    /// the same key.
    pub fn insert(&mut self, key: CacheKey, series: CandleSeries, fetched_at: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry { series, fetched_at });
    }

    /// Drop entries that are expired as of `now`. Housekeeping only;
    /// `get` never returns stale data either way.
    pub fn evict_expired(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Candle;
    use chrono::TimeZone;

    fn key(symbol: &str, granularity: Granularity) -> CacheKey {
        CacheKey {
            exchange: Exchange::Coinbase,
            symbol: symbol.to_string(),
            granularity,
        }
    }

    fn series(symbol: &str, close: f64) -> CandleSeries {
        let candle = Candle {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        };
        CandleSeries::new(
            Exchange::Coinbase,
            symbol,
            Granularity::OneHour,
            vec![candle],
            0,
        )
    }

    #[test]
    fn test_hit_within_ttl() {
        let mut cache = CandleCache::new(300);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let k = key("BTC-USD", Granularity::OneHour);

        cache.insert(k.clone(), series("BTC-USD", 100.0), t0);

        let hit = cache.get(&k, t0 + Duration::seconds(299)).unwrap();
        assert_eq!(hit.last_close(), Some(100.0));
    }

    #[test]
    fn test_expiry_at_ttl_boundary() {
        let mut cache = CandleCache::new(300);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let k = key("BTC-USD", Granularity::OneHour);

        cache.insert(k.clone(), series("BTC-USD", 100.0), t0);

        assert!(cache.get(&k, t0 + Duration::seconds(300)).is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let mut cache = CandleCache::new(300);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        cache.insert(
            key("BTC-USD", Granularity::OneHour),
            series("BTC-USD", 100.0),
            t0,
        );

        // Same symbol, different granularity: miss
        assert!(cache.get(&key("BTC-USD", Granularity::OneDay), t0).is_none());
        // Different symbol: miss
        assert!(cache.get(&key("ETH-USD", Granularity::OneHour), t0).is_none());
    }

    #[test]
    fn test_insert_replaces_previous_entry() {
        let mut cache = CandleCache::new(300);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let k = key("BTC-USD", Granularity::OneHour);

        cache.insert(k.clone(), series("BTC-USD", 100.0), t0);
        cache.insert(
            k.clone(),
            series("BTC-USD", 200.0),
            t0 + Duration::seconds(60),
        );

        // Last completed fetch wins, and its clock restarts the TTL
        let hit = cache.get(&k, t0 + Duration::seconds(350)).unwrap();
        assert_eq!(hit.last_close(), Some(200.0));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entries_expire_independently() {
        let mut cache = CandleCache::new(300);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        cache.insert(
            key("BTC-USD", Granularity::OneHour),
            series("BTC-USD", 100.0),
            t0,
        );
        cache.insert(
            key("ETH-USD", Granularity::OneHour),
            series("ETH-USD", 50.0),
            t0 + Duration::seconds(200),
        );

        let later = t0 + Duration::seconds(400);
        assert!(cache.get(&key("BTC-USD", Granularity::OneHour), later).is_none());
        assert!(cache.get(&key("ETH-USD", Granularity::OneHour), later).is_some());

        cache.evict_expired(later);
        assert_eq!(cache.len(), 1);
    }
}
