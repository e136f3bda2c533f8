//! Expiring cache for upstream chart responses.

use crate::types::{ChartRange, PricePoint};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identifies one upstream chart request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartKey {
    pub symbol: String,
    pub range: ChartRange,
    pub interval: String,
}

impl ChartKey {
    pub fn new(symbol: &str, range: ChartRange, interval: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            range,
            interval: interval.to_string(),
        }
    }
}

struct CacheEntry {
    series: Arc<Vec<PricePoint>>,
    expires_at: Instant,
}

/// Thread-safe TTL cache of parsed price series. A zero TTL disables caching.
pub struct ChartCache {
    data: DashMap<ChartKey, CacheEntry>,
    ttl: Duration,
}

impl ChartCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    /// Get a live entry, dropping it if it has expired.
    pub fn get(&self, key: &ChartKey) -> Option<Arc<Vec<PricePoint>>> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.series.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Store a series and return the shared handle to it.
    pub fn insert(&self, key: ChartKey, series: Vec<PricePoint>) -> Arc<Vec<PricePoint>> {
        let series = Arc::new(series);
        if !self.ttl.is_zero() {
            self.data.insert(
                key,
                CacheEntry {
                    series: series.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        series
    }

    /// Remove all expired entries.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries, including expired ones not yet cleaned up.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
