//! Cache Metrics System
//!
//! Provides metrics collection for the S3-FIFO cache using BTreeMap-based
//! reporting. The engine tracks its queue-specific counters on top of a set of
//! core counters, and exposes all of them through the [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap is used instead of HashMap for several critical reasons:
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and trace replay comparisons
//! - **Stable serialization**: CSV exports have predictable column ordering
//!
//! The performance difference (O(log n) vs O(1)) is negligible with ~25 metric keys.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod s3fifo;

pub use s3fifo::S3FifoCacheMetrics;

/// Counters shared by every cache policy.
///
/// All sizes are entry counts: each resident key occupies exactly one slot.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of accesses (reads and writes) made to the cache
    pub requests: u64,

    /// Number of accesses that found the key resident
    pub cache_hits: u64,

    /// Number of keys admitted into the cache
    pub insertions: u64,

    /// Number of keys removed from the cache and written back
    pub evictions: u64,

    /// Number of keys currently resident
    pub resident_entries: u64,

    /// Number of value slots
    pub capacity_entries: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for a cache with `capacity_entries` slots
    pub fn new(capacity_entries: u64) -> Self {
        Self {
            capacity_entries,
            ..Default::default()
        }
    }

    /// Records an access that found its key resident
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records an access that had to go to the backing store
    ///
    /// Cache misses are calculated as (requests - cache_hits).
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a key taking a slot
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
        self.resident_entries += 1;
    }

    /// Records a key giving up its slot
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
        self.resident_entries = self.resident_entries.saturating_sub(1);
    }

    /// Number of accesses that missed
    pub fn misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates how many of the slots are in use
    pub fn cache_utilization(&self) -> f64 {
        if self.capacity_entries > 0 {
            self.resident_entries as f64 / self.capacity_entries as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics.insert("resident_entries".to_string(), self.resident_entries as f64);
        metrics.insert("capacity_entries".to_string(), self.capacity_entries as f64);
        metrics.insert("cache_utilization".to_string(), self.cache_utilization());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that all cache algorithms must implement for metrics reporting
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics, which is essential
/// for reproducible benchmarks and consistent test results.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification
    fn algorithm_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_metrics_rates() {
        let mut m = CoreCacheMetrics::new(4);
        assert_eq!(m.hit_rate(), 0.0);

        m.record_miss();
        m.record_insertion();
        m.record_hit();
        m.record_hit();
        m.record_hit();

        assert_eq!(m.requests, 4);
        assert_eq!(m.misses(), 1);
        assert_eq!(m.hit_rate(), 0.75);
        assert_eq!(m.miss_rate(), 0.25);
        assert_eq!(m.cache_utilization(), 0.25);
    }

    #[test]
    fn test_core_metrics_eviction_tracks_residency() {
        let mut m = CoreCacheMetrics::new(2);
        m.record_insertion();
        m.record_insertion();
        m.record_eviction();
        assert_eq!(m.resident_entries, 1);
        assert_eq!(m.evictions, 1);

        let map = m.to_btreemap();
        assert_eq!(map.get("insertions"), Some(&2.0));
        assert_eq!(map.get("resident_entries"), Some(&1.0));
        assert!(!map.contains_key("eviction_rate"));
    }
}
