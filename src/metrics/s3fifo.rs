//! S3-FIFO Cache Metrics
//!
//! Metrics specific to the S3-FIFO cache algorithm.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// S3-FIFO-specific metrics (extends CoreCacheMetrics)
///
/// Tracks where hits land, how keys move between the small, main and ghost
/// queues, and how often the backing store is touched.
#[derive(Debug, Clone)]
pub struct S3FifoCacheMetrics {
    /// Core metrics common to all cache algorithms
    pub core: CoreCacheMetrics,

    /// Hits on keys owned by the small queue
    pub small_hits: u64,

    /// Hits on keys owned by the main queue
    pub main_hits: u64,

    /// Misses on keys remembered by the ghost queue
    pub ghost_hits: u64,

    /// Hot keys moved from small to main during eviction
    pub promotions: u64,

    /// Keys admitted straight into main because the ghost queue remembered them
    pub ghost_promotions: u64,

    /// Main-queue keys given a second chance during eviction
    pub requeues: u64,

    /// Cold keys written back from the small queue
    pub small_evictions: u64,

    /// Keys written back from the main queue
    pub main_evictions: u64,

    /// Ghost entries forgotten to make room for newer ones
    pub ghost_drops: u64,

    /// Values read from the backing store
    pub backing_reads: u64,

    /// Values written to the backing store
    pub backing_writes: u64,

    /// Number of keys currently owned by the small queue
    pub small_size: u64,

    /// Number of keys currently owned by the main queue
    pub main_size: u64,

    /// Number of keys currently remembered by the ghost queue
    pub ghost_size: u64,
}

impl S3FifoCacheMetrics {
    /// Creates a new S3FifoCacheMetrics instance for a cache with `capacity_entries` slots
    pub fn new(capacity_entries: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(capacity_entries),
            small_hits: 0,
            main_hits: 0,
            ghost_hits: 0,
            promotions: 0,
            ghost_promotions: 0,
            requeues: 0,
            small_evictions: 0,
            main_evictions: 0,
            ghost_drops: 0,
            backing_reads: 0,
            backing_writes: 0,
            small_size: 0,
            main_size: 0,
            ghost_size: 0,
        }
    }

    /// Records a hit in the small queue
    pub fn record_small_hit(&mut self) {
        self.core.record_hit();
        self.small_hits += 1;
    }

    /// Records a hit in the main queue
    pub fn record_main_hit(&mut self) {
        self.core.record_hit();
        self.main_hits += 1;
    }

    /// Records a miss; `in_ghost` marks a key the ghost queue still remembered
    pub fn record_miss(&mut self, in_ghost: bool) {
        self.core.record_miss();
        self.backing_reads += 1;
        if in_ghost {
            self.ghost_hits += 1;
        }
    }

    /// Records a key taking a slot; `from_ghost` marks a direct admission into main
    pub fn record_insertion(&mut self, from_ghost: bool) {
        self.core.record_insertion();
        if from_ghost {
            self.ghost_promotions += 1;
        }
    }

    /// Records a hot key moving from small to main
    pub fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    /// Records a second chance in the main queue
    pub fn record_requeue(&mut self) {
        self.requeues += 1;
    }

    /// Records a cold key leaving the small queue
    pub fn record_small_eviction(&mut self) {
        self.core.record_eviction();
        self.small_evictions += 1;
        self.backing_writes += 1;
    }

    /// Records a key leaving the main queue
    pub fn record_main_eviction(&mut self) {
        self.core.record_eviction();
        self.main_evictions += 1;
        self.backing_writes += 1;
    }

    /// Records the ghost queue forgetting its oldest key
    pub fn record_ghost_drop(&mut self) {
        self.ghost_drops += 1;
    }

    /// Updates the queue sizes
    pub fn update_queue_sizes(&mut self, small: u64, main: u64, ghost: u64) {
        self.small_size = small;
        self.main_size = main;
        self.ghost_size = ghost;
    }

    /// Fraction of misses that the ghost queue recognised
    pub fn ghost_hit_ratio(&self) -> f64 {
        let misses = self.core.misses();
        if misses > 0 {
            self.ghost_hits as f64 / misses as f64
        } else {
            0.0
        }
    }

    /// Fraction of keys leaving the small queue that were promoted rather than evicted
    pub fn promotion_ratio(&self) -> f64 {
        let left_small = self.promotions + self.small_evictions;
        if left_small > 0 {
            self.promotions as f64 / left_small as f64
        } else {
            0.0
        }
    }

    /// Converts S3-FIFO metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("small_hits".to_string(), self.small_hits as f64);
        metrics.insert("main_hits".to_string(), self.main_hits as f64);
        metrics.insert("ghost_hits".to_string(), self.ghost_hits as f64);
        metrics.insert("ghost_hit_ratio".to_string(), self.ghost_hit_ratio());

        metrics.insert("promotions".to_string(), self.promotions as f64);
        metrics.insert("ghost_promotions".to_string(), self.ghost_promotions as f64);
        metrics.insert("promotion_ratio".to_string(), self.promotion_ratio());
        metrics.insert("requeues".to_string(), self.requeues as f64);

        metrics.insert("small_evictions".to_string(), self.small_evictions as f64);
        metrics.insert("main_evictions".to_string(), self.main_evictions as f64);
        metrics.insert("ghost_drops".to_string(), self.ghost_drops as f64);

        metrics.insert("backing_reads".to_string(), self.backing_reads as f64);
        metrics.insert("backing_writes".to_string(), self.backing_writes as f64);

        metrics.insert("small_size".to_string(), self.small_size as f64);
        metrics.insert("main_size".to_string(), self.main_size as f64);
        metrics.insert("ghost_size".to_string(), self.ghost_size as f64);

        metrics
    }
}

impl CacheMetrics for S3FifoCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "S3FIFO"
    }
}
