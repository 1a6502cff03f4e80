//! Trace replay against an S3-FIFO cache.
//!
//! Every key in the trace is one `read` through the cache. The cache fronts a
//! fixed-size [`DenseStore`] holding one `u64` per object, and the hit ratio is
//! `1 - store reads / ops`, so it counts exactly the accesses the cache served.

use s3fifo_cache::config::S3FifoCacheConfig;
use s3fifo_cache::metrics::CacheMetrics;
use s3fifo_cache::store::BackingStore;
use s3fifo_cache::S3FifoCache;
use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

/// Backing store with one slot per object id, counting reads and writes.
pub struct DenseStore {
    data: Vec<u64>,
    reads: u64,
    writes: u64,
}

impl DenseStore {
    /// Creates a zeroed store for ids `0..objects`.
    pub fn new(objects: u32) -> Self {
        Self {
            data: vec![0; objects as usize],
            reads: 0,
            writes: 0,
        }
    }

    /// Number of object ids the store holds.
    pub fn objects(&self) -> u32 {
        self.data.len() as u32
    }

    /// Number of reads so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of writes so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl BackingStore<u32, u64> for DenseStore {
    fn read(&mut self, key: &u32) -> u64 {
        self.reads += 1;
        self.data[*key as usize]
    }

    fn write(&mut self, key: u32, value: u64) {
        self.writes += 1;
        self.data[key as usize] = value;
    }
}

impl fmt::Debug for DenseStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DenseStore")
            .field("objects", &self.data.len())
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

/// Error returned when a trace key falls outside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyOutOfRange {
    /// The offending key
    pub key: u32,
    /// Number of objects in the store
    pub objects: u32,
}

impl fmt::Display for KeyOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {} is outside the store of {} objects",
            self.key, self.objects
        )
    }
}

impl std::error::Error for KeyOutOfRange {}

/// Outcome of a replay
#[derive(Debug, Clone)]
pub struct ReplayResult {
    /// Number of accesses replayed
    pub ops: u64,
    /// Reads the cache issued against the store
    pub store_reads: u64,
    /// Write-backs the cache issued against the store
    pub store_writes: u64,
    /// Wall-clock time spent in the cache
    pub duration: Duration,
    /// Engine metrics at the end of the replay
    pub metrics: BTreeMap<String, f64>,
}

impl ReplayResult {
    /// `1 - store reads / ops`, or 0 for an empty trace.
    pub fn hit_ratio(&self) -> f64 {
        if self.ops == 0 {
            0.0
        } else {
            1.0 - self.store_reads as f64 / self.ops as f64
        }
    }
}

/// Replays a trace of keys through a cache built from `config`.
pub struct Replayer {
    cache: S3FifoCache<u32, u64, DenseStore>,
    ops: u64,
    elapsed: Duration,
}

impl Replayer {
    /// Creates a replayer over a store of `objects` ids.
    pub fn new(config: S3FifoCacheConfig, objects: u32) -> Self {
        Self {
            cache: S3FifoCache::from_config(config, DenseStore::new(objects)),
            ops: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Reads `key` through the cache.
    pub fn access(&mut self, key: u32) -> Result<(), KeyOutOfRange> {
        let objects = self.cache.store().objects();
        if key >= objects {
            return Err(KeyOutOfRange { key, objects });
        }
        let start = Instant::now();
        self.cache.read(&key);
        self.elapsed += start.elapsed();
        self.ops += 1;
        Ok(())
    }

    /// Returns the counters so far.
    pub fn result(&self) -> ReplayResult {
        let store = self.cache.store();
        ReplayResult {
            ops: self.ops,
            store_reads: store.reads(),
            store_writes: store.writes(),
            duration: self.elapsed,
            metrics: self.cache.metrics(),
        }
    }
}

impl fmt::Debug for Replayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replayer")
            .field("cache", &self.cache)
            .field("ops", &self.ops)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;

    fn replayer(small: usize, main: usize, objects: u32) -> Replayer {
        let config = S3FifoCacheConfig::new(
            NonZeroUsize::new(small).unwrap(),
            NonZeroUsize::new(main).unwrap(),
        );
        Replayer::new(config, objects)
    }

    #[test]
    fn test_repeated_key_hit_ratio() {
        let mut r = replayer(1, 9, 100);
        for _ in 0..10 {
            r.access(5).unwrap();
        }
        let result = r.result();
        assert_eq!(result.ops, 10);
        assert_eq!(result.store_reads, 1);
        assert!((result.hit_ratio() - 0.9).abs() < 1e-12);
        assert_eq!(result.metrics.get("cache_hits"), Some(&9.0));
    }

    #[test]
    fn test_scan_has_no_hits() {
        let mut r = replayer(1, 3, 100);
        for key in 0..100 {
            r.access(key).unwrap();
        }
        let result = r.result();
        assert_eq!(result.hit_ratio(), 0.0);
        assert_eq!(result.store_writes, 99);
    }

    #[test]
    fn test_out_of_range_key() {
        let mut r = replayer(1, 1, 10);
        assert_eq!(
            r.access(10),
            Err(KeyOutOfRange {
                key: 10,
                objects: 10
            })
        );
        assert_eq!(r.result().ops, 0);
    }

    #[test]
    fn test_empty_replay() {
        let r = replayer(1, 1, 10);
        assert_eq!(r.result().hit_ratio(), 0.0);
    }
}
