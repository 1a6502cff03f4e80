#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Module Map
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  S3FifoCache  (s3fifo)                                           │
//! │    ├── SlotTracker  (tracker)  key -> (queue, slot), free pool   │
//! │    │     └── RingBuffer x3  (ring)  small order, main order,    │
//! │    │                                 free slot indices          │
//! │    ├── GhostQueue  (ghost)     evicted keys, no values           │
//! │    ├── values / freq arenas    one entry per slot                │
//! │    └── BackingStore  (store)   read on miss, write on eviction   │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Choosing Capacities
//!
//! | Parameter | Conventional value | Effect |
//! |-----------|--------------------|--------|
//! | `small_capacity` | 10% of slots | Larger filters fewer one-hit wonders |
//! | `main_capacity` | 90% of slots | Holds keys that proved themselves |
//! | `ghost_capacity` | `main_capacity` | How long an evicted key is remembered |
//! | `hot_threshold` | 1 | Accesses beyond admission needed for promotion |
//!
//! ## Borrowing a Store
//!
//! `BackingStore` is implemented for `&mut B`, so a cache can work against a
//! store the caller keeps:
//!
//! ```rust
//! use s3fifo_cache::S3FifoCache;
//! use s3fifo_cache::store::MemoryStore;
//! use core::num::NonZeroUsize;
//!
//! let mut store: MemoryStore<u32, u32> = MemoryStore::new();
//! {
//!     let mut cache = S3FifoCache::new(
//!         NonZeroUsize::new(1).unwrap(),
//!         NonZeroUsize::new(3).unwrap(),
//!         &mut store,
//!     );
//!     cache.write(1, 10);
//!     cache.flush();
//! }
//! assert_eq!(store.peek(&1), Some(&10));
//! ```
//!
//! ## Metrics
//!
//! ```rust
//! use s3fifo_cache::S3FifoCache;
//! use s3fifo_cache::metrics::CacheMetrics;
//! use s3fifo_cache::store::MemoryStore;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = S3FifoCache::new(
//!     NonZeroUsize::new(2).unwrap(),
//!     NonZeroUsize::new(8).unwrap(),
//!     MemoryStore::<u32, u32>::new(),
//! );
//! cache.read(&1);
//! cache.read(&1);
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics.get("cache_hits"), Some(&1.0));
//! assert_eq!(metrics.get("backing_reads"), Some(&1.0));
//! ```

#![no_std]

#[cfg(not(feature = "hashbrown"))]
extern crate std;

/// Fixed-capacity circular FIFO.
///
/// The building block for every queue in the cache, including the pool of
/// free slot indices.
pub mod ring;

/// Key-to-slot tracking for the small and main queues.
pub mod tracker;

/// Bounded memory of recently evicted keys.
pub mod ghost;

/// Cache configuration structures.
pub mod config;

/// Cache metrics system.
///
/// Provides the counters the engine records and the `CacheMetrics` reporting
/// interface.
pub mod metrics;

/// Backing store interface and an in-memory implementation.
pub mod store;

/// S3-FIFO cache implementation.
///
/// Provides a fixed-size write-back cache that admits keys into a small FIFO,
/// promotes the ones reused there into a main FIFO with second chances, and
/// remembers recent evictions in a ghost FIFO.
pub mod s3fifo;

pub use config::S3FifoCacheConfig;
pub use metrics::{CacheMetrics, S3FifoCacheMetrics};
pub use s3fifo::{KeyState, S3FifoCache};
pub use store::{BackingStore, MemoryStore};
pub use tracker::Queue;
