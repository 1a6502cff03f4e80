//! Backing store interface.
//!
//! The cache sits in front of a slower key-value store. It reads from the
//! store exactly once per miss and writes to it exactly once per key that
//! leaves the cache for good. Promotions and second chances never touch it.
//!
//! [`MemoryStore`] is a hash-map store that counts its traffic, which is what
//! trace replay and the tests use to measure hit ratios.

extern crate alloc;

use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// The slower store a cache reads through and writes back to.
///
/// Calls are synchronous and must not re-enter the cache.
pub trait BackingStore<K, V> {
    /// Returns the durable value for `key`. Called once per cache miss.
    fn read(&mut self, key: &K) -> V;

    /// Durably records `value` for `key`. Called once per true eviction.
    fn write(&mut self, key: K, value: V);
}

impl<K, V, B: BackingStore<K, V> + ?Sized> BackingStore<K, V> for &mut B {
    #[inline]
    fn read(&mut self, key: &K) -> V {
        (**self).read(key)
    }

    #[inline]
    fn write(&mut self, key: K, value: V) {
        (**self).write(key, value)
    }
}

/// An in-memory backing store that counts reads and writes.
///
/// Keys that were never written read as `V::default()`.
///
/// # Examples
///
/// ```
/// use s3fifo_cache::store::{BackingStore, MemoryStore};
///
/// let mut store: MemoryStore<u32, u64> = MemoryStore::new();
/// assert_eq!(store.read(&7), 0);
/// store.write(7, 42);
/// assert_eq!(store.read(&7), 42);
/// assert_eq!((store.reads(), store.writes()), (2, 1));
/// ```
pub struct MemoryStore<K, V, S = DefaultHashBuilder> {
    data: HashMap<K, V, S>,
    reads: u64,
    writes: u64,
}

impl<K: Hash + Eq, V> MemoryStore<K, V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V> Default for MemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> MemoryStore<K, V, S> {
    /// Creates an empty store using `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        MemoryStore {
            data: HashMap::with_hasher(hash_builder),
            reads: 0,
            writes: 0,
        }
    }

    /// Number of [`read`](BackingStore::read) calls so far.
    pub fn reads(&self) -> u64 {
        self.reads
    }

    /// Number of [`write`](BackingStore::write) calls so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Returns the stored value without counting a read.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    /// Number of keys ever written.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing was written yet.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Resets the read and write counters.
    pub fn reset_counters(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }
}

impl<K: Hash + Eq, V: Clone + Default, S: BuildHasher> BackingStore<K, V>
    for MemoryStore<K, V, S>
{
    fn read(&mut self, key: &K) -> V {
        self.reads += 1;
        self.data.get(key).cloned().unwrap_or_default()
    }

    fn write(&mut self, key: K, value: V) {
        self.writes += 1;
        self.data.insert(key, value);
    }
}

impl<K, V, S> fmt::Debug for MemoryStore<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("len", &self.data.len())
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}
