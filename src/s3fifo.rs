//! S3-FIFO Cache Implementation
//!
//! S3-FIFO is a scan-resistant replacement policy built entirely from FIFO
//! queues. It approaches LRU-class hit ratios without reordering anything on a
//! hit: an access only bumps a small saturating counter.
//!
//! # How the Algorithm Works
//!
//! ## Queue Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              S3-FIFO Cache                                   │
//! │                                                                              │
//! │   miss ──▶ ┌───────────────────────┐  hot (freq > threshold)                 │
//! │            │  SMALL  (first chance) │ ───────────────────┐                    │
//! │            └───────────┬───────────┘                     ▼                    │
//! │                        │ cold            ┌───────────────────────────────┐   │
//! │                        ▼ (written back)  │  MAIN  (second chance)         │   │
//! │            ┌───────────────────────┐     │  freq > 0: decrement, requeue  │◀─┐│
//! │            │  GHOST  (keys only)    │────▶│  freq = 0: written back        │  ││
//! │            └───────────────────────┘ hit └──────────────┬────────────────┘  ││
//! │                                                         └───────────────────┘│
//! │                                                                              │
//! │   slots: [ v0 | v1 | v2 | ... ]   one shared arena for small and main       │
//! │   freq:  [ f0 | f1 | f2 | ... ]   saturating at 3                           │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Entry Lifecycle
//!
//! 1. **Miss**: the value is read from the backing store. A key remembered by
//!    the ghost queue goes straight to main; any other key enters small.
//! 2. **Hit**: the slot's frequency is bumped, saturating at 3. Nothing moves.
//! 3. **Leaving small**: a hot key moves to main keeping its slot and value; a
//!    cold key is written back, frees its slot and is remembered as a ghost.
//! 4. **Leaving main**: a key with frequency above zero loses one point and is
//!    requeued at the tail; a key at zero is written back and frees its slot.
//! 5. **Leaving ghost**: the oldest ghost is forgotten when room is needed.
//!
//! The backing store is written exactly when a key stops being resident.
//! Promotions and requeues move only the key, never the value.
//!
//! ## Operations
//!
//! | Operation | Action | Time |
//! |-----------|--------|------|
//! | `read(key)` | Return a copy of the value, admitting on miss | O(1) amortized |
//! | `write(key, value)` | Overwrite the value, admitting on miss | O(1) amortized |
//! | `get_mut(key)` | Mutable access, admitting on miss | O(1) amortized |
//! | `evict()` | Run one eviction step | O(1) amortized |
//!
//! A main-queue eviction may requeue every resident main key before it finds
//! one at zero, but each requeue spends a frequency point that only a hit can
//! give back, so the work is bounded by three requeues per hit.
//!
//! # Policy Parameters
//!
//! Two choices are configurable rather than fixed, see
//! [`S3FifoCacheConfig`](crate::config::S3FifoCacheConfig):
//!
//! - `hot_threshold` (default 1): since the admitting access already counts,
//!   a threshold of 1 means a key must be touched again while in small to be
//!   promoted.
//! - `decrement_on_promotion` (default off).
//!
//! # Thread Safety
//!
//! `S3FifoCache` is **not thread-safe**: every operation takes `&mut self` and
//! runs its eviction chain to completion. Wrap it in a `Mutex` for shared use.
//!
//! # Examples
//!
//! ```
//! use s3fifo_cache::S3FifoCache;
//! use s3fifo_cache::store::MemoryStore;
//! use core::num::NonZeroUsize;
//!
//! let store: MemoryStore<u32, u64> = MemoryStore::new();
//! let mut cache = S3FifoCache::new(
//!     NonZeroUsize::new(1).unwrap(),
//!     NonZeroUsize::new(9).unwrap(),
//!     store,
//! );
//!
//! cache.write(1, 100);
//! assert_eq!(cache.read(&1), 100);
//! assert_eq!(cache.store().reads(), 1);  // only the admitting miss
//! ```

extern crate alloc;

use crate::config::s3fifo::MAX_FREQUENCY;
use crate::config::S3FifoCacheConfig;
use crate::ghost::GhostQueue;
use crate::metrics::{CacheMetrics, S3FifoCacheMetrics};
use crate::ring::Iter;
use crate::store::BackingStore;
use crate::tracker::{Queue, SlotTracker};
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// Where a key currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Neither resident nor remembered.
    Absent,
    /// Resident in the small queue.
    Small,
    /// Resident in the main queue.
    Main,
    /// Remembered by the ghost queue, without a value.
    Ghost,
}

/// An S3-FIFO cache in front of a [`BackingStore`].
///
/// Holds at most `small_capacity + main_capacity` values in a fixed arena and
/// remembers up to `ghost_capacity` recently evicted keys.
///
/// # Examples
///
/// ```
/// use s3fifo_cache::{KeyState, S3FifoCache};
/// use s3fifo_cache::config::S3FifoCacheConfig;
/// use s3fifo_cache::store::MemoryStore;
/// use core::num::NonZeroUsize;
///
/// let config = S3FifoCacheConfig::new(
///     NonZeroUsize::new(1).unwrap(),
///     NonZeroUsize::new(2).unwrap(),
/// );
/// let mut cache = S3FifoCache::from_config(config, MemoryStore::<&str, i32>::new());
///
/// cache.write("a", 1);
/// cache.write("b", 2);             // "a" was touched once: cold, written back
/// assert_eq!(cache.state(&"a"), KeyState::Ghost);
/// assert_eq!(cache.store().peek(&"a"), Some(&1));
///
/// assert_eq!(cache.read(&"a"), 1); // remembered, so admitted straight into main
/// assert_eq!(cache.state(&"a"), KeyState::Main);
/// ```
pub struct S3FifoCache<K, V, B, S = DefaultHashBuilder> {
    config: S3FifoCacheConfig,
    tracker: SlotTracker<K, S>,
    ghost: GhostQueue<K, S>,
    values: Box<[Option<V>]>,
    freq: Box<[u8]>,
    store: B,
    metrics: S3FifoCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, B: BackingStore<K, V>> S3FifoCache<K, V, B> {
    /// Creates a cache with the given queue capacities and default policy.
    ///
    /// This is a convenience constructor. For more control, use
    /// [`S3FifoCache::from_config`].
    pub fn new(small_capacity: NonZeroUsize, main_capacity: NonZeroUsize, store: B) -> Self {
        Self::from_config(S3FifoCacheConfig::new(small_capacity, main_capacity), store)
    }

    /// Creates a cache from a configuration.
    ///
    /// # Panics
    ///
    /// Panics if `config.hot_threshold` is not below the frequency cap.
    pub fn from_config(config: S3FifoCacheConfig, store: B) -> Self {
        Self::with_hasher(config, store, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq + Clone, V, B: BackingStore<K, V>, S: BuildHasher + Clone>
    S3FifoCache<K, V, B, S>
{
    /// Creates a cache from a configuration using `hash_builder` for its maps.
    ///
    /// # Panics
    ///
    /// Panics if `config.hot_threshold` is not below the frequency cap.
    pub fn with_hasher(config: S3FifoCacheConfig, store: B, hash_builder: S) -> Self {
        config.validate();
        let total = config.total_slots();
        let mut values = Vec::with_capacity(total);
        values.resize_with(total, || None);

        S3FifoCache {
            config,
            tracker: SlotTracker::with_hasher(
                config.small_capacity,
                config.main_capacity,
                hash_builder.clone(),
            ),
            ghost: GhostQueue::with_hasher(config.ghost_capacity, hash_builder),
            values: values.into_boxed_slice(),
            freq: vec![0; total].into_boxed_slice(),
            store,
            metrics: S3FifoCacheMetrics::new(total as u64),
        }
    }

    /// Returns the configuration the cache was built with.
    #[inline]
    pub fn config(&self) -> &S3FifoCacheConfig {
        &self.config
    }

    /// Returns the number of value slots.
    #[inline]
    pub fn cap(&self) -> usize {
        self.config.total_slots()
    }

    /// Returns the number of resident keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.tracker.resident()
    }

    /// Returns `true` if no key is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracker.resident() == 0
    }

    /// Returns the number of keys in the small queue.
    #[inline]
    pub fn small_len(&self) -> usize {
        self.tracker.len(Queue::Small)
    }

    /// Returns the number of keys in the main queue.
    #[inline]
    pub fn main_len(&self) -> usize {
        self.tracker.len(Queue::Main)
    }

    /// Returns the number of keys remembered by the ghost queue.
    #[inline]
    pub fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    /// Returns `true` if `key` is resident.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.tracker.contains(key)
    }

    /// Reports which queue, if any, holds `key`.
    pub fn state<Q>(&self, key: &Q) -> KeyState
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.tracker.location(key) {
            Some((Queue::Small, _)) => KeyState::Small,
            Some((Queue::Main, _)) => KeyState::Main,
            None if self.ghost.contains(key) => KeyState::Ghost,
            None => KeyState::Absent,
        }
    }

    /// Returns the access frequency of a resident key.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u8>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.tracker.location(key).map(|(_, slot)| self.freq[slot])
    }

    /// Returns the value of a resident key without counting an access.
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let (_, slot) = self.tracker.location(key)?;
        self.values[slot].as_ref()
    }

    /// Iterates the small queue from oldest to newest.
    pub fn small_keys(&self) -> Iter<'_, K> {
        self.tracker.iter(Queue::Small)
    }

    /// Iterates the main queue from oldest to newest.
    pub fn main_keys(&self) -> Iter<'_, K> {
        self.tracker.iter(Queue::Main)
    }

    /// Iterates the ghost queue from oldest to newest.
    pub fn ghost_keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.ghost.iter()
    }

    /// Returns a shared reference to the backing store.
    #[inline]
    pub fn store(&self) -> &B {
        &self.store
    }

    /// Returns a mutable reference to the backing store.
    ///
    /// Values written here for resident keys are shadowed by the cached copy
    /// and overwritten when that copy is evicted.
    #[inline]
    pub fn store_mut(&mut self) -> &mut B {
        &mut self.store
    }

    /// Consumes the cache and returns the backing store.
    ///
    /// Resident values are dropped; call [`flush`](Self::flush) first to keep them.
    pub fn into_store(self) -> B {
        self.store
    }

    /// Returns a mutable reference to the value of `key`, admitting it on a miss.
    ///
    /// A hit bumps the key's frequency. A miss reads the value from the backing
    /// store, may evict other keys, and then counts as the key's first access.
    pub fn get_mut(&mut self, key: &K) -> &mut V {
        let slot = match self.hit(key) {
            Some(slot) => slot,
            None => self.miss(key.clone()),
        };
        self.value_mut(slot)
    }

    /// Returns a copy of the value of `key`, admitting it on a miss.
    pub fn read(&mut self, key: &K) -> V
    where
        V: Clone,
    {
        self.get_mut(key).clone()
    }

    /// Overwrites the value of `key`, admitting it on a miss.
    ///
    /// The key is resident afterwards. The new value reaches the backing store
    /// only when the key is evicted or the cache is flushed.
    pub fn write(&mut self, key: K, value: V) {
        let slot = match self.hit(&key) {
            Some(slot) => slot,
            None => self.miss(key),
        };
        *self.value_mut(slot) = value;
    }

    /// Runs one eviction step.
    ///
    /// A full small queue gives up its oldest key (promoted to main if hot).
    /// Otherwise main evicts, requeueing keys with remaining frequency until
    /// one is written back. Returns `false` only if the cache was empty.
    pub fn evict(&mut self) -> bool {
        let evicted = if self.tracker.is_full(Queue::Small) {
            self.evict_small();
            true
        } else if self.tracker.len(Queue::Main) > 0 {
            self.evict_main();
            true
        } else if self.tracker.len(Queue::Small) > 0 {
            self.evict_small();
            true
        } else {
            false
        };
        self.sync_sizes();
        evicted
    }

    /// Writes every resident value back and empties the cache, ghost included.
    ///
    /// Keys are written back small queue first, each queue oldest first.
    pub fn flush(&mut self) {
        while self.tracker.len(Queue::Small) > 0 {
            let (key, slot) = self.tracker.evict(Queue::Small, false);
            let value = self.take_value(slot);
            self.store.write(key, value);
            self.metrics.record_small_eviction();
        }
        while self.tracker.len(Queue::Main) > 0 {
            let (key, slot) = self.tracker.evict(Queue::Main, false);
            let value = self.take_value(slot);
            self.store.write(key, value);
            self.metrics.record_main_eviction();
        }
        self.ghost.clear();
        self.sync_sizes();
    }

    /// Checks the structural invariants, panicking on the first violation.
    ///
    /// - free slots and owned slots partition the arena
    /// - owned slots hold values, free slots hold none
    /// - frequencies stay within `0..=3`
    /// - no key is both resident and a ghost
    pub fn debug_validate_invariants(&self) {
        let total = self.cap();
        let mut seen = vec![false; total];
        for &slot in self.tracker.free_iter() {
            assert!(slot < total, "free slot {} out of range", slot);
            assert!(!seen[slot], "slot {} is free twice", slot);
            assert!(self.values[slot].is_none(), "free slot {} holds a value", slot);
            seen[slot] = true;
        }
        for queue in [Queue::Small, Queue::Main] {
            assert!(self.tracker.len(queue) <= self.tracker.capacity(queue));
            for key in self.tracker.iter(queue) {
                let (owner, slot) = match self.tracker.location(key) {
                    Some(location) => location,
                    None => panic!("queued key has no slot"),
                };
                assert_eq!(owner, queue, "key queued in {:?} but owned by {:?}", queue, owner);
                assert!(!seen[slot], "slot {} is owned twice or also free", slot);
                assert!(self.values[slot].is_some(), "owned slot {} is empty", slot);
                assert!(!self.ghost.contains(key), "resident key is also a ghost");
                seen[slot] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "a slot is neither free nor owned");
        assert_eq!(
            self.tracker.resident() + self.tracker.free_slots(),
            total,
            "resident keys and free slots do not add up to the arena"
        );
        assert!(self.freq.iter().all(|&f| f <= MAX_FREQUENCY));
        assert!(self.ghost.len() <= self.ghost.capacity());
    }

    fn hit(&mut self, key: &K) -> Option<usize> {
        let (queue, slot) = self.tracker.location(key)?;
        match queue {
            Queue::Small => self.metrics.record_small_hit(),
            Queue::Main => self.metrics.record_main_hit(),
        }
        self.bump(slot);
        Some(slot)
    }

    fn miss(&mut self, key: K) -> usize {
        self.metrics.record_miss(self.ghost.contains(&key));
        let value = self.store.read(&key);
        let slot = self.insert(key, value);
        self.bump(slot);
        self.sync_sizes();
        slot
    }

    fn insert(&mut self, key: K, value: V) -> usize {
        let target = if self.ghost.contains(&key) {
            Queue::Main
        } else {
            Queue::Small
        };

        while self.tracker.is_full(target) {
            match target {
                Queue::Small => {
                    self.evict();
                }
                Queue::Main => self.evict_main(),
            }
        }

        if target == Queue::Main {
            self.ghost.remove(&key);
        }
        let slot = self.tracker.insert(target, key, None);
        self.freq[slot] = 0;
        self.values[slot] = Some(value);
        self.metrics.record_insertion(target == Queue::Main);
        slot
    }

    fn evict_small(&mut self) {
        let (key, slot) = self.tracker.evict(Queue::Small, true);
        if self.freq[slot] <= self.config.hot_threshold {
            let value = self.take_value(slot);
            self.store.write(key.clone(), value);
            self.tracker.mark_free(slot);
            self.metrics.record_small_eviction();
            if self.ghost.insert(key).is_some() {
                self.metrics.record_ghost_drop();
            }
        } else {
            if self.tracker.is_full(Queue::Main) {
                self.evict_main();
            }
            if self.config.decrement_on_promotion {
                self.freq[slot] -= 1;
            }
            self.tracker.insert(Queue::Main, key, Some(slot));
            self.metrics.record_promotion();
        }
    }

    fn evict_main(&mut self) {
        while self.tracker.len(Queue::Main) > 0 {
            let (key, slot) = self.tracker.evict(Queue::Main, true);
            if self.freq[slot] > 0 {
                self.freq[slot] -= 1;
                self.tracker.insert(Queue::Main, key, Some(slot));
                self.metrics.record_requeue();
            } else {
                let value = self.take_value(slot);
                self.store.write(key, value);
                self.tracker.mark_free(slot);
                self.metrics.record_main_eviction();
                break;
            }
        }
    }

    #[inline]
    fn bump(&mut self, slot: usize) {
        if self.freq[slot] < MAX_FREQUENCY {
            self.freq[slot] += 1;
        }
    }

    fn take_value(&mut self, slot: usize) -> V {
        match self.values[slot].take() {
            Some(value) => value,
            None => unreachable!("owned slot {} holds no value", slot),
        }
    }

    fn value_mut(&mut self, slot: usize) -> &mut V {
        match self.values[slot].as_mut() {
            Some(value) => value,
            None => unreachable!("owned slot {} holds no value", slot),
        }
    }

    fn sync_sizes(&mut self) {
        self.metrics.update_queue_sizes(
            self.tracker.len(Queue::Small) as u64,
            self.tracker.len(Queue::Main) as u64,
            self.ghost.len() as u64,
        );
    }
}

impl<K, V, B, S> CacheMetrics for S3FifoCache<K, V, B, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

impl<K, V, B, S> fmt::Debug for S3FifoCache<K, V, B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3FifoCache")
            .field("config", &self.config)
            .field("tracker", &self.tracker)
            .field("ghost", &self.ghost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    /// Backing store that logs every call and reads `key * 10` for unseen keys.
    #[derive(Debug, Default)]
    struct Recorder {
        reads: Vec<u32>,
        writes: Vec<(u32, u32)>,
        data: std::collections::HashMap<u32, u32>,
    }

    impl BackingStore<u32, u32> for Recorder {
        fn read(&mut self, key: &u32) -> u32 {
            self.reads.push(*key);
            self.data.get(key).copied().unwrap_or(key * 10)
        }

        fn write(&mut self, key: u32, value: u32) {
            self.writes.push((key, value));
            self.data.insert(key, value);
        }
    }

    fn make(small: usize, main: usize) -> S3FifoCache<u32, u32, Recorder> {
        S3FifoCache::new(
            NonZeroUsize::new(small).unwrap(),
            NonZeroUsize::new(main).unwrap(),
            Recorder::default(),
        )
    }

    fn set_freq(cache: &mut S3FifoCache<u32, u32, Recorder>, key: u32, freq: u8) {
        let (_, slot) = cache.tracker.location(&key).unwrap();
        cache.freq[slot] = freq;
    }

    fn metric(cache: &S3FifoCache<u32, u32, Recorder>, name: &str) -> f64 {
        *cache.metrics().get(name).unwrap()
    }

    /// Small = [3], main = [1, 2], ghost empty.
    fn fill_main(cache: &mut S3FifoCache<u32, u32, Recorder>) {
        cache.read(&1);
        cache.read(&2); // 1 -> ghost
        cache.read(&1); // 1 -> main
        cache.read(&3); // 2 -> ghost
        cache.read(&2); // 2 -> main
        assert_eq!(cache.main_keys().copied().collect::<Vec<_>>(), [1, 2]);
        assert_eq!(cache.small_keys().copied().collect::<Vec<_>>(), [3]);
        cache.store.writes.clear();
    }

    #[test]
    fn test_s3fifo_miss_admits_into_small() {
        let mut cache = make(2, 2);
        assert_eq!(cache.read(&7), 70);
        assert_eq!(cache.state(&7), KeyState::Small);
        assert_eq!(cache.frequency(&7), Some(1));
        assert_eq!(cache.store.reads, [7]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_frequency_saturates() {
        let mut cache = make(2, 2);
        for _ in 0..10 {
            cache.read(&1);
        }
        assert_eq!(cache.frequency(&1), Some(MAX_FREQUENCY));
        assert_eq!(cache.store.reads.len(), 1);
    }

    #[test]
    fn test_s3fifo_cold_small_goes_to_ghost() {
        let mut cache = make(1, 2);
        cache.read(&1);
        cache.read(&2);
        assert_eq!(cache.state(&1), KeyState::Ghost);
        assert_eq!(cache.store.writes, [(1, 10)]);
        assert_eq!(metric(&cache, "small_evictions"), 1.0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_hot_small_moves_to_main_keeping_slot() {
        let mut cache = make(1, 2);
        cache.read(&1);
        cache.read(&1);
        let (_, before) = cache.tracker.location(&1).unwrap();

        cache.read(&2);
        let (queue, after) = cache.tracker.location(&1).unwrap();
        assert_eq!(queue, Queue::Main);
        assert_eq!(before, after);
        assert_eq!(cache.frequency(&1), Some(2));
        assert!(cache.store.writes.is_empty());
        assert_eq!(metric(&cache, "promotions"), 1.0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_decrement_on_promotion() {
        let mut config = S3FifoCacheConfig::new(
            NonZeroUsize::new(1).unwrap(),
            NonZeroUsize::new(2).unwrap(),
        );
        config.decrement_on_promotion = true;
        let mut cache = S3FifoCache::from_config(config, Recorder::default());
        cache.read(&1);
        cache.read(&1);
        cache.read(&2);
        assert_eq!(cache.state(&1), KeyState::Main);
        assert_eq!(cache.frequency(&1), Some(1));
    }

    #[test]
    fn test_s3fifo_zero_threshold_promotes_any_access() {
        let mut config = S3FifoCacheConfig::new(
            NonZeroUsize::new(1).unwrap(),
            NonZeroUsize::new(2).unwrap(),
        );
        config.hot_threshold = 0;
        let mut cache = S3FifoCache::from_config(config, Recorder::default());
        cache.read(&1);
        cache.read(&2);
        assert_eq!(cache.state(&1), KeyState::Main);
        assert!(cache.store.writes.is_empty());
    }

    #[test]
    fn test_s3fifo_main_all_zero_evicts_oldest_without_requeue() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        set_freq(&mut cache, 1, 0);
        set_freq(&mut cache, 2, 0);
        let (_, slot) = cache.tracker.location(&1).unwrap();

        cache.evict_main();
        assert_eq!(cache.store.writes, [(1, 10)]);
        assert_eq!(cache.state(&1), KeyState::Absent);
        assert_eq!(metric(&cache, "requeues"), 0.0);
        assert!(cache.tracker.free_iter().any(|&s| s == slot));
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_main_second_chance_decrements_each_pass() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        set_freq(&mut cache, 1, 2);
        set_freq(&mut cache, 2, 1);

        // 1: 2->1, 2: 1->0, 1: 1->0, then 2 is at zero and goes.
        cache.evict_main();
        assert_eq!(cache.store.writes, [(2, 20)]);
        assert_eq!(metric(&cache, "requeues"), 3.0);
        assert_eq!(cache.frequency(&1), Some(0));
        assert_eq!(cache.main_keys().copied().collect::<Vec<_>>(), [1]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_hot_promotion_into_full_main_evicts_main_first() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        set_freq(&mut cache, 1, 0);
        set_freq(&mut cache, 2, 0);
        cache.read(&3); // 3 becomes hot

        cache.read(&4);
        assert_eq!(cache.store.writes, [(1, 10)]);
        assert_eq!(cache.main_keys().copied().collect::<Vec<_>>(), [2, 3]);
        assert_eq!(cache.small_keys().copied().collect::<Vec<_>>(), [4]);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_ghost_hit_with_full_main() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        set_freq(&mut cache, 1, 0);
        set_freq(&mut cache, 2, 0);
        cache.read(&4); // 3 (cold) -> ghost
        assert_eq!(cache.state(&3), KeyState::Ghost);

        cache.read(&3);
        assert_eq!(cache.state(&3), KeyState::Main);
        assert_eq!(cache.state(&1), KeyState::Absent);
        assert_eq!(cache.ghost_len(), 0);
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_write_on_miss_reads_store_once() {
        let mut cache = make(1, 1);
        cache.write(5, 1);
        cache.write(5, 2);
        assert_eq!(cache.read(&5), 2);
        assert_eq!(cache.store.reads, [5]);
        assert!(cache.store.writes.is_empty());
    }

    #[test]
    fn test_s3fifo_evict_on_empty_cache() {
        let mut cache = make(1, 1);
        assert!(!cache.evict());
        cache.read(&1);
        assert!(cache.evict());
        assert!(cache.is_empty());
        assert_eq!(cache.state(&1), KeyState::Ghost);
    }

    #[test]
    fn test_s3fifo_flush_writes_back_everything() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        cache.write(3, 33);
        cache.flush();
        assert_eq!(cache.store.writes, [(3, 33), (1, 10), (2, 20)]);
        assert!(cache.is_empty());
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.tracker.free_slots(), cache.cap());
        cache.debug_validate_invariants();
    }

    #[test]
    fn test_s3fifo_peek_does_not_count() {
        let mut cache = make(1, 1);
        cache.read(&1);
        assert_eq!(cache.peek(&1), Some(&10));
        assert_eq!(cache.peek(&2), None);
        assert_eq!(cache.frequency(&1), Some(1));
        assert_eq!(metric(&cache, "requests"), 1.0);
    }

    #[test]
    fn test_s3fifo_metrics_track_queues() {
        let mut cache = make(1, 2);
        fill_main(&mut cache);
        assert_eq!(metric(&cache, "small_size"), 1.0);
        assert_eq!(metric(&cache, "main_size"), 2.0);
        assert_eq!(metric(&cache, "ghost_promotions"), 2.0);
        assert_eq!(metric(&cache, "ghost_hits"), 2.0);
        assert_eq!(metric(&cache, "cache_misses"), 5.0);
        assert_eq!(cache.algorithm_name(), "S3FIFO");
    }
}
