//! Slot tracking for the resident queues.
//!
//! `SlotTracker` maps every resident key to the slot that holds its value and
//! to the queue (small or main) that currently owns it. Both queues draw slot
//! indices from one shared free pool, so a key can move between queues without
//! its value moving.
//!
//! ```text
//!   map: key -> (queue, slot)          small order: [a, b]      (oldest first)
//!                                      main order:  [c, d, e]
//!   free pool: [5, 6, 7]               slots 0..8:  a=1 b=0 c=3 d=2 e=4
//! ```
//!
//! Between operations the free pool and the owned slots partition
//! `0..small_cap + main_cap` exactly.

extern crate alloc;

use crate::ring::RingBuffer;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// The resident queue that owns a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    /// First-chance queue for newly admitted keys.
    Small,
    /// Second-chance queue for promoted keys.
    Main,
}

/// Tracks which slot and queue each resident key occupies.
pub struct SlotTracker<K, S = DefaultHashBuilder> {
    map: HashMap<K, (Queue, usize), S>,
    small: RingBuffer<K>,
    main: RingBuffer<K>,
    free: RingBuffer<usize>,
}

impl<K: Hash + Eq + Clone, S: BuildHasher> SlotTracker<K, S> {
    /// Creates a tracker for `small_cap + main_cap` slots, all initially free.
    pub fn with_hasher(small_cap: NonZeroUsize, main_cap: NonZeroUsize, hash_builder: S) -> Self {
        let total = small_cap.saturating_add(main_cap.get());
        let mut free = RingBuffer::with_capacity(total);
        for slot in 0..total.get() {
            free.push(slot);
        }
        SlotTracker {
            map: HashMap::with_capacity_and_hasher(total.get(), hash_builder),
            small: RingBuffer::with_capacity(small_cap),
            main: RingBuffer::with_capacity(main_cap),
            free,
        }
    }

    #[inline]
    fn order(&self, queue: Queue) -> &RingBuffer<K> {
        match queue {
            Queue::Small => &self.small,
            Queue::Main => &self.main,
        }
    }

    #[inline]
    fn order_mut(&mut self, queue: Queue) -> &mut RingBuffer<K> {
        match queue {
            Queue::Small => &mut self.small,
            Queue::Main => &mut self.main,
        }
    }

    /// Returns `true` if `key` is resident in either queue.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    /// Returns the owning queue and slot of `key`, if resident.
    #[inline]
    pub fn location<Q>(&self, key: &Q) -> Option<(Queue, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.get(key).copied()
    }

    /// Number of keys owned by `queue`.
    #[inline]
    pub fn len(&self, queue: Queue) -> usize {
        self.order(queue).len()
    }

    /// Maximum number of keys `queue` may own.
    #[inline]
    pub fn capacity(&self, queue: Queue) -> usize {
        self.order(queue).capacity()
    }

    /// Returns `true` if `queue` cannot accept another key.
    #[inline]
    pub fn is_full(&self, queue: Queue) -> bool {
        self.order(queue).is_full()
    }

    /// Number of resident keys across both queues.
    #[inline]
    pub fn resident(&self) -> usize {
        self.map.len()
    }

    /// Number of slots not owned by any key.
    #[inline]
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Total number of slots.
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.free.capacity()
    }

    /// Appends `key` to `queue` and returns its slot.
    ///
    /// With `hint` the key takes that slot, which the caller must have obtained
    /// from an [`evict`](Self::evict) with `keep_loc` set. Without it the slot
    /// comes from the free pool.
    ///
    /// # Panics
    ///
    /// Panics if `queue` is full or `key` is already resident.
    pub fn insert(&mut self, queue: Queue, key: K, hint: Option<usize>) -> usize {
        assert!(!self.is_full(queue), "insert into a full {:?} queue", queue);
        assert!(!self.map.contains_key(&key), "key is already resident");
        let slot = match hint {
            Some(slot) => slot,
            None => self.free.pop(),
        };
        debug_assert!(slot < self.total_slots());
        self.map.insert(key.clone(), (queue, slot));
        self.order_mut(queue).push(key);
        slot
    }

    /// Removes the oldest key of `queue` and returns it with its slot.
    ///
    /// Unless `keep_loc` is set the slot goes back to the free pool. Callers
    /// that keep it must either reinsert with it as a hint or hand it to
    /// [`mark_free`](Self::mark_free).
    ///
    /// # Panics
    ///
    /// Panics if `queue` is empty.
    pub fn evict(&mut self, queue: Queue, keep_loc: bool) -> (K, usize) {
        let key = self.order_mut(queue).pop();
        let (owner, slot) = match self.map.remove(&key) {
            Some(entry) => entry,
            None => unreachable!("queued key has no slot mapping"),
        };
        debug_assert_eq!(owner, queue);
        if !keep_loc {
            self.free.push(slot);
        }
        (key, slot)
    }

    /// Returns `slot` to the free pool.
    pub fn mark_free(&mut self, slot: usize) {
        debug_assert!(slot < self.total_slots());
        self.free.push(slot);
    }

    /// Iterates the keys of `queue` from oldest to newest.
    pub fn iter(&self, queue: Queue) -> crate::ring::Iter<'_, K> {
        self.order(queue).iter()
    }

    /// Iterates the free slot indices in pool order.
    pub fn free_iter(&self) -> crate::ring::Iter<'_, usize> {
        self.free.iter()
    }
}

impl<K, S> fmt::Debug for SlotTracker<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotTracker")
            .field("small", &self.small.len())
            .field("main", &self.main.len())
            .field("free", &self.free.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn tracker(small: usize, main: usize) -> SlotTracker<&'static str> {
        SlotTracker::with_hasher(
            NonZeroUsize::new(small).unwrap(),
            NonZeroUsize::new(main).unwrap(),
            DefaultHashBuilder::default(),
        )
    }

    fn assert_partition(t: &SlotTracker<&'static str>) {
        let mut seen = std::vec![false; t.total_slots()];
        for &slot in t.free_iter() {
            assert!(!seen[slot], "slot {slot} listed twice");
            seen[slot] = true;
        }
        for queue in [Queue::Small, Queue::Main] {
            for key in t.iter(queue) {
                let (owner, slot) = t.location(key).unwrap();
                assert_eq!(owner, queue);
                assert!(!seen[slot], "slot {slot} owned and free");
                seen[slot] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "a slot is neither free nor owned");
    }

    #[test]
    fn test_tracker_insert_and_locate() {
        let mut t = tracker(2, 3);
        assert_eq!(t.free_slots(), 5);

        let a = t.insert(Queue::Small, "a", None);
        let b = t.insert(Queue::Main, "b", None);
        assert_ne!(a, b);
        assert_eq!(t.location(&"a"), Some((Queue::Small, a)));
        assert_eq!(t.location(&"b"), Some((Queue::Main, b)));
        assert_eq!(t.location(&"c"), None);
        assert!(t.contains(&"a"));
        assert_eq!(t.resident(), 2);
        assert_eq!(t.free_slots(), 3);
        assert_partition(&t);
    }

    #[test]
    fn test_tracker_evict_returns_oldest() {
        let mut t = tracker(3, 1);
        let a = t.insert(Queue::Small, "a", None);
        t.insert(Queue::Small, "b", None);
        assert!(!t.is_full(Queue::Small));

        let (key, slot) = t.evict(Queue::Small, false);
        assert_eq!((key, slot), ("a", a));
        assert!(!t.contains(&"a"));
        assert_eq!(t.free_slots(), 3);
        assert_partition(&t);
    }

    #[test]
    fn test_tracker_keep_loc_moves_between_queues() {
        let mut t = tracker(1, 1);
        let slot = t.insert(Queue::Small, "a", None);
        let (key, kept) = t.evict(Queue::Small, true);
        assert_eq!(kept, slot);
        assert_eq!(t.free_slots(), 1);

        let moved = t.insert(Queue::Main, key, Some(kept));
        assert_eq!(moved, slot);
        assert_eq!(t.location(&"a"), Some((Queue::Main, slot)));
        assert_partition(&t);
    }

    #[test]
    fn test_tracker_mark_free() {
        let mut t = tracker(1, 1);
        t.insert(Queue::Main, "a", None);
        let (_, slot) = t.evict(Queue::Main, true);
        assert_eq!(t.free_slots(), 1);
        t.mark_free(slot);
        assert_eq!(t.free_slots(), 2);
        assert_partition(&t);
    }

    #[test]
    fn test_tracker_iter_in_insertion_order() {
        let mut t = tracker(1, 4);
        for key in ["w", "x", "y", "z"] {
            t.insert(Queue::Main, key, None);
        }
        let (k, s) = t.evict(Queue::Main, true);
        t.insert(Queue::Main, k, Some(s));
        let order: Vec<_> = t.iter(Queue::Main).copied().collect();
        assert_eq!(order, ["x", "y", "z", "w"]);
        assert!(t.is_full(Queue::Main));
    }

    #[test]
    #[should_panic(expected = "insert into a full Small queue")]
    fn test_tracker_insert_full_panics() {
        let mut t = tracker(1, 1);
        t.insert(Queue::Small, "a", None);
        t.insert(Queue::Small, "b", None);
    }

    #[test]
    #[should_panic(expected = "key is already resident")]
    fn test_tracker_duplicate_key_panics() {
        let mut t = tracker(2, 2);
        t.insert(Queue::Small, "a", None);
        t.insert(Queue::Main, "a", None);
    }

    #[test]
    #[should_panic(expected = "pop from an empty ring buffer")]
    fn test_tracker_evict_empty_panics() {
        let mut t = tracker(1, 1);
        t.evict(Queue::Main, false);
    }
}
