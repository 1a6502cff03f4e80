//! Bounded FIFO of recently evicted keys.
//!
//! The ghost queue remembers keys that left the small queue cold, without
//! their values, so that a quick reaccess can be admitted straight into the
//! main queue.
//!
//! ## Architecture
//!
//! ```text
//!   live: HashMap<K, seq>           ring: RingBuffer<(K, seq)>
//!   ┌───────┬──────┐                head ─► (a,0) (b,1) (a,2) (c,3) ◄─ tail
//!   │ a     │  2   │                         ▲
//!   │ c     │  3   │                         └ stale: a was re-admitted as seq 2
//!   └───────┴──────┘                 (b,1) is stale too: b was removed
//! ```
//!
//! Removal only deletes the map entry. Ring entries whose sequence no longer
//! matches the map are skipped when they reach the head, so `remove` stays
//! O(1) without searching the ring. The capacity bounds the live keys only:
//! the oldest live key is forgotten only when `capacity` keys are already
//! remembered. The ring has room for twice the capacity, and when stale
//! entries fill it, it is compacted in place. A compaction reclaims at least
//! `capacity` entries, so inserts stay amortized O(1).

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

/// Bounded, value-less FIFO of keys with O(1) membership and removal.
pub struct GhostQueue<K, S = DefaultHashBuilder> {
    live: HashMap<K, u64, S>,
    ring: RingBuffer<(K, u64)>,
    cap: usize,
    next_seq: u64,
}

impl<K: Hash + Eq + Clone, S: BuildHasher> GhostQueue<K, S> {
    /// Creates an empty ghost queue remembering at most `cap` keys.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        GhostQueue {
            live: HashMap::with_capacity_and_hasher(cap.get(), hash_builder),
            ring: RingBuffer::with_capacity(
                NonZeroUsize::new(cap.get().saturating_mul(2)).unwrap_or(cap),
            ),
            cap: cap.get(),
            next_seq: 0,
        }
    }

    /// Maximum number of remembered keys.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Number of remembered keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no key is remembered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Returns `true` if `key` is remembered.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.live.contains_key(key)
    }

    /// Remembers `key` at the tail.
    ///
    /// Returns the key that had to be forgotten to make room, if any. A key
    /// that is already remembered moves to the tail.
    pub fn insert(&mut self, key: K) -> Option<K> {
        let mut dropped = None;
        if self.live.len() == self.cap && !self.live.contains_key(&key) {
            // The head is live once stale entries are popped.
            self.compact_head();
            if let Some((old, _)) = self.ring.try_pop() {
                self.live.remove(&old);
                dropped = Some(old);
            }
        }
        if self.ring.is_full() {
            self.compact();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.live.insert(key.clone(), seq);
        self.ring.push((key, seq));
        self.compact_head();
        dropped
    }

    /// Forgets `key`. Returns whether it was remembered.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let removed = self.live.remove(key).is_some();
        self.compact_head();
        removed
    }

    /// Forgets every key.
    pub fn clear(&mut self) {
        self.live.clear();
        self.ring.clear();
    }

    /// Iterates the remembered keys from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        self.ring
            .iter()
            .filter(move |(key, seq)| self.live.get(key) == Some(seq))
            .map(|(key, _)| key)
    }

    // Pops removed entries that reached the head.
    fn compact_head(&mut self) {
        while let Some((key, seq)) = self.ring.front() {
            if self.live.get(key) == Some(seq) {
                break;
            }
            self.ring.pop();
        }
    }

    // Rotates the whole ring once, keeping only live entries in order.
    fn compact(&mut self) {
        for _ in 0..self.ring.len() {
            let (key, seq) = self.ring.pop();
            if self.live.get(&key) == Some(&seq) {
                self.ring.push((key, seq));
            }
        }
    }
}

impl<K, S> fmt::Debug for GhostQueue<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GhostQueue")
            .field("capacity", &self.cap)
            .field("len", &self.live.len())
            .finish()
    }
}
