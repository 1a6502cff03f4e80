//! Fixed-capacity circular FIFO queue.
//!
//! `RingBuffer` is the queue primitive underneath every S3-FIFO structure: it
//! records eviction order for the small and main queues, backs the ghost
//! queue, and serves as the pool of free slot indices.
//!
//! # Layout
//!
//! ```text
//!   head = 5, tail = 8, capacity = 4
//!
//!   storage:  [ 7 ] [ 4 ] [ 5 ] [ 6 ]
//!   index:      0     1     2     3
//!                     ▲           ▲
//!              5 % 4 ─┘           └─ (8 - 1) % 4
//! ```
//!
//! `head` and `tail` only ever grow; storage is addressed modulo the capacity.
//! The number of queued items is `tail - head`, so a full queue and an empty
//! queue are never confused and no slot is sacrificed.
//!
//! # Contract
//!
//! Pushing into a full buffer or popping from an empty one is a caller bug and
//! panics. [`RingBuffer::try_push`] and [`RingBuffer::try_pop`] are available
//! for callers that want to handle those cases themselves.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;

/// A fixed-capacity FIFO queue backed by a boxed slice.
///
/// The buffer never reallocates after construction.
///
/// # Examples
///
/// ```
/// use s3fifo_cache::ring::RingBuffer;
/// use core::num::NonZeroUsize;
///
/// let mut ring = RingBuffer::with_capacity(NonZeroUsize::new(2).unwrap());
/// ring.push("a");
/// ring.push("b");
/// assert!(ring.is_full());
/// assert_eq!(ring.pop(), "a");
/// ring.push("c");
/// assert_eq!(ring.pop(), "b");
/// assert_eq!(ring.pop(), "c");
/// assert!(ring.is_empty());
/// ```
pub struct RingBuffer<T> {
    data: Box<[Option<T>]>,
    head: u64,
    tail: u64,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer that holds at most `cap` items.
    pub fn with_capacity(cap: NonZeroUsize) -> Self {
        let mut data = Vec::with_capacity(cap.get());
        data.resize_with(cap.get(), || None);
        RingBuffer {
            data: data.into_boxed_slice(),
            head: 0,
            tail: 0,
        }
    }

    /// Returns the maximum number of items the buffer can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of queued items.
    #[inline]
    pub fn len(&self) -> usize {
        (self.tail - self.head) as usize
    }

    /// Returns `true` if nothing is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Returns `true` if another push would overflow.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    fn index(&self, counter: u64) -> usize {
        (counter % self.data.len() as u64) as usize
    }

    /// Appends `item` at the tail.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is full.
    pub fn push(&mut self, item: T) {
        assert!(!self.is_full(), "push into a full ring buffer");
        let idx = self.index(self.tail);
        self.data[idx] = Some(item);
        self.tail += 1;
    }

    /// Removes and returns the item at the head.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn pop(&mut self) -> T {
        assert!(!self.is_empty(), "pop from an empty ring buffer");
        let idx = self.index(self.head);
        self.head += 1;
        match self.data[idx].take() {
            Some(item) => item,
            None => unreachable!("occupied ring position holds no item"),
        }
    }

    /// Appends `item` at the tail, handing it back if the buffer is full.
    pub fn try_push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.push(item);
        Ok(())
    }

    /// Removes and returns the head item, or `None` if the buffer is empty.
    pub fn try_pop(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            Some(self.pop())
        }
    }

    /// Returns a reference to the head item without removing it.
    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.data[self.index(self.head)].as_ref()
    }

    /// Iterates from head (oldest) to tail (newest).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            ring: self,
            pos: self.head,
        }
    }

    /// Drops every queued item. Capacity is unchanged.
    pub fn clear(&mut self) {
        while self.try_pop().is_some() {}
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("items", &DebugItems(self))
            .finish()
    }
}

struct DebugItems<'a, T>(&'a RingBuffer<T>);

impl<T: fmt::Debug> fmt::Debug for DebugItems<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

/// Head-to-tail iterator over a [`RingBuffer`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    ring: &'a RingBuffer<T>,
    pos: u64,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.pos == self.ring.tail {
            return None;
        }
        let idx = self.ring.index(self.pos);
        self.pos += 1;
        self.ring.data[idx].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.ring.tail - self.pos) as usize;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
