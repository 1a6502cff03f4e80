#![no_std]
extern crate alloc;
extern crate s3fifo_cache;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::num::NonZeroUsize;
use s3fifo_cache::config::S3FifoCacheConfig;
use s3fifo_cache::store::{BackingStore, MemoryStore};
use s3fifo_cache::{KeyState, S3FifoCache};

fn make<V: Clone + Default>(
    small: usize,
    main: usize,
) -> S3FifoCache<String, V, MemoryStore<String, V>> {
    let config = S3FifoCacheConfig::new(
        NonZeroUsize::new(small).unwrap(),
        NonZeroUsize::new(main).unwrap(),
    );
    S3FifoCache::from_config(config, MemoryStore::new())
}

/// A store backed by a plain vector, indexed by key.
struct VecStore {
    slots: Vec<u64>,
}

impl BackingStore<usize, u64> for VecStore {
    fn read(&mut self, key: &usize) -> u64 {
        self.slots[*key]
    }

    fn write(&mut self, key: usize, value: u64) {
        self.slots[key] = value;
    }
}

#[test]
fn test_string_keys_in_no_std() {
    let mut cache = make::<Vec<u8>>(2, 4);
    cache.write(String::from("alpha"), alloc::vec![1, 2, 3]);
    cache.write(String::from("beta"), alloc::vec![4]);

    assert_eq!(cache.read(&String::from("alpha")), [1, 2, 3]);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.store().reads(), 2);
}

#[test]
fn test_formatted_keys_flow_through_queues() {
    let mut cache = make::<u32>(1, 2);
    for i in 0..5u32 {
        cache.write(format!("key{}", i), i);
    }

    assert_eq!(cache.state(&format!("key{}", 4)), KeyState::Small);
    assert_eq!(cache.state(&format!("key{}", 3)), KeyState::Ghost);
    assert_eq!(cache.store().peek(&format!("key{}", 0)), Some(&0));
    assert_eq!(cache.store().writes(), 4);
}

#[test]
fn test_lookups_take_borrowed_keys() {
    let mut cache = make::<u32>(2, 4);
    cache.write(String::from("a"), 1);
    cache.read(&String::from("a"));

    assert!(cache.contains("a"));
    assert!(!cache.contains("b"));
    assert_eq!(cache.peek("a"), Some(&1));
    assert_eq!(cache.state("a"), KeyState::Small);
    assert_eq!(cache.state("b"), KeyState::Absent);
    assert_eq!(cache.frequency("a"), Some(2));
}

#[test]
fn test_custom_store_in_no_std() {
    let store = VecStore {
        slots: (0..16).map(|i| i * 100).collect(),
    };
    let mut cache = S3FifoCache::new(
        NonZeroUsize::new(1).unwrap(),
        NonZeroUsize::new(3).unwrap(),
        store,
    );

    assert_eq!(cache.read(&3), 300);
    cache.write(3, 7);
    cache.flush();

    let store = cache.into_store();
    assert_eq!(store.slots[3], 7);
}
