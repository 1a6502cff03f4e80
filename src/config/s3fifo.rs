//! Configuration for the S3-FIFO cache.

use core::fmt;
use core::num::NonZeroUsize;

/// Saturation point of the per-slot access frequency counter.
pub const MAX_FREQUENCY: u8 = 3;

/// Configuration for an S3-FIFO cache.
///
/// # Fields
///
/// - `small_capacity`: Slots available to newly admitted keys.
/// - `main_capacity`: Slots available to promoted keys.
/// - `ghost_capacity`: Number of evicted keys remembered without values.
///   Conventionally equal to `main_capacity`.
/// - `hot_threshold`: A key leaving the small queue with a frequency above this
///   value is promoted into main; at or below it the key is written back and
///   remembered in the ghost queue. `1` treats a key touched only by its
///   admitting access as cold; `0` promotes every key that was accessed at all.
/// - `decrement_on_promotion`: Whether a key promoted from small to main loses
///   one frequency point on the way.
///
/// # Examples
///
/// ```
/// use s3fifo_cache::config::S3FifoCacheConfig;
/// use core::num::NonZeroUsize;
///
/// let config = S3FifoCacheConfig {
///     small_capacity: NonZeroUsize::new(10).unwrap(),
///     main_capacity: NonZeroUsize::new(90).unwrap(),
///     ghost_capacity: NonZeroUsize::new(90).unwrap(),
///     hot_threshold: 1,
///     decrement_on_promotion: false,
/// };
/// assert_eq!(config.total_slots(), 100);
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct S3FifoCacheConfig {
    /// Capacity of the small (first-chance) queue.
    pub small_capacity: NonZeroUsize,
    /// Capacity of the main (second-chance) queue.
    pub main_capacity: NonZeroUsize,
    /// Capacity of the ghost queue.
    pub ghost_capacity: NonZeroUsize,
    /// Frequency above which a small-queue key is promoted instead of evicted.
    /// Must be below [`MAX_FREQUENCY`].
    pub hot_threshold: u8,
    /// Decrement the frequency of keys promoted from small to main.
    pub decrement_on_promotion: bool,
}

impl S3FifoCacheConfig {
    /// Creates a config with the given queue capacities and default policy:
    /// ghost sized like main, `hot_threshold = 1`, no decrement on promotion.
    pub fn new(small_capacity: NonZeroUsize, main_capacity: NonZeroUsize) -> Self {
        Self {
            small_capacity,
            main_capacity,
            ghost_capacity: main_capacity,
            hot_threshold: 1,
            decrement_on_promotion: false,
        }
    }

    /// Splits `total` slots so the small queue gets `small_percent` percent of
    /// them, rounded down but at least one, and main gets the rest (also at
    /// least one).
    ///
    /// # Panics
    ///
    /// Panics if `total` is below 2 or `small_percent` is above 100.
    pub fn with_ratio(total: NonZeroUsize, small_percent: u8) -> Self {
        assert!(total.get() >= 2, "S3-FIFO needs at least two slots");
        assert!(small_percent <= 100, "small_percent must be at most 100");
        let small = (total.get() * small_percent as usize / 100).clamp(1, total.get() - 1);
        let main = total.get() - small;
        match (NonZeroUsize::new(small), NonZeroUsize::new(main)) {
            (Some(small), Some(main)) => Self::new(small, main),
            _ => unreachable!("both queues are clamped to at least one slot"),
        }
    }

    /// Total number of value slots, `small_capacity + main_capacity`.
    pub fn total_slots(&self) -> usize {
        self.small_capacity.get() + self.main_capacity.get()
    }

    pub(crate) fn validate(&self) {
        assert!(
            self.hot_threshold < MAX_FREQUENCY,
            "hot_threshold must be below the frequency cap"
        );
    }
}

impl fmt::Debug for S3FifoCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3FifoCacheConfig")
            .field("small_capacity", &self.small_capacity)
            .field("main_capacity", &self.main_capacity)
            .field("ghost_capacity", &self.ghost_capacity)
            .field("hot_threshold", &self.hot_threshold)
            .field("decrement_on_promotion", &self.decrement_on_promotion)
            .finish()
    }
}
