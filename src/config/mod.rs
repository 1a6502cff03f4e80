//! Cache Configuration Module
//!
//! This module provides the configuration structure for the S3-FIFO cache.
//!
//! # Design Philosophy
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: Queue capacities are `NonZeroUsize`, so an empty queue
//!   cannot be configured
//! - **Fixed**: The engine copies the config at construction; capacities never
//!   change afterwards
//!
//! # Sizing Guidelines
//!
//! The cache holds `small_capacity + main_capacity` values. The conventional
//! split gives the small queue 10% of the slots and the main queue the rest,
//! with a ghost queue as large as the main queue. [`S3FifoCacheConfig::with_ratio`]
//! builds that split from a total slot count.
//!
//! # Examples
//!
//! ```
//! use s3fifo_cache::config::S3FifoCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = S3FifoCacheConfig::with_ratio(NonZeroUsize::new(1000).unwrap(), 10);
//! assert_eq!(config.small_capacity.get(), 100);
//! assert_eq!(config.main_capacity.get(), 900);
//! assert_eq!(config.ghost_capacity.get(), 900);
//! ```

pub mod s3fifo;

pub use s3fifo::S3FifoCacheConfig;
