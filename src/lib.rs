#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A string-keyed HashMap using double hashing.
///
/// This module provides a `HashMap` that wraps the `HashTable`, hashing keys
/// with a configurable [`StepHasher`] and growing along a [`TableSizes`]
/// schedule.
pub mod hash_map;

pub mod hash_table;

/// Hash functions producing a home slot and a probe stride for a key.
pub mod hash;

/// Error types.
pub mod error;

/// The schedule of table sizes a map grows through.
pub mod sizes;

/// Probe statistics for inspecting table layout.
#[cfg(feature = "stats")]
pub mod stats;

pub use error::Error;
pub use error::ScheduleError;
pub use hash::PolynomialHasher;
pub use hash::StepHasher;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use sizes::TableSizes;
