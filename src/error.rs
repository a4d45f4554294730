use thiserror::Error;

/// Errors returned by [`HashMap`](crate::HashMap) and
/// [`HashTable`](crate::HashTable) operations.
///
/// Neither error leaves the table in a partially modified state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// The key is not present in the table.
    #[error("key not found")]
    KeyNotFound,
    /// No slot could be found for a new key and the capacity schedule has no
    /// larger size left to grow into.
    #[error("hash table is full and cannot be resized further")]
    TableFull,
}

/// Errors returned when validating a custom capacity schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// The schedule has no entries.
    #[error("capacity schedule must contain at least one size")]
    Empty,
    /// A size is too small to hash into.
    #[error("table size {size} at position {index} is smaller than 2")]
    TooSmall {
        /// Position of the offending size in the schedule.
        index: usize,
        /// The offending size.
        size: usize,
    },
    /// A size is not larger than the one before it.
    #[error("table size {size} at position {index} does not exceed the previous size {previous}")]
    NotAscending {
        /// Position of the offending size in the schedule.
        index: usize,
        /// The offending size.
        size: usize,
        /// The size preceding it.
        previous: usize,
    },
}
