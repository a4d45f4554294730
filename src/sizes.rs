use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::error::ScheduleError;

/// The ascending list of table sizes a [`HashMap`](crate::HashMap) grows
/// through.
///
/// A map starts at the first size and advances one entry at a time when it
/// rehashes. Once the last entry is reached the table cannot grow any
/// further.
///
/// # Examples
///
/// ```rust
/// use step_hash::TableSizes;
///
/// let sizes = TableSizes::new(vec![7, 17, 37]).unwrap();
/// assert_eq!(sizes.first(), 7);
/// assert_eq!(sizes.get(2), Some(37));
/// assert_eq!(sizes.get(3), None);
///
/// assert!(TableSizes::new(vec![17, 7]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSizes {
    sizes: Cow<'static, [usize]>,
}

impl TableSizes {
    /// The built-in schedule. Each size is a prime roughly double the one
    /// before it; the largest comfortably holds a million entries.
    pub const DEFAULT: TableSizes = TableSizes {
        sizes: Cow::Borrowed(&[
            5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317,
            196613, 393241, 786433, 1572869,
        ]),
    };

    /// Validates and wraps a caller supplied schedule.
    ///
    /// The schedule must be non-empty, strictly ascending, and every size
    /// must be at least 2.
    pub fn new(sizes: Vec<usize>) -> Result<Self, ScheduleError> {
        if sizes.is_empty() {
            return Err(ScheduleError::Empty);
        }

        for (index, &size) in sizes.iter().enumerate() {
            if size < 2 {
                return Err(ScheduleError::TooSmall { index, size });
            }
            if index > 0 && size <= sizes[index - 1] {
                return Err(ScheduleError::NotAscending {
                    index,
                    size,
                    previous: sizes[index - 1],
                });
            }
        }

        Ok(TableSizes {
            sizes: Cow::Owned(sizes),
        })
    }

    /// Returns the size at `index`, or `None` past the end of the schedule.
    pub fn get(&self, index: usize) -> Option<usize> {
        self.sizes.get(index).copied()
    }

    /// Returns the initial table size.
    pub fn first(&self) -> usize {
        self.sizes[0]
    }

    /// Returns the number of sizes in the schedule.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns the sizes as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.sizes
    }
}

impl Default for TableSizes {
    fn default() -> Self {
        TableSizes::DEFAULT
    }
}
