//! A fixed-capacity open-addressing slot table.
//!
//! [`HashTable<T>`] owns a single boxed array of [`Slot`]s and knows nothing
//! about keys or hash functions: every operation is handed the start slot
//! and stride of a probe sequence plus an equality predicate, much like a
//! raw table underneath a std-style map. Deleted entries leave a
//! [`Slot::Tombstone`] behind, and tombstones are only cleared when the whole
//! array is rebuilt by [`HashTable::resize`].

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::Error;

/// The state of a single slot in a [`HashTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    /// Never written since the array was allocated.
    Empty,
    /// Previously occupied, now deleted. Probes continue past it.
    Tombstone,
    /// Holds a live value.
    Occupied(T),
}

impl<T> Slot<T> {
    /// Returns `true` for [`Slot::Occupied`].
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }

    fn into_occupied(self) -> Option<T> {
        match self {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }
}

/// What a probe is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Find the slot holding a matching value, failing with
    /// [`Error::KeyNotFound`] if there is none.
    Lookup,
    /// Find the slot holding a matching value, or the slot a new value should
    /// be written to. Fails with [`Error::TableFull`] if there is neither.
    Insert,
}

/// A fixed-capacity table of slots probed by double hashing.
///
/// Callers supply the probe parameters for every operation, so the same
/// table can be driven by any pair of hash functions. See
/// [`HashMap`](crate::HashMap) for the keyed interface.
///
/// # Examples
///
/// ```rust
/// use step_hash::hash_table::HashTable;
/// use step_hash::hash_table::Intent;
///
/// let mut table: HashTable<(&str, i32)> = HashTable::with_capacity(5);
///
/// let index = table.probe(2, 2, |(k, _)| *k == "a", Intent::Insert).unwrap();
/// table.occupy(index, ("a", 1));
///
/// assert_eq!(table.find(2, 2, |(k, _)| *k == "a"), Some(&("a", 1)));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<T> {
    slots: Box<[Slot<T>]>,
    populated: usize,
    tombstones: usize,
}

impl<T: Debug> Debug for HashTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.capacity())
            .field("slots", &self.slots)
            .finish()
    }
}

impl<T> HashTable<T> {
    /// Creates a table of `capacity` empty slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || Slot::Empty);
        HashTable {
            slots: slots.into_boxed_slice(),
            populated: 0,
            tombstones: 0,
        }
    }

    /// Returns the number of slots in the table.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of tombstoned slots.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns the slot at `index`, or `None` if `index` is out of bounds.
    pub fn slot(&self, index: usize) -> Option<&Slot<T>> {
        self.slots.get(index)
    }

    /// Walks the probe sequence `start, start + step, start + 2*step, ...`
    /// (modulo capacity) for at most `capacity` slots.
    ///
    /// - An occupied slot whose value satisfies `eq` resolves the probe.
    /// - An empty slot ends a [`Intent::Lookup`] with
    ///   [`Error::KeyNotFound`]. For [`Intent::Insert`] it resolves to the
    ///   first tombstone seen on the way, or to the empty slot itself.
    /// - Tombstones and non-matching values are skipped.
    ///
    /// When the budget runs out, an insert falls back to the first tombstone
    /// seen, otherwise it fails with [`Error::TableFull`]. A lookup fails with
    /// [`Error::KeyNotFound`].
    ///
    /// The sequence only covers every slot when `step` and the capacity are
    /// coprime; otherwise some slots are never visited.
    pub fn probe(
        &self,
        start: usize,
        step: usize,
        eq: impl Fn(&T) -> bool,
        intent: Intent,
    ) -> Result<usize, Error> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Err(match intent {
                Intent::Lookup => Error::KeyNotFound,
                Intent::Insert => Error::TableFull,
            });
        }

        let step = step % capacity;
        let mut position = start % capacity;
        let mut first_tombstone = None;

        for _ in 0..capacity {
            match &self.slots[position] {
                Slot::Empty => {
                    return match intent {
                        Intent::Insert => Ok(first_tombstone.unwrap_or(position)),
                        Intent::Lookup => Err(Error::KeyNotFound),
                    };
                }
                Slot::Tombstone => {
                    first_tombstone.get_or_insert(position);
                }
                Slot::Occupied(value) if eq(value) => return Ok(position),
                Slot::Occupied(_) => {}
            }

            position = (position + step) % capacity;
        }

        match (intent, first_tombstone) {
            (Intent::Insert, Some(index)) => Ok(index),
            (Intent::Insert, None) => Err(Error::TableFull),
            (Intent::Lookup, _) => Err(Error::KeyNotFound),
        }
    }

    /// Returns a reference to the matching value along the probe sequence.
    pub fn find(&self, start: usize, step: usize, eq: impl Fn(&T) -> bool) -> Option<&T> {
        let index = self.probe(start, step, eq, Intent::Lookup).ok()?;
        self.get(index)
    }

    /// Returns a mutable reference to the matching value along the probe
    /// sequence.
    pub fn find_mut(
        &mut self,
        start: usize,
        step: usize,
        eq: impl Fn(&T) -> bool,
    ) -> Option<&mut T> {
        let index = self.probe(start, step, eq, Intent::Lookup).ok()?;
        self.get_mut(index)
    }

    /// Returns the value stored at `index`, if that slot is occupied.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index)? {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value stored at `index` mutably, if that slot is occupied.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        match self.slots.get_mut(index)? {
            Slot::Occupied(value) => Some(value),
            _ => None,
        }
    }

    /// Writes `value` into the slot at `index` and returns whatever that slot
    /// held before.
    ///
    /// Writing over an empty or tombstoned slot adds one to [`len`]; writing
    /// over an occupied slot leaves it unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// [`len`]: HashTable::len
    pub fn occupy(&mut self, index: usize, value: T) -> Slot<T> {
        let previous = core::mem::replace(&mut self.slots[index], Slot::Occupied(value));
        match previous {
            Slot::Empty => self.populated += 1,
            Slot::Tombstone => {
                self.populated += 1;
                self.tombstones -= 1;
            }
            Slot::Occupied(_) => {}
        }
        previous
    }

    /// Replaces the occupied slot at `index` with a tombstone and returns its
    /// value. Returns `None` and changes nothing if the slot is not occupied.
    pub fn vacate(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        if !slot.is_occupied() {
            return None;
        }

        let value = core::mem::replace(slot, Slot::Tombstone).into_occupied();
        self.populated -= 1;
        self.tombstones += 1;
        value
    }

    /// Removes the matching value along the probe sequence, leaving a
    /// tombstone in its slot.
    pub fn remove(&mut self, start: usize, step: usize, eq: impl Fn(&T) -> bool) -> Option<T> {
        let index = self.probe(start, step, eq, Intent::Lookup).ok()?;
        self.vacate(index)
    }

    /// Resets every slot to empty without changing the capacity.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Moves every value into a fresh array of `capacity` slots.
    ///
    /// `params` returns the `(start, step)` of a value's probe sequence in the
    /// new array. Values are placed in the order of their current slots, each
    /// into the first free slot of its sequence; tombstones are dropped.
    ///
    /// The new layout is worked out before anything moves. If some value has
    /// no reachable free slot, this returns [`Error::TableFull`] and the table
    /// is left exactly as it was.
    pub fn resize(
        &mut self,
        capacity: usize,
        params: impl Fn(&T, usize) -> (usize, usize),
    ) -> Result<(), Error> {
        // Plan placements by old slot index so a failure moves nothing.
        let mut plan: HashTable<usize> = HashTable::with_capacity(capacity);
        for (index, slot) in self.slots.iter().enumerate() {
            if let Slot::Occupied(value) = slot {
                let (start, step) = params(value, capacity);
                let target = plan.probe(start, step, |_| false, Intent::Insert)?;
                plan.occupy(target, index);
            }
        }

        let mut old: Vec<Option<T>> = core::mem::take(&mut self.slots)
            .into_vec()
            .into_iter()
            .map(Slot::into_occupied)
            .collect();

        self.slots = plan
            .slots
            .into_vec()
            .into_iter()
            .map(|slot| match slot {
                Slot::Occupied(index) => old[index].take().map_or(Slot::Empty, Slot::Occupied),
                _ => Slot::Empty,
            })
            .collect();
        self.tombstones = 0;

        Ok(())
    }

    /// Returns an iterator over the values in slot order, along with their
    /// slot index.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.slots.iter().enumerate(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to the values in slot
    /// order.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            inner: self.slots.iter_mut(),
            remaining: self.populated,
        }
    }
}

/// An iterator over the occupied slots of a [`HashTable`], yielding
/// `(index, &value)` in slot order.
pub struct Iter<'a, T> {
    inner: core::iter::Enumerate<core::slice::Iter<'a, Slot<T>>>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for (index, slot) in self.inner.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some((index, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A mutable iterator over the occupied slots of a [`HashTable`].
pub struct IterMut<'a, T> {
    inner: core::slice::IterMut<'a, Slot<T>>,
    remaining: usize,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        for slot in self.inner.by_ref() {
            if let Slot::Occupied(value) = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}
