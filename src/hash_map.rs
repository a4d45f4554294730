use core::fmt::Debug;
use core::fmt::Display;

use tracing::debug;
use tracing::trace;
use tracing::warn;

use crate::error::Error;
use crate::hash::PolynomialHasher;
use crate::hash::StepHasher;
use crate::hash_table::HashTable;
use crate::hash_table::Intent;
use crate::sizes::TableSizes;

/// A string-keyed hash map using double hashing over a [`HashTable`].
///
/// `HashMap<K, V, S>` stores key-value pairs whose keys can be viewed as
/// `str`. Collisions are resolved by open addressing: a key's probe sequence
/// starts at `S::hash` and advances by `S::step`. Removed entries leave a
/// tombstone that is only cleared when the table grows.
///
/// The table grows along a [`TableSizes`] schedule whenever more than two
/// thirds of its slots are occupied. Once the schedule is exhausted it keeps
/// filling until no slot can be found, at which point inserts fail with
/// [`Error::TableFull`].
///
/// Iteration order follows the physical slot layout and changes when the
/// table grows.
///
/// # Examples
///
/// ```rust
/// use step_hash::Error;
/// use step_hash::HashMap;
///
/// let mut stats: HashMap<&str, u32> = HashMap::new();
/// stats.insert("goals", 0).unwrap();
/// stats.insert("assists", 0).unwrap();
///
/// *stats.get_mut("goals").unwrap() += 1;
/// assert_eq!(stats.get("goals"), Ok(&1));
///
/// assert_eq!(stats.remove("assists"), Ok(0));
/// assert_eq!(stats.get("assists"), Err(Error::KeyNotFound));
/// assert_eq!(stats.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = PolynomialHasher> {
    table: HashTable<(K, V)>,
    sizes: TableSizes,
    size_index: usize,
    hasher: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> Display for HashMap<K, V, S>
where
    K: Display,
    V: Display,
{
    /// Writes one `(key,value)` line per entry, in slot order.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (k, v) in self.iter() {
            writeln!(f, "({k},{v})")?;
        }
        Ok(())
    }
}

impl<K, V> HashMap<K, V, PolynomialHasher>
where
    K: AsRef<str>,
{
    /// Creates an empty map using the default schedule and hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_hash::HashMap;
    ///
    /// let map: HashMap<String, i32> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 5);
    /// ```
    pub fn new() -> Self {
        Self::with_sizes_and_hasher(TableSizes::DEFAULT, PolynomialHasher)
    }

    /// Creates an empty map that grows through `sizes`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_hash::HashMap;
    /// use step_hash::TableSizes;
    ///
    /// let sizes = TableSizes::new(vec![7, 17]).unwrap();
    /// let map: HashMap<String, i32> = HashMap::with_sizes(sizes);
    /// assert_eq!(map.capacity(), 7);
    /// ```
    pub fn with_sizes(sizes: TableSizes) -> Self {
        Self::with_sizes_and_hasher(sizes, PolynomialHasher)
    }
}

impl<K, V> Default for HashMap<K, V, PolynomialHasher>
where
    K: AsRef<str>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns `true` if every slot of the current table is occupied.
    pub fn is_full(&self) -> bool {
        self.table.len() == self.table.capacity()
    }

    /// Returns the number of slots in the current table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the position of the current capacity in the schedule.
    pub fn size_index(&self) -> usize {
        self.size_index
    }

    /// Returns the schedule this map grows through.
    pub fn sizes(&self) -> &TableSizes {
        &self.sizes
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Returns the number of tombstoned slots in the current table.
    pub fn tombstones(&self) -> usize {
        self.table.tombstones()
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries in slot order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys in slot order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in slot order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable references to the values in slot
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// map.insert("wins", 3).unwrap();
    /// map.insert("losses", 1).unwrap();
    ///
    /// for value in map.values_mut() {
    ///     *value = 0;
    /// }
    /// assert!(map.values().all(|&v| v == 0));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.table.iter_mut(),
        }
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: AsRef<str>,
    S: StepHasher,
{
    /// Creates an empty map with the default schedule and the given hasher.
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_sizes_and_hasher(TableSizes::DEFAULT, hasher)
    }

    /// Creates an empty map with the given schedule and hasher.
    pub fn with_sizes_and_hasher(sizes: TableSizes, hasher: S) -> Self {
        HashMap {
            table: HashTable::with_capacity(sizes.first()),
            sizes,
            size_index: 0,
            hasher,
        }
    }

    fn probe_params(&self, key: &str) -> (usize, usize) {
        probe_params(&self.hasher, key, self.table.capacity())
    }

    fn find_index<Q>(&self, key: &Q) -> Result<usize, Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        let key = key.as_ref();
        let (start, step) = self.probe_params(key);
        self.table
            .probe(start, step, |(k, _)| k.as_ref() == key, Intent::Lookup)
    }

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is not present.
    pub fn get<Q>(&self, key: &Q) -> Result<&V, Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        let index = self.find_index(key)?;
        self.table
            .get(index)
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns the stored key and value for `key`.
    pub fn get_key_value<Q>(&self, key: &Q) -> Result<(&K, &V), Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        let index = self.find_index(key)?;
        self.table
            .get(index)
            .map(|(k, v)| (k, v))
            .ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is not present.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V, Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        let index = self.find_index(key)?;
        self.table
            .get_mut(index)
            .map(|(_, v)| v)
            .ok_or(Error::KeyNotFound)
    }

    /// Returns `true` if the map contains `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<str> + ?Sized,
    {
        self.find_index(key).is_ok()
    }

    /// Inserts a key-value pair, returning the value it replaced.
    ///
    /// An existing key keeps its slot and only has its value replaced. A new
    /// key takes the first tombstone on its probe sequence, or the first empty
    /// slot if there is none. If the new key pushes the table past two thirds
    /// full, the table grows to the next scheduled size before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if no slot can be found for a new key
    /// even after growing through the rest of the schedule. The map is not
    /// modified in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_hash::HashMap;
    ///
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert("a", 1), Ok(None));
    /// assert_eq!(map.insert("a", 2), Ok(Some(1)));
    /// assert_eq!(map.get("a"), Ok(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let index = loop {
            let (start, step) = self.probe_params(key.as_ref());
            match self.table.probe(
                start,
                step,
                |(k, _)| k.as_ref() == key.as_ref(),
                Intent::Insert,
            ) {
                Ok(index) => break index,
                Err(Error::TableFull) => {
                    trace!(capacity = self.capacity(), "no free slot on probe sequence");
                    self.rehash()?;
                }
                Err(error) => return Err(error),
            }
        };

        if let Some((_, existing)) = self.table.get_mut(index) {
            return Ok(Some(core::mem::replace(existing, value)));
        }

        self.table.occupy(index, (key, value));

        if self.table.len() * 3 > self.table.capacity() * 2 && self.rehash().is_err() {
            warn!(
                len = self.len(),
                capacity = self.capacity(),
                "load factor exceeded and the table cannot grow"
            );
        }

        Ok(None)
    }

    /// Removes `key` from the map, returning its value.
    ///
    /// The slot becomes a tombstone and is reclaimed by a later insert or
    /// the next rehash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is not present.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes `key` from the map, returning the stored key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Result<(K, V), Error>
    where
        Q: AsRef<str> + ?Sized,
    {
        let index = self.find_index(key)?;
        self.table.vacate(index).ok_or(Error::KeyNotFound)
    }

    /// Moves every entry into a table of the next scheduled size.
    ///
    /// Home slots and strides are recomputed for the new capacity and
    /// tombstones are discarded. If the entries cannot all be placed at the
    /// next size, the sizes after it are tried in turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] if the schedule has no size left that
    /// can hold the entries. The map is left unchanged and further calls
    /// will keep failing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use step_hash::Error;
    /// use step_hash::HashMap;
    /// use step_hash::TableSizes;
    ///
    /// let mut map = HashMap::with_sizes(TableSizes::new(vec![5, 13]).unwrap());
    /// map.insert("a", 1).unwrap();
    ///
    /// assert_eq!(map.rehash(), Ok(()));
    /// assert_eq!(map.capacity(), 13);
    /// assert_eq!(map.rehash(), Err(Error::TableFull));
    /// assert_eq!(map.get("a"), Ok(&1));
    /// ```
    pub fn rehash(&mut self) -> Result<(), Error> {
        let mut size_index = self.size_index + 1;
        while let Some(capacity) = self.sizes.get(size_index) {
            let hasher = &self.hasher;
            let resized = self.table.resize(capacity, |(k, _), capacity| {
                probe_params(hasher, k.as_ref(), capacity)
            });

            match resized {
                Ok(()) => {
                    debug!(
                        capacity,
                        size_index,
                        len = self.table.len(),
                        "resized hash table"
                    );
                    self.size_index = size_index;
                    return Ok(());
                }
                Err(_) => {
                    debug!(capacity, size_index, "entries do not fit, skipping size");
                    size_index += 1;
                }
            }
        }

        Err(Error::TableFull)
    }

    /// Returns detailed probing statistics for the current table.
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::stats::DebugStats {
        let histogram = self.probe_histogram();
        crate::stats::DebugStats {
            populated: self.len(),
            capacity: self.capacity(),
            tombstones: self.tombstones(),
            size_index: self.size_index,
            load_factor: self.len() as f64 / self.capacity() as f64,
            max_probe_length: histogram.max_probe_length(),
        }
    }

    /// Computes how many strides each entry sits from its home slot.
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> crate::stats::ProbeHistogram {
        let capacity = self.capacity();
        let mut histogram = crate::stats::ProbeHistogram::default();
        for (index, (k, _)) in self.table.iter() {
            let (start, step) = self.probe_params(k.as_ref());
            let mut position = start;
            let mut length = 0;
            while position != index && length < capacity {
                position = (position + step) % capacity;
                length += 1;
            }
            histogram.record(length);
        }
        histogram
    }
}

fn probe_params<S: StepHasher>(hasher: &S, key: &str, capacity: usize) -> (usize, usize) {
    if capacity == 0 {
        return (0, 1);
    }
    let start = hasher.hash(key, capacity) % capacity;
    let step = (hasher.step(key, capacity) % capacity).max(1);
    (start, step)
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, (k, v))| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A mutable iterator over the values of a `HashMap`.
pub struct ValuesMut<'a, K, V> {
    inner: crate::hash_table::IterMut<'a, (K, V)>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::hash_table::Slot;

    fn sizes(sizes: &[usize]) -> TableSizes {
        TableSizes::new(sizes.to_vec()).unwrap()
    }

    fn slot_of<V, S>(map: &HashMap<&str, V, S>, key: &str) -> Option<usize> {
        map.table
            .iter()
            .find(|(_, (k, _))| *k == key)
            .map(|(index, _)| index)
    }

    /// Sends every key to the same home slot with a unit stride.
    #[derive(Clone, Copy)]
    struct Collide;

    impl StepHasher for Collide {
        fn hash(&self, _key: &str, _capacity: usize) -> usize {
            0
        }

        fn step(&self, _key: &str, _capacity: usize) -> usize {
            1
        }
    }

    #[test]
    fn test_new() {
        let map: HashMap<String, i32> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 5);
        assert_eq!(map.size_index(), 0);
        assert_eq!(map.sizes(), &TableSizes::DEFAULT);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::new();
        assert_eq!(map.insert("hello".to_string(), 1), Ok(None));
        assert_eq!(map.get("hello"), Ok(&1));
        assert_eq!(map.get(&"hello".to_string()), Ok(&1));
        assert_eq!(map.get("world"), Err(Error::KeyNotFound));

        assert_eq!(map.insert("hello".to_string(), 2), Ok(Some(1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("hello"), Ok(&2));
    }

    #[test]
    fn test_update_keeps_slot_and_count() {
        let mut map = HashMap::new();
        map.insert("a", 1).unwrap();
        let slot = slot_of(&map, "a");
        map.insert("a", 5).unwrap();
        assert_eq!(slot_of(&map, "a"), slot);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get_key_value("a"), Ok((&"a", &5)));
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashMap::new();
        map.insert("goals", 1).unwrap();
        *map.get_mut("goals").unwrap() += 2;
        assert_eq!(map.get("goals"), Ok(&3));
        assert_eq!(map.get_mut("saves"), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashMap::new();
        assert!(!map.contains_key("a"));
        map.insert("a", ()).unwrap();
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_remove() {
        let mut map = HashMap::new();
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();

        assert_eq!(map.remove("a"), Ok(1));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Err(Error::KeyNotFound));
        assert!(!map.contains_key("a"));
        assert_eq!(map.get("b"), Ok(&2));
        assert_eq!(map.remove("a"), Err(Error::KeyNotFound));
        assert_eq!(map.tombstones(), 1);

        assert_eq!(map.insert("a", 10), Ok(None));
        assert_eq!(map.get("a"), Ok(&10));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove_entry() {
        let mut map = HashMap::new();
        map.insert(String::from("key"), 7).unwrap();
        assert_eq!(map.remove_entry("key"), Ok((String::from("key"), 7)));
        assert!(map.is_empty());
    }

    #[test]
    fn test_schedule_of_five_holds_five_keys() {
        let mut map = HashMap::with_sizes(sizes(&[5]));
        for (value, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            map.insert(key, value).unwrap();
        }
        for (value, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            assert_eq!(map.get(key), Ok(&value));
        }
        // "a".."d" sit in slots 2, 3, 4 and 0, so "e" (home 1) still fits.
        assert_eq!(slot_of(&map, "d"), Some(0));
        assert_eq!(map.insert("e", 4), Ok(None));
        assert_eq!(slot_of(&map, "e"), Some(1));
        assert!(map.is_full());
        assert_eq!(map.capacity(), 5);

        let before: Vec<_> = map.keys().copied().collect();
        assert_eq!(map.insert("f", 5), Err(Error::TableFull));
        let after: Vec<_> = map.keys().copied().collect();
        assert_eq!(before, after);
        assert_eq!(map.len(), 5);

        // Updating a present key still works on a full table.
        assert_eq!(map.insert("c", 20), Ok(Some(2)));
    }

    #[test]
    fn test_tombstone_reuse_avoids_growth() {
        let mut map = HashMap::new();
        map.insert("a", 0).unwrap();
        map.insert("b", 0).unwrap();
        map.insert("x", 1).unwrap();
        assert_eq!(slot_of(&map, "x"), Some(0));

        map.remove("x").unwrap();
        assert_eq!(map.tombstones(), 1);

        // "n" has the same home slot as "x" and takes over its tombstone.
        assert_eq!(map.insert("n", 2), Ok(None));
        assert_eq!(slot_of(&map, "n"), Some(0));
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.len(), 3);
        assert_eq!(map.capacity(), 5);
        assert_eq!(map.get("n"), Ok(&2));
    }

    #[test]
    fn test_tombstone_does_not_hide_later_keys() {
        let mut map = HashMap::with_hasher(Collide);
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();
        map.remove("a").unwrap();

        assert_eq!(map.get("b"), Ok(&2));
        // Re-inserting "b" must update it rather than claim the tombstone.
        assert_eq!(map.insert("b", 3), Ok(Some(2)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.tombstones(), 1);
    }

    #[test]
    fn test_load_factor_triggers_growth() {
        let mut map = HashMap::new();
        for key in ["a", "b", "c"] {
            map.insert(key, ()).unwrap();
        }
        assert_eq!(map.capacity(), 5);

        map.insert("d", ()).unwrap();
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.size_index(), 1);
        // Home slots are recomputed for the new capacity.
        assert_eq!(slot_of(&map, "a"), Some(6));
        assert_eq!(slot_of(&map, "d"), Some(9));
    }

    #[test]
    fn test_growth_keeps_every_entry() {
        let mut map = HashMap::new();
        for i in 0..1000 {
            map.insert(format!("key{i}"), i).unwrap();
            assert_eq!(map.len(), i + 1);
            assert!(map.len() * 3 <= map.capacity() * 2);
        }
        assert_eq!(map.capacity(), 1543);
        assert_eq!(map.size_index(), 8);
        for i in 0..1000 {
            assert_eq!(map.get(&format!("key{i}")), Ok(&i));
        }
    }

    #[test]
    fn test_growth_drops_tombstones() {
        let mut map = HashMap::new();
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();
        map.remove("a").unwrap();
        map.insert("c", 3).unwrap();
        map.insert("d", 4).unwrap();
        map.insert("e", 5).unwrap();

        assert_eq!(map.capacity(), 13);
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.len(), 4);
        assert!(!map.contains_key("a"));
    }

    #[test]
    fn test_explicit_rehash() {
        let mut map = HashMap::with_sizes(sizes(&[5, 13]));
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();
        map.remove("b").unwrap();

        assert_eq!(map.rehash(), Ok(()));
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.size_index(), 1);
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.get("a"), Ok(&1));

        assert_eq!(map.rehash(), Err(Error::TableFull));
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.size_index(), 1);
        assert_eq!(map.get("a"), Ok(&1));
    }

    #[test]
    fn test_rehash_skips_sizes_that_cannot_hold_entries() {
        // Every key starts at slot 0 with stride 2, so a table of 6 can only
        // ever reach slots 0, 2 and 4.
        struct EvenStride;
        impl StepHasher for EvenStride {
            fn hash(&self, _key: &str, _capacity: usize) -> usize {
                0
            }

            fn step(&self, _key: &str, _capacity: usize) -> usize {
                2
            }
        }

        let mut map = HashMap::with_sizes_and_hasher(sizes(&[5, 6, 13]), EvenStride);
        for key in ["a", "b", "c"] {
            map.insert(key, ()).unwrap();
        }
        assert_eq!(map.capacity(), 5);

        map.insert("d", ()).unwrap();
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.size_index(), 2);
        // Entries move in old slot order: "a" (0), "d" (1), "b" (2), "c" (4).
        assert_eq!(slot_of(&map, "a"), Some(0));
        assert_eq!(slot_of(&map, "d"), Some(2));
        assert_eq!(slot_of(&map, "c"), Some(6));
        for key in ["a", "b", "c", "d"] {
            assert!(map.contains_key(key));
        }
    }

    #[test]
    fn test_custom_hasher_is_reduced_into_range() {
        struct Oversized;
        impl StepHasher for Oversized {
            fn hash(&self, _key: &str, capacity: usize) -> usize {
                capacity + 3
            }

            fn step(&self, _key: &str, capacity: usize) -> usize {
                capacity
            }
        }

        let mut map = HashMap::with_hasher(Oversized);
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();
        assert_eq!(slot_of(&map, "a"), Some(3));
        assert_eq!(slot_of(&map, "b"), Some(4));
        assert_eq!(map.get("b"), Ok(&2));
    }

    #[test]
    fn test_probe_failure_grows_the_table() {
        // At capacity 6, "0", "d" and "V" sit in slots 0, 4 and 2, which is
        // the whole probe cycle of "b" (home 2, stride 2).
        let mut map = HashMap::with_sizes(sizes(&[6, 13]));
        for key in ["0", "d", "V"] {
            map.insert(key, ()).unwrap();
        }
        assert_eq!(map.capacity(), 6);
        assert_eq!(slot_of(&map, "0"), Some(0));
        assert_eq!(slot_of(&map, "V"), Some(2));
        assert_eq!(slot_of(&map, "d"), Some(4));

        assert_eq!(map.insert("b", ()), Ok(None));
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_non_coprime_stride_is_a_known_limitation() {
        // Same layout without room to grow: "b" is rejected although half the
        // slots are free.
        let mut map = HashMap::with_sizes(sizes(&[6]));
        for key in ["0", "d", "V"] {
            map.insert(key, ()).unwrap();
        }
        assert_eq!(map.insert("b", ()), Err(Error::TableFull));
        assert_eq!(map.len(), 3);
        assert!(!map.contains_key("b"));
        assert!(matches!(map.table.slot(1), Some(Slot::Empty)));
    }

    #[test]
    fn test_iteration_follows_slot_order() {
        let mut map = HashMap::with_sizes(sizes(&[5]));
        for (value, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
            map.insert(key, value).unwrap();
        }
        let keys: Vec<_> = map.keys().copied().collect();
        assert_eq!(keys, vec!["d", "a", "b", "c"]);
        let values: Vec<_> = map.values().copied().collect();
        assert_eq!(values, vec![3, 0, 1, 2]);
        let pairs: Vec<_> = (&map).into_iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("d", 3), ("a", 0), ("b", 1), ("c", 2)]);
    }

    #[test]
    fn test_iteration_skips_tombstones() {
        let mut map = HashMap::new();
        map.insert("a", 1).unwrap();
        map.insert("b", 2).unwrap();
        map.remove("a").unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_values_mut_resets_counters() {
        let mut map = HashMap::new();
        for (i, key) in ["goals", "assists", "saves"].into_iter().enumerate() {
            map.insert(key, i + 1).unwrap();
        }
        for value in map.values_mut() {
            *value = 0;
        }
        assert_eq!(map.values().sum::<usize>(), 0);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut map = HashMap::new();
        for key in ["a", "b", "c", "d"] {
            map.insert(key, 0).unwrap();
        }
        map.remove("a").unwrap();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.tombstones(), 0);
        assert_eq!(map.capacity(), 13);
        assert_eq!(map.get("b"), Err(Error::KeyNotFound));
    }

    #[test]
    fn test_display_and_debug() {
        let mut map = HashMap::with_sizes(sizes(&[5]));
        map.insert("a", 1).unwrap();
        map.insert("d", 2).unwrap();
        assert_eq!(map.to_string(), "(d,2)\n(a,1)\n");
        assert_eq!(format!("{map:?}"), "{\"d\": 2, \"a\": 1}");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut map = HashMap::new();
        map.insert("a", 1).unwrap();
        let mut copy = map.clone();
        copy.insert("a", 2).unwrap();
        assert_eq!(map.get("a"), Ok(&1));
        assert_eq!(copy.get("a"), Ok(&2));
    }

    #[test]
    fn test_colliding_hasher_still_works() {
        let mut map = HashMap::with_hasher(Collide);
        for i in 0..50 {
            map.insert(format!("k{i}"), i).unwrap();
        }
        for i in 0..50 {
            assert_eq!(map.get(&format!("k{i}")), Ok(&i));
        }
        assert_eq!(map.capacity(), 97);
    }

    #[test]
    fn test_empty_key() {
        let mut map = HashMap::new();
        map.insert("", 1).unwrap();
        assert_eq!(map.get(""), Ok(&1));
        assert_eq!(map.remove(""), Ok(1));
    }

    #[test]
    #[cfg(feature = "std")]
    fn test_random_operations_match_std() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut map = HashMap::new();
        let mut model = std::collections::HashMap::new();

        for _ in 0..20_000 {
            let key = format!("k{}", rng.random_range(0..500u32));
            match rng.random_range(0..3u8) {
                0 => {
                    let value: u32 = rng.random();
                    assert_eq!(
                        map.insert(key.clone(), value).unwrap(),
                        model.insert(key, value)
                    );
                }
                1 => {
                    assert_eq!(map.remove(&key).ok(), model.remove(&key));
                }
                _ => {
                    assert_eq!(map.get(&key).ok(), model.get(&key));
                }
            }
            assert_eq!(map.len(), model.len());
        }

        let mut keys: Vec<_> = map.keys().cloned().collect();
        keys.sort();
        let mut expected: Vec<_> = model.keys().cloned().collect();
        expected.sort();
        assert_eq!(keys, expected);
    }
}
