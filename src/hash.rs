/// The pair of hash functions driving a double-hashing probe sequence.
///
/// `hash` picks the first slot a key probes, `step` picks the stride between
/// successive slots. Both depend on the table's current capacity, so a
/// [`HashMap`](crate::HashMap) recomputes them after every resize instead of
/// caching them per key.
///
/// Implementations should return `hash < capacity` and `step >= 1`. The map
/// reduces both into range regardless, so a misbehaving hasher only degrades
/// probing, it cannot index out of bounds.
pub trait StepHasher {
    /// Returns the home slot of `key` in a table of `capacity` slots.
    fn hash(&self, key: &str, capacity: usize) -> usize;

    /// Returns the probe stride of `key` in a table of `capacity` slots.
    fn step(&self, key: &str, capacity: usize) -> usize;
}

/// Polynomial hashing over the Unicode scalar values of a key.
///
/// The primary hash is a rolling polynomial whose multiplier starts at 31415
/// and is advanced by a factor of 31 modulo `capacity - 1` after every
/// character. The step hash is a plain polynomial in base 37, clamped to at
/// least 1.
///
/// # Examples
///
/// ```rust
/// use step_hash::PolynomialHasher;
/// use step_hash::StepHasher;
///
/// let hasher = PolynomialHasher;
/// assert_eq!(hasher.hash("a", 5), 2);
/// assert_eq!(hasher.step("a", 5), 2);
/// assert_eq!(hasher.hash("ab", 5), 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolynomialHasher;

impl PolynomialHasher {
    const HASH_SEED: u128 = 31415;
    const HASH_BASE: u128 = 31;
    const STEP_BASE: u128 = 37;
}

impl StepHasher for PolynomialHasher {
    fn hash(&self, key: &str, capacity: usize) -> usize {
        // Intermediate products always fit in a u128.
        let capacity = capacity as u128;
        if capacity < 2 {
            return 0;
        }

        let mut value = 0u128;
        let mut a = Self::HASH_SEED;
        for c in key.chars() {
            value = (u128::from(u32::from(c)) + a * value) % capacity;
            a = a * Self::HASH_BASE % (capacity - 1);
        }
        value as usize
    }

    fn step(&self, key: &str, capacity: usize) -> usize {
        let capacity = capacity as u128;
        if capacity == 0 {
            return 1;
        }

        let mut value = 0u128;
        for c in key.chars() {
            value = (u128::from(u32::from(c)) + value * Self::STEP_BASE) % capacity;
        }
        (value as usize).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_keys() {
        let hasher = PolynomialHasher;
        // A single character hashes to its code point modulo the capacity.
        for (key, home) in [("a", 2), ("b", 3), ("c", 4), ("d", 0), ("x", 0), ("y", 1)] {
            assert_eq!(hasher.hash(key, 5), home, "{key}");
        }
        assert_eq!(hasher.hash("a", 13), 6);
        assert_eq!(hasher.hash("d", 13), 9);
    }

    #[test]
    fn step_is_never_zero() {
        let hasher = PolynomialHasher;
        assert_eq!(hasher.step("d", 5), 1);
        assert_eq!(hasher.step("x", 5), 1);
        assert_eq!(hasher.step("", 5), 1);
        assert_eq!(hasher.step("a", 5), 2);
        assert_eq!(hasher.step("c", 5), 4);
    }

    #[test]
    fn multi_character_keys() {
        let hasher = PolynomialHasher;
        assert_eq!(hasher.hash("ab", 5), 0);
        assert_eq!(hasher.hash("ab", 13), 11);
        assert_eq!(hasher.step("ab", 13), 8);

        assert_eq!(hasher.hash("goals", 5), 1);
        assert_eq!(hasher.hash("goals", 13), 9);
        assert_eq!(hasher.hash("goals", 29), 16);
        assert_eq!(hasher.step("goals", 29), 12);

        assert_eq!(hasher.hash("assists", 13), 12);
        assert_eq!(hasher.step("assists", 29), 25);
    }

    #[test]
    fn non_ascii_keys_hash_by_code_point() {
        let hasher = PolynomialHasher;
        assert_eq!(hasher.hash("héllo", 13), 4);
        assert_eq!(hasher.step("héllo", 13), 10);
        assert_eq!(hasher.hash("héllo", 29), 14);
        assert_eq!(hasher.step("héllo", 29), 21);
    }

    #[test]
    fn hash_depends_on_capacity() {
        let hasher = PolynomialHasher;
        assert_ne!(hasher.hash("a", 5), hasher.hash("a", 13));
    }

    #[test]
    fn hash_stays_in_range_for_huge_capacities() {
        let hasher = PolynomialHasher;
        let key = "a fairly long key with plenty of characters to overflow a u64";
        assert!(hasher.hash(key, usize::MAX) < usize::MAX);
        assert!(hasher.step(key, usize::MAX) < usize::MAX);
    }
}
