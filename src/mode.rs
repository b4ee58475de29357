//! Finds the most frequent items of a sequence.

use super::{ChainedHashMap, KeyHasher, SumOfBytes};

/// Returns the most frequent items and their frequency.
///
/// Items are counted in a [`ChainedHashMap`] hashed with [`SumOfBytes`]. Every item reaching
/// the highest count is reported, in the traversal order of the map rather than input order.
/// An empty input yields no items and a frequency of `0`.
///
/// # Examples
///
/// ```
/// use primemap::find_mode;
///
/// let (mode, frequency) = find_mode(["apple", "apple", "grape", "melon", "peach"]);
/// assert_eq!(mode, ["apple"]);
/// assert_eq!(frequency, 2);
/// ```
pub fn find_mode<T, I>(items: I) -> (Vec<T>, usize)
where
    T: AsRef<[u8]> + Clone + Eq,
    I: IntoIterator<Item = T>,
{
    find_mode_with_hasher(items, SumOfBytes)
}

/// Returns the most frequent items and their frequency, counting them with the given hash
/// function.
///
/// # Examples
///
/// ```
/// use primemap::find_mode_with_hasher;
///
/// let (mut mode, frequency) =
///     find_mode_with_hasher([3, 1, 3, 2, 1], |n: &i32| u64::from(n.unsigned_abs()));
/// mode.sort_unstable();
/// assert_eq!(mode, [1, 3]);
/// assert_eq!(frequency, 2);
/// ```
pub fn find_mode_with_hasher<T, I, H>(items: I, hasher: H) -> (Vec<T>, usize)
where
    T: Clone + Eq,
    I: IntoIterator<Item = T>,
    H: KeyHasher<T>,
{
    let mut counts: ChainedHashMap<T, usize, H> = ChainedHashMap::with_hasher(hasher);
    let mut frequency = 0;
    for item in items {
        let count = counts.get(&item).copied().unwrap_or(0) + 1;
        counts.put(item, count);
        frequency = frequency.max(count);
    }

    let mode = counts
        .get_keys_and_values()
        .into_iter()
        .filter_map(|(item, count)| (count == frequency).then_some(item))
        .collect();
    (mode, frequency)
}
