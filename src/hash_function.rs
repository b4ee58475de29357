//! Pluggable hash functions.
//!
//! A table never looks inside its hash function; it only relies on [`KeyHasher::hash_key`]
//! returning the same value for equal keys.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash, Hasher};

/// Maps a key to a non-negative integer.
///
/// Every `Fn(&K) -> u64` implements [`KeyHasher`], so a plain function or closure can be
/// supplied wherever a hasher is expected.
///
/// # Examples
///
/// ```
/// use primemap::{KeyHasher, OpenHashMap};
///
/// let length = |key: &String| key.len() as u64;
/// assert_eq!(length.hash_key(&"four".to_string()), 4);
///
/// let mut map = OpenHashMap::with_capacity_and_hasher(7, length);
/// assert!(map.put("key".to_string(), 1).is_none());
/// ```
pub trait KeyHasher<K: ?Sized> {
    /// Returns the hash value of the key.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Sums the bytes of the key.
///
/// Anagrams collide, which makes it handy for exercising collision handling.
///
/// # Examples
///
/// ```
/// use primemap::{KeyHasher, SumOfBytes};
///
/// assert_eq!(SumOfBytes.hash_key("ab"), 97 + 98);
/// assert_eq!(SumOfBytes.hash_key("ab"), SumOfBytes.hash_key("ba"));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SumOfBytes;

impl<K: AsRef<[u8]> + ?Sized> KeyHasher<K> for SumOfBytes {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.as_ref()
            .iter()
            .fold(0_u64, |hash, byte| hash.wrapping_add(u64::from(*byte)))
    }
}

/// Sums the bytes of the key, each weighted by its one-based position.
///
/// # Examples
///
/// ```
/// use primemap::{KeyHasher, WeightedSum};
///
/// assert_eq!(WeightedSum.hash_key("ab"), 97 + 2 * 98);
/// assert_ne!(WeightedSum.hash_key("ab"), WeightedSum.hash_key("ba"));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct WeightedSum;

impl<K: AsRef<[u8]> + ?Sized> KeyHasher<K> for WeightedSum {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        key.as_ref()
            .iter()
            .zip(1_u64..)
            .fold(0_u64, |hash, (byte, weight)| {
                hash.wrapping_add(weight.wrapping_mul(u64::from(*byte)))
            })
    }
}

/// Adapts a [`BuildHasher`] to hash any [`Hash`] key.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherAdapter<S = RandomState> {
    build_hasher: S,
}

impl<S: BuildHasher> BuildHasherAdapter<S> {
    /// Wraps the given [`BuildHasher`].
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{BuildHasherAdapter, KeyHasher};
    /// use std::collections::hash_map::RandomState;
    ///
    /// let hasher = BuildHasherAdapter::new(RandomState::new());
    /// assert_eq!(hasher.hash_key(&17_u32), hasher.hash_key(&17_u32));
    /// ```
    #[inline]
    pub const fn new(build_hasher: S) -> Self {
        Self { build_hasher }
    }

    /// Returns a reference to the wrapped [`BuildHasher`].
    #[inline]
    pub const fn build_hasher(&self) -> &S {
        &self.build_hasher
    }
}

impl<K: Hash + ?Sized, S: BuildHasher> KeyHasher<K> for BuildHasherAdapter<S> {
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        let mut h = self.build_hasher.build_hasher();
        key.hash(&mut h);
        h.finish()
    }
}
