//! [`ChainedHashMap`] is a hash map with separate chaining.

use super::error::ResizeError;
use super::hash_table::bucket_array::BucketArray;
use super::hash_table::chain::Chain;
use super::hash_table::{HashTable, DEFAULT_CAPACITY};
use super::prime::next_prime;
use super::{BuildHasherAdapter, Equivalent, KeyHasher};
use std::fmt::{self, Debug, Display};
use std::iter::FusedIterator;
use std::slice;

/// Hash map with separate chaining.
///
/// Every bucket of [`ChainedHashMap`] owns a chain of the entries hashed to it, kept in
/// insertion order. A key is only ever looked for in its own bucket.
///
/// An insertion first grows the table to the next prime at or above double the capacity if
/// the load has reached `1.0`. Unlike [`OpenHashMap`](crate::OpenHashMap), the table can be
/// explicitly resized below the number of entries it holds, in which case the rebuild grows
/// it back as insertions would.
#[derive(Clone)]
pub struct ChainedHashMap<K, V, H = BuildHasherAdapter> {
    array: BucketArray<Chain<K, V>>,
    num_entries: usize,
    hasher: H,
}

/// An iterator over the entries of a [`ChainedHashMap`] in bucket order.
pub struct Iter<'h, K, V> {
    chains: slice::Iter<'h, Chain<K, V>>,
    entries: slice::Iter<'h, (K, V)>,
    remaining: usize,
}

impl<K, V> ChainedHashMap<K, V, BuildHasherAdapter> {
    /// Creates an empty [`ChainedHashMap`] with the default capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::ChainedHashMap;
    ///
    /// let hashmap: ChainedHashMap<u64, u32> = ChainedHashMap::new();
    /// assert_eq!(hashmap.capacity(), 11);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`ChainedHashMap`] with the specified capacity.
    ///
    /// The actual capacity is the next prime reached from the specified capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::ChainedHashMap;
    ///
    /// let hashmap: ChainedHashMap<u64, u32> = ChainedHashMap::with_capacity(96);
    /// assert_eq!(hashmap.capacity(), 97);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, BuildHasherAdapter::default())
    }
}

impl<K, V, H> ChainedHashMap<K, V, H> {
    /// Creates an empty [`ChainedHashMap`] with the given hash function.
    #[inline]
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty [`ChainedHashMap`] with the specified capacity and hash function.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{ChainedHashMap, SumOfBytes};
    ///
    /// let hashmap: ChainedHashMap<String, u32, _> =
    ///     ChainedHashMap::with_capacity_and_hasher(53, SumOfBytes);
    /// assert_eq!(hashmap.capacity(), 53);
    /// ```
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            array: BucketArray::new(next_prime(capacity)),
            num_entries: 0,
            hasher,
        }
    }

    /// Returns the number of entries in the [`ChainedHashMap`].
    #[inline]
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Returns `true` if the [`ChainedHashMap`] holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Returns the number of buckets.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Returns the ratio of entries to buckets.
    ///
    /// The load of a [`ChainedHashMap`] may exceed `1.0`.
    #[inline]
    pub fn table_load(&self) -> f64 {
        HashTable::table_load(self)
    }

    /// Returns the number of buckets with an empty chain.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{ChainedHashMap, SumOfBytes};
    ///
    /// let mut hashmap = ChainedHashMap::with_capacity_and_hasher(101, SumOfBytes);
    /// assert_eq!(hashmap.empty_buckets(), 101);
    ///
    /// hashmap.put("key1", 10);
    /// hashmap.put("key2", 20);
    /// hashmap.put("key1", 30);
    /// assert_eq!(hashmap.empty_buckets(), 99);
    /// ```
    pub fn empty_buckets(&self) -> usize {
        self.array.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Removes every entry, keeping the capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.clear_buckets();
    }

    /// Returns an iterator over the entries in bucket order.
    ///
    /// Entries sharing a bucket are visited in insertion order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            chains: self.array.iter(),
            entries: (&[]).iter(),
            remaining: self.num_entries,
        }
    }

    /// Returns a snapshot of the entries in bucket order.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{ChainedHashMap, WeightedSum};
    ///
    /// let mut hashmap = ChainedHashMap::with_capacity_and_hasher(11, WeightedSum);
    /// for i in 1..6 {
    ///     hashmap.put(i.to_string(), i * 10);
    /// }
    ///
    /// let snapshot = hashmap.get_keys_and_values();
    /// assert_eq!(snapshot.len(), 5);
    /// assert!(snapshot.contains(&("3".to_string(), 30)));
    /// ```
    pub fn get_keys_and_values(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Returns a reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::ChainedHashMap;
    ///
    /// let mut hashmap: ChainedHashMap<String, u32> = ChainedHashMap::default();
    ///
    /// assert!(hashmap.get("key").is_none());
    /// hashmap.put("key".to_string(), 10);
    /// assert_eq!(hashmap.get("key"), Some(&10));
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let chain = self.chain(key);
        let pos = chain.position(key)?;
        chain.entry(pos).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value associated with the key.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let index = self.array.calculate_bucket_index(self.hash(key));
        let chain = self.array.bucket_mut(index);
        let pos = chain.position(key)?;
        chain.value_mut(pos)
    }

    /// Returns `true` if the key is present.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        self.chain(key).position(key).is_some()
    }

    /// Removes the key from its chain.
    ///
    /// Returns the removed entry, or `None` if the key was absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::ChainedHashMap;
    ///
    /// let mut hashmap: ChainedHashMap<u64, u32> = ChainedHashMap::default();
    ///
    /// hashmap.put(1, 0);
    /// assert_eq!(hashmap.remove(&1), Some((1, 0)));
    /// assert!(hashmap.remove(&1).is_none());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let index = self.array.calculate_bucket_index(self.hash(key));
        let entry = self.array.bucket_mut(index).remove(key)?;
        self.num_entries -= 1;
        Some(entry)
    }

    /// Returns the chain the key hashes to.
    #[inline]
    fn chain<Q>(&self, key: &Q) -> &Chain<K, V>
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        self.array
            .bucket(self.array.calculate_bucket_index(self.hash(key)))
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Inserts or updates an entry.
    ///
    /// Returns the previous value if the key was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{ChainedHashMap, SumOfBytes};
    ///
    /// let mut hashmap = ChainedHashMap::with_capacity_and_hasher(3, SumOfBytes);
    ///
    /// assert!(hashmap.put("ab", 1).is_none());
    /// assert!(hashmap.put("ba", 2).is_none());
    /// assert_eq!(hashmap.put("ab", 3), Some(1));
    /// assert_eq!(hashmap.len(), 2);
    /// ```
    pub fn put(&mut self, key: K, val: V) -> Option<V> {
        self.grow_if_needed();
        let index = self.array.calculate_bucket_index(self.hash(&key));
        let previous = self.array.bucket_mut(index).upsert(key, val);
        if previous.is_none() {
            self.num_entries += 1;
        }
        previous
    }

    /// Rebuilds the table with the requested number of buckets.
    ///
    /// The requested capacity is adjusted to a prime, and grown further if the entries would
    /// otherwise overload the table.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::Zero`] and leaves the table untouched if the requested capacity
    /// is `0`.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{ChainedHashMap, ResizeError};
    ///
    /// let mut hashmap: ChainedHashMap<u64, u32> = ChainedHashMap::with_capacity(53);
    /// hashmap.put(1, 10);
    /// hashmap.put(2, 20);
    ///
    /// assert!(hashmap.resize_table(100).is_ok());
    /// assert_eq!(hashmap.capacity(), 101);
    /// assert!(hashmap.resize_table(1).is_ok());
    /// assert_eq!(hashmap.capacity(), 3);
    /// assert_eq!(hashmap.resize_table(0), Err(ResizeError::Zero));
    /// assert_eq!(hashmap.get(&2), Some(&20));
    /// ```
    #[inline]
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        self.resize(new_capacity)
    }
}

impl<K, V, H> HashTable<K, V, H> for ChainedHashMap<K, V, H> {
    type Bucket = Chain<K, V>;
    type Entries = std::vec::IntoIter<(K, V)>;

    const LOAD_THRESHOLD: f64 = 1.0;

    #[inline]
    fn hasher(&self) -> &H {
        &self.hasher
    }

    #[inline]
    fn bucket_array(&self) -> &BucketArray<Self::Bucket> {
        &self.array
    }

    #[inline]
    fn bucket_array_mut(&mut self) -> &mut BucketArray<Self::Bucket> {
        &mut self.array
    }

    #[inline]
    fn num_entries(&self) -> usize {
        self.num_entries
    }

    #[inline]
    fn set_num_entries(&mut self, num_entries: usize) {
        self.num_entries = num_entries;
    }

    #[inline]
    fn validate_capacity(&self, requested: usize) -> Result<(), ResizeError> {
        if requested < 1 {
            return Err(ResizeError::Zero);
        }
        Ok(())
    }

    #[inline]
    fn for_each_key<F: FnMut(&K)>(bucket: &Self::Bucket, mut f: F) {
        bucket.iter().for_each(|(key, _)| f(key));
    }

    #[inline]
    fn into_entries(bucket: Self::Bucket) -> Self::Entries {
        bucket.into_entries()
    }

    #[inline]
    fn place(array: &mut BucketArray<Self::Bucket>, hash: u64, key: K, val: V) {
        let index = array.calculate_bucket_index(hash);
        array.bucket_mut(index).append(key, val);
    }
}

impl<K, V, H: Default> Default for ChainedHashMap<K, V, H> {
    /// Creates an empty [`ChainedHashMap`] with the default capacity and hash function.
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> PartialEq for ChainedHashMap<K, V, H>
where
    K: Eq,
    V: PartialEq,
    H: KeyHasher<K>,
{
    /// Compares two maps entry by entry, regardless of their capacities or hash functions.
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Eq, V: Eq, H: KeyHasher<K>> Eq for ChainedHashMap<K, V, H> {}

impl<K: Debug, V: Debug, H> Debug for ChainedHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Debug, V: Debug, H> Display for ChainedHashMap<K, V, H> {
    /// Dumps every bucket, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.array.iter().enumerate() {
            writeln!(f, "{index}: {chain}")?;
        }
        Ok(())
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    #[inline]
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, val) in iter {
            self.put(key, val);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for ChainedHashMap<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    #[inline]
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut hashmap = Self::default();
        hashmap.extend(iter);
        hashmap
    }
}

impl<'h, K, V, H> IntoIterator for &'h ChainedHashMap<K, V, H> {
    type Item = (&'h K, &'h V);
    type IntoIter = Iter<'h, K, V>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'h, K, V> Iterator for Iter<'h, K, V> {
    type Item = (&'h K, &'h V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, v)) = self.entries.next() {
                self.remaining -= 1;
                return Some((k, v));
            }
            self.entries = self.chains.next()?.iter();
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            chains: self.chains.clone(),
            entries: self.entries.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: Debug, V: Debug> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
