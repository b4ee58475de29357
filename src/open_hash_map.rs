//! [`OpenHashMap`] is a hash map with open addressing and quadratic probing.

use super::error::ResizeError;
use super::hash_table::bucket_array::BucketArray;
use super::hash_table::slot::{ProbeSequence, Slot};
use super::hash_table::{HashTable, DEFAULT_CAPACITY};
use super::prime::next_prime;
use super::{BuildHasherAdapter, Equivalent, KeyHasher};
use std::fmt::{self, Debug, Display};
use std::iter::FusedIterator;
use std::mem::replace;
use std::slice;

/// Hash map with open addressing.
///
/// [`OpenHashMap`] stores at most one entry per slot in a prime-sized array. A key that collides
/// with another key is displaced along the quadratic probe sequence `(h + j²) mod capacity`.
///
/// ## Growth
///
/// An insertion first grows the table to the next prime at or above double the capacity if
/// the load, the ratio of live entries to slots, has reached `0.5`. With a prime capacity and
/// a load below `0.5`, the probe sequence of any key is guaranteed to reach a free slot.
///
/// ## Removal
///
/// A removed entry leaves a tombstone behind: lookups keep probing past it, since keys
/// inserted after a collision at that slot live further along the sequence. Inserting a new
/// key reuses the first tombstone on its sequence, and any rebuild of the table discards all
/// tombstones.
///
/// Tombstones do not count towards the load. Repeated insertions and removals can therefore
/// leave a table with no empty slot at all, and a lookup of an absent key then walks the
/// whole probe sequence. Calling [`OpenHashMap::resize_table`] with the current capacity
/// clears the tombstones.
#[derive(Clone)]
pub struct OpenHashMap<K, V, H = BuildHasherAdapter> {
    array: BucketArray<Slot<K, V>>,
    num_entries: usize,
    hasher: H,
}

/// An iterator over the entries of an [`OpenHashMap`] in slot order.
pub struct Iter<'h, K, V> {
    slots: slice::Iter<'h, Slot<K, V>>,
    remaining: usize,
}

impl<K, V> OpenHashMap<K, V, BuildHasherAdapter> {
    /// Creates an empty [`OpenHashMap`] with the default capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let hashmap: OpenHashMap<u64, u32> = OpenHashMap::new();
    /// assert_eq!(hashmap.capacity(), 11);
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty [`OpenHashMap`] with the specified capacity.
    ///
    /// The actual capacity is the next prime reached from the specified capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let hashmap: OpenHashMap<u64, u32> = OpenHashMap::with_capacity(20);
    /// assert_eq!(hashmap.capacity(), 23);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, BuildHasherAdapter::default())
    }
}

impl<K, V, H> OpenHashMap<K, V, H> {
    /// Creates an empty [`OpenHashMap`] with the given hash function.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, SumOfBytes};
    ///
    /// let hashmap: OpenHashMap<String, u32, _> = OpenHashMap::with_hasher(SumOfBytes);
    /// assert_eq!(hashmap.capacity(), 11);
    /// ```
    #[inline]
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_capacity_and_hasher(DEFAULT_CAPACITY, hasher)
    }

    /// Creates an empty [`OpenHashMap`] with the specified capacity and hash function.
    ///
    /// The actual capacity is the next prime reached from the specified capacity; the
    /// smallest possible capacity is `3`.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, WeightedSum};
    ///
    /// let hashmap: OpenHashMap<String, u32, _> =
    ///     OpenHashMap::with_capacity_and_hasher(75, WeightedSum);
    /// assert_eq!(hashmap.capacity(), 79);
    ///
    /// let hashmap: OpenHashMap<String, u32, _> =
    ///     OpenHashMap::with_capacity_and_hasher(0, WeightedSum);
    /// assert_eq!(hashmap.capacity(), 3);
    /// ```
    #[inline]
    pub fn with_capacity_and_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            array: BucketArray::new(next_prime(capacity)),
            num_entries: 0,
            hasher,
        }
    }

    /// Returns the number of entries in the [`OpenHashMap`].
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    ///
    /// hashmap.put(1, 0);
    /// hashmap.put(1, 1);
    /// assert_eq!(hashmap.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Returns `true` if the [`OpenHashMap`] holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Returns the number of slots.
    ///
    /// The capacity is always a prime number.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.array.len()
    }

    /// Returns the ratio of entries to slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, SumOfBytes};
    ///
    /// let mut hashmap = OpenHashMap::with_capacity_and_hasher(101, SumOfBytes);
    /// assert_eq!(hashmap.table_load(), 0.0);
    ///
    /// hashmap.put("key1", 10);
    /// hashmap.put("key2", 20);
    /// assert_eq!(hashmap.table_load(), 2.0 / 101.0);
    /// ```
    #[inline]
    pub fn table_load(&self) -> f64 {
        HashTable::table_load(self)
    }

    /// Returns the number of slots that have never held an entry since the table was built.
    ///
    /// A tombstone is not counted as empty, although it holds no entry. The number of slots
    /// always equals `empty_buckets() + len() + num_tombstones()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, SumOfBytes};
    ///
    /// let mut hashmap = OpenHashMap::with_capacity_and_hasher(53, SumOfBytes);
    /// hashmap.put("key1", 10);
    /// assert_eq!(hashmap.empty_buckets(), 52);
    ///
    /// hashmap.remove("key1");
    /// assert_eq!(hashmap.empty_buckets(), 52);
    /// assert_eq!(hashmap.num_tombstones(), 1);
    /// ```
    pub fn empty_buckets(&self) -> usize {
        self.array
            .iter()
            .filter(|slot| matches!(slot, Slot::Empty))
            .count()
    }

    /// Returns the number of tombstones.
    pub fn num_tombstones(&self) -> usize {
        self.array
            .iter()
            .filter(|slot| matches!(slot, Slot::Tombstone))
            .count()
    }

    /// Removes every entry and tombstone, keeping the capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::with_capacity(101);
    /// hashmap.put(1, 0);
    /// hashmap.clear();
    ///
    /// assert!(hashmap.is_empty());
    /// assert_eq!(hashmap.capacity(), 101);
    /// assert_eq!(hashmap.empty_buckets(), 101);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.clear_buckets();
    }

    /// Returns an iterator over the entries in slot order.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    /// hashmap.put(1, 10);
    /// hashmap.put(2, 20);
    ///
    /// let mut sum = 0;
    /// for (_, v) in hashmap.iter() {
    ///     sum += *v;
    /// }
    /// assert_eq!(sum, 30);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.array.iter(),
            remaining: self.num_entries,
        }
    }

    /// Returns a snapshot of the entries in slot order.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, SumOfBytes};
    ///
    /// let mut hashmap = OpenHashMap::with_capacity_and_hasher(11, SumOfBytes);
    /// hashmap.put("2", 20);
    /// hashmap.put("1", 10);
    ///
    /// assert_eq!(hashmap.get_keys_and_values(), [("1", 10), ("2", 20)]);
    /// ```
    pub fn get_keys_and_values(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Returns the index of the slot holding the key.
    fn find_index<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let hash = self.hash(key);
        for index in ProbeSequence::new(hash, self.array.len()) {
            match self.array.bucket(index) {
                Slot::Empty => return None,
                Slot::Tombstone => (),
                Slot::Occupied(k, _) => {
                    if key.equivalent(k) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }
}

impl<K, V, H> OpenHashMap<K, V, H>
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
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    ///
    /// assert!(hashmap.put(1, 0).is_none());
    /// assert_eq!(hashmap.put(1, 1), Some(0));
    /// assert_eq!(hashmap.get(&1), Some(&1));
    /// ```
    pub fn put(&mut self, key: K, val: V) -> Option<V> {
        self.grow_if_needed();
        let hash = self.hash(&key);
        let mut matched = None;
        let mut tombstone = None;
        let mut vacant = None;
        for index in ProbeSequence::new(hash, self.array.len()) {
            match self.array.bucket(index) {
                Slot::Empty => {
                    vacant = Some(index);
                    break;
                }
                Slot::Tombstone => tombstone = tombstone.or(Some(index)),
                Slot::Occupied(k, _) if *k == key => {
                    matched = Some(index);
                    break;
                }
                Slot::Occupied(..) => (),
            }
        }
        if let Some(index) = matched {
            if let Slot::Occupied(_, v) = self.array.bucket_mut(index) {
                return Some(replace(v, val));
            }
        }

        // Fewer than half of the slots hold entries and the first `(capacity + 1) / 2` probes
        // of a prime capacity are distinct, so the walk passes an empty slot or a tombstone.
        match tombstone.or(vacant) {
            Some(index) => {
                self.array.set_at_index(index, Slot::Occupied(key, val));
                self.num_entries += 1;
                None
            }
            None => unreachable!(
                "no free slot on the probe sequence of a table with {} slots",
                self.array.len()
            ),
        }
    }

    /// Rebuilds the table with at least the requested number of slots.
    ///
    /// The requested capacity is adjusted to a prime, and grown further if the entries would
    /// otherwise overload the table. All tombstones are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`ResizeError::BelowSize`] and leaves the table untouched if the requested
    /// capacity is smaller than the number of entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::{OpenHashMap, ResizeError};
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::with_capacity(20);
    /// hashmap.put(1, 10);
    ///
    /// assert!(hashmap.resize_table(30).is_ok());
    /// assert_eq!(hashmap.capacity(), 31);
    /// assert_eq!(hashmap.get(&1), Some(&10));
    ///
    /// hashmap.put(2, 20);
    /// assert_eq!(
    ///     hashmap.resize_table(1),
    ///     Err(ResizeError::BelowSize { requested: 1, len: 2 })
    /// );
    /// assert_eq!(hashmap.capacity(), 31);
    /// ```
    #[inline]
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<(), ResizeError> {
        self.resize(new_capacity)
    }
}

impl<K, V, H> OpenHashMap<K, V, H> {
    /// Returns a reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<String, u32> = OpenHashMap::default();
    ///
    /// assert!(hashmap.get("key1").is_none());
    /// hashmap.put("key1".to_string(), 10);
    /// assert_eq!(hashmap.get("key1"), Some(&10));
    /// ```
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let index = self.find_index(key)?;
        match self.array.bucket(index) {
            Slot::Occupied(_, v) => Some(v),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns a mutable reference to the value associated with the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    ///
    /// hashmap.put(1, 10);
    /// if let Some(v) = hashmap.get_mut(&1) {
    ///     *v += 1;
    /// }
    /// assert_eq!(hashmap.get(&1), Some(&11));
    /// ```
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let index = self.find_index(key)?;
        match self.array.bucket_mut(index) {
            Slot::Occupied(_, v) => Some(v),
            Slot::Empty | Slot::Tombstone => None,
        }
    }

    /// Returns `true` if the key is present.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    ///
    /// assert!(!hashmap.contains_key(&1));
    /// hashmap.put(1, 0);
    /// assert!(hashmap.contains_key(&1));
    /// ```
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        self.find_index(key).is_some()
    }

    /// Removes the key, leaving a tombstone in its slot.
    ///
    /// Returns the removed entry, or `None` if the key was absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let mut hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    ///
    /// hashmap.put(1, 0);
    /// assert_eq!(hashmap.remove(&1), Some((1, 0)));
    /// assert!(hashmap.remove(&1).is_none());
    /// assert!(hashmap.is_empty());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + ?Sized,
        H: KeyHasher<Q>,
    {
        let index = self.find_index(key)?;
        let entry = self.array.bucket_mut(index).bury()?;
        self.num_entries -= 1;
        Some(entry)
    }
}

impl<K, V, H> HashTable<K, V, H> for OpenHashMap<K, V, H> {
    type Bucket = Slot<K, V>;
    type Entries = std::option::IntoIter<(K, V)>;

    const LOAD_THRESHOLD: f64 = 0.5;

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
        if requested < self.num_entries {
            return Err(ResizeError::BelowSize {
                requested,
                len: self.num_entries,
            });
        }
        Ok(())
    }

    #[inline]
    fn for_each_key<F: FnMut(&K)>(bucket: &Self::Bucket, mut f: F) {
        if let Slot::Occupied(key, _) = bucket {
            f(key);
        }
    }

    #[inline]
    fn into_entries(bucket: Self::Bucket) -> Self::Entries {
        bucket.into_entry().into_iter()
    }

    fn place(array: &mut BucketArray<Self::Bucket>, hash: u64, key: K, val: V) {
        let capacity = array.len();
        for index in ProbeSequence::new(hash, capacity) {
            if matches!(array.bucket(index), Slot::Empty) {
                array.set_at_index(index, Slot::Occupied(key, val));
                return;
            }
        }
        unreachable!("no free slot on the probe sequence of a table with {capacity} slots");
    }
}

impl<K, V, H: Default> Default for OpenHashMap<K, V, H> {
    /// Creates an empty [`OpenHashMap`] with the default capacity and hash function.
    ///
    /// # Examples
    ///
    /// ```
    /// use primemap::OpenHashMap;
    ///
    /// let hashmap: OpenHashMap<u64, u32> = OpenHashMap::default();
    /// assert_eq!(hashmap.capacity(), 11);
    /// ```
    #[inline]
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> PartialEq for OpenHashMap<K, V, H>
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

impl<K: Eq, V: Eq, H: KeyHasher<K>> Eq for OpenHashMap<K, V, H> {}

impl<K: Debug, V: Debug, H> Debug for OpenHashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Debug, V: Debug, H> Display for OpenHashMap<K, V, H> {
    /// Dumps every slot, one per line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.array.iter().enumerate() {
            writeln!(f, "{index}: {slot}")?;
        }
        Ok(())
    }
}

impl<K, V, H> Extend<(K, V)> for OpenHashMap<K, V, H>
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

impl<K, V, H> FromIterator<(K, V)> for OpenHashMap<K, V, H>
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

impl<'h, K, V, H> IntoIterator for &'h OpenHashMap<K, V, H> {
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
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(k, v) = slot {
                self.remaining -= 1;
                return Some((k, v));
            }
        }
        None
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
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: Debug, V: Debug> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
