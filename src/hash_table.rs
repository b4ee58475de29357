pub(crate) mod bucket_array;
pub(crate) mod chain;
pub(crate) mod slot;

use crate::error::ResizeError;
use crate::prime::{grown_capacity, next_prime};
use crate::KeyHasher;
use bucket_array::BucketArray;
use log::{debug, trace};
use std::mem::take;

/// The capacity requested by constructors that do not take one.
pub const DEFAULT_CAPACITY: usize = 11;

/// `HashTable` defines common functions for hash table implementations.
///
/// An implementation supplies its bucket type and how entries are laid out in buckets; sizing,
/// load-triggered growth and rebuilding are shared.
pub(crate) trait HashTable<K, V, H> {
    /// The content of a single bucket.
    type Bucket: Default;

    /// The owned entries of a single bucket.
    type Entries: Iterator<Item = (K, V)>;

    /// The load at which an insertion first grows the table.
    const LOAD_THRESHOLD: f64;

    /// Returns a reference to the hash function.
    fn hasher(&self) -> &H;

    /// Returns a reference to the [`BucketArray`].
    fn bucket_array(&self) -> &BucketArray<Self::Bucket>;

    /// Returns a mutable reference to the [`BucketArray`].
    fn bucket_array_mut(&mut self) -> &mut BucketArray<Self::Bucket>;

    /// Returns the number of live entries.
    fn num_entries(&self) -> usize;

    /// Overwrites the number of live entries.
    fn set_num_entries(&mut self, num_entries: usize);

    /// Checks whether the table can be rebuilt at the requested capacity.
    fn validate_capacity(&self, requested: usize) -> Result<(), ResizeError>;

    /// Passes every live key in the bucket to `f`, in traversal order.
    fn for_each_key<F: FnMut(&K)>(bucket: &Self::Bucket, f: F);

    /// Moves the live entries out of the bucket, in traversal order.
    fn into_entries(bucket: Self::Bucket) -> Self::Entries;

    /// Places an entry whose key is known to be absent from the array.
    ///
    /// No key comparison takes place.
    fn place(array: &mut BucketArray<Self::Bucket>, hash: u64, key: K, val: V);

    /// Returns the hash value of the key.
    #[inline]
    fn hash<Q>(&self, key: &Q) -> u64
    where
        Q: ?Sized,
        H: KeyHasher<Q>,
    {
        self.hasher().hash_key(key)
    }

    /// Returns the number of buckets.
    #[inline]
    fn capacity(&self) -> usize {
        self.bucket_array().len()
    }

    /// Returns the ratio of live entries to buckets.
    #[allow(clippy::cast_precision_loss)]
    #[inline]
    fn table_load(&self) -> f64 {
        self.num_entries() as f64 / self.capacity() as f64
    }

    /// Returns the capacity a rebuild of `num_entries` entries ends up with.
    ///
    /// Starting from the prime-adjusted request, the capacity grows exactly as consecutive
    /// insertions into it would grow it.
    #[allow(clippy::cast_precision_loss)]
    fn fitted_capacity(requested: usize, num_entries: usize) -> usize {
        let mut capacity = next_prime(requested);
        if num_entries == 0 {
            return capacity;
        }
        let last = (num_entries - 1) as f64;
        while last / capacity as f64 >= Self::LOAD_THRESHOLD {
            capacity = grown_capacity(capacity);
        }
        capacity
    }

    /// Grows the table if its load has reached the threshold.
    fn grow_if_needed(&mut self)
    where
        H: KeyHasher<K>,
    {
        if self.table_load() >= Self::LOAD_THRESHOLD {
            let capacity = grown_capacity(self.capacity());
            trace!(
                "load {:.3} reached the threshold {}, growing to {capacity}",
                self.table_load(),
                Self::LOAD_THRESHOLD
            );
            self.rebuild(Self::fitted_capacity(capacity, self.num_entries()));
        }
    }

    /// Rebuilds the table at the requested capacity.
    fn resize(&mut self, requested: usize) -> Result<(), ResizeError>
    where
        H: KeyHasher<K>,
    {
        if let Err(error) = self.validate_capacity(requested) {
            debug!("resize to {requested} refused: {error}");
            return Err(error);
        }
        self.rebuild(Self::fitted_capacity(requested, self.num_entries()));
        Ok(())
    }

    /// Moves every live entry into a newly allocated [`BucketArray`] of the given capacity.
    ///
    /// All the keys are hashed before the current array is touched, so a panicking hash
    /// function leaves the table intact.
    fn rebuild(&mut self, capacity: usize)
    where
        H: KeyHasher<K>,
    {
        let mut hashes = Vec::with_capacity(self.num_entries());
        for bucket in self.bucket_array().iter() {
            Self::for_each_key(bucket, |key| hashes.push(self.hash(key)));
        }

        let mut new_array = BucketArray::new(capacity);
        let old_array = take(self.bucket_array_mut());
        let old_capacity = old_array.len();
        let entries = old_array.into_buckets().flat_map(Self::into_entries);
        let mut num_entries = 0;
        for (hash, (key, val)) in hashes.into_iter().zip(entries) {
            Self::place(&mut new_array, hash, key, val);
            num_entries += 1;
        }
        *self.bucket_array_mut() = new_array;
        self.set_num_entries(num_entries);
        debug!("rebuilt {num_entries} entries: capacity {old_capacity} -> {capacity}");
    }

    /// Drops every entry while keeping the capacity.
    fn clear_buckets(&mut self) {
        self.bucket_array_mut().clear();
        self.set_num_entries(0);
    }
}
