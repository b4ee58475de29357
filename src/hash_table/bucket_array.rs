use std::mem::replace;
use std::slice;
use std::vec;

/// [`BucketArray`] is a fixed-length array of buckets.
///
/// The length never changes once the array is allocated; a table resize allocates a new
/// [`BucketArray`] and swaps it in.
#[derive(Clone, Debug, Default)]
pub(crate) struct BucketArray<B> {
    buckets: Vec<B>,
}

impl<B: Default> BucketArray<B> {
    /// Creates a new [`BucketArray`] of `len` default buckets.
    pub(crate) fn new(len: usize) -> Self {
        let mut array = Self {
            buckets: Vec::with_capacity(len),
        };
        for _ in 0..len {
            array.append(B::default());
        }
        array
    }

    /// Resets every bucket to its default state.
    pub(crate) fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = B::default());
    }
}

impl<B> BucketArray<B> {
    /// Returns the number of buckets.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Calculates the bucket index for the hash value.
    #[allow(clippy::cast_possible_truncation)] // The remainder is smaller than `len`.
    #[inline]
    pub(crate) fn calculate_bucket_index(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Returns a reference to the bucket at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub(crate) fn bucket(&self, index: usize) -> &B {
        &self.buckets[index]
    }

    /// Returns a mutable reference to the bucket at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub(crate) fn bucket_mut(&mut self, index: usize) -> &mut B {
        &mut self.buckets[index]
    }

    /// Stores `bucket` at `index` and returns the bucket it replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub(crate) fn set_at_index(&mut self, index: usize, bucket: B) -> B {
        replace(&mut self.buckets[index], bucket)
    }

    /// Returns an iterator over the buckets in index order.
    #[inline]
    pub(crate) fn iter(&self) -> slice::Iter<'_, B> {
        self.buckets.iter()
    }

    /// Converts the array into its buckets in index order.
    #[inline]
    pub(crate) fn into_buckets(self) -> vec::IntoIter<B> {
        self.buckets.into_iter()
    }

    fn append(&mut self, bucket: B) {
        self.buckets.push(bucket);
    }
}
