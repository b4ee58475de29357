use std::fmt::{self, Debug, Display};
use std::iter::FusedIterator;
use std::mem::replace;

/// [`Slot`] is a single cell of an open addressing table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum Slot<K, V> {
    /// Never used since the table was allocated or cleared.
    #[default]
    Empty,

    /// Used to hold an entry that has since been removed.
    ///
    /// Lookups probe past it; inserts of new keys may reuse it.
    Tombstone,

    /// Holds a live entry.
    Occupied(K, V),
}

impl<K, V> Slot<K, V> {
    /// Turns an occupied slot into a tombstone, returning the entry it held.
    ///
    /// Any other slot is left as is.
    pub(crate) fn bury(&mut self) -> Option<(K, V)> {
        match replace(self, Slot::Tombstone) {
            Slot::Occupied(key, val) => Some((key, val)),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Moves the live entry out of the slot.
    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        match self {
            Slot::Occupied(key, val) => Some((key, val)),
            Slot::Empty | Slot::Tombstone => None,
        }
    }
}

impl<K: Debug, V: Debug> Display for Slot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Empty => f.write_str("None"),
            Slot::Tombstone => f.write_str("Tombstone"),
            Slot::Occupied(key, val) => write!(f, "K: {key:?} V: {val:?}"),
        }
    }
}

/// [`ProbeSequence`] yields the slot indexes visited by quadratic probing.
///
/// The `j`-th index is `(h + j²) mod capacity`. Only `capacity` indexes are produced since the
/// sequence repeats itself afterwards.
#[derive(Clone, Debug)]
pub(crate) struct ProbeSequence {
    index: usize,
    step: usize,
    capacity: usize,
}

impl ProbeSequence {
    /// Starts a sequence at the home slot of `hash`.
    #[allow(clippy::cast_possible_truncation)] // The remainder is smaller than `capacity`.
    #[inline]
    pub(crate) fn new(hash: u64, capacity: usize) -> Self {
        let index = if capacity == 0 {
            0
        } else {
            (hash % capacity as u64) as usize
        };
        Self {
            index,
            step: 0,
            capacity,
        }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step == self.capacity {
            return None;
        }
        let current = self.index;
        self.step += 1;
        // (j + 1)² - j² = 2j + 1.
        let stride = (2 * self.step - 1) % self.capacity;
        self.index = (self.index + stride) % self.capacity;
        Some(current)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.capacity - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
impl FusedIterator for ProbeSequence {}
