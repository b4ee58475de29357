use crate::Equivalent;
use std::fmt::{self, Debug, Display};
use std::mem::replace;
use std::slice;
use std::vec;

/// [`Chain`] is the sequence of entries sharing a bucket in a chained table.
///
/// Entries are kept in insertion order, and removal closes the gap instead of leaving a marker.
#[derive(Clone, Debug)]
pub(crate) struct Chain<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for Chain<K, V> {
    #[inline]
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Chain<K, V> {
    /// Returns `true` if the chain holds no entries.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends an entry whose key is known to be absent from the chain.
    #[inline]
    pub(crate) fn append(&mut self, key: K, val: V) {
        self.entries.push((key, val));
    }

    /// Returns the position of the entry matching the key.
    pub(crate) fn position<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: Equivalent<K> + ?Sized,
    {
        self.entries.iter().position(|(k, _)| key.equivalent(k))
    }

    /// Returns the entry at `pos`.
    #[inline]
    pub(crate) fn entry(&self, pos: usize) -> Option<(&K, &V)> {
        self.entries.get(pos).map(|(k, v)| (k, v))
    }

    /// Returns a mutable reference to the value at `pos`.
    #[inline]
    pub(crate) fn value_mut(&mut self, pos: usize) -> Option<&mut V> {
        self.entries.get_mut(pos).map(|(_, v)| v)
    }

    /// Overwrites the value of the matching entry, or appends a new entry.
    ///
    /// Returns the previous value if the key was already present.
    pub(crate) fn upsert(&mut self, key: K, val: V) -> Option<V>
    where
        K: Eq,
    {
        if let Some((_, v)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(replace(v, val));
        }
        self.append(key, val);
        None
    }

    /// Unlinks the entry matching the key, keeping the order of the remaining entries.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        Q: Equivalent<K> + ?Sized,
    {
        let pos = self.position(key)?;
        Some(self.entries.remove(pos))
    }

    /// Returns an iterator over the entries in insertion order.
    #[inline]
    pub(crate) fn iter(&self) -> slice::Iter<'_, (K, V)> {
        self.entries.iter()
    }

    /// Converts the chain into its entries in insertion order.
    #[inline]
    pub(crate) fn into_entries(self) -> vec::IntoIter<(K, V)> {
        self.entries.into_iter()
    }
}

impl<K: Debug, V: Debug> Display for Chain<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SLL [")?;
        for (i, (key, val)) in self.entries.iter().enumerate() {
            if i != 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{key:?}: {val:?}")?;
        }
        f.write_str("]")
    }
}
