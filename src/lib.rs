//! Prime-capacity hash maps built on a fixed-size bucket array.
//!
//! Both maps expose the same operations, hash keys with a pluggable [`KeyHasher`], keep a
//! prime number of buckets, and rebuild the whole table when an insertion finds it too loaded.
//!
//! # [`OpenHashMap`]
//!
//! Open addressing: one entry per slot, collisions resolved with quadratic probing, removal
//! leaves a tombstone. The table grows once half of its slots hold entries.
//!
//! # [`ChainedHashMap`]
//!
//! Separate chaining: every bucket owns a chain of entries in insertion order. The table grows
//! once it holds as many entries as buckets.
//!
//! # [`find_mode`]
//!
//! Reports the most frequent items of a sequence, counted in a [`ChainedHashMap`].
//!
//! # Examples
//!
//! ```
//! use primemap::{OpenHashMap, SumOfBytes};
//!
//! let mut hashmap = OpenHashMap::with_capacity_and_hasher(53, SumOfBytes);
//! for i in 0..150 {
//!     hashmap.put(format!("str{i}"), i * 100);
//! }
//! assert_eq!(hashmap.len(), 150);
//! assert_eq!(hashmap.get("str42"), Some(&4200));
//! assert!(hashmap.table_load() < 0.5);
//! ```

pub mod chained_hash_map;
pub use chained_hash_map::ChainedHashMap;

pub mod open_hash_map;
pub use open_hash_map::OpenHashMap;

mod error;
pub use error::ResizeError;

mod hash_function;
pub use hash_function::{BuildHasherAdapter, KeyHasher, SumOfBytes, WeightedSum};

mod mode;
pub use mode::{find_mode, find_mode_with_hasher};

mod prime;
pub use prime::{is_prime, next_prime};

pub use hash_table::DEFAULT_CAPACITY;

#[cfg(not(feature = "equivalent"))]
mod equivalent;
#[cfg(not(feature = "equivalent"))]
pub use equivalent::Equivalent;
#[cfg(feature = "equivalent")]
pub use equivalent::Equivalent;

mod hash_table;

#[cfg(feature = "serde")]
mod serde;
