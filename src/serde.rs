use super::{ChainedHashMap, KeyHasher, OpenHashMap};

use serde::de::{Deserialize, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserializer;

use std::fmt;
use std::marker::PhantomData;

/// Deserializes a map into [`OpenHashMap`] or [`ChainedHashMap`].
pub struct HashMapVisitor<M> {
    #[allow(clippy::type_complexity)]
    marker: PhantomData<fn() -> M>,
}

impl<M> HashMapVisitor<M> {
    fn new() -> Self {
        HashMapVisitor {
            marker: PhantomData,
        }
    }
}

macro_rules! serde_impl {
    ($map:ident, $name:literal) => {
        impl<'de, K, V, H> Visitor<'de> for HashMapVisitor<$map<K, V, H>>
        where
            K: Deserialize<'de> + Eq,
            V: Deserialize<'de>,
            H: KeyHasher<K> + Default,
        {
            type Value = $map<K, V, H>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str($name)
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut map =
                    $map::with_capacity_and_hasher(access.size_hint().unwrap_or(0), H::default());

                while let Some((key, value)) = access.next_entry()? {
                    map.put(key, value);
                }

                Ok(map)
            }
        }

        impl<'de, K, V, H> Deserialize<'de> for $map<K, V, H>
        where
            K: Deserialize<'de> + Eq,
            V: Deserialize<'de>,
            H: KeyHasher<K> + Default,
        {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_map(HashMapVisitor::<$map<K, V, H>>::new())
            }
        }

        impl<K, V, H> Serialize for $map<K, V, H>
        where
            K: Serialize,
            V: Serialize,
        {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                let mut map = serializer.serialize_map(Some(self.len()))?;
                for (k, v) in self {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    };
}

serde_impl!(OpenHashMap, "an OpenHashMap");
serde_impl!(ChainedHashMap, "a ChainedHashMap");
