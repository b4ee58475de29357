mod open_hash_map {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering::Relaxed;

    use crate::{OpenHashMap, ResizeError, SumOfBytes, WeightedSum};

    struct R(&'static AtomicUsize);
    impl R {
        fn new(cnt: &'static AtomicUsize) -> R {
            cnt.fetch_add(1, Relaxed);
            R(cnt)
        }
    }
    impl Drop for R {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Relaxed);
        }
    }

    fn collide(_: &u64) -> u64 {
        0
    }

    fn assert_accounted<K, V, H>(hashmap: &OpenHashMap<K, V, H>) {
        assert_eq!(
            hashmap.empty_buckets() + hashmap.len() + hashmap.num_tombstones(),
            hashmap.capacity()
        );
    }

    #[test]
    fn prime_capacity() {
        for (requested, expected) in [(0, 3), (1, 3), (4, 5), (10, 11), (20, 23), (53, 53)] {
            let hashmap: OpenHashMap<u64, u64> = OpenHashMap::with_capacity(requested);
            assert_eq!(hashmap.capacity(), expected);
            assert_eq!(hashmap.empty_buckets(), expected);
        }
        let hashmap: OpenHashMap<u64, u64> = OpenHashMap::default();
        assert_eq!(hashmap.capacity(), crate::DEFAULT_CAPACITY);
    }

    #[test]
    fn put_growth() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(53, SumOfBytes);
        let mut capacities = Vec::new();
        for i in 0..150 {
            hashmap.put(format!("str{i}"), i * 100);
            if i % 25 == 24 {
                assert_eq!(hashmap.len(), i + 1);
                assert_accounted(&hashmap);
                capacities.push(hashmap.capacity());
            }
        }
        assert_eq!(capacities, [53, 107, 223, 223, 449, 449]);
    }

    #[test]
    fn put_duplicates() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(41, WeightedSum);
        for i in 0..50 {
            hashmap.put(format!("str{}", i / 3), i * 100);
            if i % 10 == 9 {
                assert_eq!(hashmap.len(), i / 3 + 1);
                assert_accounted(&hashmap);
            }
        }
        assert_eq!(hashmap.len(), 17);
        assert_eq!(hashmap.capacity(), 41);
        assert_eq!(hashmap.get("str16"), Some(&4900));
        assert_eq!(hashmap.get("str0"), Some(&200));
    }

    #[test]
    fn resize_keeps_entries() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(20, SumOfBytes);
        hashmap.put("key1".to_string(), 10);
        assert_eq!((hashmap.len(), hashmap.capacity()), (1, 23));
        assert!(hashmap.resize_table(30).is_ok());
        assert_eq!((hashmap.len(), hashmap.capacity()), (1, 31));
        assert_eq!(hashmap.get("key1"), Some(&10));
        assert!(hashmap.contains_key("key1"));
    }

    #[test]
    fn resize_sweep() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(75, WeightedSum);
        let keys: Vec<u64> = (25..1000).step_by(13).collect();
        for key in &keys {
            hashmap.put(key.to_string(), key * 42);
        }
        assert_eq!(hashmap.len(), 75);

        for capacity in (111..1000).step_by(117) {
            assert!(hashmap.resize_table(capacity).is_ok());
            assert!(crate::is_prime(hashmap.capacity()));
            assert!(hashmap.capacity() >= capacity);
            assert!(hashmap.table_load() <= 0.5);
            assert_eq!(hashmap.num_tombstones(), 0);

            assert!(hashmap.put("some key".to_string(), 0).is_none());
            assert!(hashmap.contains_key("some key"));
            assert!(hashmap.remove("some key").is_some());

            for key in &keys {
                assert!(hashmap.contains_key(key.to_string().as_str()));
                assert!(!hashmap.contains_key((key + 1).to_string().as_str()));
            }
            assert_eq!(hashmap.len(), 75);
            assert_accounted(&hashmap);
        }
    }

    #[test]
    fn resize_refused() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(11, WeightedSum);
        for i in 1..6 {
            hashmap.put(i.to_string(), (i * 10).to_string());
        }
        let before = hashmap.get_keys_and_values();
        assert_eq!(
            hashmap.resize_table(2),
            Err(ResizeError::BelowSize {
                requested: 2,
                len: 5
            })
        );
        assert_eq!(hashmap.capacity(), 11);
        assert_eq!(hashmap.get_keys_and_values(), before);

        hashmap.put("20".to_string(), "200".to_string());
        assert!(hashmap.remove("1").is_some());
        assert!(hashmap.resize_table(12).is_ok());
        assert_eq!(hashmap.capacity(), 13);

        let mut keys: Vec<String> = hashmap
            .get_keys_and_values()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["2", "20", "3", "4", "5"]);
    }

    #[test]
    fn table_load() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(101, SumOfBytes);
        assert!(hashmap.table_load().abs() < f64::EPSILON);
        hashmap.put("key1", 10);
        assert!((hashmap.table_load() - 1.0 / 101.0).abs() < f64::EPSILON);
        hashmap.put("key2", 20);
        hashmap.put("key1", 30);
        assert!((hashmap.table_load() - 2.0 / 101.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_buckets() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(101, SumOfBytes);
        let mut observed = vec![hashmap.empty_buckets()];
        for (key, val) in [("key1", 10), ("key2", 20), ("key1", 30), ("key4", 40)] {
            hashmap.put(key, val);
            observed.push(hashmap.empty_buckets());
        }
        assert_eq!(observed, [101, 100, 99, 99, 98]);

        assert!(hashmap.remove("key2").is_some());
        assert_eq!(hashmap.empty_buckets(), 98);
        assert_eq!(hashmap.num_tombstones(), 1);
        assert_accounted(&hashmap);
    }

    #[test]
    fn get_and_contains() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(151, WeightedSum);
        for i in (200..300).step_by(7) {
            hashmap.put(i.to_string(), i * 10);
        }
        assert_eq!((hashmap.len(), hashmap.capacity()), (15, 151));
        for i in (200..300).step_by(21) {
            assert_eq!(hashmap.get(i.to_string().as_str()), Some(&(i * 10)));
            assert!(hashmap.get((i + 1).to_string().as_str()).is_none());
        }

        let mut hashmap = OpenHashMap::with_capacity_and_hasher(79, WeightedSum);
        let keys: Vec<u64> = (1..1000).step_by(20).collect();
        for key in &keys {
            hashmap.put(key.to_string(), key * 42);
        }
        assert_eq!((hashmap.len(), hashmap.capacity()), (50, 163));
        for key in &keys {
            assert!(hashmap.contains_key(key.to_string().as_str()));
            assert!(!hashmap.contains_key((key + 1).to_string().as_str()));
        }
    }

    #[test]
    fn remove() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(53, SumOfBytes);
        assert!(hashmap.get("key1").is_none());
        hashmap.put("key1", 10);
        assert_eq!(hashmap.get("key1"), Some(&10));
        assert_eq!(hashmap.remove("key1"), Some(("key1", 10)));
        assert!(hashmap.get("key1").is_none());
        assert!(hashmap.remove("key1").is_none());
        assert!(hashmap.remove("key4").is_none());
        assert!(hashmap.is_empty());
        assert_eq!(hashmap.num_tombstones(), 1);
    }

    #[test]
    fn probe_past_tombstone() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(11, collide);
        for key in 1..=3_u64 {
            assert!(hashmap.put(key, key * 10).is_none());
        }
        assert_eq!(hashmap.remove(&2), Some((2, 20)));
        assert_eq!(hashmap.get(&3), Some(&30));
        assert!(hashmap.contains_key(&1));
        assert!(!hashmap.contains_key(&2));
        assert_accounted(&hashmap);
    }

    #[test]
    fn update_past_tombstone() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(11, collide);
        for key in 1..=3_u64 {
            hashmap.put(key, key * 10);
        }
        hashmap.remove(&2);
        assert_eq!(hashmap.put(3, 33), Some(30));
        assert_eq!(hashmap.len(), 2);
        assert_eq!(hashmap.num_tombstones(), 1);
        assert_eq!(hashmap.remove(&3), Some((3, 33)));
        assert!(hashmap.get(&3).is_none());
    }

    #[test]
    fn reuse_tombstone() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(11, collide);
        for key in 1..=3_u64 {
            hashmap.put(key, key * 10);
        }
        hashmap.remove(&2);
        assert!(hashmap.put(4, 40).is_none());
        assert_eq!(hashmap.num_tombstones(), 0);
        assert_eq!(hashmap.len(), 3);
        assert_eq!(hashmap.empty_buckets(), 8);
        for key in [1_u64, 3, 4] {
            assert_eq!(hashmap.get(&key), Some(&(key * 10)));
        }
    }

    #[test]
    fn colliding_growth() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(3, collide);
        for key in 0..64_u64 {
            assert!(hashmap.put(key, key).is_none());
        }
        assert_eq!(hashmap.len(), 64);
        for key in 0..64 {
            assert_eq!(hashmap.get(&key), Some(&key));
        }
        assert_accounted(&hashmap);
    }

    #[test]
    fn tombstone_churn() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(7, |k: &u64| *k);
        for key in 0..200_u64 {
            assert!(hashmap.put(key, key).is_none());
            assert_eq!(hashmap.remove(&key), Some((key, key)));
        }
        assert_eq!(hashmap.capacity(), 7);
        assert_eq!(hashmap.num_tombstones(), 7);
        assert_eq!(hashmap.empty_buckets(), 0);
        assert!(!hashmap.contains_key(&1000_u64));

        // Every insertion lands in a tombstone without growing the table.
        for key in 200..203_u64 {
            assert!(hashmap.put(key, key * 2).is_none());
        }
        assert_eq!(hashmap.capacity(), 7);
        assert_eq!(hashmap.num_tombstones(), 4);
        for key in 200..203_u64 {
            assert_eq!(hashmap.get(&key), Some(&(key * 2)));
        }
        assert!(hashmap.get(&1000_u64).is_none());
        assert_accounted(&hashmap);

        assert!(hashmap.resize_table(7).is_ok());
        assert_eq!(hashmap.capacity(), 7);
        assert_eq!(hashmap.num_tombstones(), 0);
        assert_eq!(hashmap.empty_buckets(), 4);
    }

    #[test]
    fn clear() {
        static INST_CNT: AtomicUsize = AtomicUsize::new(0);
        let mut hashmap = OpenHashMap::with_capacity(53);
        for key in 0..20_u64 {
            hashmap.put(key, R::new(&INST_CNT));
        }
        assert!(hashmap.remove(&7).is_some());
        hashmap.put(3, R::new(&INST_CNT));
        assert!(hashmap.resize_table(100).is_ok());
        assert_eq!(INST_CNT.load(Relaxed), 19);
        assert_eq!(hashmap.capacity(), 101);

        hashmap.clear();
        assert_eq!(INST_CNT.load(Relaxed), 0);
        assert!(hashmap.is_empty());
        assert_eq!(hashmap.capacity(), 101);
        assert_eq!(hashmap.empty_buckets(), 101);
        assert_eq!(hashmap.num_tombstones(), 0);
    }

    #[test]
    fn drop_entries() {
        static INST_CNT: AtomicUsize = AtomicUsize::new(0);
        let mut hashmap = OpenHashMap::with_capacity(3);
        for key in 0..256_u64 {
            hashmap.put(key, R::new(&INST_CNT));
        }
        assert_eq!(INST_CNT.load(Relaxed), 256);
        for key in 0..128_u64 {
            drop(hashmap.remove(&key));
        }
        assert_eq!(INST_CNT.load(Relaxed), 128);
        drop(hashmap);
        assert_eq!(INST_CNT.load(Relaxed), 0);
    }

    #[test]
    fn iterate() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(10, WeightedSum);
        for i in 0..5 {
            hashmap.put(i.to_string(), (i * 24).to_string());
        }
        hashmap.remove("0");
        hashmap.remove("4");

        let iter = hashmap.iter();
        assert_eq!(iter.len(), 3);
        let mut entries: Vec<(&String, &String)> = iter.collect();
        entries.sort_unstable();
        assert_eq!(
            entries
                .into_iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect::<Vec<_>>(),
            [("1", "24"), ("2", "48"), ("3", "72")]
        );
        assert_eq!(hashmap.empty_buckets(), 6);
        assert_eq!(hashmap.iter().count(), (&hashmap).into_iter().count());
    }

    #[test]
    fn display() {
        let mut hashmap = OpenHashMap::with_capacity_and_hasher(3, |k: &u64| *k);
        hashmap.put(1_u64, "a");
        assert_eq!(hashmap.to_string(), "0: None\n1: K: 1 V: \"a\"\n2: None\n");
        hashmap.remove(&1);
        assert_eq!(hashmap.to_string(), "0: None\n1: Tombstone\n2: None\n");
    }

    #[test]
    fn collect_and_compare() {
        let hashmap: OpenHashMap<u64, u64> = (0..100).map(|i| (i, i * 2)).collect();
        let mut other: OpenHashMap<u64, u64> = OpenHashMap::with_capacity(500);
        other.extend((0..100).rev().map(|i| (i, i * 2)));
        assert_eq!(hashmap, other);
        other.put(0, 1);
        assert_ne!(hashmap, other);
        assert_eq!(hashmap.clone(), hashmap);
    }
}

mod chained_hash_map {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering::Relaxed;

    use crate::{ChainedHashMap, ResizeError, SumOfBytes, WeightedSum};

    struct R(&'static AtomicUsize);
    impl R {
        fn new(cnt: &'static AtomicUsize) -> R {
            cnt.fetch_add(1, Relaxed);
            R(cnt)
        }
    }
    impl Drop for R {
        fn drop(&mut self) {
            self.0.fetch_sub(1, Relaxed);
        }
    }

    #[test]
    fn prime_capacity() {
        let hashmap: ChainedHashMap<u64, u64> = ChainedHashMap::default();
        assert_eq!(hashmap.capacity(), 11);
        assert_eq!(hashmap.empty_buckets(), 11);
        let hashmap: ChainedHashMap<u64, u64> = ChainedHashMap::with_capacity(100);
        assert_eq!(hashmap.capacity(), 101);
    }

    #[test]
    fn put_growth() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(53, SumOfBytes);
        let mut capacities = Vec::new();
        for i in 0..150 {
            hashmap.put(format!("str{i}"), i * 100);
            if i % 25 == 24 {
                assert_eq!(hashmap.len(), i + 1);
                assert!(hashmap.empty_buckets() < hashmap.capacity());
                capacities.push(hashmap.capacity());
            }
        }
        assert_eq!(capacities, [53, 53, 107, 107, 223, 223]);
    }

    #[test]
    fn shared_chain() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(3, SumOfBytes);
        assert!(hashmap.put("ab", 1).is_none());
        assert!(hashmap.put("ba", 2).is_none());
        assert_eq!(hashmap.empty_buckets(), 2);
        assert_eq!(hashmap.remove("ab"), Some(("ab", 1)));
        assert_eq!(hashmap.get("ba"), Some(&2));
        assert!(hashmap.remove("ab").is_none());
        assert_eq!(hashmap.len(), 1);
    }

    #[test]
    fn resize() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(11, WeightedSum);
        for i in 0..10 {
            hashmap.put(i.to_string(), i);
        }
        assert_eq!(hashmap.resize_table(0), Err(ResizeError::Zero));
        assert_eq!(hashmap.capacity(), 11);

        assert!(hashmap.resize_table(1).is_ok());
        assert_eq!(hashmap.capacity(), 17);
        assert!(hashmap.table_load() <= 1.0);
        for i in 0..10 {
            assert_eq!(hashmap.get(i.to_string().as_str()), Some(&i));
        }

        assert!(hashmap.resize_table(100).is_ok());
        assert_eq!(hashmap.capacity(), 101);
        assert_eq!(hashmap.len(), 10);
    }

    #[test]
    fn resize_sweep() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(75, WeightedSum);
        let keys: Vec<u64> = (25..1000).step_by(13).collect();
        for key in &keys {
            hashmap.put(key.to_string(), key * 42);
        }
        for capacity in (111..1000).step_by(117) {
            assert!(hashmap.resize_table(capacity).is_ok());
            hashmap.put("some key".to_string(), 0);
            assert!(hashmap.contains_key("some key"));
            hashmap.remove("some key");
            for key in &keys {
                assert!(hashmap.contains_key(key.to_string().as_str()));
                assert!(!hashmap.contains_key((key + 1).to_string().as_str()));
            }
            assert_eq!(hashmap.len(), keys.len());
        }
    }

    #[test]
    fn clear() {
        static INST_CNT: AtomicUsize = AtomicUsize::new(0);
        let mut hashmap = ChainedHashMap::with_capacity(53);
        for key in 0..200_u64 {
            hashmap.put(key, R::new(&INST_CNT));
        }
        assert_eq!(INST_CNT.load(Relaxed), 200);
        let capacity = hashmap.capacity();
        hashmap.clear();
        assert_eq!(INST_CNT.load(Relaxed), 0);
        assert!(hashmap.is_empty());
        assert_eq!(hashmap.capacity(), capacity);
        assert_eq!(hashmap.empty_buckets(), capacity);
    }

    #[test]
    fn iterate() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(3, SumOfBytes);
        hashmap.put("ab", 1);
        hashmap.put("c", 2);
        hashmap.put("ba", 3);
        let iter = hashmap.iter();
        assert_eq!(iter.len(), 3);
        let entries: Vec<(&&str, &i32)> = iter.collect();
        // "ab" and "ba" share a bucket and keep their insertion order.
        let ab = entries.iter().position(|(k, _)| **k == "ab");
        let ba = entries.iter().position(|(k, _)| **k == "ba");
        assert!(ab < ba);
        assert_eq!(hashmap.get_keys_and_values().len(), 3);
    }

    #[test]
    fn display() {
        let mut hashmap = ChainedHashMap::with_capacity_and_hasher(3, |k: &u64| *k);
        hashmap.put(1_u64, 'a');
        hashmap.put(4, 'b');
        assert_eq!(
            hashmap.to_string(),
            "0: SLL []\n1: SLL [1: 'a' -> 4: 'b']\n2: SLL []\n"
        );
    }

    #[test]
    fn collect_and_compare() {
        let hashmap: ChainedHashMap<u64, u64> = (0..100).map(|i| (i, i)).collect();
        let other: ChainedHashMap<u64, u64> = (0..100).rev().map(|i| (i, i)).collect();
        assert_eq!(hashmap, other);
    }
}
