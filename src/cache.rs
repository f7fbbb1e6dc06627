use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Fixed-capacity map with least-recently-used eviction.
///
/// Recency is a monotonically increasing stamp; `order` maps stamp → key so
/// the oldest entry is always the first key of the BTreeMap.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
    tick: u64,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// A capacity of 0 is bumped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: BTreeMap::new(),
            tick: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up `key` and mark it most recently used.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let stamp = self.next_tick();
        let (_, last_used) = self.entries.get_mut(key)?;
        let old = std::mem::replace(last_used, stamp);
        if let Some(k) = self.order.remove(&old) {
            self.order.insert(stamp, k);
        }
        self.entries.get(key).map(|(v, _)| v)
    }

    /// Membership test that does not touch recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Insert or replace `key`, making it most recently used. Returns the
    /// evicted key when a new key pushed the cache past capacity.
    pub fn insert(&mut self, key: K, value: V) -> Option<K> {
        let stamp = self.next_tick();

        if let Some((_, old)) = self.entries.remove(&key) {
            self.order.remove(&old);
            self.order.insert(stamp, key.clone());
            self.entries.insert(key, (value, stamp));
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_oldest()
        } else {
            None
        };

        self.order.insert(stamp, key.clone());
        self.entries.insert(key, (value, stamp));
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.order.values()
    }

    fn evict_oldest(&mut self) -> Option<K> {
        let (_, key) = self.order.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_insert() {
        let mut c = LruCache::new(3);
        assert!(c.is_empty());
        c.insert("a", 1);
        c.insert("b", 2);
        assert_eq!(c.get("a"), Some(&1));
        assert_eq!(c.get("z"), None);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut c = LruCache::new(2);
        c.insert("a", 1);
        c.insert("b", 2);
        assert_eq!(c.insert("c", 3), Some("a"));
        assert!(!c.contains("a"));
        assert!(c.contains("b"));
        assert!(c.contains("c"));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut c = LruCache::new(2);
        c.insert("a", 1);
        c.insert("b", 2);
        c.get("a");
        assert_eq!(c.insert("c", 3), Some("b"));
        assert!(c.contains("a"));
        assert!(!c.contains("b"));
        assert!(c.contains("c"));
    }

    #[test]
    fn test_contains_does_not_refresh() {
        let mut c = LruCache::new(2);
        c.insert("a", 1);
        c.insert("b", 2);
        assert!(c.contains("a"));
        assert_eq!(c.insert("c", 3), Some("a"));
    }

    #[test]
    fn test_reinsert_replaces_without_eviction() {
        let mut c = LruCache::new(2);
        c.insert("a", 1);
        c.insert("b", 2);
        assert_eq!(c.insert("a", 10), None);
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("a"), Some(&10));
        // "a" was refreshed by the reinsert, so "b" goes next
        assert_eq!(c.insert("c", 3), Some("b"));
    }

    #[test]
    fn test_capacity_bound_holds() {
        let mut c = LruCache::new(200);
        for i in 0..201 {
            c.insert(format!("k{i}"), i);
        }
        assert_eq!(c.len(), 200);
        assert!(!c.contains("k0"));
        for i in 1..201 {
            assert_eq!(c.get(format!("k{i}").as_str()), Some(&i));
        }
    }

    #[test]
    fn test_keys_by_recency() {
        let mut c = LruCache::new(3);
        c.insert(1, ());
        c.insert(2, ());
        c.insert(3, ());
        c.get(&1);
        let keys: Vec<_> = c.keys_by_recency().copied().collect();
        assert_eq!(keys, vec![2, 3, 1]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut c = LruCache::new(0);
        c.insert("a", 1);
        assert_eq!(c.capacity(), 1);
        assert_eq!(c.insert("b", 2), Some("a"));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut c = LruCache::new(2);
        c.insert("a", 1);
        c.clear();
        assert!(c.is_empty());
        assert_eq!(c.keys_by_recency().count(), 0);
    }
}
