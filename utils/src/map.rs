use std::hash::Hash;

use fnv::FnvHashMap;

/// Per-key signed counters backed by an fnv hash map.
#[derive(Debug, Clone)]
pub struct CountMap<K>(pub FnvHashMap<K, i64>);

impl<K: Eq + Hash> Default for CountMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> CountMap<K> {
    pub fn new() -> Self {
        Self(FnvHashMap::<K, i64>::default())
    }

    /// Adds `delta` to the counter of `k` and returns the updated value.
    pub fn add(&mut self, k: K, delta: i64) -> i64 {
        let v: &mut i64 = self.0.entry(k).or_insert(0);
        *v += delta;
        *v
    }

    pub fn incr(&mut self, k: K) -> i64 {
        self.add(k, 1)
    }

    /// Missing keys read as zero.
    pub fn get(&self, k: &K) -> i64 {
        self.0.get(k).copied().unwrap_or(0)
    }

    /// Sum over all keys.
    pub fn total(&self) -> i64 {
        self.0.values().sum()
    }
}
