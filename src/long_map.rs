//! LongMap: bucket array, resize controller and exporters.

use crate::bucket::{Bucket, Entry, Inserted};
use crate::config::{threshold_for, CollisionPolicy, LongMapConfig};
use crate::error::LongMapError;
use crate::hash::bucket_index;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use rustc_hash::FxBuildHasher;

/// A map from `i64` keys to `V`, stored as an array of lazily allocated
/// bucket chains.
///
/// `S` hashes values for the structural collision check of
/// [`CollisionPolicy::Permissive`]; keys are always indexed by folding
/// their high word onto the low word.
///
/// To store "null" values use `V = Option<T>`: `get` then distinguishes an
/// absent key (`None`) from a stored null (`Some(&None)`).
///
/// Inserting needs `V: Clone + PartialEq + Hash` under either policy, since
/// the policy is chosen at runtime. Values without `Hash`, such as `f64`,
/// go in through a wrapper that hashes a canonical form (`f64::to_bits`).
#[derive(Clone)]
pub struct LongMap<V, S = FxBuildHasher> {
    buckets: Vec<Option<Bucket<V>>>,
    len: usize,
    load_factor: f32,
    threshold: usize,
    policy: CollisionPolicy,
    hasher: S,
}

impl<V> LongMap<V> {
    /// Empty map with 16 buckets, load factor 0.75 and the permissive
    /// collision policy.
    pub fn new() -> Self {
        let config = LongMapConfig::default();
        let capacity = config.capacity as usize;
        Self::build(capacity, config, FxBuildHasher)
    }

    pub fn with_capacity(capacity: isize) -> Result<Self, LongMapError> {
        Self::with_config(LongMapConfig::new().with_capacity(capacity))
    }

    pub fn with_load_factor(load_factor: f32) -> Result<Self, LongMapError> {
        Self::with_config(LongMapConfig::new().with_load_factor(load_factor))
    }

    pub fn with_capacity_and_load_factor(
        capacity: isize,
        load_factor: f32,
    ) -> Result<Self, LongMapError> {
        Self::with_config(
            LongMapConfig::new()
                .with_capacity(capacity)
                .with_load_factor(load_factor),
        )
    }

    pub fn with_config(config: LongMapConfig) -> Result<Self, LongMapError> {
        Self::with_config_and_hasher(config, FxBuildHasher)
    }
}

impl<V> Default for LongMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> LongMap<V, S> {
    /// Fails with `InvalidCapacity` or `InvalidLoadFactor` on bad arguments.
    pub fn with_config_and_hasher(config: LongMapConfig, hasher: S) -> Result<Self, LongMapError> {
        let capacity = config.validate()?;
        Ok(Self::build(capacity, config, hasher))
    }

    fn build(capacity: usize, config: LongMapConfig, hasher: S) -> Self {
        Self {
            buckets: empty_buckets(capacity),
            len: 0,
            load_factor: config.load_factor,
            threshold: threshold_for(capacity, config.load_factor),
            policy: config.collision_policy,
            hasher,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bucket slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f32 {
        self.load_factor
    }

    /// Entry count at which the next insert grows the table.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn try_get(&self, key: i64) -> Result<Option<&V>, LongMapError> {
        let index = bucket_index(key, self.buckets.len())?;
        Ok(self.buckets[index].as_ref().and_then(|b| b.get(key)))
    }

    /// Value stored under `key`.
    ///
    /// # Panics
    /// On a table with zero buckets; see [`LongMap::try_get`].
    pub fn get(&self, key: i64) -> Option<&V> {
        match self.try_get(key) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_contains_key(&self, key: i64) -> Result<bool, LongMapError> {
        let index = bucket_index(key, self.buckets.len())?;
        Ok(self.buckets[index]
            .as_ref()
            .is_some_and(|b| b.contains_key(key)))
    }

    /// # Panics
    /// On a table with zero buckets; see [`LongMap::try_contains_key`].
    pub fn contains_key(&self, key: i64) -> bool {
        match self.try_contains_key(key) {
            Ok(found) => found,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes the entry for `key`. A bucket whose last entry goes is
    /// released. Under the permissive policy a one-entry bucket is released
    /// whichever key it holds.
    pub fn try_remove(&mut self, key: i64) -> Result<Option<V>, LongMapError> {
        let index = bucket_index(key, self.buckets.len())?;
        let Some(bucket) = self.buckets[index].as_mut() else {
            return Ok(None);
        };

        let release = bucket.len() == 1
            && (self.policy == CollisionPolicy::Permissive || bucket.first_key() == Some(key));
        let removed = if release {
            self.buckets[index].take().and_then(Bucket::into_sole_value)
        } else {
            bucket.remove(key)
        };

        if removed.is_some() {
            self.len -= 1;
        }
        Ok(removed)
    }

    /// # Panics
    /// On a table with zero buckets; see [`LongMap::try_remove`].
    pub fn remove(&mut self, key: i64) -> Option<V> {
        match self.try_remove(key) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    /// Every key, bucket by bucket and in chain order within a bucket.
    pub fn keys(&self) -> Vec<i64> {
        self.iter().map(|(k, _)| k).collect()
    }

    /// Every value in the same order as [`LongMap::keys`], or `None` when the
    /// map holds no entries.
    pub fn values(&self) -> Option<Vec<&V>> {
        if self.is_empty() {
            return None;
        }
        Some(self.iter().map(|(_, v)| v).collect())
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|(_, v)| v == value)
    }

    /// Drops every entry. Capacity and threshold stay as they are.
    pub fn clear(&mut self) {
        tracing::trace!(entries = self.len, capacity = self.buckets.len(), "clear");
        for slot in &mut self.buckets {
            *slot = None;
        }
        self.len = 0;
    }

    #[cfg(test)]
    pub(crate) fn buckets_for_test(&self) -> &[Option<Bucket<V>>] {
        &self.buckets
    }

    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Default::default(),
            remaining: self.len,
        }
    }
}

impl<V, S> LongMap<V, S>
where
    V: Clone + PartialEq + Hash,
    S: BuildHasher,
{
    /// Inserts `value` under `key`, growing the table first when
    /// `len + 1` reaches the threshold. Returns the value reported by the
    /// bucket chain, see [`CollisionPolicy`].
    pub fn try_put(&mut self, key: i64, value: V) -> Result<Option<V>, LongMapError> {
        if self.len + 1 >= self.threshold {
            self.resize()?;
        }
        self.insert_entry(key, value)
    }

    /// # Panics
    /// On a table with zero buckets; see [`LongMap::try_put`].
    pub fn put(&mut self, key: i64, value: V) -> Option<V> {
        match self.try_put(key, value) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }

    fn insert_entry(&mut self, key: i64, value: V) -> Result<Option<V>, LongMapError> {
        let index = bucket_index(key, self.buckets.len())?;
        let slot = &mut self.buckets[index];
        match slot {
            None => {
                *slot = Some(Bucket::with_entry(key, value));
                self.len += 1;
                Ok(None)
            }
            Some(bucket) => {
                let Inserted { previous, appended } =
                    bucket.insert(key, value, self.policy, &self.hasher);
                self.len += appended;
                Ok(previous)
            }
        }
    }

    /// Doubles the bucket array and re-inserts every entry, bucket by
    /// bucket, through the chain insert path.
    fn resize(&mut self) -> Result<(), LongMapError> {
        let capacity = self.buckets.len() * 2;
        let old = mem::replace(&mut self.buckets, empty_buckets(capacity));
        self.threshold = threshold_for(capacity, self.load_factor);
        tracing::trace!(
            from = old.len(),
            to = capacity,
            threshold = self.threshold,
            entries = self.len,
            "resize"
        );

        self.len = 0;
        for Entry { key, value } in old.into_iter().flatten().flat_map(Bucket::into_entries) {
            self.insert_entry(key, value)?;
        }
        Ok(())
    }
}

impl<V, S> Extend<(i64, V)> for LongMap<V, S>
where
    V: Clone + PartialEq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (i64, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<V> FromIterator<(i64, V)> for LongMap<V>
where
    V: Clone + PartialEq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (i64, V)>>(iter: I) -> Self {
        let mut map = LongMap::new();
        map.extend(iter);
        map
    }
}

impl<V: fmt::Debug, S> fmt::Debug for LongMap<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

fn empty_buckets<V>(capacity: usize) -> Vec<Option<Bucket<V>>> {
    let mut buckets = Vec::with_capacity(capacity);
    buckets.resize_with(capacity, || None);
    buckets
}

/// Iterator over `(key, &value)` in bucket-then-chain order.
pub struct Iter<'a, V> {
    buckets: core::slice::Iter<'a, Option<Bucket<V>>>,
    chain: core::slice::Iter<'a, Entry<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (i64, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.chain.next() {
                self.remaining -= 1;
                return Some((e.key, &e.value));
            }
            if let Some(b) = self.buckets.next()? {
                self.chain = b.entries().iter();
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V, S> IntoIterator for &'a LongMap<V, S> {
    type Item = (i64, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strict<V>() -> LongMap<V> {
        LongMap::with_config(LongMapConfig::new().with_collision_policy(CollisionPolicy::Strict))
            .unwrap()
    }

    #[test]
    fn new_map_uses_defaults() {
        let m: LongMap<String> = LongMap::new();
        assert_eq!(m.capacity(), 16);
        assert_eq!(m.load_factor(), 0.75);
        assert_eq!(m.threshold(), 12);
        assert_eq!(m.collision_policy(), CollisionPolicy::Permissive);
        assert!(m.is_empty());
    }

    /// Invariant: buckets are allocated on first insert into a slot and
    /// released when their only entry is removed.
    #[test]
    fn buckets_are_lazy_and_released() {
        let mut m: LongMap<&str> = LongMap::new();
        assert!(m.buckets.iter().all(Option::is_none));
        m.put(1, "a");
        assert!(m.buckets[1].is_some());
        m.put(17, "b");
        assert_eq!(m.buckets[1].as_ref().map(Bucket::len), Some(2));
        assert_eq!(m.remove(1), Some("a"));
        assert!(m.buckets[1].is_some());
        assert_eq!(m.remove(17), Some("b"));
        assert!(m.buckets[1].is_none());
        assert_eq!(m.len(), 0);
    }

    /// Invariant: `len + 1 >= threshold` on put doubles the array and
    /// recomputes the threshold; nothing is lost in the rehash.
    #[test]
    fn resize_doubles_and_keeps_entries() {
        let mut m: LongMap<i64> = LongMap::new();
        for k in 0..11 {
            m.put(k, k * 10);
        }
        assert_eq!(m.capacity(), 16);
        m.put(11, 110);
        assert_eq!(m.capacity(), 32);
        assert_eq!(m.threshold(), 24);
        assert_eq!(m.len(), 12);
        for k in 0..12 {
            assert_eq!(m.get(k), Some(&(k * 10)));
        }
    }

    /// Invariant: a threshold that rounds to zero still converges instead of
    /// growing forever.
    #[test]
    fn tiny_threshold_grows_until_meaningful() {
        let config = LongMapConfig::new()
            .with_capacity(1)
            .with_load_factor(0.1)
            .with_collision_policy(CollisionPolicy::Strict);
        let mut m: LongMap<u8> = LongMap::with_config(config).unwrap();
        assert_eq!(m.threshold(), 0);
        m.put(5, 1);
        assert_eq!(m.capacity(), 2);
        for k in 0..20 {
            m.put(k, 2);
        }
        assert_eq!(m.len(), 20);
        assert!(m.threshold() > m.len());
    }

    /// Invariant: a zero-capacity table reports every indexed operation as
    /// out of range.
    #[test]
    fn zero_capacity_is_out_of_range() {
        let mut m: LongMap<&str> = LongMap::with_capacity(0).unwrap();
        let oor = LongMapError::IndexOutOfRange { key: 3 };
        assert_eq!(m.try_put(3, "x"), Err(oor));
        assert_eq!(m.try_get(3), Err(oor));
        assert_eq!(m.try_contains_key(3), Err(oor));
        assert_eq!(m.try_remove(3), Err(oor));
        assert_eq!(m.capacity(), 0);
        assert!(m.is_empty());
        assert_eq!(m.values(), None);
        assert!(m.keys().is_empty());
    }

    #[test]
    #[should_panic(expected = "bucket index out of range")]
    fn zero_capacity_put_panics() {
        let mut m: LongMap<&str> = LongMap::with_capacity(0).unwrap();
        m.put(1, "x");
    }

    /// Invariant: the permissive policy releases a one-entry bucket on any
    /// key that maps to it; the strict policy compares keys.
    #[test]
    fn single_entry_bucket_removal_by_policy() {
        let mut m: LongMap<&str> = LongMap::new();
        m.put(1, "a");
        assert_eq!(m.remove(17), Some("a"));
        assert!(m.is_empty());

        let mut m = strict();
        m.put(1, "a");
        assert_eq!(m.remove(17), None);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(1), Some(&"a"));
    }

    #[test]
    fn clear_keeps_capacity_and_threshold() {
        let mut m: LongMap<i32> = (0..20).map(|k| (k, k as i32)).collect();
        let (cap, thr) = (m.capacity(), m.threshold());
        m.clear();
        assert_eq!((m.capacity(), m.threshold()), (cap, thr));
        assert!(m.is_empty());
        assert!(m.buckets.iter().all(Option::is_none));
        assert_eq!(m.get(3), None);
    }

    #[test]
    fn iter_is_exact_and_ordered() {
        let mut m: LongMap<char> = LongMap::new();
        m.put(17, 'b');
        m.put(2, 'c');
        m.put(1, 'a');
        let it = m.iter();
        assert_eq!(it.len(), 3);
        // bucket 1 holds 17 then 1, bucket 2 holds 2
        assert_eq!(it.collect::<Vec<_>>(), vec![(17, &'b'), (1, &'a'), (2, &'c')]);
        assert_eq!(format!("{m:?}"), "{17: 'b', 1: 'a', 2: 'c'}");
    }
}
