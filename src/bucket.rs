//! Bucket chains: the ordered entries that share one slot of the table.

use crate::config::CollisionPolicy;
use crate::hash::entry_hash;
use core::hash::{BuildHasher, Hash};
use core::mem;

#[derive(Clone, Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: i64,
    pub(crate) value: V,
}

/// Outcome of inserting into an existing chain.
#[derive(Debug)]
pub(crate) struct Inserted<V> {
    /// Value reported back to the caller of `put`.
    pub(crate) previous: Option<V>,
    /// Number of entries the chain grew by.
    pub(crate) appended: usize,
}

/// A chain of entries. Never empty while it sits in a table slot.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Bucket<V> {
    pub(crate) fn with_entry(key: i64, value: V) -> Self {
        Self {
            entries: vec![Entry { key, value }],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<V>> {
        self.entries
    }

    pub(crate) fn first_key(&self) -> Option<i64> {
        self.entries.first().map(|e| e.key)
    }

    pub(crate) fn get(&self, key: i64) -> Option<&V> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }

    pub(crate) fn contains_key(&self, key: i64) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    /// Removes the first entry with `key`, keeping the order of the rest.
    pub(crate) fn remove(&mut self, key: i64) -> Option<V> {
        let pos = self.entries.iter().position(|e| e.key == key)?;
        Some(self.entries.remove(pos).value)
    }

    /// Consumes a one-entry bucket and yields its value.
    pub(crate) fn into_sole_value(self) -> Option<V> {
        self.entries.into_iter().next().map(|e| e.value)
    }
}

impl<V> Bucket<V>
where
    V: Clone + PartialEq + Hash,
{
    pub(crate) fn insert<S: BuildHasher>(
        &mut self,
        key: i64,
        value: V,
        policy: CollisionPolicy,
        hasher: &S,
    ) -> Inserted<V> {
        match policy {
            CollisionPolicy::Strict => self.insert_strict(key, value),
            CollisionPolicy::Permissive => self.insert_permissive(key, value, hasher),
        }
    }

    fn insert_strict(&mut self, key: i64, value: V) -> Inserted<V> {
        if let Some(e) = self.entries.iter_mut().find(|e| e.key == key) {
            return Inserted {
                previous: Some(mem::replace(&mut e.value, value)),
                appended: 0,
            };
        }
        self.entries.push(Entry { key, value });
        Inserted {
            previous: None,
            appended: 1,
        }
    }

    /// Walks the entries present before the call. A same-key entry takes the
    /// new value; afterwards any entry whose structural hash equals the
    /// incoming one but which differs from it causes a copy of the incoming
    /// entry to be appended. The last of these events decides `previous`.
    fn insert_permissive<S: BuildHasher>(&mut self, key: i64, value: V, hasher: &S) -> Inserted<V> {
        let incoming = entry_hash(hasher, key, &value);
        let existing = self.entries.len();
        let mut previous = None;
        let mut matched = false;
        let mut appended = 0;

        for i in 0..existing {
            let e = &mut self.entries[i];
            if e.key == key {
                matched = true;
                previous = Some(mem::replace(&mut e.value, value.clone()));
            }

            let e = &self.entries[i];
            let collides = entry_hash(hasher, e.key, &e.value) == incoming
                && !(e.key == key && e.value == value);
            if collides {
                let prior = e.value.clone();
                tracing::trace!(key, colliding_key = e.key, "structural hash collision, appending");
                self.entries.push(Entry {
                    key,
                    value: value.clone(),
                });
                previous = Some(prior);
                appended += 1;
            }
        }

        if !matched && appended == 0 {
            self.entries.push(Entry { key, value });
            appended = 1;
        }
        Inserted { previous, appended }
    }
}
