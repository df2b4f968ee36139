use crate::{hashing::EquivalenceRelation, key_value::KeyValue, stack::Stack};
use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Entries whose keys are not equivalent but whose hashes are identical.
///
/// Equality and hashing ignore the order of entries.
#[derive(Clone, Debug)]
pub struct Bucket<K, V> {
    hash: u32,
    entries: Stack<KeyValue<K, V>>,
}

impl<K, V> Bucket<K, V> {
    pub fn new(hash: u32, first: KeyValue<K, V>, second: KeyValue<K, V>) -> Self {
        Self {
            hash,
            entries: Stack::new().push(first).push(second),
        }
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn entries(&self) -> &Stack<KeyValue<K, V>> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        hash: u32,
        equivalence: &E,
    ) -> Option<&V> {
        if hash != self.hash {
            return None;
        }

        self.entries
            .iter()
            .find(|key_value| equivalence.equivalent(key, key_value.key()))
            .map(KeyValue::value)
    }

    fn position<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        equivalence: &E,
    ) -> Option<usize> {
        self.entries
            .position(|key_value| equivalence.equivalent(key, key_value.key()))
    }
}

impl<K: Clone, V: Clone> Bucket<K, V> {
    #[must_use]
    pub fn put<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: K,
        value: V,
        equivalence: &E,
    ) -> Self {
        let entries = match self.position(&key, equivalence) {
            Some(index) => self.entries.replace_at(index, KeyValue::new(key, value)),
            None => self.entries.push(KeyValue::new(key, value)),
        };

        Self {
            hash: self.hash,
            entries,
        }
    }

    /// Removes an entry. Returns `None` if the key is not in the bucket.
    ///
    /// The result may hold a single entry, which its owner must demote to a
    /// leaf.
    #[must_use]
    pub fn remove<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        hash: u32,
        equivalence: &E,
    ) -> Option<Self> {
        if hash != self.hash {
            return None;
        }

        let index = self.position(key, equivalence)?;

        Some(Self {
            hash: self.hash,
            entries: self.entries.remove_at(index),
        })
    }
}

impl<K: PartialEq, V: PartialEq> Bucket<K, V> {
    fn count(&self, key_value: &KeyValue<K, V>) -> usize {
        self.entries.iter().filter(|other| *other == key_value).count()
    }
}

/// Buckets are compared as multisets of entries since entries distinct under
/// an equivalence relation can still be equal.
///
/// Comparing buckets with the same entries in different orders takes
/// quadratic time in their size.
impl<K: PartialEq, V: PartialEq> PartialEq for Bucket<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.len() == other.len()
            && (self.entries == other.entries
                || self
                    .entries
                    .iter()
                    .all(|key_value| self.count(key_value) == other.count(key_value)))
    }
}

impl<K: Eq, V: Eq> Eq for Bucket<K, V> {}

impl<K: Hash, V: Hash> Hash for Bucket<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
        self.len().hash(state);
        self.entries
            .iter()
            .map(|key_value| {
                let mut hasher = DefaultHasher::new();
                key_value.hash(&mut hasher);
                hasher.finish()
            })
            .fold(0u64, u64::wrapping_add)
            .hash(state);
    }
}
