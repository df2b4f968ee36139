use crate::{
    hamt::{Hamt, IntoIter, Iter, Removal},
    hashing::{DefaultHashing, Equality, EquivalenceRelation, HashingAlgorithm},
};
use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Map data structure of HAMT.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary. Versions share their unchanged sub-trees.
///
/// Keys are compared by an equivalence relation `E` and hashed by a hashing
/// algorithm `H`, which default to `Eq` and `Hash`. Keys equivalent to each
/// other must have the same hash. Otherwise, lookups may miss entries.
pub struct Map<K, V, E = Equality, H = DefaultHashing> {
    size: usize,
    hamt: Arc<Hamt<K, V>>,
    equivalence: E,
    hashing: H,
}

impl<K: Hash + Eq, V> Map<K, V> {
    /// Creates a new map.
    pub fn new() -> Self {
        Self::with_strategies(Equality, DefaultHashing)
    }
}

impl<K, V, E, H> Map<K, V, E, H> {
    /// Creates a new map with a custom equivalence relation and hashing
    /// algorithm of keys.
    pub fn with_strategies(equivalence: E, hashing: H) -> Self {
        Self {
            size: 0,
            hamt: Hamt::new().into(),
            equivalence,
            hashing,
        }
    }

    /// Returns a size of a map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.size == 0, self.hamt.is_empty());

        self.size == 0
    }

    /// Returns key-value pairs in a map.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.hamt.iter()
    }
}

impl<K, V, E: EquivalenceRelation<K>, H: HashingAlgorithm<K>> Map<K, V, E, H> {
    /// Finds a value corresponding to a key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.hamt
            .get(key, self.hashing.hash(key), 1, &self.equivalence)
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }
}

impl<K, V, E, H> Map<K, V, E, H>
where
    K: Clone,
    V: Clone,
    E: EquivalenceRelation<K> + Clone,
    H: HashingAlgorithm<K> + Clone,
{
    /// Inserts a key-value pair into a map.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let hash = self.hashing.hash(&key);
        let found = self
            .hamt
            .get(&key, hash, 1, &self.equivalence)
            .is_some();

        self.with_hamt(
            self.hamt
                .put(key, value, hash, 1, &self.equivalence, &self.hashing),
            if found { self.size } else { self.size + 1 },
        )
    }

    /// Removes a key from a map if any.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        match self
            .hamt
            .remove(key, self.hashing.hash(key), 1, &self.equivalence)
        {
            Removal::Unchanged => self.clone(),
            Removal::Vanished => self.with_hamt(Hamt::new().into(), 0),
            Removal::Updated(hamt) => self.with_hamt(hamt, self.size - 1),
        }
    }

    /// Extends a map with an iterator of key-value pairs.
    #[must_use]
    pub fn extend(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = self.clone();

        for (key, value) in iterator {
            map = map.insert(key, value);
        }

        map
    }

    fn with_hamt(&self, hamt: Arc<Hamt<K, V>>, size: usize) -> Self {
        Self {
            size,
            hamt,
            equivalence: self.equivalence.clone(),
            hashing: self.hashing.clone(),
        }
    }
}

impl<K, V, E: Clone, H: Clone> Clone for Map<K, V, E, H> {
    fn clone(&self) -> Self {
        Self {
            size: self.size,
            hamt: self.hamt.clone(),
            equivalence: self.equivalence.clone(),
            hashing: self.hashing.clone(),
        }
    }
}

impl<K: Hash + Eq, V> Default for Map<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Debug, V: Debug, E, H> Debug for Map<K, V, E, H> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, E, H> PartialEq for Map<K, V, E, H> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && *self.hamt == *other.hamt
    }
}

impl<K: Eq, V: Eq, E, H> Eq for Map<K, V, E, H> {}

impl<K: Hash, V: Hash, E, H> Hash for Map<K, V, E, H> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        Hash::hash(&self.hamt, state);
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iterator: I) -> Self {
        Self::new().extend(iterator)
    }
}

impl<'a, K, V, E, H> IntoIterator for &'a Map<K, V, E, H> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone, V: Clone, E, H> IntoIterator for Map<K, V, E, H> {
    type IntoIter = IntoIter<K, V>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.hamt)
    }
}
