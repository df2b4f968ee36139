//! Key equivalence and hashing strategies.
//!
//! A trie never compares keys with `Eq` or hashes them with `Hash` directly.
//! Instead, it asks an [`EquivalenceRelation`] and a [`HashingAlgorithm`]
//! chosen by its owner. Keys equivalent under the relation must hash to the
//! same value. This is not checked and breaking it makes lookups miss.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{BuildHasher, Hash, Hasher},
};

/// Reflexive, symmetric and transitive relation over keys.
pub trait EquivalenceRelation<K: ?Sized> {
    /// Returns `true` if two keys identify the same entry.
    fn equivalent(&self, one: &K, other: &K) -> bool;
}

/// Deterministic 32-bit hash function over keys.
pub trait HashingAlgorithm<K: ?Sized> {
    /// Hashes a key.
    fn hash(&self, key: &K) -> u32;
}

impl<K: ?Sized, F: Fn(&K, &K) -> bool> EquivalenceRelation<K> for F {
    fn equivalent(&self, one: &K, other: &K) -> bool {
        self(one, other)
    }
}

impl<K: ?Sized, F: Fn(&K) -> u32> HashingAlgorithm<K> for F {
    fn hash(&self, key: &K) -> u32 {
        self(key)
    }
}

/// Equivalence by `Eq`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Equality;

impl<K: Eq + ?Sized> EquivalenceRelation<K> for Equality {
    fn equivalent(&self, one: &K, other: &K) -> bool {
        one == other
    }
}

/// Hashing by `Hash` with the standard library's default hasher.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DefaultHashing;

impl<K: Hash + ?Sized> HashingAlgorithm<K> for DefaultHashing {
    fn hash(&self, key: &K) -> u32 {
        let mut hasher = DefaultHasher::new();

        Hash::hash(key, &mut hasher);

        fold(hasher.finish())
    }
}

/// Hashing by `Hash` with hashers built by a [`BuildHasher`].
///
/// The builder must produce identically seeded hashers for as long as a trie
/// using it lives, which holds for a single `RandomState` instance.
#[derive(Clone, Debug, Default)]
pub struct BuildHasherHashing<S>(S);

impl<S> BuildHasherHashing<S> {
    pub fn new(builder: S) -> Self {
        Self(builder)
    }
}

impl<K: Hash + ?Sized, S: BuildHasher> HashingAlgorithm<K> for BuildHasherHashing<S> {
    fn hash(&self, key: &K) -> u32 {
        fold(self.0.hash_one(key))
    }
}

fn fold(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}
