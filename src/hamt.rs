use crate::{
    array,
    bitmap::Bitmap,
    bucket::Bucket,
    hashing::{EquivalenceRelation, HashingAlgorithm},
    key_value::KeyValue,
    stack::{self, Stack},
};
use std::{
    hash::{self, Hasher},
    slice,
    sync::Arc,
};

const LEVEL_SIZE: usize = 5;
const FULL_LEVEL: u32 = (1 << LEVEL_SIZE) - 1;
/// Deepest level with hash bits left to branch on. Levels start at 1.
pub const MAX_LEVEL: usize = (u32::BITS as usize).div_ceil(LEVEL_SIZE);

fn bitmap_index(hash: u32, level: usize) -> u8 {
    debug_assert!((1..=MAX_LEVEL).contains(&level));

    let shift = (level - 1) * LEVEL_SIZE;

    ((hash >> shift) & FULL_LEVEL) as u8
}

/// Result of removing a key from a sub-trie.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Removal<T> {
    /// The key was absent.
    Unchanged,
    /// The sub-trie lost its last entry.
    Vanished,
    /// The sub-trie survives in a new shape.
    Updated(T),
}

/// Node of a persistent hash array mapped trie.
///
/// Every node is immutable once built. Updates copy the nodes on the path to
/// a key and share all the other sub-tries with the original trie.
///
/// Each operation takes a level starting at 1 at the root. A branch at a
/// level indexes its children by the 5 hash bits at offset
/// `(level - 1) * 5`. Once levels are exhausted, entries whose hashes are
/// identical are kept in a collision bucket.
#[derive(Debug, Eq, Hash, PartialEq)]
pub enum Hamt<K, V> {
    Branch(Branch<K, V>),
    Leaf(KeyValue<K, V>),
    Collision(Bucket<K, V>),
}

impl<K, V> Hamt<K, V> {
    /// Creates an empty trie.
    pub const fn new() -> Self {
        Self::Branch(Branch::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Branch(branch) if branch.is_empty())
    }

    pub fn get<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        hash: u32,
        level: usize,
        equivalence: &E,
    ) -> Option<&V> {
        match self {
            Self::Branch(branch) => branch.get(key, hash, level, equivalence),
            Self::Leaf(key_value) => equivalence
                .equivalent(key, key_value.key())
                .then_some(key_value.value()),
            Self::Collision(bucket) => bucket.get(key, hash, equivalence),
        }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    fn leaf(key: K, value: V) -> Arc<Self> {
        Arc::new(Self::Leaf(KeyValue::new(key, value)))
    }
}

impl<K: Clone, V: Clone> Hamt<K, V> {
    #[must_use]
    pub fn put<E, H>(
        self: &Arc<Self>,
        key: K,
        value: V,
        hash: u32,
        level: usize,
        equivalence: &E,
        hashing: &H,
    ) -> Arc<Self>
    where
        E: EquivalenceRelation<K> + ?Sized,
        H: HashingAlgorithm<K> + ?Sized,
    {
        match &**self {
            Self::Branch(branch) => Arc::new(Self::Branch(branch.put(
                key,
                value,
                hash,
                level,
                equivalence,
                hashing,
            ))),
            Self::Leaf(key_value) => {
                if equivalence.equivalent(&key, key_value.key()) {
                    Self::leaf(key, value)
                } else if level <= MAX_LEVEL {
                    let index = bitmap_index(hashing.hash(key_value.key()), level);

                    Arc::new(Self::Branch(
                        Branch::new().insert_at(index, 0, self.clone()).put(
                            key,
                            value,
                            hash,
                            level,
                            equivalence,
                            hashing,
                        ),
                    ))
                } else {
                    Arc::new(Self::Collision(Bucket::new(
                        hash,
                        key_value.clone(),
                        KeyValue::new(key, value),
                    )))
                }
            }
            Self::Collision(bucket) => {
                debug_assert_eq!(hash, bucket.hash());
                debug_assert!(bucket.len() >= 2);

                Arc::new(Self::Collision(bucket.put(key, value, equivalence)))
            }
        }
    }

    #[must_use]
    pub fn remove<E: EquivalenceRelation<K> + ?Sized>(
        self: &Arc<Self>,
        key: &K,
        hash: u32,
        level: usize,
        equivalence: &E,
    ) -> Removal<Arc<Self>> {
        match &**self {
            Self::Branch(branch) => branch.remove(key, hash, level, equivalence),
            Self::Leaf(key_value) => {
                if equivalence.equivalent(key, key_value.key()) {
                    Removal::Vanished
                } else {
                    Removal::Unchanged
                }
            }
            Self::Collision(bucket) => match bucket.remove(key, hash, equivalence) {
                Some(bucket) => Removal::Updated(Arc::new(bucket.into())),
                None => Removal::Unchanged,
            },
        }
    }
}

impl<K, V> Default for Hamt<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone, V: Clone> From<Bucket<K, V>> for Hamt<K, V> {
    fn from(bucket: Bucket<K, V>) -> Self {
        if bucket.len() == 1 {
            if let Some(key_value) = bucket.entries().first() {
                return Self::Leaf(key_value.clone());
            }
        }

        Self::Collision(bucket)
    }
}

/// Branch with a child per set bit of its bitmap, ordered by bit index.
#[derive(Debug, Eq)]
pub struct Branch<K, V> {
    bitmap: Bitmap,
    children: Vec<Arc<Hamt<K, V>>>,
}

impl<K, V> Branch<K, V> {
    pub const fn new() -> Self {
        Self {
            bitmap: Bitmap::new(),
            children: Vec::new(),
        }
    }

    fn from_parts(bitmap: Bitmap, children: Vec<Arc<Hamt<K, V>>>) -> Self {
        debug_assert_eq!(bitmap.size(), children.len());

        Self { bitmap, children }
    }

    pub fn is_empty(&self) -> bool {
        self.bitmap.is_empty()
    }

    pub fn children(&self) -> &[Arc<Hamt<K, V>>] {
        &self.children
    }

    fn child(&self, index: u8) -> Option<(usize, &Arc<Hamt<K, V>>)> {
        self.bitmap.get(index).then(|| {
            let offset = self.bitmap.offset(index);

            (offset, &self.children[offset])
        })
    }

    fn insert_at(&self, index: u8, offset: usize, child: Arc<Hamt<K, V>>) -> Self {
        debug_assert!(!self.bitmap.get(index));

        Self::from_parts(
            self.bitmap.set(index),
            array::insert_at(offset, &self.children, child),
        )
    }

    fn override_at(&self, offset: usize, child: Arc<Hamt<K, V>>) -> Self {
        Self::from_parts(
            self.bitmap,
            array::override_at(offset, &self.children, child),
        )
    }

    fn delete_at(&self, index: u8, offset: usize) -> Self {
        Self::from_parts(
            self.bitmap.unset(index),
            array::delete_at(offset, &self.children),
        )
    }

    fn get<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        hash: u32,
        level: usize,
        equivalence: &E,
    ) -> Option<&V> {
        let (_, child) = self.child(bitmap_index(hash, level))?;

        child.get(key, hash, level + 1, equivalence)
    }
}

impl<K: Clone, V: Clone> Branch<K, V> {
    fn put<E, H>(
        &self,
        key: K,
        value: V,
        hash: u32,
        level: usize,
        equivalence: &E,
        hashing: &H,
    ) -> Self
    where
        E: EquivalenceRelation<K> + ?Sized,
        H: HashingAlgorithm<K> + ?Sized,
    {
        let index = bitmap_index(hash, level);

        match self.child(index) {
            Some((offset, child)) => self.override_at(
                offset,
                child.put(key, value, hash, level + 1, equivalence, hashing),
            ),
            None => self.insert_at(
                index,
                self.bitmap.offset(index),
                Hamt::leaf(key, value),
            ),
        }
    }

    fn remove<E: EquivalenceRelation<K> + ?Sized>(
        &self,
        key: &K,
        hash: u32,
        level: usize,
        equivalence: &E,
    ) -> Removal<Arc<Hamt<K, V>>> {
        let index = bitmap_index(hash, level);
        let Some((offset, child)) = self.child(index) else {
            return Removal::Unchanged;
        };

        let branch = match child.remove(key, hash, level + 1, equivalence) {
            Removal::Unchanged => return Removal::Unchanged,
            Removal::Updated(child) => self.override_at(offset, child),
            Removal::Vanished => self.delete_at(index, offset),
        };

        if branch.is_empty() {
            return Removal::Vanished;
        }

        // Non-root branches never hold a lone leaf.
        if level > 1 {
            if let [child] = branch.children() {
                if matches!(**child, Hamt::Leaf(_)) {
                    return Removal::Updated(child.clone());
                }
            }
        }

        Removal::Updated(Arc::new(Hamt::Branch(branch)))
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Branch<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.bitmap == other.bitmap
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(one, other)| Arc::ptr_eq(one, other) || one == other)
    }
}

impl<K: hash::Hash, V: hash::Hash> hash::Hash for Branch<K, V> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        hash::Hash::hash(&self.bitmap, state);
        hash::Hash::hash(&self.children, state);
    }
}

#[derive(Debug)]
enum Frame<'a, K, V> {
    Branch(slice::Iter<'a, Arc<Hamt<K, V>>>),
    Collision(stack::Iter<'a, KeyValue<K, V>>),
    Leaf(&'a KeyValue<K, V>),
}

/// Iterator over entries of a trie.
///
/// Entries come depth first with children in order of their bit indexes.
/// Entries in a collision bucket come from the most recently added one.
#[derive(Debug)]
pub struct Iter<'a, K, V>(Vec<Frame<'a, K, V>>);

impl<'a, K, V> Iter<'a, K, V> {
    fn new(hamt: &'a Hamt<K, V>) -> Self {
        let mut iterator = Self(Vec::with_capacity(MAX_LEVEL + 1));
        iterator.push(hamt);
        iterator
    }

    fn push(&mut self, hamt: &'a Hamt<K, V>) {
        self.0.push(match hamt {
            Hamt::Branch(branch) => Frame::Branch(branch.children().iter()),
            Hamt::Leaf(key_value) => Frame::Leaf(key_value),
            Hamt::Collision(bucket) => Frame::Collision(bucket.entries().iter()),
        });
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self(
            self.0
                .iter()
                .map(|frame| match frame {
                    Frame::Branch(children) => Frame::Branch(children.clone()),
                    Frame::Collision(entries) => Frame::Collision(entries.clone()),
                    Frame::Leaf(key_value) => Frame::Leaf(*key_value),
                })
                .collect(),
        )
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.last_mut()? {
                Frame::Branch(children) => {
                    if let Some(child) = children.next() {
                        self.push(child);
                    } else {
                        self.0.pop();
                    }
                }
                Frame::Collision(entries) => {
                    if let Some(key_value) = entries.next() {
                        return Some(key_value.as_pair());
                    }

                    self.0.pop();
                }
                Frame::Leaf(key_value) => {
                    let key_value = *key_value;
                    self.0.pop();
                    return Some(key_value.as_pair());
                }
            }
        }
    }
}

#[derive(Debug)]
enum OwnedFrame<K, V> {
    Branch(Arc<Hamt<K, V>>, usize),
    Collision(Stack<KeyValue<K, V>>),
    Leaf((K, V)),
}

/// Iterator over cloned entries of a trie in the same order as [`Iter`].
///
/// It holds sub-tries it has not visited yet and clones entries one by one.
#[derive(Debug)]
pub struct IntoIter<K, V>(Vec<OwnedFrame<K, V>>);

impl<K: Clone, V: Clone> IntoIter<K, V> {
    pub(crate) fn new(hamt: Arc<Hamt<K, V>>) -> Self {
        let mut iterator = Self(Vec::with_capacity(MAX_LEVEL + 1));
        iterator.push(hamt);
        iterator
    }

    fn push(&mut self, hamt: Arc<Hamt<K, V>>) {
        let frame = match &*hamt {
            Hamt::Branch(_) => None,
            Hamt::Leaf(key_value) => Some(OwnedFrame::Leaf(key_value.to_pair())),
            Hamt::Collision(bucket) => Some(OwnedFrame::Collision(bucket.entries().clone())),
        };

        self.0
            .push(frame.unwrap_or_else(|| OwnedFrame::Branch(hamt, 0)));
    }
}

impl<K: Clone, V: Clone> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.0.last_mut()? {
                OwnedFrame::Branch(hamt, index) => {
                    let child = match &**hamt {
                        Hamt::Branch(branch) => branch.children().get(*index).cloned(),
                        _ => None,
                    };
                    *index += 1;

                    if let Some(child) = child {
                        self.push(child);
                    } else {
                        self.0.pop();
                    }
                }
                OwnedFrame::Collision(entries) => {
                    let next = entries
                        .first_rest()
                        .map(|(key_value, rest)| (key_value.to_pair(), rest));

                    if let Some((pair, rest)) = next {
                        *entries = rest;
                        return Some(pair);
                    }

                    self.0.pop();
                }
                OwnedFrame::Leaf(_) => {
                    if let Some(OwnedFrame::Leaf(pair)) = self.0.pop() {
                        return Some(pair);
                    }
                }
            }
        }
    }
}
