/// Immutable key-value pair stored at a leaf of a trie.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn as_pair(&self) -> (&K, &V) {
        (&self.key, &self.value)
    }
}

impl<K: Clone, V: Clone> KeyValue<K, V> {
    pub fn to_pair(&self) -> (K, V) {
        (self.key.clone(), self.value.clone())
    }
}
