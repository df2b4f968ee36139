//! Persistent HAMT whose versions share their sub-trees.
//!
//! Hash-Array Mapped Trie (HAMT) is a data structure popular as a map (a.k.a.
//! associative array or dictionary) or set. Its immutable variant is adopted
//! widely by functional programming languages like Scala and Clojure to
//! implement immutable and memory-efficient associative arrays and sets.
//!
//! Every update of a [`Map`] returns a new map and leaves the original intact.
//! The new map copies only the nodes on the path to an updated key and shares
//! all the others with the original one, so old versions stay cheap to keep
//! around and can be read from any number of threads.
//!
//! Keys are identified by a pluggable [`EquivalenceRelation`] and hashed by a
//! pluggable [`HashingAlgorithm`] into 32 bits. Keys whose hashes are
//! identical in all bits are kept in a collision bucket.
//!
//! ```
//! use persistent_hamt::Map;
//!
//! let map = Map::new().insert("a", 1);
//! let other = map.insert("b", 2);
//!
//! assert_eq!(map.get(&"b"), None);
//! assert_eq!(other.get(&"a"), Some(&1));
//! assert_eq!(other.remove(&"a").get(&"a"), None);
//! ```

mod array;
mod bitmap;
mod bucket;
mod hamt;
mod hashing;
mod key_value;
mod map;
#[cfg(test)]
mod proptests;
mod stack;

pub use hamt::{IntoIter, Iter};
pub use hashing::{
    BuildHasherHashing, DefaultHashing, Equality, EquivalenceRelation, HashingAlgorithm,
};
pub use map::Map;
