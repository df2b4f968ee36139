use std::{
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    sync::Arc,
};

struct Link<T> {
    value: T,
    next: Option<Arc<Link<T>>>,
}

/// Immutable LIFO list whose tails are shared between versions.
///
/// Dropping, comparing and hashing never recurse, so a stack can be
/// arbitrarily long.
pub struct Stack<T> {
    head: Option<Arc<Link<T>>>,
    size: usize,
}

impl<T> Stack<T> {
    pub const fn new() -> Self {
        Self {
            head: None,
            size: 0,
        }
    }

    #[must_use]
    pub fn push(&self, value: T) -> Self {
        self.clone().prepend(value)
    }

    fn prepend(mut self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Link {
                value,
                next: self.head.take(),
            })),
            size: self.size + 1,
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.head.as_ref().map(|link| &link.value)
    }

    pub fn first_rest(&self) -> Option<(&T, Self)> {
        self.head.as_ref().map(|link| {
            (
                &link.value,
                Self {
                    head: link.next.clone(),
                    size: self.size - 1,
                },
            )
        })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter(self.head.as_deref())
    }

    pub fn position(&self, predicate: impl Fn(&T) -> bool) -> Option<usize> {
        self.iter().position(predicate)
    }

    // Returns values above an index and the link at it.
    fn split(&self, index: usize) -> (Vec<&T>, Option<&Arc<Link<T>>>) {
        let mut prefix = Vec::with_capacity(index);
        let mut link = self.head.as_ref();

        while let Some(current) = link {
            if prefix.len() == index {
                break;
            }

            prefix.push(&current.value);
            link = current.next.as_ref();
        }

        (prefix, link)
    }
}

impl<T: Clone> Stack<T> {
    /// Replaces a value at an index keeping the order of the others. The tail
    /// below the index is shared with the original stack.
    #[must_use]
    pub fn replace_at(&self, index: usize, value: T) -> Self {
        debug_assert!(index < self.size);

        let (prefix, link) = self.split(index);
        let Some(link) = link else {
            return self.clone();
        };

        Self::rebuild(
            Self {
                head: link.next.clone(),
                size: self.size - index - 1,
            }
            .prepend(value),
            prefix,
        )
    }

    /// Removes a value at an index keeping the order of the others. The tail
    /// below the index is shared with the original stack.
    #[must_use]
    pub fn remove_at(&self, index: usize) -> Self {
        debug_assert!(index < self.size);

        let (prefix, link) = self.split(index);
        let Some(link) = link else {
            return self.clone();
        };

        Self::rebuild(
            Self {
                head: link.next.clone(),
                size: self.size - index - 1,
            },
            prefix,
        )
    }

    fn rebuild(mut stack: Self, prefix: Vec<&T>) -> Self {
        for value in prefix.into_iter().rev() {
            stack = stack.prepend(value.clone());
        }

        stack
    }
}

impl<T> Clone for Stack<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            size: self.size,
        }
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Stack<T> {
    fn drop(&mut self) {
        let mut link = self.head.take();

        while let Some(current) = link {
            match Arc::try_unwrap(current) {
                Ok(mut current) => link = current.next.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for Stack<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Stack<T> {}

impl<T: Hash> Hash for Stack<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);

        for value in self {
            value.hash(state);
        }
    }
}

impl<T: Debug> Debug for Stack<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_list().entries(self).finish()
    }
}

impl<T> FromIterator<T> for Stack<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iterator: I) -> Self {
        let mut stack = Self::new();

        for value in iterator {
            stack = stack.prepend(value);
        }

        stack
    }
}

/// Iterator over a stack from the most recently pushed value.
pub struct Iter<'a, T>(Option<&'a Link<T>>);

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self(self.0)
    }
}

impl<T: Debug> Debug for Iter<'_, T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.map(|link| {
            self.0 = link.next.as_deref();
            &link.value
        })
    }
}

impl<'a, T> IntoIterator for &'a Stack<T> {
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
