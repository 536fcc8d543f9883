use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

pub struct Key<T>(u32, PhantomData<fn() -> T>);

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0)
    }
}

impl<T> std::hash::Hash for Key<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialEq for Key<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Key<T> {}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T> Key<T> {
    pub fn new(index: u32) -> Self {
        Self(index, PhantomData)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl<T> From<u32> for Key<T> {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Arena<T> {
    items: Vec<T>,
}

impl<T> FromIterator<T> for Arena<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self { items: Default::default() }
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn alloc(&mut self, value: T) -> Key<T> {
        let idx = self.items.len() as u32;
        self.items.push(value);
        Key::new(idx)
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Index<Key<T>> for Arena<T> {
    type Output = T;
    fn index(&self, index: Key<T>) -> &Self::Output {
        &self.items[index.index() as usize]
    }
}

impl<T> IndexMut<Key<T>> for Arena<T> {
    fn index_mut(&mut self, index: Key<T>) -> &mut Self::Output {
        &mut self.items[index.index() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_indices() {
        let mut arena = Arena::new();
        let a = arena.alloc("a");
        let b = arena.alloc("b");

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena[b], "b");
        assert_eq!(arena.len(), 2);

        arena[a] = "c";
        assert_eq!(arena[Key::new(0)], "c");
    }
}
