//! Borrowing iterators that walk the tree along its threads.

use std::iter::FusedIterator;

use crate::types::ThreadedNode;
use crate::util;

/// Ascending iterator over `(&K, &V)`.
///
/// Holds no stack: each step is either a thread hop or a descent to the
/// leftmost node of a real right subtree.
pub struct Iter<'a, K, V> {
    arena: &'a [ThreadedNode<K, V>],
    curr: Option<u32>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(arena: &'a [ThreadedNode<K, V>], root: Option<u32>, len: usize) -> Self {
        Self {
            arena,
            curr: util::first(arena, root),
            remaining: len,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        self.curr = util::next(self.arena, i);
        self.remaining = self.remaining.saturating_sub(1);
        let n = &self.arena[i as usize];
        Some((&n.k, &n.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Entries with keys in `[lower, upper]`, ascending.
pub struct Range<'a, K, V, C> {
    arena: &'a [ThreadedNode<K, V>],
    curr: Option<u32>,
    upper: &'a K,
    comparator: &'a C,
}

impl<'a, K, V, C> Range<'a, K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub(crate) fn new(
        arena: &'a [ThreadedNode<K, V>],
        root: Option<u32>,
        lower: &K,
        upper: &'a K,
        comparator: &'a C,
    ) -> Self {
        let curr = if comparator(lower, upper) > 0 {
            None
        } else {
            util::find_ceil(arena, root, lower, comparator)
        };
        Self {
            arena,
            curr,
            upper,
            comparator,
        }
    }
}

impl<'a, K, V, C> Iterator for Range<'a, K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.curr?;
        let n = &self.arena[i as usize];
        if (self.comparator)(&n.k, self.upper) > 0 {
            self.curr = None;
            return None;
        }
        self.curr = util::next(self.arena, i);
        Some((&n.k, &n.v))
    }
}

impl<K, V, C> FusedIterator for Range<'_, K, V, C> where C: Fn(&K, &K) -> i32 {}
