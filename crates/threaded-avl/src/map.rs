use std::fmt::{self, Debug, Display};
use std::io;

use log::debug;

use crate::error::InvariantError;
use crate::iter::{Iter, Range};
use crate::types::{RightLink, ThreadedNode};
use crate::util;

fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Sorted map on a threaded AVL tree.
///
/// Keys are unique and the map only grows: there is no removal. Nodes sit
/// in an arena and refer to each other by `u32` handle, so a node without a
/// real right child can store a thread to its in-order successor without
/// owning it.
///
/// Besides the borrowing [`iter`](Self::iter), the map carries one internal
/// cursor driven by [`begin`](Self::begin) and [`next`](Self::next).
/// Calling `begin` again discards the previous walk.
pub struct ThreadedAvlMap<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    root: Option<u32>,
    size: usize,
    cursor: Option<u32>,
    comparator: C,
    arena: Vec<ThreadedNode<K, V>>,
}

impl<K, V> ThreadedAvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut map = Self::new();
        map.arena.reserve(capacity);
        map
    }
}

impl<K, V> Default for ThreadedAvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> ThreadedAvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    /// Empty map ordered by `comparator` (negative, zero or positive, like
    /// `a - b`).
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            root: None,
            size: 0,
            cursor: None,
            comparator,
            arena: Vec::new(),
        }
    }

    /// Number of distinct keys inserted since the last [`clear`](Self::clear).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the tree, `-1` when empty.
    pub fn height(&self) -> i32 {
        self.root.map_or(-1, |r| self.arena[r as usize].height)
    }

    fn find(&self, key: &K) -> Option<u32> {
        util::find(&self.arena, self.root, key, &self.comparator)
    }

    pub fn search(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.arena[i as usize].v)
    }

    pub fn has(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        Some(&mut self.arena[i as usize].v)
    }

    /// Value stored under `key`, or `V::default()` if absent.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Default + Clone,
    {
        self.search(key).cloned().unwrap_or_default()
    }

    /// Key referenced by the right field of `key`'s node.
    ///
    /// For a threaded node this is the in-order successor. For a node with
    /// a real right subtree it is the key of that subtree's root. `None`
    /// if `key` is absent or is the largest key.
    pub fn successor_of(&self, key: &K) -> Option<&K> {
        let i = self.find(key)?;
        let target = self.arena[i as usize].r.target()?;
        Some(&self.arena[target as usize].k)
    }

    /// Stored height of `key`'s node, `-1` if absent.
    pub fn height_of(&self, key: &K) -> i32 {
        self.find(key).map_or(-1, |i| self.arena[i as usize].height)
    }

    /// Inserts `key` with `value`. A duplicate key leaves the map untouched
    /// and returns `false`.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let node = util::insert(
            &mut self.arena,
            &mut self.root,
            key,
            value,
            &self.comparator,
        );
        if node.is_some() {
            self.size += 1;
        }
        node.is_some()
    }

    /// Positions the cursor at the smallest key.
    pub fn begin(&mut self) {
        self.cursor = util::first(&self.arena, self.root);
    }

    /// Returns the key under the cursor and advances it, or `None` once the
    /// walk is exhausted (or was never started).
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&K> {
        let i = self.cursor?;
        self.cursor = util::next(&self.arena, i);
        Some(&self.arena[i as usize].k)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.arena, self.root, self.size)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        util::first(&self.arena, self.root).map(|i| {
            let n = &self.arena[i as usize];
            (&n.k, &n.v)
        })
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        util::last(&self.arena, self.root).map(|i| {
            let n = &self.arena[i as usize];
            (&n.k, &n.v)
        })
    }

    /// Lazily yields entries with `lower <= key <= upper`.
    ///
    /// One descent finds the first key not below `lower`; the rest is a
    /// walk along successors. Empty when `lower > upper`.
    pub fn range<'a>(&'a self, lower: &K, upper: &'a K) -> Range<'a, K, V, C> {
        Range::new(&self.arena, self.root, lower, upper, &self.comparator)
    }

    /// Keys in `[lower, upper]`, ascending, in O(log N + M).
    pub fn range_search(&self, lower: &K, upper: &K) -> Vec<K>
    where
        K: Clone,
    {
        self.range(lower, upper).map(|(k, _)| k.clone()).collect()
    }

    /// Drops every node and resets the map and its cursor.
    pub fn clear(&mut self) {
        if self.root.is_some() {
            debug!("clearing threaded AVL map of {} nodes", self.size);
        }
        self.arena.clear();
        self.root = None;
        self.size = 0;
        self.cursor = None;
    }

    /// Writes an in-order listing of `(key,value,height[,successor])`.
    ///
    /// The successor column appears only for threaded nodes that have one.
    /// The tree is not modified.
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        K: Display,
        V: Display,
    {
        writeln!(out, "**************************************************")?;
        writeln!(out, "********************* AVLT ***********************")?;
        writeln!(out, "** size: {}", self.size)?;
        writeln!(out, "** height: {}", self.height())?;

        let mut curr = util::first(&self.arena, self.root);
        while let Some(i) = curr {
            let n = &self.arena[i as usize];
            match n.r {
                RightLink::Thread(Some(s)) => writeln!(
                    out,
                    "({},{},{},{})",
                    n.k, n.v, n.height, self.arena[s as usize].k
                )?,
                _ => writeln!(out, "({},{},{})", n.k, n.v, n.height)?,
            }
            curr = util::next(&self.arena, i);
        }

        writeln!(out, "**************************************************")
    }

    /// Checks ordering, balance, stored heights, threads and size.
    pub fn assert_valid(&self) -> Result<(), InvariantError> {
        util::assert_threaded_avl(&self.arena, self.root, self.size, &self.comparator)
    }
}

/// Copies are independent: threads are arena handles, so the cloned arena
/// threads through its own nodes. The copy starts with no active cursor.
impl<K, V, C> Clone for ThreadedAvlMap<K, V, C>
where
    K: Clone,
    V: Clone,
    C: Fn(&K, &K) -> i32 + Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            size: self.size,
            cursor: None,
            comparator: self.comparator.clone(),
            arena: self.arena.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.arena.clone_from(&source.arena);
        self.root = source.root;
        self.size = source.size;
        self.cursor = None;
        self.comparator = source.comparator.clone();
    }
}

impl<K, V, C> Debug for ThreadedAvlMap<K, V, C>
where
    K: Debug,
    V: Debug,
    C: Fn(&K, &K) -> i32,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ThreadedAvlMap(size={}) {}",
            self.size,
            util::print(&self.arena, self.root, "")
        )
    }
}

impl<'a, K, V, C> IntoIterator for &'a ThreadedAvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, C> Extend<(K, V)> for ThreadedAvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ThreadedAvlMap<K, V, fn(&K, &K) -> i32>
where
    K: PartialOrd,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
