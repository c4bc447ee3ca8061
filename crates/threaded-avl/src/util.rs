//! Arena-level operations on a threaded AVL tree.
//!
//! Every function takes the node arena plus a root handle. Nothing here
//! keeps parent pointers: insertion records its ancestors on an explicit
//! stack, and forward traversal follows threads.

use std::fmt::Debug;

use log::trace;

use crate::error::InvariantError;
use crate::types::{RightLink, ThreadedNode};

#[inline]
fn height_of<K, V>(arena: &[ThreadedNode<K, V>], i: Option<u32>) -> i32 {
    i.map_or(-1, |i| arena[i as usize].height)
}

#[inline]
fn left_height<K, V>(arena: &[ThreadedNode<K, V>], i: u32) -> i32 {
    height_of(arena, arena[i as usize].l)
}

/// Height of the real right subtree; a thread contributes nothing.
#[inline]
fn right_height<K, V>(arena: &[ThreadedNode<K, V>], i: u32) -> i32 {
    height_of(arena, arena[i as usize].r.child())
}

#[inline]
fn update_height<K, V>(arena: &mut [ThreadedNode<K, V>], i: u32) {
    let h = 1 + left_height(arena, i).max(right_height(arena, i));
    arena[i as usize].height = h;
}

#[inline]
fn leftmost<K, V>(arena: &[ThreadedNode<K, V>], mut i: u32) -> u32 {
    while let Some(l) = arena[i as usize].l {
        i = l;
    }
    i
}

/// Leftmost node of the tree.
pub fn first<K, V>(arena: &[ThreadedNode<K, V>], root: Option<u32>) -> Option<u32> {
    root.map(|r| leftmost(arena, r))
}

/// Rightmost node of the tree.
pub fn last<K, V>(arena: &[ThreadedNode<K, V>], root: Option<u32>) -> Option<u32> {
    let mut curr = root?;
    while let Some(r) = arena[curr as usize].r.child() {
        curr = r;
    }
    Some(curr)
}

/// In-order successor of `node`.
///
/// A threaded node answers in O(1); otherwise this is the leftmost node of
/// the real right subtree.
pub fn next<K, V>(arena: &[ThreadedNode<K, V>], node: u32) -> Option<u32> {
    match arena[node as usize].r {
        RightLink::Thread(s) => s,
        RightLink::Child(r) => Some(leftmost(arena, r)),
    }
}

/// Exact-match lookup.
pub fn find<K, V, C>(
    arena: &[ThreadedNode<K, V>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    while let Some(i) = curr {
        let n = &arena[i as usize];
        let cmp = comparator(key, &n.k);
        if cmp == 0 {
            return Some(i);
        }
        curr = if cmp < 0 { n.l } else { n.r.child() };
    }
    None
}

/// Node holding the smallest key that is `>= key`.
pub fn find_ceil<K, V, C>(
    arena: &[ThreadedNode<K, V>],
    root: Option<u32>,
    key: &K,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let mut curr = root;
    let mut candidate = None;
    while let Some(i) = curr {
        let n = &arena[i as usize];
        let cmp = comparator(key, &n.k);
        if cmp == 0 {
            return Some(i);
        }
        if cmp < 0 {
            candidate = Some(i);
            curr = n.l;
        } else {
            curr = n.r.child();
        }
    }
    candidate
}

/// Points `parent`'s slot that held `old` at `new`. Returns the new root.
fn relink<K, V>(
    arena: &mut [ThreadedNode<K, V>],
    root: Option<u32>,
    parent: Option<u32>,
    old: u32,
    new: u32,
) -> Option<u32> {
    let Some(p) = parent else {
        return Some(new);
    };
    let p = &mut arena[p as usize];
    if p.l == Some(old) {
        p.l = Some(new);
    } else {
        debug_assert_eq!(p.r, RightLink::Child(old));
        p.r = RightLink::Child(new);
    }
    root
}

/// Rotates left around `n`, whose parent is `parent` (`None` for the root).
///
/// If the right child's left subtree is empty, `n` ends up with no right
/// child and is threaded to its former right child. Returns the new root.
pub fn left_rotate<K, V>(
    arena: &mut [ThreadedNode<K, V>],
    root: Option<u32>,
    parent: Option<u32>,
    n: u32,
) -> Option<u32> {
    let r = arena[n as usize]
        .r
        .child()
        .expect("left rotation needs a real right child");
    let b = arena[r as usize].l;

    arena[r as usize].l = Some(n);
    arena[n as usize].r = match b {
        Some(b) => RightLink::Child(b),
        None => RightLink::Thread(Some(r)),
    };
    let root = relink(arena, root, parent, n, r);

    update_height(arena, n);
    update_height(arena, r);
    root
}

/// Rotates right around `n`, whose parent is `parent` (`None` for the root).
///
/// A threaded left child has no real right subtree to hand over; its thread
/// already points at `n` and is replaced by a real link. Returns the new root.
pub fn right_rotate<K, V>(
    arena: &mut [ThreadedNode<K, V>],
    root: Option<u32>,
    parent: Option<u32>,
    n: u32,
) -> Option<u32> {
    let l = arena[n as usize].l.expect("right rotation needs a left child");
    let b = arena[l as usize].r.child();

    arena[n as usize].l = b;
    arena[l as usize].r = RightLink::Child(n);
    let root = relink(arena, root, parent, n, l);

    update_height(arena, n);
    update_height(arena, l);
    root
}

/// Restores balance at `n` given its child heights. Returns the new root.
fn rebalance<K, V>(
    arena: &mut [ThreadedNode<K, V>],
    root: Option<u32>,
    parent: Option<u32>,
    n: u32,
    hl: i32,
    hr: i32,
) -> Option<u32> {
    if hr > hl {
        let r = arena[n as usize]
            .r
            .child()
            .expect("right-heavy node has a right child");
        if right_height(arena, r) >= left_height(arena, r) {
            trace!("rebalance at node {n}: right-right, rotate left");
            left_rotate(arena, root, parent, n)
        } else {
            trace!("rebalance at node {n}: right-left, rotate right then left");
            let root = right_rotate(arena, root, Some(n), r);
            left_rotate(arena, root, parent, n)
        }
    } else {
        let l = arena[n as usize]
            .l
            .expect("left-heavy node has a left child");
        if left_height(arena, l) >= right_height(arena, l) {
            trace!("rebalance at node {n}: left-left, rotate right");
            right_rotate(arena, root, parent, n)
        } else {
            trace!("rebalance at node {n}: left-right, rotate left then right");
            let root = left_rotate(arena, root, Some(n), l);
            right_rotate(arena, root, parent, n)
        }
    }
}

fn rebalance_after_insert<K, V>(
    arena: &mut [ThreadedNode<K, V>],
    root: Option<u32>,
    mut ancestors: Vec<u32>,
) -> Option<u32> {
    while let Some(curr) = ancestors.pop() {
        let hl = left_height(arena, curr);
        let hr = right_height(arena, curr);
        let h = 1 + hl.max(hr);
        if h == arena[curr as usize].height {
            return root;
        }
        arena[curr as usize].height = h;

        if (hl - hr).abs() > 1 {
            let parent = ancestors.last().copied();
            // One rotation restores the height this subtree had before the
            // insert, so nothing above it changes.
            return rebalance(arena, root, parent, curr, hl, hr);
        }
    }
    root
}

/// Inserts `key` unless it is already present.
///
/// Returns the handle of the new node, or `None` for a duplicate key, in
/// which case neither the arena nor the stored value is touched.
pub fn insert<K, V, C>(
    arena: &mut Vec<ThreadedNode<K, V>>,
    root: &mut Option<u32>,
    key: K,
    value: V,
    comparator: &C,
) -> Option<u32>
where
    C: Fn(&K, &K) -> i32,
{
    let depth = height_of(arena, *root) + 1;
    let mut ancestors: Vec<u32> = Vec::with_capacity(depth as usize);
    let mut curr = *root;
    let mut cmp = 0;
    while let Some(i) = curr {
        let n = &arena[i as usize];
        cmp = comparator(&key, &n.k);
        if cmp == 0 {
            return None;
        }
        ancestors.push(i);
        curr = if cmp < 0 { n.l } else { n.r.child() };
    }

    let n = arena.len() as u32;
    match ancestors.last().copied() {
        None => {
            arena.push(ThreadedNode::new(key, value, None));
            *root = Some(n);
        }
        Some(last) if cmp < 0 => {
            arena.push(ThreadedNode::new(key, value, Some(last)));
            arena[last as usize].l = Some(n);
        }
        Some(last) => {
            let successor = arena[last as usize].r.thread();
            arena.push(ThreadedNode::new(key, value, successor));
            arena[last as usize].r = RightLink::Child(n);
        }
    }

    *root = rebalance_after_insert(arena, *root, ancestors);
    Some(n)
}

/// Returns the real height of the subtree, checking stored heights and
/// balance along the way. Visited handles are appended to `inorder`.
fn check_subtree<K, V>(
    arena: &[ThreadedNode<K, V>],
    node: Option<u32>,
    inorder: &mut Vec<u32>,
) -> Result<i32, InvariantError> {
    let Some(i) = node else {
        return Ok(-1);
    };
    if i as usize >= arena.len() {
        return Err(InvariantError::DanglingHandle(i));
    }
    if inorder.len() > arena.len() {
        return Err(InvariantError::SizeMismatch {
            expected: arena.len(),
            actual: inorder.len(),
        });
    }

    let n = &arena[i as usize];
    let left = check_subtree(arena, n.l, inorder)?;
    inorder.push(i);
    let right = check_subtree(arena, n.r.child(), inorder)?;

    let expected = 1 + left.max(right);
    if n.height != expected {
        return Err(InvariantError::HeightMismatch {
            node: i,
            expected,
            actual: n.height,
        });
    }
    if (left - right).abs() > 1 {
        return Err(InvariantError::Unbalanced { node: i, left, right });
    }
    Ok(expected)
}

/// Validates ordering, balance, stored heights, threads and node count.
pub fn assert_threaded_avl<K, V, C>(
    arena: &[ThreadedNode<K, V>],
    root: Option<u32>,
    size: usize,
    comparator: &C,
) -> Result<(), InvariantError>
where
    C: Fn(&K, &K) -> i32,
{
    let mut inorder = Vec::with_capacity(size);
    check_subtree(arena, root, &mut inorder)?;

    if inorder.len() != size {
        return Err(InvariantError::SizeMismatch {
            expected: size,
            actual: inorder.len(),
        });
    }

    for (pos, &i) in inorder.iter().enumerate() {
        let following = inorder.get(pos + 1).copied();
        if let Some(j) = following {
            if comparator(&arena[i as usize].k, &arena[j as usize].k) >= 0 {
                return Err(InvariantError::OrderViolated(j));
            }
        }
        if let RightLink::Thread(actual) = arena[i as usize].r {
            if actual != following {
                return Err(InvariantError::BrokenThread {
                    node: i,
                    expected: following,
                    actual,
                });
            }
        }
    }

    Ok(())
}

/// Debug printer; threads are shown as `⇢` followed by the target handle.
pub fn print<K, V>(arena: &[ThreadedNode<K, V>], node: Option<u32>, tab: &str) -> String
where
    K: Debug,
    V: Debug,
{
    match node {
        None => "∅".to_string(),
        Some(i) => {
            let n = &arena[i as usize];
            let left = print(arena, n.l, &format!("{tab}  "));
            let right = match n.r {
                RightLink::Child(r) => print(arena, Some(r), &format!("{tab}  ")),
                RightLink::Thread(Some(s)) => format!("⇢{s}"),
                RightLink::Thread(None) => "⇢∅".to_string(),
            };
            format!(
                "Node[{i}] [h={}] {{ {:?} = {:?} }}\n{tab}L={left}\n{tab}R={right}",
                n.height, n.k, n.v
            )
        }
    }
}
