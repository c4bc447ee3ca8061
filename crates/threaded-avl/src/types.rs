//! Node layout for the threaded AVL tree.
//!
//! Links are `u32` indices into the map's arena. The right link is a tagged
//! union: either a real, owned right subtree or a non-owning thread to the
//! node's in-order successor.

/// Right-hand link of a [`ThreadedNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RightLink {
    /// Real right subtree, owned by this node.
    Child(u32),
    /// Thread to the in-order successor; `None` for the maximum key.
    Thread(Option<u32>),
}

impl RightLink {
    /// Real right child, ignoring threads.
    #[inline]
    pub fn child(self) -> Option<u32> {
        match self {
            RightLink::Child(r) => Some(r),
            RightLink::Thread(_) => None,
        }
    }

    /// Successor handle stored in the thread, if this link is a thread.
    #[inline]
    pub fn thread(self) -> Option<u32> {
        match self {
            RightLink::Child(_) => None,
            RightLink::Thread(s) => s,
        }
    }

    #[inline]
    pub fn is_thread(self) -> bool {
        matches!(self, RightLink::Thread(_))
    }

    /// Whatever handle the field points at: child or successor.
    #[inline]
    pub fn target(self) -> Option<u32> {
        match self {
            RightLink::Child(r) => Some(r),
            RightLink::Thread(s) => s,
        }
    }
}

/// Threaded AVL tree node.
#[derive(Clone, Debug)]
pub struct ThreadedNode<K, V> {
    pub l: Option<u32>,
    pub r: RightLink,
    pub k: K,
    pub v: V,
    /// Subtree height; a leaf is `0`, an absent child counts as `-1`.
    pub height: i32,
}

impl<K, V> ThreadedNode<K, V> {
    /// New leaf threaded to `successor`.
    pub fn new(k: K, v: V, successor: Option<u32>) -> Self {
        Self {
            l: None,
            r: RightLink::Thread(successor),
            k,
            v,
            height: 0,
        }
    }

    #[inline]
    pub fn is_threaded(&self) -> bool {
        self.r.is_thread()
    }
}
