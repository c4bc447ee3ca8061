//! Threaded AVL tree map.
//!
//! A height-balanced binary search tree in which every node lacking a real
//! right child stores a thread to its in-order successor instead. Forward
//! traversal therefore needs neither parent pointers nor a stack, while
//! lookup, insertion and range queries stay logarithmic.
//!
//! Nodes live in a `Vec` arena and all links are `u32` handles, so a thread
//! is simply a handle that does not own its target.
//!
//! # Module layout
//!
//! | Module | Contents |
//! |--------|----------|
//! [`types`] | [`ThreadedNode`] and the [`RightLink`] child-or-thread tag |
//! [`util`] | arena-level search, insertion, rotations, validation, printing |
//! [`map`] | [`ThreadedAvlMap`], the owning map with its traversal cursor |
//! [`iter`] | [`Iter`] and [`Range`] borrowing iterators |
//!
//! # Example
//!
//! ```
//! use threaded_avl::ThreadedAvlMap;
//!
//! let mut map = ThreadedAvlMap::new();
//! for k in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(k, k * 10);
//! }
//! assert_eq!(map.height(), 2);
//! assert_eq!(map.range_search(&4, &8), vec![4, 5, 7, 8]);
//!
//! map.begin();
//! let mut keys = Vec::new();
//! while let Some(k) = map.next() {
//!     keys.push(*k);
//! }
//! assert_eq!(keys, vec![1, 3, 4, 5, 7, 8, 9]);
//! ```

pub mod error;
pub mod iter;
pub mod map;
pub mod types;
pub mod util;

pub use error::InvariantError;
pub use iter::{Iter, Range};
pub use map::ThreadedAvlMap;
pub use types::{RightLink, ThreadedNode};
