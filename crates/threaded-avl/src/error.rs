use thiserror::Error;

/// Structural problem found by [`crate::util::assert_threaded_avl`].
///
/// Any of these on a tree built through the public API is a bug.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    #[error("node order violated at node {0}")]
    OrderViolated(u32),
    #[error("AVL balance violated at node {node}: left {left}, right {right}")]
    Unbalanced { node: u32, left: i32, right: i32 },
    #[error("stored height mismatch at node {node}: expected {expected}, got {actual}")]
    HeightMismatch { node: u32, expected: i32, actual: i32 },
    #[error("thread of node {node} points to {actual:?}, expected {expected:?}")]
    BrokenThread {
        node: u32,
        expected: Option<u32>,
        actual: Option<u32>,
    },
    #[error("handle {0} is outside the arena")]
    DanglingHandle(u32),
    #[error("size mismatch: tree reports {expected}, reached {actual} nodes")]
    SizeMismatch { expected: usize, actual: usize },
}
