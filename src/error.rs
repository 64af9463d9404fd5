//! Error types for forest construction and search.

use thiserror::Error;

/// Result type alias using [`ForestError`].
pub type Result<T> = std::result::Result<T, ForestError>;

/// Errors raised by [`Forest`](crate::Forest) operations.
///
/// Tree and cursor operations never fail; only caller-supplied slot indices
/// and the shape of the child-index graph can.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForestError {
    #[error("search root slot {index} holds no tree")]
    RootMissing { index: usize },

    #[error("slot {index} is out of range for a forest of {len} slots")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("descent reached depth {depth}, limit is {limit} levels")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("tree {tree} re-entered from key {key} on its own search path")]
    CycleDetected { tree: usize, key: i32 },
}
