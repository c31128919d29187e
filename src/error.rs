//! Error type shared by every fallible trie operation.

use thiserror::Error;

/// Failure reported by a [`Trie`](crate::Trie) operation.
///
/// Every mutating operation checks its preconditions before rewiring any node,
/// so an `Err` always leaves the trie exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum TrieError {
    /// The key has no fragments. An empty sequence has no position in the tree.
    #[error("key must contain at least one fragment")]
    InvalidKey,

    /// No value is stored under the exact key.
    #[error("key not found")]
    KeyNotFound,

    /// The position refers to a node that was erased, pruned or cleared, or is
    /// the end position where an element was required.
    #[error("position does not refer to a live element")]
    InvalidPosition,

    /// The node arena ran out of addressable slots.
    #[error("node arena is full ({0} nodes)")]
    CapacityExceeded(usize),
}

pub type Result<T, E = TrieError> = std::result::Result<T, E>;
