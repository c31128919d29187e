//! # frag-trie
//!
//! An ordered map whose keys are sequences of fragments, stored as a prefix
//! tree so that keys sharing a prefix share its storage.
//!
//! The map is generic over how keys are split, ordered and rebuilt:
//!
//! - any [`FragmentSequence`] can be used as a key (`str` yields `char`s,
//!   slices and vectors yield their elements),
//! - a [`Comparator`] orders sibling fragments and so defines key order,
//! - a [`Concatenator`] rebuilds full keys during iteration, so keys need not
//!   even be sequences themselves (bit fragments can fold into an integer).
//!
//! ## Example
//!
//! ```rust
//! use frag_trie::{StringConcat, Trie};
//!
//! let mut trie: Trie<char, u32, StringConcat> = Trie::new(StringConcat);
//! trie.insert("tea", 1).unwrap();
//! trie.insert("ten", 2).unwrap();
//! trie.insert("to", 3).unwrap();
//!
//! assert_eq!(trie.get("ten"), Some(&2));
//! assert_eq!(trie.lower_bound("tf").key().as_deref(), Some("to"));
//!
//! let under_te: Vec<String> = trie.prefix_iter("te").map(|(k, _)| k).collect();
//! assert_eq!(under_te, ["tea", "ten"]);
//! ```
//!
//! ## Positions
//!
//! Borrowing [`Cursor`]s walk the map in both directions. A [`Position`] is the
//! detached form of a cursor: it survives mutation and is checked on every use,
//! so erasing through a stale position fails with [`TrieError::InvalidPosition`]
//! instead of touching the wrong element.
//!
//! ## Logging
//!
//! Enable the `tracing` feature to get `tracing` events for structural changes
//! (branch forks, pruning, clearing, compaction).

#![deny(unsafe_op_in_unsafe_fn)]

mod log;

mod cursor;
mod error;
mod node;
mod strategy;
mod tree;
mod trie;

pub use cursor::{Cursor, IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
pub use error::{Result, TrieError};
pub use node::Position;
pub use strategy::{
    concat_fn, Comparator, Concatenator, FnComparator, FnConcat, FragmentSequence, Natural,
    Reverse, StringConcat, TransparentComparator, VecConcat,
};
pub use trie::Trie;

#[cfg(test)]
mod proptests;
