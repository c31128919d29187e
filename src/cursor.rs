//! Cursors and iterators over a [`Trie`](crate::Trie).
//!
//! All of them walk the node links directly: stepping to the next or previous
//! element needs no recursion and no auxiliary stack, and full keys are only
//! rebuilt when an item is produced.

use std::fmt;
use std::iter::FusedIterator;

use crate::node::{Node, NodeId, Position};
use crate::strategy::Concatenator;
use crate::tree::{reconstruct_key, NodeArena};

// =============================================================================
// Cursor
// =============================================================================

/// A read-only position inside a trie.
///
/// A cursor always rests either on an element or on the end. Movement wraps
/// through the end: [`move_next`](Cursor::move_next) from the end lands on the
/// first element and [`move_prev`](Cursor::move_prev) from the end lands on the
/// last one.
pub struct Cursor<'a, K, V, S> {
    arena: &'a NodeArena<K, V>,
    concat: &'a S,
    node: NodeId,
}

impl<'a, K, V, S> Cursor<'a, K, V, S> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, concat: &'a S, node: NodeId) -> Self {
        Self {
            arena,
            concat,
            node,
        }
    }

    /// A detached handle to the current element, usable after the borrow ends.
    pub fn position(&self) -> Position {
        self.arena.position(self.node)
    }

    pub fn is_end(&self) -> bool {
        self.node.is_root()
    }

    pub fn value(&self) -> Option<&'a V> {
        self.arena.value(self.node)
    }

    /// Advance to the next element in key order.
    pub fn move_next(&mut self) {
        self.node = self.arena.successor(self.node);
    }

    /// Retreat to the previous element in key order.
    pub fn move_prev(&mut self) {
        self.node = self.arena.predecessor(self.node);
    }

    /// A cursor one step ahead, leaving this one in place.
    pub fn peek_next(&self) -> Self {
        let mut c = *self;
        c.move_next();
        c
    }

    pub fn peek_prev(&self) -> Self {
        let mut c = *self;
        c.move_prev();
        c
    }
}

impl<'a, K, V, S: Concatenator<K>> Cursor<'a, K, V, S> {
    /// The full key of the current element, rebuilt from its path.
    pub fn key(&self) -> Option<S::Key> {
        if self.is_end() {
            return None;
        }
        Some(self.arena.key_of(self.node, self.concat))
    }

    pub fn entry(&self) -> Option<(S::Key, &'a V)> {
        let value = self.value()?;
        Some((self.arena.key_of(self.node, self.concat), value))
    }
}

impl<K, V, S> Clone for Cursor<'_, K, V, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, S> Copy for Cursor<'_, K, V, S> {}

impl<K, V, S> PartialEq for Cursor<'_, K, V, S> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.arena, other.arena) && self.node == other.node
    }
}

impl<K, V, S> Eq for Cursor<'_, K, V, S> {}

impl<K, V: fmt::Debug, S: Concatenator<K>> fmt::Debug for Cursor<'_, K, V, S>
where
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((k, v)) => f.debug_tuple("Cursor").field(&k).field(v).finish(),
            None => f.write_str("Cursor(end)"),
        }
    }
}

// =============================================================================
// Node walks
// =============================================================================

/// Half-open walk `[front, back)` over value-bearing nodes.
struct Walk<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    front: NodeId,
    back: NodeId,
}

impl<'a, K, V> Walk<'a, K, V> {
    fn next_id(&mut self) -> Option<NodeId> {
        // The end is never yielded; reaching it exhausts the walk for good.
        if self.front == self.back || self.front.is_root() {
            self.back = self.front;
            return None;
        }
        let id = self.front;
        self.front = self.arena.successor(id);
        Some(id)
    }

    fn next_back_id(&mut self) -> Option<NodeId> {
        if self.front == self.back {
            return None;
        }
        let id = self.arena.predecessor(self.back);
        if id.is_root() {
            self.back = self.front;
            return None;
        }
        self.back = id;
        Some(id)
    }
}

impl<K, V> Clone for Walk<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
        }
    }
}

// =============================================================================
// Iter / Range
// =============================================================================

/// Entries of a trie in key order.
pub struct Iter<'a, K, V, S> {
    walk: Walk<'a, K, V>,
    concat: &'a S,
    len: usize,
}

impl<'a, K, V, S> Iter<'a, K, V, S> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, concat: &'a S, len: usize) -> Self {
        Self {
            walk: Walk {
                arena,
                front: arena.first_value_from(NodeId::ROOT),
                back: NodeId::ROOT,
            },
            concat,
            len,
        }
    }
}

impl<'a, K, V, S: Concatenator<K>> Iterator for Iter<'a, K, V, S> {
    type Item = (S::Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_id()?;
        self.len -= 1;
        let arena = self.walk.arena;
        Some((arena.key_of(id, self.concat), arena.value(id)?))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V, S: Concatenator<K>> DoubleEndedIterator for Iter<'_, K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        self.len -= 1;
        let arena = self.walk.arena;
        Some((arena.key_of(id, self.concat), arena.value(id)?))
    }
}

impl<K, V, S: Concatenator<K>> ExactSizeIterator for Iter<'_, K, V, S> {}

impl<K, V, S: Concatenator<K>> FusedIterator for Iter<'_, K, V, S> {}

impl<K, V, S> Clone for Iter<'_, K, V, S> {
    fn clone(&self) -> Self {
        Self {
            walk: self.walk.clone(),
            concat: self.concat,
            len: self.len,
        }
    }
}

/// Entries between two positions, `[first, last)`, in key order.
pub struct Range<'a, K, V, S> {
    walk: Walk<'a, K, V>,
    concat: &'a S,
}

impl<'a, K, V, S> Range<'a, K, V, S> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, concat: &'a S, front: NodeId, back: NodeId) -> Self {
        Self {
            walk: Walk { arena, front, back },
            concat,
        }
    }
}

impl<'a, K, V, S: Concatenator<K>> Iterator for Range<'a, K, V, S> {
    type Item = (S::Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_id()?;
        let arena = self.walk.arena;
        Some((arena.key_of(id, self.concat), arena.value(id)?))
    }
}

impl<K, V, S: Concatenator<K>> DoubleEndedIterator for Range<'_, K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        let arena = self.walk.arena;
        Some((arena.key_of(id, self.concat), arena.value(id)?))
    }
}

impl<K, V, S: Concatenator<K>> FusedIterator for Range<'_, K, V, S> {}

// =============================================================================
// Keys / Values
// =============================================================================

pub struct Keys<'a, K, V, S> {
    inner: Iter<'a, K, V, S>,
}

impl<'a, K, V, S> Keys<'a, K, V, S> {
    pub(crate) fn new(inner: Iter<'a, K, V, S>) -> Self {
        Self { inner }
    }
}

impl<K, V, S: Concatenator<K>> Iterator for Keys<'_, K, V, S> {
    type Item = S::Key;

    fn next(&mut self) -> Option<S::Key> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V, S: Concatenator<K>> DoubleEndedIterator for Keys<'_, K, V, S> {
    fn next_back(&mut self) -> Option<S::Key> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V, S: Concatenator<K>> ExactSizeIterator for Keys<'_, K, V, S> {}

impl<K, V, S: Concatenator<K>> FusedIterator for Keys<'_, K, V, S> {}

/// Values in key order. Keys are never rebuilt.
pub struct Values<'a, K, V> {
    walk: Walk<'a, K, V>,
    len: usize,
}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(arena: &'a NodeArena<K, V>, len: usize) -> Self {
        Self {
            walk: Walk {
                arena,
                front: arena.first_value_from(NodeId::ROOT),
                back: NodeId::ROOT,
            },
            len,
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        let id = self.walk.next_id()?;
        self.len -= 1;
        self.walk.arena.value(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back_id()?;
        self.len -= 1;
        self.walk.arena.value(id)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// Mutable and owning iteration
// =============================================================================

/// Node ids of every element, in key order.
fn element_order<K, V>(arena: &NodeArena<K, V>, len: usize) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(len);
    let mut walk = Walk {
        arena,
        front: arena.first_value_from(NodeId::ROOT),
        back: NodeId::ROOT,
    };
    while let Some(id) = walk.next_id() {
        order.push(id);
    }
    order
}

/// Mutable borrows of the value slots named by `order`, kept in that order.
///
/// Only the listed slots are visited, so the cost follows the number of
/// elements rather than the arena's capacity.
fn claim_values<'a, V>(values: &'a mut [Option<V>], order: &[NodeId]) -> Vec<(NodeId, &'a mut V)> {
    let mut by_slot: Vec<(usize, NodeId)> = order.iter().copied().enumerate().collect();
    by_slot.sort_unstable_by_key(|&(_, id)| id);

    let mut claimed: Vec<Option<(NodeId, &'a mut V)>> = (0..order.len()).map(|_| None).collect();
    let mut rest = values;
    let mut base = 0;
    for (rank, id) in by_slot {
        let (_, tail) = std::mem::take(&mut rest).split_at_mut(id.index() - base);
        let Some((slot, tail)) = tail.split_first_mut() else {
            break;
        };
        claimed[rank] = slot.as_mut().map(|v| (id, v));
        rest = tail;
        base = id.index() + 1;
    }
    claimed.into_iter().flatten().collect()
}

/// Entries in key order with mutable values.
///
/// The element order is resolved up front; afterwards the node structure is
/// only read while the values are handed out one at a time.
pub struct IterMut<'a, K, V, S> {
    nodes: &'a [Node<K>],
    entries: std::vec::IntoIter<(NodeId, &'a mut V)>,
    concat: &'a S,
}

impl<'a, K, V, S> IterMut<'a, K, V, S> {
    pub(crate) fn new(arena: &'a mut NodeArena<K, V>, concat: &'a S, len: usize) -> Self {
        let order = element_order(arena, len);
        let (nodes, values) = arena.split_mut();
        Self {
            nodes,
            entries: claim_values(values, &order).into_iter(),
            concat,
        }
    }
}

impl<'a, K, V, S: Concatenator<K>> Iterator for IterMut<'a, K, V, S> {
    type Item = (S::Key, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, value) = self.entries.next()?;
        Some((reconstruct_key(self.nodes, id, self.concat), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V, S: Concatenator<K>> DoubleEndedIterator for IterMut<'_, K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (id, value) = self.entries.next_back()?;
        Some((reconstruct_key(self.nodes, id, self.concat), value))
    }
}

impl<K, V, S: Concatenator<K>> ExactSizeIterator for IterMut<'_, K, V, S> {}

impl<K, V, S: Concatenator<K>> FusedIterator for IterMut<'_, K, V, S> {}

pub struct ValuesMut<'a, K, V, S> {
    inner: IterMut<'a, K, V, S>,
}

impl<'a, K, V, S> ValuesMut<'a, K, V, S> {
    pub(crate) fn new(inner: IterMut<'a, K, V, S>) -> Self {
        Self { inner }
    }
}

impl<'a, K, V, S> Iterator for ValuesMut<'a, K, V, S> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.entries.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.entries.size_hint()
    }
}

impl<K, V, S> DoubleEndedIterator for ValuesMut<'_, K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.entries.next_back().map(|(_, v)| v)
    }
}

impl<K, V, S> ExactSizeIterator for ValuesMut<'_, K, V, S> {}

impl<K, V, S> FusedIterator for ValuesMut<'_, K, V, S> {}

/// Owning iterator, produced by `Trie::into_iter`.
pub struct IntoIter<K, V, S> {
    arena: NodeArena<K, V>,
    concat: S,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V, S> IntoIter<K, V, S> {
    pub(crate) fn new(arena: NodeArena<K, V>, concat: S, len: usize) -> Self {
        let order = element_order(&arena, len).into_iter();
        Self {
            arena,
            concat,
            order,
        }
    }
}

impl<K, V, S: Concatenator<K>> Iterator for IntoIter<K, V, S> {
    type Item = (S::Key, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        let value = self.arena.value_slot(id).take()?;
        Some((self.arena.key_of(id, &self.concat), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V, S: Concatenator<K>> DoubleEndedIterator for IntoIter<K, V, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        let value = self.arena.value_slot(id).take()?;
        Some((self.arena.key_of(id, &self.concat), value))
    }
}

impl<K, V, S: Concatenator<K>> ExactSizeIterator for IntoIter<K, V, S> {}

impl<K, V, S: Concatenator<K>> FusedIterator for IntoIter<K, V, S> {}
