//! The ordered map.

use std::cmp::Ordering;
use std::fmt;

use crate::cursor::{Cursor, IntoIter, Iter, IterMut, Keys, Range, Values, ValuesMut};
use crate::error::{Result, TrieError};
use crate::log::{debug_log, trace_log};
use crate::node::{NodeId, Position};
use crate::strategy::{Comparator, Concatenator, FragmentSequence, Natural, TransparentComparator};
use crate::tree::{ChildSlot, NodeArena};

/// An ordered map from fragment sequences to values, stored as a prefix tree.
///
/// Each node holds one fragment; a key is the path from the root to the node
/// that carries its value, so keys sharing a prefix share the nodes for it.
/// Full keys are never stored: the [`Concatenator`] `S` rebuilds them during
/// iteration, and the [`Comparator`] `C` orders sibling fragments, which makes
/// iteration order lexicographic.
///
/// There is no `Default`: a trie cannot exist without a way to
/// rebuild its keys.
///
/// ```rust
/// use frag_trie::{StringConcat, Trie};
///
/// let mut trie: Trie<char, i32, StringConcat> = Trie::new(StringConcat);
/// trie.insert("gsd", 42).unwrap();
/// trie.insert("gs", -24).unwrap();
///
/// let pairs: Vec<(String, i32)> = trie.iter().map(|(k, v)| (k, *v)).collect();
/// assert_eq!(pairs, vec![("gs".to_string(), -24), ("gsd".to_string(), 42)]);
/// ```
pub struct Trie<K, V, S, C = Natural> {
    arena: NodeArena<K, V>,
    len: usize,
    concat: S,
    comparator: C,
}

impl<K, V, S: Concatenator<K>> Trie<K, V, S, Natural>
where
    K: Ord,
{
    pub fn new(concat: S) -> Self {
        Self::with_comparator(concat, Natural)
    }

    /// Reserve room for `nodes` tree nodes up front.
    pub fn with_capacity(concat: S, nodes: usize) -> Self {
        Self::with_capacity_and_comparator(concat, Natural, nodes)
    }

    /// Build from `(key, value)` pairs; on duplicate keys the first one wins.
    pub fn from_pairs<Q, I>(concat: S, pairs: I) -> Result<Self>
    where
        Q: FragmentSequence<K>,
        I: IntoIterator<Item = (Q, V)>,
    {
        Self::from_pairs_with_comparator(concat, Natural, pairs)
    }
}

impl<K, V, S: Concatenator<K>, C: Comparator<K>> Trie<K, V, S, C> {
    pub fn with_comparator(concat: S, comparator: C) -> Self {
        Self::with_capacity_and_comparator(concat, comparator, 0)
    }

    pub fn with_capacity_and_comparator(concat: S, comparator: C, nodes: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(nodes),
            len: 0,
            concat,
            comparator,
        }
    }

    pub fn from_pairs_with_comparator<Q, I>(concat: S, comparator: C, pairs: I) -> Result<Self>
    where
        Q: FragmentSequence<K>,
        I: IntoIterator<Item = (Q, V)>,
    {
        let mut trie = Self::with_comparator(concat, comparator);
        trie.insert_many(pairs)?;
        Ok(trie)
    }

    // =========================================================================
    // Capacity and observers
    // =========================================================================

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Tree nodes in use, root included.
    pub fn node_count(&self) -> usize {
        self.arena.live_nodes()
    }

    /// Bytes held by the node arena, including free slots.
    pub fn memory_usage(&self) -> usize {
        self.arena.memory_usage()
    }

    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    /// Rewrite the live nodes into a dense arena, dropping slots freed by
    /// erasure. Every position except the end becomes stale. Returns the number
    /// of nodes rewritten.
    pub fn compact(&mut self) -> usize {
        let rewritten = self.arena.compact();
        debug_log!(rewritten, len = self.len, "compacted node arena");
        rewritten
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    pub fn concatenator(&self) -> &S {
        &self.concat
    }

    // =========================================================================
    // Descent
    // =========================================================================

    /// Walk the path of `key` as far as it exists. Returns the last node
    /// reached and whether it is the exact, value-bearing node for `key`.
    fn try_find<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> (NodeId, bool) {
        let mut cur = NodeId::ROOT;
        for fragment in key.fragments() {
            match self.arena.find_child(cur, &fragment, &self.comparator) {
                ChildSlot::Found(c) => cur = c,
                _ => return (cur, false),
            }
        }
        (cur, !cur.is_root() && self.arena.has_value(cur))
    }

    fn find_node<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Option<NodeId> {
        match self.try_find(key) {
            (id, true) => Some(id),
            _ => None,
        }
    }

    /// Walk the path of `key`, creating every missing node, and return the
    /// node the path ends at.
    fn try_insert<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Result<NodeId> {
        let mut fragments = key.fragments().peekable();
        if fragments.peek().is_none() {
            return Err(TrieError::InvalidKey);
        }

        let mut cur = NodeId::ROOT;
        let mut created = None;
        for fragment in fragments {
            let slot = self.arena.find_child(cur, &fragment, &self.comparator);
            if let ChildSlot::Found(c) = slot {
                cur = c;
                continue;
            }
            let id = match self.arena.alloc(fragment) {
                Ok(id) => id,
                Err(e) => {
                    // Undo the partial path so no value-less leaf is left behind.
                    if let Some(last) = created {
                        self.arena.prune(last);
                    }
                    return Err(e);
                }
            };
            match slot {
                ChildSlot::Before(c) => self.arena.insert_before(c, id),
                ChildSlot::After(c) => self.arena.insert_after(c, id),
                ChildSlot::Empty | ChildSlot::Found(_) => self.arena.attach_first_child(cur, id),
            }
            if created.is_none() {
                trace_log!(parent = cur.index(), "forking new branch");
            }
            created = Some(id);
            cur = id;
        }
        Ok(cur)
    }

    /// Node of the first element whose key is not less than `key`, and whether
    /// that element's key equals `key`.
    fn lower_bound_node<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> (NodeId, bool) {
        let mut cur = NodeId::ROOT;
        for fragment in key.fragments() {
            match self.arena.find_child(cur, &fragment, &self.comparator) {
                ChildSlot::Found(c) => cur = c,
                // The first greater sibling's subtree holds the answer.
                ChildSlot::Before(c) => return (self.arena.first_value_from(c), false),
                // Everything below `cur` sorts before `key`.
                ChildSlot::After(_) | ChildSlot::Empty => {
                    return (self.arena.skip_subtree(cur), false)
                }
            }
        }
        if self.arena.has_value(cur) {
            (cur, true)
        } else {
            (self.arena.first_value_from(cur), false)
        }
    }

    fn cursor_at(&self, id: NodeId) -> Cursor<'_, K, V, S> {
        Cursor::new(&self.arena, &self.concat, id)
    }

    /// The node behind `pos` if it is a live element.
    fn element(&self, pos: Position) -> Option<NodeId> {
        (self.arena.is_live(pos) && !pos.is_end() && self.arena.has_value(pos.node))
            .then_some(pos.node)
    }

    /// Whether `pos` is the end or a live element.
    fn is_valid(&self, pos: Position) -> bool {
        pos.is_end() || self.element(pos).is_some()
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Insert `value` under `key` unless the key is already present.
    ///
    /// Returns the position of the entry and whether an insertion happened. An
    /// existing value is never overwritten.
    pub fn insert<Q: FragmentSequence<K> + ?Sized>(
        &mut self,
        key: &Q,
        value: V,
    ) -> Result<(Position, bool)> {
        self.try_emplace(key, || value)
    }

    /// Like [`insert`](Self::insert), but only builds the value when the key
    /// is absent.
    pub fn try_emplace<Q, F>(&mut self, key: &Q, make: F) -> Result<(Position, bool)>
    where
        Q: FragmentSequence<K> + ?Sized,
        F: FnOnce() -> V,
    {
        let id = self.try_insert(key)?;
        let pos = self.arena.position(id);
        let slot = self.arena.value_slot(id);
        if slot.is_some() {
            return Ok((pos, false));
        }
        *slot = Some(make());
        self.len += 1;
        Ok((pos, true))
    }

    /// Insert, or overwrite the value of an existing key. The flag is `true`
    /// when a new entry was created.
    pub fn insert_or_assign<Q: FragmentSequence<K> + ?Sized>(
        &mut self,
        key: &Q,
        value: V,
    ) -> Result<(Position, bool)> {
        let id = self.try_insert(key)?;
        let pos = self.arena.position(id);
        let inserted = self.arena.value_slot(id).replace(value).is_none();
        if inserted {
            self.len += 1;
        }
        Ok((pos, inserted))
    }

    /// The value under `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with<Q, F>(&mut self, key: &Q, make: F) -> Result<&mut V>
    where
        Q: FragmentSequence<K> + ?Sized,
        F: FnOnce() -> V,
    {
        let id = self.try_insert(key)?;
        let slot = self.arena.value_slot(id);
        if slot.is_none() {
            self.len += 1;
        }
        Ok(slot.get_or_insert_with(make))
    }

    /// The value under `key`, inserting `V::default()` first if absent.
    pub fn get_or_insert_default<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Result<&mut V>
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Insert every pair; on duplicate keys the first one wins. If any key is
    /// empty nothing is inserted. Returns the number of new entries.
    pub fn insert_many<Q, I>(&mut self, pairs: I) -> Result<usize>
    where
        Q: FragmentSequence<K>,
        I: IntoIterator<Item = (Q, V)>,
    {
        let pairs: Vec<(Q, V)> = pairs.into_iter().collect();
        if pairs.iter().any(|(k, _)| k.fragments().next().is_none()) {
            return Err(TrieError::InvalidKey);
        }

        let mut inserted = 0;
        for (key, value) in pairs {
            if self.insert(&key, value)?.1 {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn get<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Option<&V> {
        self.find_node(key).and_then(|id| self.arena.value(id))
    }

    pub fn get_mut<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Option<&mut V> {
        let id = self.find_node(key)?;
        self.arena.value_mut(id)
    }

    /// The value under `key`; fails with [`TrieError::KeyNotFound`] when absent.
    pub fn at<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Result<&V> {
        if key.fragments().next().is_none() {
            return Err(TrieError::InvalidKey);
        }
        self.get(key).ok_or(TrieError::KeyNotFound)
    }

    pub fn at_mut<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Result<&mut V> {
        if key.fragments().next().is_none() {
            return Err(TrieError::InvalidKey);
        }
        self.get_mut(key).ok_or(TrieError::KeyNotFound)
    }

    pub fn contains<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> bool {
        self.find_node(key).is_some()
    }

    /// `1` if `key` is present, else `0`.
    pub fn count<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> usize {
        usize::from(self.contains(key))
    }

    /// A cursor at `key`, or at the end when absent.
    pub fn find<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, S> {
        self.cursor_at(self.find_node(key).unwrap_or(NodeId::ROOT))
    }

    /// The first element whose key is not less than `key`.
    pub fn lower_bound<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, S> {
        self.cursor_at(self.lower_bound_node(key).0)
    }

    /// The first element whose key is greater than `key`.
    pub fn upper_bound<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, S> {
        let (id, exact) = self.lower_bound_node(key);
        let id = if exact { self.arena.successor(id) } else { id };
        self.cursor_at(id)
    }

    /// `(lower_bound(key), upper_bound(key))`, from a single descent.
    pub fn equal_range<Q: FragmentSequence<K> + ?Sized>(
        &self,
        key: &Q,
    ) -> (Cursor<'_, K, V, S>, Cursor<'_, K, V, S>) {
        let (lower, exact) = self.lower_bound_node(key);
        let upper = if exact { self.arena.successor(lower) } else { lower };
        (self.cursor_at(lower), self.cursor_at(upper))
    }

    /// The element with the longest key that is a prefix of `key` (the key
    /// itself included), or the end if there is none.
    pub fn longest_prefix_of<Q: FragmentSequence<K> + ?Sized>(&self, key: &Q) -> Cursor<'_, K, V, S> {
        let mut cur = NodeId::ROOT;
        let mut best = NodeId::ROOT;
        for fragment in key.fragments() {
            match self.arena.find_child(cur, &fragment, &self.comparator) {
                ChildSlot::Found(c) => cur = c,
                _ => break,
            }
            if self.arena.has_value(cur) {
                best = cur;
            }
        }
        self.cursor_at(best)
    }

    /// Every element whose key starts with `prefix`, in key order.
    pub fn prefix_iter<Q: FragmentSequence<K> + ?Sized>(&self, prefix: &Q) -> Range<'_, K, V, S> {
        let mut cur = NodeId::ROOT;
        for fragment in prefix.fragments() {
            match self.arena.find_child(cur, &fragment, &self.comparator) {
                ChildSlot::Found(c) => cur = c,
                _ => return Range::new(&self.arena, &self.concat, NodeId::ROOT, NodeId::ROOT),
            }
        }
        let front = self.arena.first_value_from(cur);
        let back = if cur.is_root() {
            NodeId::ROOT
        } else {
            self.arena.skip_subtree(cur)
        };
        Range::new(&self.arena, &self.concat, front, back)
    }

    // =========================================================================
    // Heterogeneous lookup
    // =========================================================================
    //
    // A transparent ordering has no general relation to the fragment order, so
    // these scan every element in key order and stop at the first hit.

    fn scan<Q, T>(&self, probe: &Q, cmp: &T, hit: impl Fn(Ordering) -> bool) -> NodeId
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        let mut id = self.arena.first_value_from(NodeId::ROOT);
        while !id.is_root() {
            let key = self.arena.key_of(id, &self.concat);
            if hit(cmp.compare_key(&key, probe)) {
                return id;
            }
            id = self.arena.successor(id);
        }
        NodeId::ROOT
    }

    /// The first element, in key order, that `cmp` considers equal to `probe`.
    pub fn find_with<Q, T>(&self, probe: &Q, cmp: &T) -> Cursor<'_, K, V, S>
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        self.cursor_at(self.scan(probe, cmp, |o| o == Ordering::Equal))
    }

    /// `1` if any element equals `probe` under `cmp`, else `0`; several equal
    /// elements still count once.
    pub fn count_with<Q, T>(&self, probe: &Q, cmp: &T) -> usize
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        usize::from(self.contains_with(probe, cmp))
    }

    pub fn contains_with<Q, T>(&self, probe: &Q, cmp: &T) -> bool
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        !self.scan(probe, cmp, |o| o == Ordering::Equal).is_root()
    }

    /// The first element, in key order, that is not less than `probe` under `cmp`.
    pub fn lower_bound_with<Q, T>(&self, probe: &Q, cmp: &T) -> Cursor<'_, K, V, S>
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        self.cursor_at(self.scan(probe, cmp, |o| o != Ordering::Less))
    }

    /// The first element, in key order, that is greater than `probe` under `cmp`.
    pub fn upper_bound_with<Q, T>(&self, probe: &Q, cmp: &T) -> Cursor<'_, K, V, S>
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        self.cursor_at(self.scan(probe, cmp, |o| o == Ordering::Greater))
    }

    pub fn equal_range_with<Q, T>(
        &self,
        probe: &Q,
        cmp: &T,
    ) -> (Cursor<'_, K, V, S>, Cursor<'_, K, V, S>)
    where
        Q: ?Sized,
        T: TransparentComparator<S::Key, Q> + ?Sized,
    {
        (self.lower_bound_with(probe, cmp), self.upper_bound_with(probe, cmp))
    }

    pub fn find_by<Q: ?Sized>(&self, probe: &Q) -> Cursor<'_, K, V, S>
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.find_with(probe, &self.comparator)
    }

    pub fn count_by<Q: ?Sized>(&self, probe: &Q) -> usize
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.count_with(probe, &self.comparator)
    }

    pub fn contains_by<Q: ?Sized>(&self, probe: &Q) -> bool
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.contains_with(probe, &self.comparator)
    }

    pub fn lower_bound_by<Q: ?Sized>(&self, probe: &Q) -> Cursor<'_, K, V, S>
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.lower_bound_with(probe, &self.comparator)
    }

    pub fn upper_bound_by<Q: ?Sized>(&self, probe: &Q) -> Cursor<'_, K, V, S>
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.upper_bound_with(probe, &self.comparator)
    }

    pub fn equal_range_by<Q: ?Sized>(&self, probe: &Q) -> (Cursor<'_, K, V, S>, Cursor<'_, K, V, S>)
    where
        C: TransparentComparator<S::Key, Q>,
    {
        self.equal_range_with(probe, &self.comparator)
    }

    // =========================================================================
    // Positions and iteration
    // =========================================================================

    /// A cursor at the first element (the end if empty).
    pub fn begin(&self) -> Cursor<'_, K, V, S> {
        self.cursor_at(self.arena.first_value_from(NodeId::ROOT))
    }

    pub fn end(&self) -> Cursor<'_, K, V, S> {
        self.cursor_at(NodeId::ROOT)
    }

    /// A cursor at `pos`, or `None` if the position is stale.
    pub fn cursor(&self, pos: Position) -> Option<Cursor<'_, K, V, S>> {
        self.is_valid(pos).then(|| self.cursor_at(pos.node))
    }

    pub fn value_at_mut(&mut self, pos: Position) -> Option<&mut V> {
        let id = self.element(pos)?;
        self.arena.value_mut(id)
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter::new(&self.arena, &self.concat, self.len)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, S> {
        IterMut::new(&mut self.arena, &self.concat, self.len)
    }

    pub fn keys(&self) -> Keys<'_, K, V, S> {
        Keys::new(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(&self.arena, self.len)
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V, S> {
        ValuesMut::new(self.iter_mut())
    }

    /// Nodes of every element in `[first, last)`, in key order. Fails if either
    /// position is stale or `first` comes after `last`.
    fn span(&self, first: Position, last: Position) -> Result<Vec<NodeId>> {
        if !self.is_valid(first) || !self.is_valid(last) {
            return Err(TrieError::InvalidPosition);
        }

        let mut ids = Vec::new();
        let mut id = first.node;
        while id != last.node {
            if id.is_root() {
                return Err(TrieError::InvalidPosition);
            }
            ids.push(id);
            id = self.arena.successor(id);
        }
        Ok(ids)
    }

    /// Elements in `[first, last)`. Fails with [`TrieError::InvalidPosition`]
    /// if `first` comes after `last`.
    pub fn range(&self, first: Position, last: Position) -> Result<Range<'_, K, V, S>> {
        self.span(first, last)?;
        Ok(Range::new(&self.arena, &self.concat, first.node, last.node))
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Take the value out of `id`, pruning the branch if it became a dead end.
    fn remove_node(&mut self, id: NodeId) -> Option<V> {
        let value = self.arena.value_slot(id).take()?;
        self.len -= 1;
        if self.arena.child(id).is_none() {
            self.arena.prune(id);
        }
        Some(value)
    }

    /// Erase the element at `pos` and return the position of its successor.
    ///
    /// A node that still leads to other keys only loses its value; otherwise
    /// the node and every ancestor that existed only for it are freed.
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        let id = self.element(pos).ok_or(TrieError::InvalidPosition)?;
        let next = self.arena.successor(id);
        self.remove_node(id);
        Ok(self.arena.position(next))
    }

    /// Erase every element in `[first, last)` and return `last`.
    ///
    /// The whole range is checked before anything is removed; a range whose
    /// `first` comes after `last` is rejected.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self)))]
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position> {
        for id in self.span(first, last)? {
            self.remove_node(id);
        }
        Ok(last)
    }

    /// Remove `key` and return its value.
    pub fn remove<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Option<V> {
        let id = self.find_node(key)?;
        self.remove_node(id)
    }

    /// Remove `key` and return the rebuilt key with its value.
    pub fn remove_entry<Q: FragmentSequence<K> + ?Sized>(&mut self, key: &Q) -> Option<(S::Key, V)> {
        let id = self.find_node(key)?;
        let full = self.arena.key_of(id, &self.concat);
        self.remove_node(id).map(|v| (full, v))
    }

    /// Remove every element. Every position except the end becomes stale.
    pub fn clear(&mut self) {
        debug_log!(len = self.len, nodes = self.arena.live_nodes(), "clearing trie");
        self.arena.clear();
        self.len = 0;
    }

    /// Move the contents out, leaving `self` empty with the same strategies.
    pub fn take(&mut self) -> Self
    where
        S: Clone,
        C: Clone,
    {
        let empty = Self::with_comparator(self.concat.clone(), self.comparator.clone());
        std::mem::replace(self, empty)
    }

    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    #[cfg(test)]
    pub(crate) fn validate(&self) {
        assert_eq!(self.arena.validate(&self.comparator), self.len);
    }
}

// =============================================================================
// Trait impls
// =============================================================================

impl<K: Clone, V: Clone, S: Clone, C: Clone> Clone for Trie<K, V, S, C> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena.deep_clone(),
            len: self.len,
            concat: self.concat.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<K, V, S, C> fmt::Debug for Trie<K, V, S, C>
where
    V: fmt::Debug,
    S: Concatenator<K>,
    S::Key: fmt::Debug,
    C: Comparator<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, S, C> PartialEq for Trie<K, V, S, C>
where
    V: PartialEq,
    S: Concatenator<K>,
    S::Key: PartialEq,
    C: Comparator<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<K, V, S, C> Eq for Trie<K, V, S, C>
where
    V: Eq,
    S: Concatenator<K>,
    S::Key: Eq,
    C: Comparator<K>,
{
}

impl<K, V, S, C> PartialOrd for Trie<K, V, S, C>
where
    V: PartialOrd,
    S: Concatenator<K>,
    S::Key: PartialOrd,
    C: Comparator<K>,
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K, V, S, C> Ord for Trie<K, V, S, C>
where
    V: Ord,
    S: Concatenator<K>,
    S::Key: Ord,
    C: Comparator<K>,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<'a, K, V, S: Concatenator<K>, C: Comparator<K>> IntoIterator for &'a Trie<K, V, S, C> {
    type Item = (S::Key, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, S: Concatenator<K>, C: Comparator<K>> IntoIterator for &'a mut Trie<K, V, S, C> {
    type Item = (S::Key, &'a mut V);
    type IntoIter = IterMut<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, S: Concatenator<K>, C: Comparator<K>> IntoIterator for Trie<K, V, S, C> {
    type Item = (S::Key, V);
    type IntoIter = IntoIter<K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena, self.concat, self.len)
    }
}
