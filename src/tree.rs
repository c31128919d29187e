//! Node arena and the linkage algebra over it.
//!
//! Every node lives in one `Vec` slot addressed by [`NodeId`]; parent, child
//! and sibling relationships are stored as indices. Values live in a parallel
//! `Vec<Option<V>>` so structure and values can be borrowed independently.
//! Freed slots go on a free list and are reused by later insertions.

use std::cmp::Ordering;

use smallvec::SmallVec;

use crate::error::{Result, TrieError};
use crate::log::trace_log;
use crate::node::{Node, NodeId, Position};
use crate::strategy::{Comparator, Concatenator};

/// Root-to-node paths up to this depth are assembled without allocating.
const INLINE_DEPTH: usize = 32;

/// Where a fragment sits among the children of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ChildSlot {
    /// A child with an equal fragment exists.
    Found(NodeId),
    /// No equal child; the new one belongs right before this child.
    Before(NodeId),
    /// No equal child; every child is smaller, the new one goes after this last child.
    After(NodeId),
    /// The node has no children.
    Empty,
}

/// Rebuild the full key of `id` from the node slots alone, so callers holding
/// the values mutably can still produce keys.
pub(crate) fn reconstruct_key<K, S: Concatenator<K>>(
    nodes: &[Node<K>],
    id: NodeId,
    concat: &S,
) -> S::Key {
    let mut path: SmallVec<[NodeId; INLINE_DEPTH]> = SmallVec::new();
    let mut cur = Some(id);
    while let Some(c) = cur {
        if c.is_root() {
            break;
        }
        path.push(c);
        cur = nodes[c.index()].parent;
    }

    let mut key = concat.empty();
    for &c in path.iter().rev() {
        if let Some(f) = nodes[c.index()].fragment.as_ref() {
            concat.concat(&mut key, f);
        }
    }
    key
}

#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    pub(crate) nodes: Vec<Node<K>>,
    pub(crate) values: Vec<Option<V>>,
    free: Vec<NodeId>,
    /// Slots whose generation is exhausted. They stay vacant until `compact`.
    retired: usize,
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        let mut values = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::root());
        values.push(None);
        Self {
            nodes,
            values,
            free: Vec::new(),
            retired: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn fragment(&self, id: NodeId) -> Option<&K> {
        self.node(id).fragment.as_ref()
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).child
    }

    #[inline]
    pub(crate) fn has_value(&self, id: NodeId) -> bool {
        self.values[id.index()].is_some()
    }

    #[inline]
    pub(crate) fn value(&self, id: NodeId) -> Option<&V> {
        self.values[id.index()].as_ref()
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.values[id.index()].as_mut()
    }

    #[inline]
    pub(crate) fn value_slot(&mut self, id: NodeId) -> &mut Option<V> {
        &mut self.values[id.index()]
    }

    /// Node structure for reading alongside mutable access to every value.
    pub(crate) fn split_mut(&mut self) -> (&[Node<K>], &mut [Option<V>]) {
        (&self.nodes, &mut self.values)
    }

    /// Number of nodes in use, root included.
    #[inline]
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len() - self.retired
    }

    pub(crate) fn position(&self, id: NodeId) -> Position {
        Position {
            node: id,
            generation: self.node(id).generation,
        }
    }

    /// Whether `pos` still names the node it was taken from.
    pub(crate) fn is_live(&self, pos: Position) -> bool {
        if pos.node.is_root() {
            return true;
        }
        self.nodes
            .get(pos.node.index())
            .is_some_and(|n| n.generation == pos.generation && n.fragment.is_some())
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node<K>>()
            + self.values.capacity() * std::mem::size_of::<Option<V>>()
            + self.free.capacity() * std::mem::size_of::<NodeId>()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
        self.values.shrink_to_fit();
        self.free.shrink_to_fit();
    }

    // =========================================================================
    // Allocation
    // =========================================================================

    pub(crate) fn alloc(&mut self, fragment: K) -> Result<NodeId> {
        if let Some(id) = self.free.pop() {
            let generation = self.node(id).generation;
            self.nodes[id.index()] = Node::with_fragment(Some(fragment), generation);
            return Ok(id);
        }
        let id = NodeId::from_index(self.nodes.len())
            .ok_or(TrieError::CapacityExceeded(self.nodes.len()))?;
        self.nodes.push(Node::with_fragment(Some(fragment), 0));
        self.values.push(None);
        Ok(id)
    }

    /// Release one detached slot.
    ///
    /// A slot whose generation cannot be bumped again is retired instead of
    /// reused, so no stale position can ever match it.
    fn free_node(&mut self, id: NodeId) {
        debug_assert!(!id.is_root());
        let current = self.node(id).generation;
        self.values[id.index()] = None;
        match current.checked_add(1) {
            Some(generation) => {
                self.nodes[id.index()] = Node::with_fragment(None, generation);
                self.free.push(id);
            }
            None => {
                self.nodes[id.index()] = Node::with_fragment(None, current);
                self.retired += 1;
            }
        }
    }

    /// Release `top` and everything below it. `top` must already be detached.
    fn free_subtree(&mut self, top: NodeId) -> usize {
        let mut stack = vec![top];
        let mut freed = 0;
        while let Some(id) = stack.pop() {
            let mut c = self.child(id);
            while let Some(ci) = c {
                c = self.node(ci).next;
                stack.push(ci);
            }
            self.free_node(id);
            freed += 1;
        }
        freed
    }

    /// Drop every node but the root. Positions taken before become stale.
    pub(crate) fn clear(&mut self) {
        let root_child = self.child(NodeId::ROOT);
        self.node_mut(NodeId::ROOT).child = None;
        if let Some(first) = root_child {
            let mut c = Some(first);
            while let Some(ci) = c {
                c = self.node(ci).next;
                self.free_subtree(ci);
            }
        }
    }

    // =========================================================================
    // Linkage
    // =========================================================================

    pub(crate) fn attach_first_child(&mut self, parent: NodeId, new: NodeId) {
        debug_assert!(self.child(parent).is_none());
        let n = self.node_mut(new);
        n.parent = Some(parent);
        n.prev = None;
        n.next = None;
        self.node_mut(parent).child = Some(new);
    }

    pub(crate) fn insert_after(&mut self, node: NodeId, new: NodeId) {
        let (parent, next) = {
            let n = self.node(node);
            (n.parent, n.next)
        };
        {
            let n = self.node_mut(new);
            n.parent = parent;
            n.prev = Some(node);
            n.next = next;
        }
        if let Some(next) = next {
            self.node_mut(next).prev = Some(new);
        }
        self.node_mut(node).next = Some(new);
    }

    pub(crate) fn insert_before(&mut self, node: NodeId, new: NodeId) {
        let (parent, prev) = {
            let n = self.node(node);
            (n.parent, n.prev)
        };
        {
            let n = self.node_mut(new);
            n.parent = parent;
            n.prev = prev;
            n.next = Some(node);
        }
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(new),
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).child = Some(new);
                }
            }
        }
        self.node_mut(node).prev = Some(new);
    }

    /// Unlink `id` from its parent and siblings. Its own subtree stays attached to it.
    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let n = self.node(id);
            (n.parent, n.prev, n.next)
        };
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => {
                if let Some(parent) = parent {
                    self.node_mut(parent).child = next;
                }
            }
        }
        if let Some(next) = next {
            self.node_mut(next).prev = prev;
        }
        let n = self.node_mut(id);
        n.parent = None;
        n.prev = None;
        n.next = None;
    }

    /// Remove the dead-end chain ending at `node`, which must hold no value
    /// and have no children.
    ///
    /// Walks up past every ancestor that is value-less and has no other child,
    /// detaches the highest such node and frees the chain below it. Returns the
    /// number of nodes freed.
    pub(crate) fn prune(&mut self, node: NodeId) -> usize {
        debug_assert!(!node.is_root());
        debug_assert!(!self.has_value(node) && self.child(node).is_none());

        let mut top = node;
        while !self.node(top).has_siblings() {
            let Some(parent) = self.node(top).parent else {
                break;
            };
            if parent.is_root() || self.has_value(parent) {
                break;
            }
            top = parent;
        }

        self.detach(top);
        let freed = self.free_subtree(top);
        trace_log!(freed, top = top.index(), "pruned dead branch");
        freed
    }

    /// Locate `fragment` among the children of `parent`. Children are sorted,
    /// so the scan stops at the first child not less than `fragment`.
    pub(crate) fn find_child<C: Comparator<K>>(
        &self,
        parent: NodeId,
        fragment: &K,
        cmp: &C,
    ) -> ChildSlot {
        let mut cur = self.child(parent);
        let mut last = None;
        while let Some(c) = cur {
            let Some(f) = self.fragment(c) else {
                break;
            };
            match cmp.compare(f, fragment) {
                Ordering::Less => {
                    last = Some(c);
                    cur = self.node(c).next;
                }
                Ordering::Equal => return ChildSlot::Found(c),
                Ordering::Greater => return ChildSlot::Before(c),
            }
        }
        match last {
            Some(last) => ChildSlot::After(last),
            None => ChildSlot::Empty,
        }
    }

    // =========================================================================
    // Traversal
    // =========================================================================

    /// First value-bearing node at or below `id` in key order, or the root if
    /// `id` is a value-less node with nothing below it (only the empty root).
    pub(crate) fn first_value_from(&self, mut id: NodeId) -> NodeId {
        loop {
            if self.has_value(id) {
                return id;
            }
            match self.child(id) {
                Some(c) => id = c,
                None => return NodeId::ROOT,
            }
        }
    }

    /// Last node of the subtree at `id` in key order: its rightmost leaf.
    pub(crate) fn rightmost_from(&self, mut id: NodeId) -> NodeId {
        while let Some(mut c) = self.child(id) {
            while let Some(n) = self.node(c).next {
                c = n;
            }
            id = c;
        }
        id
    }

    /// First element after the whole subtree of `id`.
    pub(crate) fn skip_subtree(&self, mut id: NodeId) -> NodeId {
        loop {
            let n = self.node(id);
            if let Some(next) = n.next {
                return self.first_value_from(next);
            }
            match n.parent {
                Some(parent) => id = parent,
                None => return NodeId::ROOT,
            }
        }
    }

    /// Next element in key order. From the root this is the first element;
    /// from the last element it is the root.
    pub(crate) fn successor(&self, id: NodeId) -> NodeId {
        match self.child(id) {
            Some(c) => self.first_value_from(c),
            None => self.skip_subtree(id),
        }
    }

    /// Previous element in key order. From the root this is the last element;
    /// from the first element it is the root.
    pub(crate) fn predecessor(&self, mut id: NodeId) -> NodeId {
        if id.is_root() {
            return self.rightmost_from(id);
        }
        loop {
            let n = self.node(id);
            if let Some(prev) = n.prev {
                return self.rightmost_from(prev);
            }
            match n.parent {
                Some(parent) if !parent.is_root() => {
                    if self.has_value(parent) {
                        return parent;
                    }
                    id = parent;
                }
                _ => return NodeId::ROOT,
            }
        }
    }

    /// Rebuild the full key of `id` by concatenating fragments root to node.
    pub(crate) fn key_of<S: Concatenator<K>>(&self, id: NodeId, concat: &S) -> S::Key {
        reconstruct_key(&self.nodes, id, concat)
    }

    // =========================================================================
    // Copy / compaction
    // =========================================================================

    /// Every live non-root node paired with its parent. Parents precede their
    /// children and each sibling list appears contiguously and in order.
    fn layout(&self) -> Vec<(NodeId, NodeId)> {
        let mut out = Vec::with_capacity(self.live_nodes().saturating_sub(1));
        let mut stack = vec![NodeId::ROOT];
        while let Some(parent) = stack.pop() {
            let mut c = self.child(parent);
            while let Some(ci) = c {
                out.push((ci, parent));
                stack.push(ci);
                c = self.node(ci).next;
            }
        }
        out
    }

    /// Build a dense arena with the shape described by `layout`, pulling each
    /// node's fragment and value out of `take`.
    fn rebuild(
        layout: &[(NodeId, NodeId)],
        slots: usize,
        generation: u32,
        mut take: impl FnMut(NodeId) -> (Option<K>, Option<V>),
    ) -> Self {
        let mut arena = Self::with_capacity(layout.len() + 1);
        let mut map: Vec<Option<NodeId>> = vec![None; slots];
        map[NodeId::ROOT.index()] = Some(NodeId::ROOT);

        let mut prev: Option<(NodeId, NodeId)> = None;
        for &(old, old_parent) in layout {
            let (fragment, value) = take(old);
            // Dense ids always fit: the source arena addressed at least as many.
            let id = NodeId::from_index(arena.nodes.len()).unwrap_or(NodeId::ROOT);
            arena.nodes.push(Node::with_fragment(fragment, generation));
            arena.values.push(value);
            map[old.index()] = Some(id);

            match prev {
                Some((prev_parent, prev_new)) if prev_parent == old_parent => {
                    arena.insert_after(prev_new, id);
                }
                _ => {
                    let parent = map[old_parent.index()].unwrap_or(NodeId::ROOT);
                    arena.attach_first_child(parent, id);
                }
            }
            prev = Some((old_parent, id));
        }
        arena
    }

    /// Rewrite live nodes into a fresh dense arena, dropping free slots.
    /// Returns the number of nodes rewritten.
    pub(crate) fn compact(&mut self) -> usize {
        let layout = self.layout();
        let slots = self.nodes.len();
        let generation = self
            .nodes
            .iter()
            .map(|n| n.generation)
            .max()
            .unwrap_or(0)
            .wrapping_add(1);

        let mut old = std::mem::replace(self, Self::with_capacity(0));
        *self = Self::rebuild(&layout, slots, generation, |id| {
            (
                old.nodes[id.index()].fragment.take(),
                old.values[id.index()].take(),
            )
        });
        layout.len()
    }

    /// Deep copy through an explicit worklist, so very deep tries cannot
    /// overflow the stack. The copy is compacted.
    pub(crate) fn deep_clone(&self) -> Self
    where
        K: Clone,
        V: Clone,
    {
        let layout = self.layout();
        Self::rebuild(&layout, self.nodes.len(), 0, |id| {
            (
                self.nodes[id.index()].fragment.clone(),
                self.values[id.index()].clone(),
            )
        })
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every structural invariant; returns the number of values found.
    #[cfg(test)]
    pub(crate) fn validate<C: Comparator<K>>(&self, cmp: &C) -> usize {
        let root = self.node(NodeId::ROOT);
        assert!(root.parent.is_none(), "root must have no parent");
        assert!(!root.has_siblings(), "root must have no siblings");
        assert!(root.fragment.is_none(), "root must have no fragment");
        assert!(!self.has_value(NodeId::ROOT), "root must hold no value");

        let mut values = 0usize;
        let mut visited = 0usize;
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            visited += 1;
            let n = self.node(id);
            if !id.is_root() {
                assert!(n.fragment.is_some(), "live node without fragment");
                if n.child.is_none() {
                    assert!(self.has_value(id), "leaf must hold a value");
                }
                if self.has_value(id) {
                    values += 1;
                }
            }

            let mut prev: Option<NodeId> = None;
            let mut c = n.child;
            while let Some(ci) = c {
                let cn = self.node(ci);
                assert_eq!(cn.parent, Some(id), "child parent link broken");
                assert_eq!(cn.prev, prev, "sibling prev link broken");
                if let (Some(p), Some(pf), Some(cf)) =
                    (prev, prev.and_then(|p| self.fragment(p)), cn.fragment.as_ref())
                {
                    assert_eq!(
                        cmp.compare(pf, cf),
                        Ordering::Less,
                        "siblings out of order after {}",
                        p.index()
                    );
                }
                stack.push(ci);
                prev = Some(ci);
                c = cn.next;
            }
        }

        assert_eq!(visited, self.live_nodes(), "unreachable live nodes");
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Natural, StringConcat};

    /// Insert a key by hand through the linkage algebra.
    fn put(arena: &mut NodeArena<char, i32>, key: &str, value: i32) -> NodeId {
        let mut cur = NodeId::ROOT;
        for ch in key.chars() {
            cur = match arena.find_child(cur, &ch, &Natural) {
                ChildSlot::Found(c) => c,
                ChildSlot::Before(c) => {
                    let id = arena.alloc(ch).unwrap();
                    arena.insert_before(c, id);
                    id
                }
                ChildSlot::After(c) => {
                    let id = arena.alloc(ch).unwrap();
                    arena.insert_after(c, id);
                    id
                }
                ChildSlot::Empty => {
                    let id = arena.alloc(ch).unwrap();
                    arena.attach_first_child(cur, id);
                    id
                }
            };
        }
        *arena.value_slot(cur) = Some(value);
        cur
    }

    fn keys(arena: &NodeArena<char, i32>) -> Vec<String> {
        let mut out = Vec::new();
        let mut cur = arena.successor(NodeId::ROOT);
        while !cur.is_root() {
            out.push(arena.key_of(cur, &StringConcat));
            cur = arena.successor(cur);
        }
        out
    }

    #[test]
    fn test_shared_prefix_single_path() {
        let mut a = NodeArena::with_capacity(0);
        put(&mut a, "gsd", 42);
        put(&mut a, "gs", -24);
        // root + g + s + d
        assert_eq!(a.live_nodes(), 4);
        assert_eq!(a.validate(&Natural), 2);
        assert_eq!(keys(&a), vec!["gs", "gsd"]);
    }

    #[test]
    fn test_siblings_sorted() {
        let mut a = NodeArena::with_capacity(0);
        for k in ["m", "c", "x", "a", "d"] {
            put(&mut a, k, 0);
        }
        a.validate(&Natural);
        assert_eq!(keys(&a), vec!["a", "c", "d", "m", "x"]);
    }

    #[test]
    fn test_predecessor_walk() {
        let mut a = NodeArena::with_capacity(0);
        for k in ["abc", "abcd", "abcde", "bcd", "bcde", "hgasha"] {
            put(&mut a, k, 1);
        }
        let mut out = Vec::new();
        let mut cur = a.predecessor(NodeId::ROOT);
        while !cur.is_root() {
            out.push(a.key_of(cur, &StringConcat));
            cur = a.predecessor(cur);
        }
        assert_eq!(out, vec!["hgasha", "bcde", "bcd", "abcde", "abcd", "abc"]);
    }

    #[test]
    fn test_prune_removes_dead_chain() {
        let mut a = NodeArena::with_capacity(0);
        put(&mut a, "ab", 1);
        let leaf = put(&mut a, "abxyz", 2);
        assert_eq!(a.live_nodes(), 6);

        *a.value_slot(leaf) = None;
        // x, y, z go; a and b stay because b holds a value.
        assert_eq!(a.prune(leaf), 3);
        assert_eq!(a.live_nodes(), 3);
        assert_eq!(a.validate(&Natural), 1);
    }

    #[test]
    fn test_prune_stops_at_branch() {
        let mut a = NodeArena::with_capacity(0);
        put(&mut a, "abc", 1);
        let leaf = put(&mut a, "abd", 2);
        *a.value_slot(leaf) = None;
        assert_eq!(a.prune(leaf), 1);
        assert_eq!(keys(&a), vec!["abc"]);
        a.validate(&Natural);
    }

    #[test]
    fn test_prune_to_root() {
        let mut a = NodeArena::with_capacity(0);
        let leaf = put(&mut a, "xyz", 1);
        *a.value_slot(leaf) = None;
        assert_eq!(a.prune(leaf), 3);
        assert_eq!(a.live_nodes(), 1);
        assert!(a.child(NodeId::ROOT).is_none());
    }

    #[test]
    fn test_freed_slots_reused_with_new_generation() {
        let mut a = NodeArena::with_capacity(0);
        let leaf = put(&mut a, "q", 1);
        let pos = a.position(leaf);
        *a.value_slot(leaf) = None;
        a.prune(leaf);
        assert!(!a.is_live(pos));

        let again = put(&mut a, "r", 2);
        assert_eq!(again, leaf);
        assert!(!a.is_live(pos));
        assert!(a.is_live(a.position(again)));
    }

    #[test]
    fn test_exhausted_generation_retires_slot() {
        let mut a = NodeArena::with_capacity(0);
        let leaf = put(&mut a, "q", 1);
        a.nodes[leaf.index()].generation = u32::MAX;
        let pos = a.position(leaf);
        *a.value_slot(leaf) = None;
        a.prune(leaf);
        assert!(!a.is_live(pos));
        assert_eq!(a.live_nodes(), 1);

        // The retired slot is never handed out again.
        let fresh = put(&mut a, "q", 2);
        assert_ne!(fresh, leaf);
        assert!(!a.is_live(pos));
        assert_eq!(a.live_nodes(), 2);
        a.validate(&Natural);

        // Compaction drops the retired slot.
        a.compact();
        assert_eq!(a.nodes.len(), a.live_nodes());
        assert!(!a.is_live(pos));
        a.validate(&Natural);
    }

    #[test]
    fn test_deep_clone_and_compact() {
        let mut a = NodeArena::with_capacity(0);
        for k in ["key1", "key", "fajsjk", "hjazuwa", "zz"] {
            put(&mut a, k, 7);
        }
        let zz = put(&mut a, "zz", 7);
        *a.value_slot(zz) = None;
        a.prune(zz);

        let b = a.deep_clone();
        assert_eq!(keys(&b), keys(&a));
        assert_eq!(b.nodes.len(), b.live_nodes());
        b.validate(&Natural);

        let before = keys(&a);
        let rewritten = a.compact();
        assert_eq!(rewritten, a.live_nodes() - 1);
        assert_eq!(keys(&a), before);
        a.validate(&Natural);
    }

    #[test]
    fn test_deep_clone_very_deep() {
        let mut a = NodeArena::with_capacity(0);
        let key: String = std::iter::repeat('a').take(100_000).collect();
        put(&mut a, &key, 1);
        let b = a.deep_clone();
        assert_eq!(b.live_nodes(), 100_001);
        assert_eq!(b.validate(&Natural), 1);
    }
}
