//! Tree nodes and the handles that address them.

/// Index of a node inside its [`NodeArena`](crate::tree::NodeArena).
///
/// Stored as `u32` to keep the four links of a node compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// The root sentinel. It always exists, never holds a user value, and
    /// doubles as the end position of iteration.
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn from_index(idx: usize) -> Option<Self> {
        u32::try_from(idx).ok().map(Self)
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

/// One key-fragment position in the tree.
///
/// `child` heads a sibling list ordered by fragment; `prev`/`next` link the
/// siblings both ways. The head of a sibling list has `prev == None`.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    /// `None` for the root and for vacant slots.
    pub(crate) fragment: Option<K>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    /// Bumped every time the slot is freed so stale [`Position`]s are detectable.
    pub(crate) generation: u32,
}

impl<K> Node<K> {
    pub(crate) fn root() -> Self {
        Self::with_fragment(None, 0)
    }

    pub(crate) fn with_fragment(fragment: Option<K>, generation: u32) -> Self {
        Self {
            fragment,
            parent: None,
            child: None,
            prev: None,
            next: None,
            generation,
        }
    }

    #[inline]
    pub(crate) fn has_siblings(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }
}

/// A detached handle to an element (or to the end) of a [`Trie`](crate::Trie).
///
/// Positions borrow nothing, so they survive mutation of the trie. Inserting
/// never invalidates a position. Erasing invalidates only positions of the
/// erased element and of nodes pruned with it; every use of a position is
/// checked, and a stale one is reported rather than followed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) node: NodeId,
    pub(crate) generation: u32,
}

impl Position {
    pub(crate) const END: Position = Position {
        node: NodeId::ROOT,
        generation: 0,
    };

    /// Whether this is the end position.
    #[inline]
    pub fn is_end(self) -> bool {
        self.node.is_root()
    }
}
