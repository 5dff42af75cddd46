use crate::{BalanceTree, Key};

/// Sentinel index standing in for an absent link (no parent, no child, empty root)
pub(crate) const NIL: usize = usize::MAX;

/// Two-state tag carried by every node.
///
/// The tag is diagnostic only: balancing is driven by subtree heights and no
/// coloring invariant is maintained. The first node placed into an empty tree
/// is black, every later node is created red, and the renderer marks red
/// nodes with an `R` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Tag given to every node created below the root
    Red,
    /// Tag given to the node that founded the tree
    Black,
}

/// A node in the tree arena.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// The key, unique within the tree
    pub(crate) key: Key,

    /// Diagnostic tag
    pub(crate) color: Color,

    /// Index of parent node in the arena (nil if this is root)
    pub(crate) parent: usize,

    /// Index of left child node in the arena (nil if no left child)
    pub(crate) left: usize,

    /// Index of right child node in the arena (nil if no right child)
    pub(crate) right: usize,

    /// Height of the subtree rooted at this node, a leaf has height 1
    pub(crate) height: u32,
}

impl Node {
    pub(crate) const fn new(key: Key, parent: usize, color: Color) -> Self {
        Self {
            key,
            color,
            parent,
            left: NIL,
            right: NIL,
            height: 1,
        }
    }
}

/// Read-only handle to a node of a [`BalanceTree`].
///
/// Returned by [`BalanceTree::find`] and [`BalanceTree::root`]. The handle
/// borrows the tree, so it can navigate to the parent and children but the
/// tree cannot be mutated while it is alive.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a BalanceTree,
    idx: usize,
}

impl<'a> NodeRef<'a> {
    pub(crate) const fn new(tree: &'a BalanceTree, idx: usize) -> Self {
        Self { tree, idx }
    }

    #[inline]
    fn node(&self) -> &'a Node {
        self.tree.node_at(self.idx)
    }

    fn wrap(&self, idx: usize) -> Option<NodeRef<'a>> {
        (idx != NIL).then_some(NodeRef::new(self.tree, idx))
    }

    /// Returns the key stored in this node
    #[inline]
    pub fn key(&self) -> Key {
        self.node().key
    }

    /// Returns the diagnostic tag of this node
    #[inline]
    pub fn color(&self) -> Color {
        self.node().color
    }

    /// Returns the height of the subtree rooted at this node (a leaf is 1)
    #[inline]
    pub fn height(&self) -> u32 {
        self.node().height
    }

    /// Returns `height(left) - height(right)` for this node
    #[inline]
    pub fn balance_factor(&self) -> i32 {
        self.tree.balance_factor(self.idx)
    }

    /// Returns the parent node, or `None` for the root
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.wrap(self.node().parent)
    }

    /// Returns the left child, if any
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.wrap(self.node().left)
    }

    /// Returns the right child, if any
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.wrap(self.node().right)
    }

    /// Returns `true` if this node has no parent
    pub fn is_root(&self) -> bool {
        self.node().parent == NIL
    }

    /// Returns `true` if this node has no children
    pub fn is_leaf(&self) -> bool {
        let node = self.node();
        node.left == NIL && node.right == NIL
    }
}

impl core::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", &self.key())
            .field("color", &self.color())
            .field("height", &self.height())
            .field("parent", &self.parent().map(|p| p.key()))
            .field("left", &self.left().map(|l| l.key()))
            .field("right", &self.right().map(|r| r.key()))
            .finish()
    }
}
