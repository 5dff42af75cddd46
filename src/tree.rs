use log::debug;

use crate::{
    Key, RebalancePolicy,
    node::{Color, NIL, Node, NodeRef},
    rebalance::Trigger,
};

/// A height-balanced binary search tree over unique integer keys.
///
/// Nodes live in a growable arena and refer to each other by index, so the
/// parent back-links never form ownership cycles. Slots vacated by removals
/// are kept on a free list and reused by later insertions.
///
/// Every mutation ends with a rebalance pass seeded at the node closest to
/// the structural change. How far that pass climbs is controlled by the
/// [`RebalancePolicy`].
///
/// Key features:
/// - O(height) insertion, removal and lookup
/// - Cached subtree heights, so balance factors are O(1)
/// - Duplicate keys are rejected, missing keys are ignored on removal
/// - Diagnostic grid rendering via [`BalanceTree::print`]
#[derive(Debug, Clone)]
pub struct BalanceTree {
    /// Arena of nodes, indexed by the links stored in each node
    /// Slots listed in `free_list` hold stale data and are unreachable
    nodes: Vec<Node>,

    /// Stack of vacated arena slots available for reuse
    free_list: Vec<usize>,

    /// Number of live nodes reachable from the root
    len: usize,

    /// Index of the root node in the arena
    /// Equal to nil when tree is empty
    pub(crate) root: usize,

    /// How far rebalancing climbs after a mutation
    pub(crate) policy: RebalancePolicy,
}

impl Default for BalanceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceTree {
    /// Creates an empty tree with the default [`RebalancePolicy`]
    pub fn new() -> Self {
        Self::with_policy(RebalancePolicy::default())
    }

    /// Creates an empty tree using the given rebalancing policy
    ///
    /// # Arguments
    ///
    /// * `policy` - How far the rebalance pass climbs after each mutation
    pub fn with_policy(policy: RebalancePolicy) -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            root: NIL,
            policy,
        }
    }

    /// Creates an empty tree with room for `capacity` nodes before the arena
    /// has to grow
    pub fn with_capacity(capacity: usize) -> Self {
        let mut tree = Self::new();
        tree.nodes.reserve_exact(capacity);
        tree
    }

    /// Builds a tree by calling [`BalanceTree::add`] for each key in order
    ///
    /// # Arguments
    ///
    /// * `keys` - Keys to insert, duplicates are skipped
    pub fn from_keys(keys: &[Key]) -> Self {
        let mut tree = Self::with_capacity(keys.len());
        tree.extend(keys.iter().copied());
        tree
    }

    /// Returns the rebalancing policy
    #[inline]
    pub const fn policy(&self) -> RebalancePolicy {
        self.policy
    }

    /// Sets the rebalancing policy used by subsequent mutations
    ///
    /// Switching policy does not touch the existing shape.
    ///
    /// # Returns
    ///
    /// * `&mut Self` - The tree
    pub const fn set_policy(&mut self, policy: RebalancePolicy) -> &mut Self {
        self.policy = policy;
        self
    }

    /// Returns the number of keys stored in the tree
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the tree holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of nodes the arena can hold without reallocating
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the height of the tree: 0 when empty, 1 for a lone root
    #[inline]
    pub fn height(&self) -> u32 {
        self.height_of(self.root)
    }

    /// Returns the root node, or `None` if the tree is empty
    pub fn root(&self) -> Option<NodeRef<'_>> {
        (self.root != NIL).then_some(NodeRef::new(self, self.root))
    }

    /// Returns the smallest key in the tree
    pub fn min(&self) -> Option<Key> {
        if self.root == NIL {
            return None;
        }
        Some(self.node_at(self.find_minimum(self.root)).key)
    }

    /// Returns the largest key in the tree
    pub fn max(&self) -> Option<Key> {
        if self.root == NIL {
            return None;
        }
        Some(self.node_at(self.find_maximum(self.root)).key)
    }

    /// Removes every key, keeping the arena allocation for reuse
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.len = 0;
        self.root = NIL;
    }

    /// Looks up a key
    ///
    /// # Arguments
    ///
    /// * `key` - The key to search for
    ///
    /// # Returns
    ///
    /// * `Option<NodeRef>` - A handle to the node holding `key`, or `None`
    pub fn find(&self, key: Key) -> Option<NodeRef<'_>> {
        self.find_node(key).map(|idx| NodeRef::new(self, idx))
    }

    /// Returns `true` if `key` is stored in the tree
    #[inline]
    pub fn contains(&self, key: Key) -> bool {
        self.find_node(key).is_some()
    }

    /// Inserts a key and rebalances from the new node's grandparent
    ///
    /// A key that is already present is left alone.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if a node was created, `false` for a duplicate
    pub fn add(&mut self, key: Key) -> bool {
        if self.find_node(key).is_some() {
            debug!("ignoring duplicate key {key}");
            return false;
        }

        let parent_idx = self.find_insertion_parent(key);
        let color = if parent_idx == NIL {
            Color::Black
        } else {
            Color::Red
        };

        let new_idx = self.allocate_node(Node::new(key, parent_idx, color));
        self.link_to_parent(new_idx, parent_idx, key);
        self.len += 1;

        if parent_idx != NIL {
            self.recalculate_height(parent_idx);
            let grandparent = self.node_at(parent_idx).parent;
            self.rebalance_from(grandparent, Trigger::Inserted(key));
        }

        #[cfg(debug_assertions)]
        debug_assert_eq!(
            self.validate(),
            Ok(()),
            "tree invariants violated after inserting {key}"
        );

        true
    }

    /// Removes a key and rebalances from the removed node's former parent
    ///
    /// A node with a right subtree takes over its in-order successor's key,
    /// and the successor (which has no left child) is unlinked instead.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to remove
    ///
    /// # Returns
    ///
    /// * `bool` - `true` if a node was removed, `false` if `key` was absent
    pub fn remove(&mut self, key: Key) -> bool {
        let Some(target) = self.find_node(key) else {
            debug!("key {key} not present, nothing to remove");
            return false;
        };

        let mut node_to_delete = target;
        let right = self.node_at(target).right;
        if right != NIL {
            let successor = self.find_minimum(right);
            let successor_key = self.node_at(successor).key;
            self.node_at_mut(target).key = successor_key;
            node_to_delete = successor;
        }

        let node = self.node_at(node_to_delete);
        let child = if node.left != NIL { node.left } else { node.right };
        let former_parent = node.parent;

        self.transplant(node_to_delete, child);
        self.deallocate_node(node_to_delete);
        self.len -= 1;

        self.rebalance_from(former_parent, Trigger::Removed);

        #[cfg(debug_assertions)]
        debug_assert_eq!(
            self.validate(),
            Ok(()),
            "tree invariants violated after removing {key}"
        );

        true
    }

    fn allocate_node(&mut self, node: Node) -> usize {
        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn deallocate_node(&mut self, node_idx: usize) {
        debug_assert!(node_idx < self.nodes.len());
        self.free_list.push(node_idx);
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node {
        debug_assert!(idx != NIL, "dereferenced the nil link");
        &self.nodes[idx]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, idx: usize) -> &mut Node {
        debug_assert!(idx != NIL, "dereferenced the nil link");
        &mut self.nodes[idx]
    }

    fn link_to_parent(&mut self, node_idx: usize, parent_idx: usize, key: Key) {
        if parent_idx == NIL {
            self.root = node_idx;
        } else if key < self.node_at(parent_idx).key {
            self.node_at_mut(parent_idx).left = node_idx;
        } else {
            self.node_at_mut(parent_idx).right = node_idx;
        }
    }

    fn find_node(&self, key: Key) -> Option<usize> {
        let mut current = self.root;

        while current != NIL {
            let node = self.node_at(current);
            match key.cmp(&node.key) {
                core::cmp::Ordering::Equal => return Some(current),
                core::cmp::Ordering::Less => current = node.left,
                core::cmp::Ordering::Greater => current = node.right,
            }
        }
        None
    }

    fn find_insertion_parent(&self, key: Key) -> usize {
        let mut current = self.root;
        let mut parent = NIL;

        while current != NIL {
            parent = current;
            let node = self.node_at(current);
            current = if key < node.key { node.left } else { node.right };
        }
        parent
    }

    fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.node_at(node).left;
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    fn find_maximum(&self, mut node: usize) -> usize {
        while node != NIL {
            let right = self.node_at(node).right;
            if right == NIL {
                break;
            }
            node = right;
        }
        node
    }

    /// Puts `new_node` where `old_node` hangs from its parent
    fn transplant(&mut self, old_node: usize, new_node: usize) {
        let parent = self.node_at(old_node).parent;

        if parent == NIL {
            self.root = new_node;
        } else if old_node == self.node_at(parent).left {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        if new_node != NIL {
            self.node_at_mut(new_node).parent = parent;
        }
    }

    #[inline]
    pub(crate) fn height_of(&self, node_idx: usize) -> u32 {
        if node_idx == NIL {
            0
        } else {
            self.node_at(node_idx).height
        }
    }

    pub(crate) fn recalculate_height(&mut self, node_idx: usize) {
        if node_idx == NIL {
            return;
        }

        let node = self.node_at(node_idx);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.node_at_mut(node_idx).height = height;
    }

    pub(crate) fn update_heights_to_root(&mut self, mut node: usize) {
        while node != NIL {
            self.recalculate_height(node);
            node = self.node_at(node).parent;
        }
    }

    #[inline]
    pub(crate) fn get_parent(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).parent
        }
    }

    #[inline]
    pub(crate) fn get_left(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).left
        }
    }

    #[inline]
    pub(crate) fn get_right(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).right
        }
    }
}

impl Extend<Key> for BalanceTree {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}

impl FromIterator<Key> for BalanceTree {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
impl BalanceTree {
    /// Keys in ascending order, collected with an explicit stack
    pub(crate) fn in_order_keys(&self) -> Vec<Key> {
        let mut keys = Vec::with_capacity(self.len);
        let mut stack = Vec::new();
        let mut current = self.root;

        while current != NIL || !stack.is_empty() {
            while current != NIL {
                stack.push(current);
                current = self.node_at(current).left;
            }
            if let Some(idx) = stack.pop() {
                keys.push(self.node_at(idx).key);
                current = self.node_at(idx).right;
            }
        }
        keys
    }

    /// Plain search-tree insertion with heights kept current but no rotations,
    /// used to set up exact shapes
    pub(crate) fn insert_unbalanced(&mut self, key: Key) {
        let parent_idx = self.find_insertion_parent(key);
        let color = if parent_idx == NIL {
            Color::Black
        } else {
            Color::Red
        };
        let new_idx = self.allocate_node(Node::new(key, parent_idx, color));
        self.link_to_parent(new_idx, parent_idx, key);
        self.len += 1;
        self.update_heights_to_root(parent_idx);
    }

    pub(crate) fn index_of(&self, key: Key) -> usize {
        self.find_node(key).unwrap_or(NIL)
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.nodes.len()
    }
}
