use thiserror::Error;

use crate::Key;

/// A broken structural invariant, reported by [`crate::BalanceTree::validate`]
/// and [`crate::BalanceTree::validate_balanced`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// The root node points at a parent
    #[error("root node {key} has a parent link")]
    RootHasParent {
        /// Key of the root
        key: Key,
    },

    /// A key falls outside the bounds set by its ancestors
    #[error("key {key} is out of search-tree order")]
    OrderViolation {
        /// Key of the misplaced node
        key: Key,
    },

    /// A child's parent link does not lead back to the node owning it
    #[error("node {child} does not point back to its parent {parent}")]
    BrokenParentLink {
        /// Key of the node holding the child link
        parent: Key,
        /// Key of the child
        child: Key,
    },

    /// The same node is reachable along two paths
    #[error("node {key} is reachable more than once")]
    SharedNode {
        /// Key of the node reached twice
        key: Key,
    },

    /// A cached subtree height disagrees with the children's heights
    #[error("node {key} caches height {cached} but its subtree has height {actual}")]
    StaleHeight {
        /// Key of the node
        key: Key,
        /// Height stored in the node
        cached: u32,
        /// Height derived from the children
        actual: u32,
    },

    /// A balance factor lies outside `[-1, 1]`
    #[error("node {key} has balance factor {factor}")]
    Unbalanced {
        /// Key of the node
        key: Key,
        /// `height(left) - height(right)`
        factor: i32,
    },

    /// The node count does not match the nodes reachable from the root
    #[error("tree records {recorded} nodes but {reachable} are reachable from the root")]
    LengthMismatch {
        /// Count kept by the tree
        recorded: usize,
        /// Nodes found by traversal
        reachable: usize,
    },
}
