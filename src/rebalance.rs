use log::trace;

use crate::{BalanceTree, Key, node::NIL};

/// How far a rebalance pass climbs after an insertion or removal.
///
/// Both policies start at the same seed node: the grandparent of a newly
/// inserted node, or the former parent of a removed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebalancePolicy {
    /// Inspect and correct the seed node only.
    ///
    /// Ancestors above the seed keep their shape, so an imbalance higher up
    /// the tree survives the mutation. Cached heights are still refreshed all
    /// the way to the root.
    ///
    /// The node left in the seed's position is balanced only if the tree was
    /// balanced before the mutation. A seed that already carried an
    /// imbalance from an earlier mutation can stay at a factor of 2 or more:
    /// a single rotation cannot repair a factor of 3, the insert rule may
    /// select a rotation on the light side, and the delete rules skip a
    /// heavy child whose own factor is 2.
    SeedOnly,
    /// Inspect and correct every node from the seed up to the root, which
    /// keeps every balance factor in `[-1, 1]`.
    #[default]
    FullPath,
}

/// The mutation a rebalance pass is reacting to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    /// A node holding this key was just created
    Inserted(Key),
    /// A node was just unlinked
    Removed,
}

impl BalanceTree {
    /// `height(left) - height(right)`, zero for the nil link
    #[inline]
    pub(crate) fn balance_factor(&self, node_idx: usize) -> i32 {
        if node_idx == NIL {
            return 0;
        }
        let node = self.node_at(node_idx);
        self.height_of(node.left) as i32 - self.height_of(node.right) as i32
    }

    /// Runs a rebalance pass starting at `seed`.
    ///
    /// The seed's children must already carry correct heights. On return
    /// every cached height in the tree is exact, whichever policy is active.
    pub(crate) fn rebalance_from(&mut self, seed: usize, trigger: Trigger) {
        let mut node = seed;

        while node != NIL {
            self.recalculate_height(node);
            let subtree_root = self.rebalance_node(node, trigger);
            node = self.get_parent(subtree_root);

            if self.policy == RebalancePolicy::SeedOnly {
                self.update_heights_to_root(node);
                break;
            }
        }
    }

    /// Applies at most one rotation at `node` and returns the root of the
    /// subtree that `node` used to root
    fn rebalance_node(&mut self, node: usize, trigger: Trigger) -> usize {
        let factor = self.balance_factor(node);
        if (-1..=1).contains(&factor) {
            return node;
        }

        trace!(
            "key {} has balance factor {factor} after {trigger:?}",
            self.node_at(node).key
        );

        match trigger {
            Trigger::Inserted(key) => self.rebalance_after_insert(node, factor, key),
            Trigger::Removed => self.rebalance_after_remove(node, factor),
        }
    }

    /// Picks the rotation from which side of the heavy child the new key
    /// landed on
    fn rebalance_after_insert(&mut self, node: usize, factor: i32, key: Key) -> usize {
        if factor < -1 {
            let right_key = self.node_at(self.get_right(node)).key;
            if key > right_key {
                return self.rotate_left(node);
            }
            if key < right_key {
                return self.rotate_right_left(node);
            }
        } else if factor > 1 {
            let left_key = self.node_at(self.get_left(node)).key;
            if key < left_key {
                return self.rotate_right(node);
            }
            if key > left_key {
                return self.rotate_left_right(node);
            }
        }
        node
    }

    /// Picks the rotation from the heavy child's own balance factor
    fn rebalance_after_remove(&mut self, node: usize, factor: i32) -> usize {
        if factor < -1 {
            let right_factor = self.balance_factor(self.get_right(node));
            if right_factor <= 0 {
                return self.rotate_left(node);
            }
            if right_factor == 1 {
                return self.rotate_right_left(node);
            }
        } else if factor > 1 {
            let left_factor = self.balance_factor(self.get_left(node));
            if left_factor == -1 {
                return self.rotate_left_right(node);
            }
            if left_factor >= 0 {
                return self.rotate_right(node);
            }
        }
        node
    }
}
