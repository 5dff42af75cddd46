use ahash::RandomState;
use hashbrown::HashSet;

use crate::{BalanceTree, InvariantError, Key, node::NIL};

impl BalanceTree {
    /// Audits the structural invariants of the tree
    ///
    /// Checks, with an explicit stack rather than recursion:
    /// - the root has no parent
    /// - every key lies strictly between the bounds set by its ancestors
    /// - every child links back to the node owning it
    /// - no node is reachable twice
    /// - every cached height matches its children
    /// - the recorded length equals the number of reachable nodes
    ///
    /// # Returns
    ///
    /// * `Result<(), InvariantError>` - The first violation found
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.root == NIL {
            return self.check_length(0);
        }

        let root = self.node_at(self.root);
        if root.parent != NIL {
            return Err(InvariantError::RootHasParent { key: root.key });
        }

        let mut visited = HashSet::with_capacity_and_hasher(self.len(), RandomState::new());
        let mut stack: Vec<(usize, Option<Key>, Option<Key>)> = vec![(self.root, None, None)];

        while let Some((idx, lower, upper)) = stack.pop() {
            let node = self.node_at(idx);

            if !visited.insert(idx) {
                return Err(InvariantError::SharedNode { key: node.key });
            }

            if lower.is_some_and(|bound| node.key <= bound)
                || upper.is_some_and(|bound| node.key >= bound)
            {
                return Err(InvariantError::OrderViolation { key: node.key });
            }

            let actual = 1 + self.height_of(node.left).max(self.height_of(node.right));
            if node.height != actual {
                return Err(InvariantError::StaleHeight {
                    key: node.key,
                    cached: node.height,
                    actual,
                });
            }

            for (child, child_lower, child_upper) in [
                (node.left, lower, Some(node.key)),
                (node.right, Some(node.key), upper),
            ] {
                if child == NIL {
                    continue;
                }
                let child_node = self.node_at(child);
                if child_node.parent != idx {
                    return Err(InvariantError::BrokenParentLink {
                        parent: node.key,
                        child: child_node.key,
                    });
                }
                stack.push((child, child_lower, child_upper));
            }
        }

        self.check_length(visited.len())
    }

    /// Audits the structural invariants and requires every balance factor to
    /// lie in `[-1, 1]`
    ///
    /// Always holds under [`crate::RebalancePolicy::FullPath`]; under
    /// [`crate::RebalancePolicy::SeedOnly`] an imbalance above the seed node
    /// may persist and is reported here.
    pub fn validate_balanced(&self) -> Result<(), InvariantError> {
        self.validate()?;

        let mut stack = Vec::with_capacity(self.height() as usize + 1);
        if self.root != NIL {
            stack.push(self.root);
        }

        while let Some(idx) = stack.pop() {
            let factor = self.balance_factor(idx);
            let node = self.node_at(idx);
            if !(-1..=1).contains(&factor) {
                return Err(InvariantError::Unbalanced {
                    key: node.key,
                    factor,
                });
            }
            stack.extend([node.left, node.right].into_iter().filter(|&c| c != NIL));
        }
        Ok(())
    }

    fn check_length(&self, reachable: usize) -> Result<(), InvariantError> {
        if reachable == self.len() {
            Ok(())
        } else {
            Err(InvariantError::LengthMismatch {
                recorded: self.len(),
                reachable,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RebalancePolicy;
    use pretty_assertions::assert_eq;

    fn sample() -> BalanceTree {
        BalanceTree::from_keys(&[50, 25, 75, 12, 37, 62, 87])
    }

    #[test]
    fn test_valid_trees() {
        assert_eq!(BalanceTree::new().validate(), Ok(()));
        assert_eq!(BalanceTree::new().validate_balanced(), Ok(()));
        assert_eq!(sample().validate_balanced(), Ok(()));
    }

    #[test]
    fn test_detects_root_with_parent() {
        let mut tree = sample();
        let root = tree.root;
        tree.node_at_mut(root).parent = tree.index_of(12);
        assert_eq!(
            tree.validate(),
            Err(InvariantError::RootHasParent { key: 50 })
        );
    }

    #[test]
    fn test_detects_order_violation() {
        let mut tree = sample();
        let idx = tree.index_of(37);
        tree.node_at_mut(idx).key = 55;
        assert_eq!(
            tree.validate(),
            Err(InvariantError::OrderViolation { key: 55 })
        );
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut tree = sample();
        let idx = tree.index_of(62);
        tree.node_at_mut(idx).parent = tree.index_of(50);
        assert_eq!(
            tree.validate(),
            Err(InvariantError::BrokenParentLink {
                parent: 75,
                child: 62
            })
        );
    }

    #[test]
    fn test_detects_shared_node() {
        let mut tree = BalanceTree::from_keys(&[2, 1]);
        let root = tree.root;
        let leaf = tree.index_of(1);
        tree.node_at_mut(root).right = leaf;
        let err = tree.validate().unwrap_err();
        assert!(matches!(
            err,
            InvariantError::SharedNode { key: 1 }
                | InvariantError::OrderViolation { key: 1 }
                | InvariantError::BrokenParentLink { .. }
                | InvariantError::StaleHeight { .. }
        ));
    }

    #[test]
    fn test_detects_stale_height() {
        let mut tree = sample();
        let root = tree.root;
        tree.node_at_mut(root).height = 7;
        assert_eq!(
            tree.validate(),
            Err(InvariantError::StaleHeight {
                key: 50,
                cached: 7,
                actual: 3
            })
        );
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut tree = sample();
        let idx = tree.index_of(75);
        tree.node_at_mut(idx).right = NIL;
        tree.node_at_mut(idx).height = 2;
        assert_eq!(
            tree.validate(),
            Err(InvariantError::LengthMismatch {
                recorded: 7,
                reachable: 6
            })
        );
    }

    #[test]
    fn test_detects_imbalance() {
        let mut tree = BalanceTree::with_policy(RebalancePolicy::SeedOnly);
        for key in [1, 2, 3] {
            tree.insert_unbalanced(key);
        }
        assert_eq!(tree.validate(), Ok(()));
        assert_eq!(
            tree.validate_balanced(),
            Err(InvariantError::Unbalanced { key: 1, factor: -2 })
        );
    }

    #[test]
    fn test_error_messages() {
        let err = InvariantError::Unbalanced { key: 4, factor: 2 };
        assert_eq!(err.to_string(), "node 4 has balance factor 2");

        let err = InvariantError::LengthMismatch {
            recorded: 3,
            reachable: 2,
        };
        assert_eq!(
            err.to_string(),
            "tree records 3 nodes but 2 are reachable from the root"
        );
    }
}
