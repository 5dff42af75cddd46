use log::{trace, warn};

use crate::{BalanceTree, node::NIL};

// A rotation whose required child is missing leaves the tree untouched and
// returns the node it was given.
impl BalanceTree {
    /// Promotes `x.right` into `x`'s position and returns it
    pub(crate) fn rotate_left(&mut self, x: usize) -> usize {
        if x == NIL {
            return NIL;
        }

        let y = self.node_at(x).right;
        if y == NIL {
            warn!("left rotation at key {} skipped: no right child", self.node_at(x).key);
            return x;
        }

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        if y_left != NIL {
            self.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.node_at(x).parent;
        self.node_at_mut(y).parent = x_parent;

        if x_parent == NIL {
            self.root = y;
        } else if x == self.node_at(x_parent).left {
            self.node_at_mut(x_parent).left = y;
        } else {
            self.node_at_mut(x_parent).right = y;
        }

        self.node_at_mut(y).left = x;
        self.node_at_mut(x).parent = y;

        self.recalculate_height(x);
        self.recalculate_height(y);

        trace!(
            "rotated left: {} now above {}",
            self.node_at(y).key,
            self.node_at(x).key
        );
        y
    }

    /// Promotes `y.left` into `y`'s position and returns it
    pub(crate) fn rotate_right(&mut self, y: usize) -> usize {
        if y == NIL {
            return NIL;
        }

        let x = self.node_at(y).left;
        if x == NIL {
            warn!("right rotation at key {} skipped: no left child", self.node_at(y).key);
            return y;
        }

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        if x_right != NIL {
            self.node_at_mut(x_right).parent = y;
        }

        let y_parent = self.node_at(y).parent;
        self.node_at_mut(x).parent = y_parent;

        if y_parent == NIL {
            self.root = x;
        } else if y == self.node_at(y_parent).left {
            self.node_at_mut(y_parent).left = x;
        } else {
            self.node_at_mut(y_parent).right = x;
        }

        self.node_at_mut(x).right = y;
        self.node_at_mut(y).parent = x;

        self.recalculate_height(y);
        self.recalculate_height(x);

        trace!(
            "rotated right: {} now above {}",
            self.node_at(x).key,
            self.node_at(y).key
        );
        x
    }

    /// Rotates `node.left` left, then `node` right, promoting `node.left.right`
    pub(crate) fn rotate_left_right(&mut self, node: usize) -> usize {
        let left = self.get_left(node);
        if left == NIL || self.get_right(left) == NIL {
            if node != NIL {
                warn!(
                    "left-right rotation at key {} skipped: no left-right grandchild",
                    self.node_at(node).key
                );
            }
            return node;
        }

        self.rotate_left(left);
        self.rotate_right(node)
    }

    /// Rotates `node.right` right, then `node` left, promoting `node.right.left`
    pub(crate) fn rotate_right_left(&mut self, node: usize) -> usize {
        let right = self.get_right(node);
        if right == NIL || self.get_left(right) == NIL {
            if node != NIL {
                warn!(
                    "right-left rotation at key {} skipped: no right-left grandchild",
                    self.node_at(node).key
                );
            }
            return node;
        }

        self.rotate_right(right);
        self.rotate_left(node)
    }
}
