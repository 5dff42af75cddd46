use core::fmt::{self, Write};
use std::collections::VecDeque;

use crate::{
    BalanceTree,
    node::{Color, NIL},
    utils::helper::{level_range, row_width, slot_count, slot_span, visible_levels},
};

/// Deepest row drawn by the diagnostic renderer.
///
/// Levels below it are summarised in a trailing note, which keeps the grid
/// bounded for skewed trees.
pub const MAX_RENDER_LEVELS: usize = 6;

/// Narrowest cell reserved for one label on the bottom row
const MIN_CELL_WIDTH: usize = 6;

const RULE: &str = "-----------------------------------------------------------------------------";

const EMPTY_PLACEHOLDER: &str = "(empty)";

impl BalanceTree {
    /// Writes the diagnostic diagram to standard output
    ///
    /// See [`BalanceTree::render`] for the layout.
    pub fn print(&self) {
        print!("{self}");
    }

    /// Renders the tree as a text grid.
    ///
    /// The output starts with a rule line. An empty tree renders as
    /// `(empty)`; otherwise each level of the tree becomes one row (rows
    /// separated by a blank line), with every slot of a row twice as wide as
    /// the slots of the row below so each key sits centred over its children.
    /// Keys of red nodes carry an `R` suffix. At most [`MAX_RENDER_LEVELS`]
    /// rows are drawn.
    ///
    /// The format is meant for humans and may change between releases.
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Breadth-first indexing of the top `levels` rows into complete-tree
    /// slots, nil where a slot is empty
    fn index_slots(&self, levels: usize) -> Vec<usize> {
        let mut slots = vec![NIL; slot_count(levels)];
        let mut queue = VecDeque::new();
        if self.root != NIL {
            queue.push_back((self.root, 0));
        }

        while let Some((idx, slot)) = queue.pop_front() {
            slots[slot] = idx;
            let node = self.node_at(idx);
            for (child, child_slot) in [(node.left, 2 * slot + 1), (node.right, 2 * slot + 2)] {
                if child != NIL && child_slot < slots.len() {
                    queue.push_back((child, child_slot));
                }
            }
        }
        slots
    }

    fn slot_label(&self, idx: usize) -> String {
        if idx == NIL {
            return String::new();
        }
        let node = self.node_at(idx);
        match node.color {
            Color::Red => format!("{}R", node.key),
            Color::Black => node.key.to_string(),
        }
    }
}

impl fmt::Display for BalanceTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;

        if self.is_empty() {
            return writeln!(f, "{EMPTY_PLACEHOLDER}");
        }

        let height = self.height() as usize;
        let levels = visible_levels(height, MAX_RENDER_LEVELS);
        let labels: Vec<String> = self
            .index_slots(levels)
            .into_iter()
            .map(|idx| self.slot_label(idx))
            .collect();

        // one column of padding keeps the widest neighbours apart
        let widest = labels.iter().map(String::len).max().unwrap_or(0);
        let width = row_width(levels, (widest + 1).max(MIN_CELL_WIDTH));

        for depth in 0..levels {
            let span = slot_span(width, depth);
            let mut row = String::with_capacity(width);
            for label in &labels[level_range(depth)] {
                write!(row, "{label:^span$}")?;
            }
            writeln!(f, "{}", row.trim_end())?;
            if depth + 1 < levels {
                writeln!(f)?;
            }
        }

        if height > levels {
            writeln!(f, "... {} deeper level(s) not shown", height - levels)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Key, RebalancePolicy};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_empty() {
        let tree = BalanceTree::new();
        assert_eq!(tree.render(), format!("{RULE}\n(empty)\n"));
    }

    #[test]
    fn test_render_single_root() {
        let tree = BalanceTree::from_keys(&[7]);
        assert_eq!(tree.render(), format!("{RULE}\n{:^6}\n", "7").replace("   \n", "\n"));
    }

    #[test]
    fn test_render_three_nodes() {
        let tree = BalanceTree::from_keys(&[10, 20, 30]);
        let rendered = tree.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], RULE);
        assert_eq!(lines[1].trim(), "20R");
        assert_eq!(lines[2], "");
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), vec!["10", "30R"]);

        // the root label sits between its children
        let root_col = lines[1].find("20R").unwrap();
        let left_col = lines[3].find("10").unwrap();
        let right_col = lines[3].find("30R").unwrap();
        assert!(left_col < root_col && root_col < right_col);
    }

    #[test]
    fn test_render_keeps_empty_slots() {
        let mut tree = BalanceTree::with_policy(RebalancePolicy::SeedOnly);
        tree.insert_unbalanced(2);
        tree.insert_unbalanced(1);
        tree.insert_unbalanced(3);
        tree.insert_unbalanced(4);

        let rendered = tree.render();
        let bottom = rendered.lines().last().unwrap();

        assert_eq!(bottom.split_whitespace().collect::<Vec<_>>(), vec!["4R"]);
        // 4 occupies the last of the four bottom slots
        assert!(bottom.find("4R").unwrap() >= 3 * MIN_CELL_WIDTH);
    }

    #[test]
    fn test_render_wide_labels_stay_apart() {
        let tree = BalanceTree::from_keys(&[
            2_000_000, 1_000_000, 3_000_000, 500_000, 1_500_000, 2_500_000, 3_500_000,
        ]);
        let rendered = tree.render();
        let lines: Vec<&str> = rendered.lines().collect();
        let bottom = lines[lines.len() - 1];

        assert_eq!(
            bottom.split_whitespace().collect::<Vec<_>>(),
            vec!["500000R", "1500000R", "2500000R", "3500000R"]
        );
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            vec!["1000000R", "3000000R"]
        );

        let root_col = lines[1].find("2000000").unwrap();
        let left_col = bottom.find("1500000R").unwrap();
        let right_col = bottom.find("2500000R").unwrap();
        assert!(left_col < root_col && root_col < right_col);
    }

    #[test]
    fn test_render_skewed_tree_is_truncated() {
        let mut tree = BalanceTree::with_policy(RebalancePolicy::SeedOnly);
        for key in 0..40 {
            tree.insert_unbalanced(key);
        }

        let rendered = tree.render();
        assert!(rendered.ends_with("... 34 deeper level(s) not shown\n"));
        assert!(rendered.lines().all(|line| line.len() <= row_width(MAX_RENDER_LEVELS, MIN_CELL_WIDTH)));
    }

    #[test]
    fn test_render_every_shape() {
        for n in 0..64 as Key {
            let tree: BalanceTree = (0..n).collect();
            let rendered = tree.render();
            assert!(rendered.starts_with(RULE));
            for key in 0..n.min(7) {
                assert!(rendered.contains(&key.to_string()));
            }
        }
    }

    #[test]
    fn test_print_does_not_panic() {
        BalanceTree::new().print();
        BalanceTree::from_keys(&[3, 1, 2, 5, 4]).print();
    }
}
