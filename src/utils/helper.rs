use core::ops::Range;

/// Returns the number of grid rows to draw for a tree of the given height
///
/// # Arguments
///
/// * `height` - The height of the tree
/// * `max_levels` - The deepest row the grid may show
///
/// # Returns
///
/// * `usize` - `height` clamped to `max_levels`
#[inline]
pub const fn visible_levels(height: usize, max_levels: usize) -> usize {
    if height < max_levels {
        height
    } else {
        max_levels
    }
}

/// Returns the number of slots in a complete binary tree with `levels` rows
#[inline]
pub const fn slot_count(levels: usize) -> usize {
    (1 << levels) - 1
}

/// Returns the slot indices that make up row `depth` of the breadth-first grid
///
/// The root is slot 0 and the children of slot `i` are `2i + 1` and `2i + 2`.
#[inline]
pub const fn level_range(depth: usize) -> Range<usize> {
    slot_count(depth)..slot_count(depth + 1)
}

/// Returns the character width of a row
///
/// # Arguments
///
/// * `levels` - Number of rows drawn, at least 1
/// * `cell_width` - Width reserved for one label on the bottom row
///
/// # Returns
///
/// * `usize` - Width shared by every row
#[inline]
pub const fn row_width(levels: usize, cell_width: usize) -> usize {
    cell_width << (levels - 1)
}

/// Returns the width of one slot on row `depth`, halving with every row
#[inline]
pub const fn slot_span(width: usize, depth: usize) -> usize {
    width >> depth
}
