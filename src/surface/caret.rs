//! Caret position mapping.
//!
//! Converts between a flat character offset into the surface's text and a
//! concrete [`Caret`] inside the rendering tree, in both directions. For
//! every tree shape, `restore_caret(o)` followed by `capture_caret()` yields
//! `o` again as long as `o` is within the text.

use super::{Caret, Surface, char_len, text_leaves, text_len};

/// Read the selection end point as a flat character offset.
///
/// Returns 0 when there is no selection or when the selection lies outside
/// the root. The result never exceeds the flat text length.
pub fn capture_caret<S: Surface + ?Sized>(surface: &S) -> usize {
    let Some(caret) = surface.selection() else {
        return 0;
    };

    let mut before = 0;
    let mut stack = vec![surface.root()];
    while let Some(node) = stack.pop() {
        if node == caret.node {
            let within = match surface.text(node) {
                Some(text) => caret.offset.min(char_len(text)),
                None => surface
                    .children(node)
                    .iter()
                    .take(caret.offset)
                    .map(|&child| text_len(surface, child))
                    .sum(),
            };
            return before + within;
        }
        match surface.text(node) {
            Some(text) => before += char_len(text),
            None => stack.extend(surface.children(node).iter().rev().copied()),
        }
    }

    0
}

/// Collapse the selection onto the flat character `offset`.
///
/// The first text leaf whose cumulative end reaches `offset` receives the
/// caret. Offsets past the end clamp to the end of the last leaf, and a tree
/// without leaves puts the caret on the root at 0. Returns the offset that
/// was actually placed.
pub fn restore_caret<S: Surface + ?Sized>(surface: &mut S, offset: usize) -> usize {
    let root = surface.root();
    let mut before = 0;
    let mut last = None;

    for leaf in text_leaves(&*surface, root) {
        let len = surface.text(leaf).map_or(0, char_len);
        if before + len >= offset {
            surface.set_selection(Caret::new(leaf, offset - before));
            return offset;
        }
        before += len;
        last = Some((leaf, len));
    }

    let caret = match last {
        Some((leaf, len)) => Caret::new(leaf, len),
        None => Caret::new(root, 0),
    };
    surface.set_selection(caret);
    before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{NodeTree, flat_text};

    /// `say "hi" now` split across a plain leaf, a styled element and a plain leaf.
    fn highlighted_tree() -> NodeTree {
        let mut tree = NodeTree::new();
        let root = tree.root();
        tree.append_text(root, "say ");
        let styled = tree.append_element(root, Some("string-literal"));
        tree.append_text(styled, "\"hi\"");
        tree.append_text(root, " now");
        tree
    }

    #[test]
    fn test_capture_without_selection_is_zero() {
        let tree = highlighted_tree();
        assert_eq!(tree.selection(), None);
        assert_eq!(capture_caret(&tree), 0);
    }

    #[test]
    fn test_capture_inside_styled_leaf_counts_preceding_leaves() {
        let mut tree = highlighted_tree();
        let leaves = text_leaves(&tree, tree.root());
        tree.set_selection(Caret::new(leaves[1], 2));
        assert_eq!(capture_caret(&tree), 6);
    }

    #[test]
    fn test_capture_on_element_uses_child_index() {
        let mut tree = highlighted_tree();
        let root = tree.root();
        tree.set_selection(Caret::new(root, 2));
        assert_eq!(capture_caret(&tree), 8);

        tree.set_selection(Caret::new(root, 3));
        assert_eq!(capture_caret(&tree), 12);
    }

    #[test]
    fn test_capture_clamps_in_leaf_offset() {
        let mut tree = highlighted_tree();
        let leaves = text_leaves(&tree, tree.root());
        tree.set_selection(Caret::new(leaves[0], 99));
        assert_eq!(capture_caret(&tree), 4);
    }

    #[test]
    fn test_restore_prefers_earlier_leaf_on_boundary() {
        let mut tree = highlighted_tree();
        let leaves = text_leaves(&tree, tree.root());

        assert_eq!(restore_caret(&mut tree, 4), 4);
        assert_eq!(tree.selection(), Some(Caret::new(leaves[0], 4)));

        assert_eq!(restore_caret(&mut tree, 5), 5);
        assert_eq!(tree.selection(), Some(Caret::new(leaves[1], 1)));
    }

    #[test]
    fn test_restore_clamps_past_the_end() {
        let mut tree = highlighted_tree();
        let len = flat_text(&tree).chars().count();
        let leaves = text_leaves(&tree, tree.root());

        assert_eq!(restore_caret(&mut tree, len + 100), len);
        assert_eq!(tree.selection(), Some(Caret::new(leaves[2], 4)));
        assert_eq!(capture_caret(&tree), len);
    }

    #[test]
    fn test_empty_tree_restores_onto_root() {
        let mut tree = NodeTree::new();
        assert_eq!(capture_caret(&tree), 0);
        assert_eq!(restore_caret(&mut tree, 0), 0);
        assert_eq!(tree.selection(), Some(Caret::new(tree.root(), 0)));
        assert_eq!(capture_caret(&tree), 0);

        assert_eq!(restore_caret(&mut tree, 7), 0);
        assert_eq!(capture_caret(&tree), 0);
    }

    #[test]
    fn test_restore_then_capture_round_trips_every_offset() {
        let mut tree = highlighted_tree();
        let len = flat_text(&tree).chars().count();
        for offset in 0..=len {
            restore_caret(&mut tree, offset);
            assert_eq!(capture_caret(&tree), offset, "offset {offset}");
        }
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let mut tree = NodeTree::new();
        let root = tree.root();
        tree.append_text(root, "né");
        let styled = tree.append_element(root, Some("string-literal"));
        tree.append_text(styled, "'ü'");

        restore_caret(&mut tree, 3);
        let leaves = text_leaves(&tree, root);
        assert_eq!(tree.selection(), Some(Caret::new(leaves[1], 1)));
        assert_eq!(capture_caret(&tree), 3);
    }
}
