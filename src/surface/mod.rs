//! Host rendering surface.
//!
//! The editable query line is a small rendering tree owned by a host:
//! - [`Surface`]: the interface the core reads and rebuilds through
//! - [`NodeTree`]: the arena-backed host used by the terminal UI and tests
//! - [`caret`]: conversion between flat character offsets and tree positions
//!
//! Only leaves carry text. The text of every leaf, concatenated in document
//! order, is the flat text the rest of the crate works with.

pub mod caret;
mod tree;

pub use caret::{capture_caret, restore_caret};
pub use tree::{NodeId, NodeKind, NodeTree};

/// A collapsed selection point inside the rendering tree.
///
/// When `node` is a text leaf, `offset` counts characters into the leaf's
/// text. When `node` is an element, `offset` is a child index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret<N> {
    pub node: N,
    pub offset: usize,
}

impl<N> Caret<N> {
    pub const fn new(node: N, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// One top-level node of a detached replacement subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    /// A bare text leaf.
    Text(String),
    /// An inline element carrying `class`, wrapping a single text leaf.
    Styled { class: String, text: String },
}

impl FragmentNode {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Styled { text, .. } => text,
        }
    }
}

/// A detached list of nodes that replaces the children of a parent in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    nodes: Vec<FragmentNode>,
}

impl Fragment {
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a plain text node. Empty text is skipped.
    pub fn push_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.nodes.push(FragmentNode::Text(text.to_string()));
        }
    }

    /// Append a styled inline node wrapping `text`.
    pub fn push_styled(&mut self, class: &str, text: &str) {
        self.nodes.push(FragmentNode::Styled {
            class: class.to_string(),
            text: text.to_string(),
        });
    }

    pub fn nodes(&self) -> &[FragmentNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<FragmentNode> {
        self.nodes
    }

    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Concatenated text of every node, in order.
    pub fn text(&self) -> String {
        self.nodes.iter().map(FragmentNode::text).collect()
    }
}

/// The host-side interface of an editable rendering tree.
///
/// The core only queries the tree, moves the selection and swaps out the
/// children of a node wholesale. Nodes are never edited in place by the core.
pub trait Surface {
    type Node: Copy + Eq + std::fmt::Debug;

    /// The editable root.
    fn root(&self) -> Self::Node;

    /// Children of `node` in document order. Text leaves have none.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Text content when `node` is a text leaf, `None` for elements.
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// The current selection end point, if any.
    fn selection(&self) -> Option<Caret<Self::Node>>;

    /// Replace the whole selection with a single collapsed point.
    fn set_selection(&mut self, caret: Caret<Self::Node>);

    /// Drop every child of `parent` and insert the fragment's nodes instead.
    fn replace_children(&mut self, parent: Self::Node, fragment: Fragment);
}

/// Text leaves under `node` in document (pre-order) order.
pub fn text_leaves<S: Surface + ?Sized>(surface: &S, node: S::Node) -> Vec<S::Node> {
    let mut leaves = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if surface.text(current).is_some() {
            leaves.push(current);
        } else {
            stack.extend(surface.children(current).iter().rev().copied());
        }
    }
    leaves
}

/// The flat text under the surface's root.
pub fn flat_text<S: Surface + ?Sized>(surface: &S) -> String {
    text_leaves(surface, surface.root())
        .into_iter()
        .filter_map(|leaf| surface.text(leaf))
        .collect()
}

/// Length of the flat text under `node`, in characters.
pub fn text_len<S: Surface + ?Sized>(surface: &S, node: S::Node) -> usize {
    text_leaves(surface, node)
        .into_iter()
        .filter_map(|leaf| surface.text(leaf))
        .map(char_len)
        .sum()
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_idx`-th character, or `text.len()` past the end.
pub(crate) fn byte_index(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map_or(text.len(), |(idx, _)| idx)
}
