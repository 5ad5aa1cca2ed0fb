use super::{
    Caret, Fragment, FragmentNode, Surface, byte_index, capture_caret, char_len, restore_caret,
    text_leaves,
};

/// Handle to a node in a [`NodeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An inline container, optionally tagged with a style class.
    Element { class: Option<String> },
    /// A text-bearing leaf.
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// Arena-backed rendering tree with a single collapsed selection.
///
/// This is the host side of the query line: it owns the nodes and the
/// selection, and applies the raw edits (typing, deleting, caret motion)
/// that precede an edit notification. Slots of removed subtrees are
/// recycled, so `NodeId`s are only stable while their node is attached.
#[derive(Debug, Clone)]
pub struct NodeTree {
    slots: Vec<Option<NodeData>>,
    free: Vec<NodeId>,
    root: NodeId,
    selection: Option<Caret<NodeId>>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// Create a tree holding only an empty, unstyled root element.
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element { class: None },
            children: Vec::new(),
        };
        Self {
            slots: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
            selection: None,
        }
    }

    /// Create a tree whose root holds `text` as a single leaf, caret at the end.
    pub fn with_text(text: &str) -> Self {
        let mut tree = Self::new();
        if !text.is_empty() {
            let root = tree.root;
            let leaf = tree.append_text(root, text);
            tree.selection = Some(Caret::new(leaf, char_len(text)));
        }
        tree
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.data(node).map(|data| &data.kind)
    }

    /// Style class of an element node.
    pub fn class(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Element { class } => class.as_deref(),
            NodeKind::Text(_) => None,
        }
    }

    /// Append a text leaf as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.alloc(NodeKind::Text(text.to_string()));
        self.attach(parent, id, None);
        id
    }

    /// Append an element as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, class: Option<&str>) -> NodeId {
        let id = self.alloc(NodeKind::Element {
            class: class.map(ToOwned::to_owned),
        });
        self.attach(parent, id, None);
        id
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Insert `text` at the caret and move the caret past it.
    ///
    /// Returns `false` when `text` is empty and nothing changed.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let inserted = char_len(text);
        let caret = self.selection.unwrap_or(Caret::new(self.root, 0));

        if let Some(NodeData {
            kind: NodeKind::Text(existing),
            ..
        }) = self.data_mut(caret.node)
        {
            let offset = caret.offset.min(char_len(existing));
            let at = byte_index(existing, offset);
            existing.insert_str(at, text);
            self.selection = Some(Caret::new(caret.node, offset + inserted));
            return true;
        }

        // Caret sits between children of an element: give the text its own leaf.
        let Some(parent) = self.data(caret.node).map(|_| caret.node) else {
            return false;
        };
        let leaf = self.alloc(NodeKind::Text(text.to_string()));
        self.attach(parent, leaf, Some(caret.offset));
        self.selection = Some(Caret::new(leaf, inserted));
        true
    }

    /// Delete the character before the caret (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_backward(&mut self) -> bool {
        let offset = capture_caret(&*self);
        if offset == 0 {
            return false;
        }
        self.remove_char_at(offset - 1)
    }

    /// Delete the character at the caret (Delete).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let offset = capture_caret(&*self);
        self.remove_char_at(offset)
    }

    /// Move the caret by `delta` characters, clamped to the text.
    pub fn move_caret(&mut self, delta: isize) {
        let offset = capture_caret(&*self).saturating_add_signed(delta);
        restore_caret(self, offset);
    }

    pub fn move_caret_to_start(&mut self) {
        restore_caret(self, 0);
    }

    pub fn move_caret_to_end(&mut self) {
        restore_caret(self, usize::MAX);
    }

    /// Remove every node under the root.
    ///
    /// Returns `true` if there was anything to remove.
    pub fn clear(&mut self) -> bool {
        let root = self.root;
        let had_children = !self.children(root).is_empty();
        self.replace_children(root, Fragment::new());
        self.selection = Some(Caret::new(root, 0));
        had_children
    }

    /// Remove the character at flat offset `target`, leaving the caret there.
    fn remove_char_at(&mut self, target: usize) -> bool {
        let mut before = 0;
        for leaf in text_leaves(&*self, self.root) {
            let Some(NodeData {
                kind: NodeKind::Text(text),
                ..
            }) = self.data_mut(leaf)
            else {
                continue;
            };
            let len = char_len(text);
            if target < before + len {
                let local = target - before;
                let start = byte_index(text, local);
                let end = byte_index(text, local + 1);
                text.replace_range(start..end, "");
                self.selection = Some(Caret::new(leaf, local));
                return true;
            }
            before += len;
        }
        false
    }

    fn data(&self, node: NodeId) -> Option<&NodeData> {
        self.slots.get(node.0).and_then(Option::as_ref)
    }

    fn data_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(node.0).and_then(Option::as_mut)
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let data = NodeData {
            kind,
            children: Vec::new(),
        };
        if let Some(id) = self.free.pop() {
            self.slots[id.0] = Some(data);
            id
        } else {
            self.slots.push(Some(data));
            NodeId(self.slots.len() - 1)
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        if let Some(data) = self.data_mut(parent) {
            let at = index.map_or(data.children.len(), |i| i.min(data.children.len()));
            data.children.insert(at, child);
        }
    }

    fn release_subtree(&mut self, node: NodeId) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.slots.get_mut(current.0).and_then(Option::take) {
                stack.extend(data.children);
                self.free.push(current);
            }
        }
    }
}

impl Surface for NodeTree {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.data(node).map_or(&[], |data| data.children.as_slice())
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.data(node)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    fn selection(&self) -> Option<Caret<NodeId>> {
        self.selection
    }

    fn set_selection(&mut self, caret: Caret<NodeId>) {
        self.selection = Some(caret);
    }

    fn replace_children(&mut self, parent: NodeId, fragment: Fragment) {
        let Some(data) = self.data_mut(parent) else {
            return;
        };
        let old = std::mem::take(&mut data.children);
        for child in old {
            self.release_subtree(child);
        }
        // A selection inside the removed nodes falls back to the parent.
        if self
            .selection
            .is_some_and(|caret| self.data(caret.node).is_none())
        {
            self.selection = Some(Caret::new(parent, 0));
        }

        for node in fragment.into_nodes() {
            match node {
                FragmentNode::Text(text) => {
                    self.append_text(parent, &text);
                }
                FragmentNode::Styled { class, text } => {
                    let element = self.append_element(parent, Some(&class));
                    self.append_text(element, &text);
                }
            }
        }
    }
}
