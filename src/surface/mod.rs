//! The live editable surface.
//!
//! An arena-backed node tree holding the rendered document the way a
//! browser holds a `contenteditable` subtree: elements tagged with a
//! [`NodeKind`], text nodes, a caret anchored in a text node and an
//! optionally focused element. Detached nodes stay in the arena until the
//! next full render clears it, so they can be re-attached (edit-mode cancel).

mod html;

use std::ops::Range;

use crate::document::{Block, Inline, InlineKind};

/// Handle to a node in a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// The closed set of element kinds the renderer produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The editable container itself.
    Root,
    Heading(u8),
    /// Thematic break; `source` is the marker line that produced it.
    Rule { source: String },
    Blockquote,
    ListItem {
        marker: String,
        /// Leading whitespace written before the marker.
        indent: String,
        ordered: bool,
    },
    /// Nested list created by indenting an item.
    List { ordered: bool },
    Paragraph,
    Blank,
    YamlLine { delimiter: bool },
    Inline(InlineKind),
    /// Plain text field showing a compound element's markdown.
    EditInput {
        value: String,
        selection: Range<usize>,
    },
}

impl NodeKind {
    /// Whether the element can be opened in raw edit mode.
    pub const fn is_compound(&self) -> bool {
        match self {
            Self::Rule { .. } | Self::Blockquote => true,
            Self::Inline(kind) => kind.is_compound(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Element(NodeKind),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Caret position: a text node and a char offset inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: NodeId,
    pub offset: usize,
}

/// The rendered, user-mutable tree.
#[derive(Debug, Clone)]
pub struct Surface {
    nodes: Vec<Node>,
    caret: Option<Caret>,
    focus: Option<NodeId>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Create an empty surface containing only the root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Element(NodeKind::Root),
            }],
            caret: None,
            focus: None,
        }
    }

    /// Build a surface from rendered blocks.
    pub fn from_blocks(blocks: &[Block]) -> Self {
        let mut surface = Self::new();
        surface.replace_blocks(blocks);
        surface
    }

    /// The editable container.
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Drop every node except the root, along with caret and focus.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0].children.clear();
        self.caret = None;
        self.focus = None;
    }

    /// Replace the whole surface with freshly rendered blocks.
    pub fn replace_blocks(&mut self, blocks: &[Block]) {
        self.clear();
        let root = self.root();
        for block in blocks {
            let id = self.build_block(block);
            self.append_child(root, id);
        }
    }

    fn build_block(&mut self, block: &Block) -> NodeId {
        match block {
            Block::Heading {
                level,
                marker,
                gap,
                content,
            } => {
                let el = self.create_element(NodeKind::Heading(*level));
                self.push_text(el, &format!("{marker}{gap}"));
                self.push_inlines(el, content);
                el
            }
            Block::Rule { source } => self.create_element(NodeKind::Rule {
                source: source.clone(),
            }),
            Block::Blockquote { content } => {
                let el = self.create_element(NodeKind::Blockquote);
                self.push_inlines(el, content);
                el
            }
            Block::ListItem {
                indent,
                marker,
                gap,
                ordered,
                content,
            } => {
                let el = self.create_element(NodeKind::ListItem {
                    marker: marker.clone(),
                    indent: indent.clone(),
                    ordered: *ordered,
                });
                self.push_text(el, &format!("{marker}{gap}"));
                self.push_inlines(el, content);
                el
            }
            Block::Paragraph { content } => {
                let el = self.create_element(NodeKind::Paragraph);
                self.push_inlines(el, content);
                el
            }
            Block::YamlLine { text, delimiter } => {
                let el = self.create_element(NodeKind::YamlLine {
                    delimiter: *delimiter,
                });
                self.push_text(el, text);
                el
            }
            Block::Blank => self.create_element(NodeKind::Blank),
        }
    }

    fn push_inlines(&mut self, parent: NodeId, pieces: &[Inline]) {
        for piece in pieces {
            match piece {
                Inline::Text(text) => self.push_text(parent, text),
                Inline::Span { kind, text } => {
                    let el = self.create_element(NodeKind::Inline(kind.clone()));
                    if !text.is_empty() {
                        let text = self.create_text(text);
                        self.append_child(el, text);
                    }
                    self.append_child(parent, el);
                }
            }
        }
    }

    /// Append text, merging into a trailing text node the way markup parsing would.
    fn push_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeData::Text(existing) = &mut self.nodes[last.0].data
        {
            existing.push_str(text);
            return;
        }
        let node = self.create_text(text);
        self.append_child(parent, node);
    }

    /// Create a detached element.
    pub fn create_element(&mut self, kind: NodeKind) -> NodeId {
        self.alloc(NodeData::Element(kind))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Move `child` under `parent`, before `reference` (or last when `None`).
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.contains(parent) || !self.contains(child) || parent == child {
            return;
        }
        self.detach(child);
        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|&c| c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove a node from its parent. The node and its subtree stay allocated.
    pub fn detach(&mut self, node: NodeId) {
        if !self.contains(node) {
            return;
        }
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    /// Put `new` where `old` is and detach `old`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        let Some(parent) = self.parent(old) else {
            return;
        };
        self.insert_before(parent, new, Some(old));
        self.detach(old);
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map_or(&[], |n| n.children.as_slice())
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root() {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Element kind, or `None` for text nodes.
    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Element(kind) => Some(kind),
            NodeData::Text(_) => None,
        }
    }

    pub fn kind_mut(&mut self, node: NodeId) -> Option<&mut NodeKind> {
        match &mut self.nodes.get_mut(node.0)?.data {
            NodeData::Element(kind) => Some(kind),
            NodeData::Text(_) => None,
        }
    }

    /// Text of a text node, or `None` for elements.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes.get(node.0)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    /// Overwrite the text of a text node. No-op on elements.
    pub fn set_text(&mut self, node: NodeId, value: &str) {
        if let Some(Node {
            data: NodeData::Text(text),
            ..
        }) = self.nodes.get_mut(node.0)
        {
            value.clone_into(text);
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.text(node).is_some()
    }

    fn sibling_index(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(node)?;
        let index = self.children(parent).iter().position(|&c| c == node)?;
        Some((parent, index))
    }

    /// The following sibling, text or element.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(node)?;
        self.children(parent).get(index + 1).copied()
    }

    /// The closest preceding sibling that is an element.
    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let (parent, index) = self.sibling_index(node)?;
        self.children(parent)[..index]
            .iter()
            .rev()
            .copied()
            .find(|&c| !self.is_text(c))
    }

    /// Walk from `node` up to the root, returning the first element matching `pred`.
    pub fn closest(&self, node: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.kind(id).is_some_and(&pred) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Preorder walk of `node` and everything under it.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Attached text nodes in document order.
    pub fn text_nodes(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.is_text(id))
            .collect()
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }

    /// First attached element matching `pred`, in document order.
    pub fn find(&self, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.find_all(pred).into_iter().next()
    }

    /// Every attached element matching `pred`, in document order.
    pub fn find_all(&self, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| self.kind(id).is_some_and(&pred))
            .collect()
    }

    pub const fn caret(&self) -> Option<Caret> {
        self.caret
    }

    pub const fn set_caret(&mut self, caret: Option<Caret>) {
        self.caret = caret;
    }

    pub const fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    pub const fn set_focus(&mut self, node: Option<NodeId>) {
        self.focus = node;
    }

    /// Type text at the caret, as the browser would in a `contenteditable`.
    ///
    /// Without a caret the text lands in a trailing top-level text node.
    pub fn insert_text_at_caret(&mut self, input: &str) {
        let typed = input.chars().count();
        if let Some(Caret { node, offset }) = self.caret
            && let Some(text) = self.text(node)
        {
            let at = byte_index(text, offset);
            let mut updated = text.to_string();
            updated.insert_str(at, input);
            self.set_text(node, &updated);
            self.caret = Some(Caret {
                node,
                offset: offset + typed,
            });
            return;
        }

        let root = self.root();
        let trailing = self.children(root).last().copied().filter(|&c| self.is_text(c));
        let node = if let Some(node) = trailing {
            let updated = format!("{}{input}", self.text(node).unwrap_or_default());
            self.set_text(node, &updated);
            node
        } else {
            let node = self.create_text(input);
            self.append_child(root, node);
            node
        };
        let offset = self.text(node).map_or(0, |t| t.chars().count());
        self.caret = Some(Caret { node, offset });
    }

    /// Delete the character before the caret within its text node (Backspace).
    ///
    /// Returns `true` if a character was deleted.
    pub fn delete_before_caret(&mut self) -> bool {
        let Some(Caret { node, offset }) = self.caret else {
            return false;
        };
        let Some(text) = self.text(node) else {
            return false;
        };
        if offset == 0 {
            return false;
        }
        let start = byte_index(text, offset - 1);
        let end = byte_index(text, offset);
        let mut updated = text.to_string();
        updated.replace_range(start..end, "");
        self.set_text(node, &updated);
        self.caret = Some(Caret {
            node,
            offset: offset - 1,
        });
        true
    }

    /// Markup for the whole surface.
    pub fn to_html(&self) -> String {
        html::render(self)
    }
}

/// Byte index of the `offset`-th char, clamped to the end.
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(index, _)| index)
}
