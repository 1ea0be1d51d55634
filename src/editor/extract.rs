//! Markdown extraction from the surface.
//!
//! The inverse of rendering: every top-level element contributes one
//! markdown line rebuilt from its visible text and the data its compound
//! children carry.

use std::collections::HashMap;

use crate::document::{QUOTE_PREFIX, span_source};
use crate::surface::{NodeId, NodeKind, Surface};

use super::buffer::Anchor;

/// Result of [`extract_with_anchors`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The extracted, trimmed markdown.
    pub text: String,
    /// Where each compound element's markdown sits in `text`.
    pub anchors: HashMap<NodeId, Anchor>,
}

impl Extraction {
    pub fn anchor(&self, node: NodeId) -> Option<Anchor> {
        self.anchors.get(&node).copied()
    }
}

/// Serialize the surface back to markdown.
pub fn extract(surface: &Surface) -> String {
    extract_with_anchors(surface).text
}

/// Serialize the surface and record an [`Anchor`] for every compound element.
pub fn extract_with_anchors(surface: &Surface) -> Extraction {
    let _scope = crate::perf::scope("extract");
    let mut writer = Writer::new(surface);
    for &child in surface.children(surface.root()) {
        writer.top_level(child);
    }
    let extraction = writer.finish();
    tracing::debug!(
        bytes = extraction.text.len(),
        anchors = extraction.anchors.len(),
        "extracted markdown"
    );
    extraction
}

struct Writer<'a> {
    surface: &'a Surface,
    out: String,
    line: usize,
    column: usize,
    anchors: HashMap<NodeId, Anchor>,
}

impl<'a> Writer<'a> {
    fn new(surface: &'a Surface) -> Self {
        Self {
            surface,
            out: String::new(),
            line: 0,
            column: 0,
            anchors: HashMap::new(),
        }
    }

    fn push(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        self.out.push_str(text);
    }

    fn push_anchored(&mut self, node: NodeId, text: &str) {
        let from = (self.line, self.column);
        self.push(text);
        self.anchor_from(node, from);
    }

    /// Anchor `node` over everything written since `(line, column)`.
    fn anchor_from(&mut self, node: NodeId, (line, start): (usize, usize)) {
        if self.line == line {
            self.anchors
                .insert(node, Anchor::new(line, start, self.column));
        }
    }

    fn top_level(&mut self, node: NodeId) {
        if let Some(text) = self.surface.text(node) {
            self.push(text);
            return;
        }
        // Stray text typed before a render has no newline of its own.
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.push("\n");
        }
        self.block(node);
    }

    fn block(&mut self, node: NodeId) {
        let surface = self.surface;
        let Some(kind) = surface.kind(node) else {
            return;
        };
        match kind {
            NodeKind::Blank => {}
            NodeKind::YamlLine { .. } => self.push(&surface.text_content(node)),
            NodeKind::Rule { source } => self.push_anchored(node, &rule_source(source)),
            NodeKind::Blockquote => {
                let from = (self.line, self.column);
                self.push(QUOTE_PREFIX);
                self.inline_children(node);
                self.anchor_from(node, from);
            }
            NodeKind::ListItem { indent, .. } => {
                self.push(indent);
                self.inline_children(node);
                self.push("\n");
                for &child in surface.children(node) {
                    if matches!(surface.kind(child), Some(NodeKind::List { .. })) {
                        for &item in surface.children(child) {
                            self.block(item);
                        }
                    }
                }
                return;
            }
            NodeKind::List { .. } => {
                for &item in surface.children(node) {
                    self.block(item);
                }
                return;
            }
            NodeKind::EditInput { value, .. } => self.push(value),
            NodeKind::Inline(_) => self.inline(node),
            NodeKind::Root | NodeKind::Heading(_) | NodeKind::Paragraph => {
                self.inline_children(node);
            }
        }
        self.push("\n");
    }

    fn inline(&mut self, node: NodeId) {
        let surface = self.surface;
        match surface.kind(node) {
            Some(NodeKind::Inline(kind)) => {
                let source = span_source(kind, &surface.text_content(node));
                if kind.is_compound() {
                    self.push_anchored(node, &source);
                } else {
                    self.push(&source);
                }
            }
            Some(NodeKind::List { .. }) => {}
            Some(NodeKind::EditInput { value, .. }) => self.push(value),
            Some(_) => self.push(&surface.text_content(node)),
            None => self.push(surface.text(node).unwrap_or_default()),
        }
    }

    /// Emit the inline markdown of a block's children, anchoring compound spans.
    fn inline_children(&mut self, node: NodeId) {
        let surface = self.surface;
        for &child in surface.children(node) {
            self.inline(child);
        }
    }

    fn finish(self) -> Extraction {
        let raw = self.out;
        let lead = raw.len() - raw.trim_start().len();
        let prefix = &raw[..lead];
        let dropped_lines = prefix.matches('\n').count();
        let shift = prefix.rsplit('\n').next().map_or(0, |s| s.chars().count());

        let anchors = self
            .anchors
            .into_iter()
            .filter(|(_, anchor)| anchor.line >= dropped_lines)
            .map(|(node, mut anchor)| {
                anchor.line -= dropped_lines;
                if anchor.line == 0 {
                    anchor.start = anchor.start.saturating_sub(shift);
                    anchor.end = anchor.end.saturating_sub(shift);
                }
                (node, anchor)
            })
            .collect();

        Extraction {
            text: raw.trim().to_string(),
            anchors,
        }
    }
}

/// Markdown for a rule element, defaulting to `---`.
pub(crate) fn rule_source(source: &str) -> String {
    if source.is_empty() {
        "---".to_string()
    } else {
        source.to_string()
    }
}

/// Inline markdown of an element's children, with compound spans rebuilt.
pub(crate) fn inline_source(surface: &Surface, node: NodeId) -> String {
    surface
        .children(node)
        .iter()
        .map(|&child| {
            if let Some(text) = surface.text(child) {
                return text.to_string();
            }
            match surface.kind(child) {
                Some(NodeKind::List { .. }) => String::new(),
                Some(NodeKind::Inline(inline)) => {
                    span_source(inline, &surface.text_content(child))
                }
                Some(NodeKind::EditInput { value, .. }) => value.clone(),
                _ => surface.text_content(child),
            }
        })
        .collect()
}
