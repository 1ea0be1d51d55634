//! Markup serialization for the surface.

use std::fmt::Write as _;

use super::{NodeId, NodeKind, Surface};
use crate::document::{escape_html, write_span_html};

/// Serialize the surface: one line of markup per top-level node.
pub(super) fn render(surface: &Surface) -> String {
    surface
        .children(surface.root())
        .iter()
        .map(|&id| node_html(surface, id))
        .filter(|html| !html.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn node_html(surface: &Surface, id: NodeId) -> String {
    if let Some(text) = surface.text(id) {
        return escape_html(text);
    }
    let Some(kind) = surface.kind(id) else {
        return String::new();
    };
    let inner = || -> String {
        surface
            .children(id)
            .iter()
            .map(|&child| node_html(surface, child))
            .collect()
    };
    let mut out = String::new();
    let _ = match kind {
        NodeKind::Root | NodeKind::Blank => Ok(()),
        NodeKind::Heading(level) => write!(
            out,
            "<h{level} class=\"mw-heading mw-h{level}\">{}</h{level}>",
            inner()
        ),
        NodeKind::Rule { .. } => write!(out, "<hr class=\"mw-rule\">"),
        NodeKind::Blockquote => write!(out, "<blockquote class=\"mw-quote\">{}</blockquote>", inner()),
        NodeKind::ListItem {
            indent, ordered, ..
        } => write!(
            out,
            "<li class=\"mw-item {}\" data-indent=\"{}\">{}</li>",
            if *ordered { "mw-ordered" } else { "mw-bullet" },
            indent.chars().count(),
            inner()
        ),
        NodeKind::List { ordered } => {
            let tag = if *ordered { "ol" } else { "ul" };
            write!(out, "<{tag} class=\"mw-list\">{}</{tag}>", inner())
        }
        NodeKind::Paragraph => write!(out, "<p class=\"mw-paragraph\">{}</p>", inner()),
        NodeKind::YamlLine { delimiter } => write!(
            out,
            "<div class=\"mw-yaml{}\">{}</div>",
            if *delimiter { " mw-yaml-delimiter" } else { "" },
            inner()
        ),
        NodeKind::Inline(kind) => {
            write_span_html(&mut out, kind, &surface.text_content(id));
            Ok(())
        }
        NodeKind::EditInput { value, .. } => write!(
            out,
            "<input class=\"mw-edit-input\" value=\"{}\">",
            escape_html(value)
        ),
    };
    out
}

#[cfg(test)]
mod tests {
    use crate::document::render_document;
    use crate::surface::{NodeKind, Surface};

    #[test]
    fn test_nested_list_markup() {
        let mut s = Surface::from_blocks(&render_document("- a\n- b"));
        let root = s.root();
        let (a, b) = (s.children(root)[0], s.children(root)[1]);
        let list = s.create_element(NodeKind::List { ordered: false });
        s.append_child(a, list);
        s.append_child(list, b);
        assert_eq!(
            s.to_html(),
            "<li class=\"mw-item mw-bullet\" data-indent=\"0\">- a\
             <ul class=\"mw-list\"><li class=\"mw-item mw-bullet\" data-indent=\"0\">- b</li></ul></li>"
        );
    }

    #[test]
    fn test_edit_input_value_is_escaped() {
        let mut s = Surface::new();
        let input = s.create_element(NodeKind::EditInput {
            value: "[a](\"b\")".to_string(),
            selection: 0..0,
        });
        let root = s.root();
        s.append_child(root, input);
        assert_eq!(
            s.to_html(),
            "<input class=\"mw-edit-input\" value=\"[a](&quot;b&quot;)\">"
        );
    }
}
