//! Tab / Shift+Tab list nesting.
//!
//! Structural moves only: an indented item becomes the last entry of a
//! sub-list under its previous sibling, and the indent recorded on the item
//! and everything nested in it follows the move so the next extraction
//! writes the new nesting out as leading whitespace.

use crate::surface::{NodeId, NodeKind, Surface};

/// Spaces added per nesting level.
pub const INDENT_WIDTH: usize = 2;

fn is_list_item(surface: &Surface, node: NodeId) -> bool {
    matches!(surface.kind(node), Some(NodeKind::ListItem { .. }))
}

fn item_indent(surface: &Surface, node: NodeId) -> Option<String> {
    match surface.kind(node)? {
        NodeKind::ListItem { indent, .. } => Some(indent.clone()),
        _ => None,
    }
}

/// The list item holding the caret, if any.
pub fn list_item_at_caret(surface: &Surface) -> Option<NodeId> {
    let caret = surface.caret()?;
    surface.closest(caret.node, |k| matches!(k, NodeKind::ListItem { .. }))
}

/// Move `item` into a sub-list under its previous sibling item.
///
/// Returns `false` when there is no previous item to nest under.
pub fn indent(surface: &mut Surface, item: NodeId) -> bool {
    let Some(NodeKind::ListItem { ordered, indent, .. }) = surface.kind(item).cloned() else {
        return false;
    };
    let Some(previous) = surface.previous_element_sibling(item) else {
        return false;
    };
    let Some(previous_indent) = item_indent(surface, previous) else {
        return false;
    };

    let ordered = match surface.parent(item).and_then(|p| surface.kind(p)) {
        Some(NodeKind::List { ordered }) => *ordered,
        _ => ordered,
    };
    let sublist = surface
        .children(previous)
        .iter()
        .copied()
        .find(|&c| matches!(surface.kind(c), Some(NodeKind::List { .. })));
    let sublist = sublist.unwrap_or_else(|| {
        let list = surface.create_element(NodeKind::List { ordered });
        surface.append_child(previous, list);
        list
    });

    surface.append_child(sublist, item);
    let nested = format!("{previous_indent}{}", " ".repeat(INDENT_WIDTH));
    shift_indent(surface, item, &nested, &indent);
    tracing::debug!(?item, "indented list item");
    true
}

/// Move `item` out of its sub-list to just after the item that holds it.
///
/// Returns `false` for items already at the top level.
pub fn outdent(surface: &mut Surface, item: NodeId) -> bool {
    let Some(indent) = item_indent(surface, item) else {
        return false;
    };
    let Some(list) = surface.parent(item) else {
        return false;
    };
    if !matches!(surface.kind(list), Some(NodeKind::List { .. })) {
        return false;
    }
    let Some(owner) = surface.parent(list).filter(|&p| is_list_item(surface, p)) else {
        return false;
    };
    let Some(container) = surface.parent(owner) else {
        return false;
    };
    let owner_indent = item_indent(surface, owner).unwrap_or_default();

    let next = surface.next_sibling(owner);
    surface.insert_before(container, item, next);
    shift_indent(surface, item, &owner_indent, &indent);
    if surface.children(list).is_empty() {
        surface.detach(list);
    }
    tracing::debug!(?item, "outdented list item");
    true
}

/// Re-indent `item` from `from` to `to`, moving its nested items by the same amount.
///
/// Nested items keep whatever whitespace they carry beyond `from`.
fn shift_indent(surface: &mut Surface, item: NodeId, to: &str, from: &str) {
    let dropped = from.chars().count();
    for node in surface.descendants(item) {
        if let Some(NodeKind::ListItem { indent, .. }) = surface.kind_mut(node) {
            let rest: String = indent.chars().skip(dropped).collect();
            *indent = format!("{to}{rest}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::render_document;
    use crate::editor::extract;
    use crate::surface::Caret;

    fn surface(text: &str) -> Surface {
        Surface::from_blocks(&render_document(text))
    }

    #[test]
    fn test_indent_nests_under_previous_item() {
        let mut s = surface("- one\n- two");
        let root = s.root();
        let (one, two) = (s.children(root)[0], s.children(root)[1]);

        assert!(indent(&mut s, two));
        assert_eq!(s.children(root), &[one]);
        let sublist = *s.children(one).last().unwrap();
        assert_eq!(s.kind(sublist), Some(&NodeKind::List { ordered: false }));
        assert_eq!(s.children(sublist), &[two]);
        assert_eq!(extract(&s), "- one\n  - two");
    }

    #[test]
    fn test_outdent_restores_siblings() {
        let mut s = surface("- one\n- two");
        let root = s.root();
        let (one, two) = (s.children(root)[0], s.children(root)[1]);

        assert!(indent(&mut s, two));
        assert!(outdent(&mut s, two));
        assert_eq!(s.children(root), &[one, two]);
        assert!(s.find(|k| matches!(k, NodeKind::List { .. })).is_none());
        assert_eq!(extract(&s), "- one\n- two");
    }

    #[test]
    fn test_first_item_cannot_indent() {
        let mut s = surface("- one\n- two");
        let one = s.children(s.root())[0];
        assert!(!indent(&mut s, one));
    }

    #[test]
    fn test_indent_after_non_item_is_noop() {
        let mut s = surface("para\n- item");
        let item = s.children(s.root())[1];
        assert!(!indent(&mut s, item));
    }

    #[test]
    fn test_top_level_outdent_is_noop() {
        let mut s = surface("- one");
        let one = s.children(s.root())[0];
        assert!(!outdent(&mut s, one));
    }

    #[test]
    fn test_sublist_kind_follows_item() {
        let mut s = surface("1. a\n2. b");
        let b = s.children(s.root())[1];
        assert!(indent(&mut s, b));
        assert!(s.find(|k| *k == NodeKind::List { ordered: true }).is_some());
    }

    #[test]
    fn test_nested_items_move_with_parent() {
        let mut s = surface("- a\n- b\n- c");
        let root = s.root();
        let (b, c) = (s.children(root)[1], s.children(root)[2]);
        assert!(indent(&mut s, b));
        assert!(indent(&mut s, c));
        assert!(indent(&mut s, c));
        assert_eq!(extract(&s), "- a\n  - b\n    - c");

        assert!(outdent(&mut s, b));
        assert_eq!(extract(&s), "- a\n- b\n  - c");
    }

    #[test]
    fn test_outdent_keeps_following_siblings_nested() {
        let mut s = surface("- a\n- b\n- c");
        let root = s.root();
        let (b, c) = (s.children(root)[1], s.children(root)[2]);
        indent(&mut s, b);
        indent(&mut s, c);
        assert!(outdent(&mut s, b));
        assert_eq!(extract(&s), "- a\n  - c\n- b");
    }

    #[test]
    fn test_tab_indented_items_keep_their_whitespace() {
        let mut s = surface("\t- a\n\t- b\n\t\t- c");
        let root = s.root();
        let b = s.children(root)[1];
        let c = s.children(root)[2];
        assert!(indent(&mut s, c));
        assert_eq!(extract(&s), "\t- a\n\t- b\n\t  - c");

        assert!(indent(&mut s, b));
        assert_eq!(extract(&s), "\t- a\n\t  - b\n\t    - c");
        assert!(outdent(&mut s, b));
        assert_eq!(extract(&s), "\t- a\n\t- b\n\t  - c");
    }

    #[test]
    fn test_item_at_caret() {
        let mut s = surface("text\n- item");
        let nodes = s.text_nodes();
        s.set_caret(Some(Caret {
            node: nodes[1],
            offset: 3,
        }));
        assert_eq!(list_item_at_caret(&s), Some(s.children(s.root())[1]));
        s.set_caret(Some(Caret {
            node: nodes[0],
            offset: 0,
        }));
        assert_eq!(list_item_at_caret(&s), None);
    }
}
