//! Caret preservation across full re-renders.
//!
//! The caret is reduced to a flat char offset over the surface's text
//! nodes before a render and mapped back onto the new nodes afterwards.

use crate::surface::{Caret, Surface};

/// Chars preceding the caret across all text nodes in document order.
///
/// Returns 0 when there is no caret or it sits outside the attached text.
pub fn capture_offset(surface: &Surface) -> usize {
    let Some(caret) = surface.caret() else {
        return 0;
    };
    let mut preceding = 0;
    for node in surface.text_nodes() {
        let len = surface.text(node).map_or(0, |t| t.chars().count());
        if node == caret.node {
            return preceding + caret.offset.min(len);
        }
        preceding += len;
    }
    0
}

/// Place the caret `offset` chars into the surface's text.
///
/// Offsets past the end clamp to the end of the last text node. A surface
/// with no text nodes ends up with no caret.
pub fn restore_offset(surface: &mut Surface, offset: usize) {
    let nodes = surface.text_nodes();
    let mut preceding = 0;
    let mut last = None;
    for node in nodes {
        let len = surface.text(node).map_or(0, |t| t.chars().count());
        if preceding + len >= offset {
            surface.set_caret(Some(Caret {
                node,
                offset: offset - preceding,
            }));
            return;
        }
        preceding += len;
        last = Some((node, len));
    }
    if offset > preceding {
        tracing::debug!(offset, total = preceding, "caret offset clamped");
    }
    surface.set_caret(last.map(|(node, len)| Caret { node, offset: len }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::render_document;

    fn surface(text: &str) -> Surface {
        Surface::from_blocks(&render_document(text))
    }

    #[test]
    fn test_no_caret_captures_zero() {
        assert_eq!(capture_offset(&surface("hello")), 0);
    }

    #[test]
    fn test_offset_spans_text_nodes() {
        let mut s = surface("ab **cd** ef");
        let nodes = s.text_nodes();
        s.set_caret(Some(Caret {
            node: nodes[1],
            offset: 2,
        }));
        assert_eq!(capture_offset(&s), 5);
    }

    #[test]
    fn test_restore_after_same_length_render() {
        let mut before = surface("# Heading\nsome *text* here");
        restore_offset(&mut before, 5);
        let offset = capture_offset(&before);
        assert_eq!(offset, 5);

        let mut after = surface("# Heading\nsome *text* here");
        restore_offset(&mut after, offset);
        let caret = after.caret().unwrap();
        assert_eq!(after.text(caret.node), Some("# Heading"));
        assert_eq!(caret.offset, 5);
    }

    #[test]
    fn test_boundary_prefers_earlier_node() {
        let mut s = surface("ab\ncd");
        restore_offset(&mut s, 2);
        let caret = s.caret().unwrap();
        assert_eq!(s.text(caret.node), Some("ab"));
        assert_eq!(caret.offset, 2);
    }

    #[test]
    fn test_restore_clamps_to_end() {
        let mut s = surface("ab\ncd");
        restore_offset(&mut s, 99);
        let caret = s.caret().unwrap();
        assert_eq!(s.text(caret.node), Some("cd"));
        assert_eq!(caret.offset, 2);
    }

    #[test]
    fn test_restore_on_empty_surface_clears_caret() {
        let mut s = surface("");
        restore_offset(&mut s, 3);
        assert!(s.caret().is_none());
    }

    #[test]
    fn test_offsets_count_chars_not_bytes() {
        let mut s = surface("héllo wörld");
        restore_offset(&mut s, 8);
        assert_eq!(capture_offset(&s), 8);
    }
}
