use std::ops::Range;

use ropey::Rope;

/// Position of a markdown fragment: a line and a char column span within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Zero-based line index.
    pub line: usize,
    /// First char column of the fragment.
    pub start: usize,
    /// Char column one past the fragment.
    pub end: usize,
}

impl Anchor {
    pub const fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// Number of chars covered.
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The document's markdown text, backed by a rope.
///
/// Tracks whether the text changed since the last successful save and
/// supports replacing a fragment at an [`Anchor`].
#[derive(Debug, Clone, Default)]
pub struct SourceBuffer {
    rope: Rope,
    dirty: bool,
}

impl SourceBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    ///
    /// Lines end at `\n` only, matching the columns extraction records.
    pub fn line_count(&self) -> usize {
        self.rope.chars().filter(|&ch| ch == '\n').count() + 1
    }

    /// Char range of a line, without its trailing newline.
    fn line_chars(&self, line_idx: usize) -> Option<Range<usize>> {
        let mut line = 0;
        let mut start = 0;
        for (idx, ch) in self.rope.chars().enumerate() {
            if ch != '\n' {
                continue;
            }
            if line == line_idx {
                return Some(start..idx);
            }
            line += 1;
            start = idx + 1;
        }
        (line == line_idx).then(|| start..self.rope.len_chars())
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        let range = self.line_chars(line_idx)?;
        Some(self.rope.slice(range).to_string())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Replace the whole text. Marks the buffer dirty only if it changed.
    pub fn set_text(&mut self, text: &str) {
        if self.rope == text {
            return;
        }
        self.rope = Rope::from_str(text);
        self.dirty = true;
    }

    fn anchor_range(&self, anchor: &Anchor) -> Option<Range<usize>> {
        let line = self.line_chars(anchor.line)?;
        if anchor.start > anchor.end || anchor.end > line.len() {
            return None;
        }
        Some(line.start + anchor.start..line.start + anchor.end)
    }

    /// Text covered by an anchor, if it lies inside the buffer.
    pub fn slice(&self, anchor: &Anchor) -> Option<String> {
        let range = self.anchor_range(anchor)?;
        Some(self.rope.slice(range).to_string())
    }

    /// Replace the fragment at `anchor` with `replacement`.
    ///
    /// Returns `false` (and leaves the text alone) if the anchor is out of range.
    pub fn replace(&mut self, anchor: &Anchor, replacement: &str) -> bool {
        let Some(range) = self.anchor_range(anchor) else {
            return false;
        };
        let start = range.start;
        self.rope.remove(range);
        self.rope.insert(start, replacement);
        self.dirty = true;
        true
    }

    /// Anchor of the first occurrence of a single-line fragment.
    pub fn find(&self, fragment: &str) -> Option<Anchor> {
        if fragment.is_empty() || fragment.contains('\n') {
            return None;
        }
        let text = self.text();
        let before = &text[..text.find(fragment)?];
        let line = before.matches('\n').count();
        let start = before.rsplit('\n').next().map_or(0, |s| s.chars().count());
        Some(Anchor::new(line, start, start + fragment.chars().count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_is_clean() {
        let buf = SourceBuffer::from_text("hello\nworld");
        assert!(!buf.is_dirty());
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.line_at(2), None);
    }

    #[test]
    fn test_set_text_marks_dirty_only_on_change() {
        let mut buf = SourceBuffer::from_text("same");
        buf.set_text("same");
        assert!(!buf.is_dirty());
        buf.set_text("different");
        assert!(buf.is_dirty());
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_slice_and_replace_at_anchor() {
        let mut buf = SourceBuffer::from_text("intro\nsee [a](x) and [a](x)");
        let second = Anchor::new(1, 16, 22);
        assert_eq!(buf.slice(&second), Some("[a](x)".to_string()));
        assert!(buf.replace(&second, "[b](y)"));
        assert_eq!(buf.text(), "intro\nsee [a](x) and [b](y)");
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_replace_out_of_range_is_refused() {
        let mut buf = SourceBuffer::from_text("short");
        assert!(!buf.replace(&Anchor::new(0, 2, 40), "x"));
        assert!(!buf.replace(&Anchor::new(3, 0, 0), "x"));
        assert_eq!(buf.text(), "short");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_find_reports_char_columns() {
        let buf = SourceBuffer::from_text("café\nvoilà [x](y)");
        assert_eq!(buf.find("[x](y)"), Some(Anchor::new(1, 6, 12)));
        assert_eq!(buf.find("missing"), None);
        assert_eq!(buf.find("a\nb"), None);
    }

    #[test]
    fn test_lines_break_on_newline_only() {
        let mut buf = SourceBuffer::from_text("note\u{2028}more\r\n[a](x) and [a](x)");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("note\u{2028}more\r".to_string()));

        let second = Anchor::new(1, 11, 17);
        assert_eq!(buf.slice(&second), Some("[a](x)".to_string()));
        assert_eq!(buf.find("[a](x)"), Some(Anchor::new(1, 0, 6)));
        assert!(buf.replace(&second, "[b](y)"));
        assert_eq!(buf.text(), "note\u{2028}more\r\n[a](x) and [b](y)");
    }

    #[test]
    fn test_anchor_on_trailing_empty_line() {
        let buf = SourceBuffer::from_text("a\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.slice(&Anchor::new(1, 0, 0)), Some(String::new()));
        assert_eq!(buf.slice(&Anchor::new(2, 0, 0)), None);
    }
}
