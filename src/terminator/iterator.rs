//! Windowed iterator that survives edits made while scanning.

use crate::editable::{ChipText, ChippedText};

/// Cursor over `[start, end)` of a buffer.
///
/// Deleting or replacing text through the iterator keeps the scan position
/// and the window end consistent with the mutated buffer, so a scan can
/// rewrite the text it is walking over.
pub struct TextIterator<'a> {
    text: &'a mut dyn ChipText,
    start: usize,
    end: usize,
    /// Offset of the character the next `next_char` call returns
    next: usize,
}

impl<'a> TextIterator<'a> {
    pub fn new(text: &'a mut dyn ChipText, start: usize, end: usize) -> Self {
        let len = text.len_chars();
        let start = start.min(len);
        let end = end.min(len).max(start);
        Self {
            text,
            start,
            end,
            next: start,
        }
    }

    pub fn text(&self) -> &dyn ChipText {
        &*self.text
    }

    pub fn text_mut(&mut self) -> &mut dyn ChipText {
        &mut *self.text
    }

    /// Offset of the character most recently returned by `next_char`
    pub fn index(&self) -> usize {
        self.next.saturating_sub(1)
    }

    pub fn total_len(&self) -> usize {
        self.text.len_chars()
    }

    pub fn window_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn window_end(&self) -> usize {
        self.end
    }

    pub fn has_next(&self) -> bool {
        self.next < self.end
    }

    /// Advance and return the next character of the window
    pub fn next_char(&mut self) -> Option<char> {
        if !self.has_next() {
            return None;
        }
        let ch = self.text.char_at(self.next)?;
        self.next += 1;
        Some(ch)
    }

    /// Delete the character at [`index`](Self::index).
    ///
    /// With `maintain_index` false the cursor steps back, so the next call
    /// to `next_char` yields the character that slid into the freed slot.
    pub fn delete_char(&mut self, maintain_index: bool) {
        let index = self.index();
        self.text.remove(index..index + 1);
        if !maintain_index {
            self.next = self.next.saturating_sub(1);
        }
        self.end = self.end.saturating_sub(1);
    }

    /// Replace `[range_start, range_end)` and continue after the replacement
    pub fn replace(&mut self, range_start: usize, range_end: usize, replacement: ChippedText) {
        let old_len = range_end.saturating_sub(range_start);
        let new_len = replacement.len_chars();
        self.text.replace_chipped(range_start..range_end, replacement);
        self.next = range_start + new_len;
        self.end = (self.end + new_len).saturating_sub(old_len);
    }
}

impl Iterator for TextIterator<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.next_char()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::{ChipBuffer, TextBuffer};

    #[test]
    fn test_iterates_window_only() {
        let mut buf = ChipBuffer::from_text("abcdef");
        let collected: String = TextIterator::new(&mut buf, 1, 4).collect();
        assert_eq!(collected, "bcd");
    }

    #[test]
    fn test_window_is_clamped() {
        let mut buf = ChipBuffer::from_text("abc");
        let iter = TextIterator::new(&mut buf, 2, 99);
        assert_eq!(iter.window_len(), 1);
    }

    #[test]
    fn test_delete_without_maintaining_index_yields_slid_char() {
        let mut buf = ChipBuffer::from_text("a;b");
        let mut iter = TextIterator::new(&mut buf, 0, 3);
        assert_eq!(iter.next_char(), Some('a'));
        assert_eq!(iter.next_char(), Some(';'));
        iter.delete_char(false);
        assert_eq!(iter.window_end(), 2);
        assert_eq!(iter.next_char(), Some('b'));
        assert_eq!(iter.next_char(), None);
        assert_eq!(buf.content(), "ab");
    }

    #[test]
    fn test_delete_maintaining_index() {
        let mut buf = ChipBuffer::from_text("x;yz");
        let mut iter = TextIterator::new(&mut buf, 0, 4);
        iter.next_char();
        iter.next_char();
        iter.delete_char(true);
        assert_eq!(iter.index(), 1);
        // 'y' slid into index 1 and is skipped
        assert_eq!(iter.next_char(), Some('z'));
        assert!(!iter.has_next());
    }

    #[test]
    fn test_replace_adjusts_cursor_and_window() {
        let mut buf = ChipBuffer::from_text("ab cd");
        let mut iter = TextIterator::new(&mut buf, 0, 5);
        iter.next_char();
        iter.next_char();
        iter.next_char();
        iter.replace(0, 3, ChippedText::plain("[ab]"));
        assert_eq!(iter.index(), 3);
        assert_eq!(iter.window_end(), 6);
        let rest: String = iter.collect();
        assert_eq!(rest, "cd");
        assert_eq!(buf.content(), "[ab]cd");
    }
}
