//! Text buffer traits and the chip-aware rope buffer.
//!
//! Provides `TextBuffer` (read-only) and `TextBufferMut` (read-write) over
//! character offsets, and `ChipText`, which adds out-of-band chip
//! attachments over character ranges. `ChipBuffer` implements all three on
//! top of `ropey::Rope` with a side table of attachments sorted by start.

use std::fmt;
use std::ops::Range;

use ropey::Rope;

use crate::chip::{Chip, ChipId};

/// Clamp `range` into `[0, len]` and make sure `end >= start`.
pub fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    start..end
}

/// Read-only view into a text buffer, addressed by character offset.
pub trait TextBuffer {
    /// Total length in characters
    fn len_chars(&self) -> usize;

    /// Check if buffer is empty
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Get character at offset, None if out of bounds
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Get slice of text as String (by character indices, clamped)
    fn slice(&self, range: Range<usize>) -> String;

    /// Get full content as String
    fn content(&self) -> String;
}

/// Mutable buffer operations. Extends TextBuffer.
pub trait TextBufferMut: TextBuffer {
    /// Insert text at character offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Remove text in character range
    fn remove(&mut self, range: Range<usize>);

    /// Replace text in range with new text
    fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = clamp_range(range, self.len_chars());
        let start = range.start;
        self.remove(range);
        self.insert(start, text);
    }

    /// Append text at the end
    fn append(&mut self, text: &str) {
        let len = self.len_chars();
        self.insert(len, text);
    }

    /// Clear all content
    fn clear(&mut self) {
        let len = self.len_chars();
        if len > 0 {
            self.remove(0..len);
        }
    }

    /// Set content, replacing everything
    fn set_content(&mut self, text: &str) {
        self.clear();
        self.insert(0, text);
    }
}

/// A buffer that can carry chip attachments over character ranges.
///
/// Attachments follow exclusive/exclusive semantics: text inserted at a
/// region's start moves the region, text inserted strictly inside grows it,
/// and a region whose text is deleted entirely is detached.
pub trait ChipText: TextBufferMut {
    /// Attach `chip` over `range` (clamped). Empty ranges are ignored.
    fn attach_chip(&mut self, chip: Chip, range: Range<usize>);

    /// Remove the attachment for `id`, leaving the text untouched
    fn detach_chip(&mut self, id: ChipId) -> Option<Chip>;

    fn chip(&self, id: ChipId) -> Option<&Chip>;

    fn chip_mut(&mut self, id: ChipId) -> Option<&mut Chip>;

    /// Current region of an attached chip
    fn chip_range(&self, id: ChipId) -> Option<Range<usize>>;

    /// Chips whose region intersects `range`, ordered by start.
    ///
    /// An empty query `[q, q)` matches chips with `start <= q <= end`.
    fn chips_in(&self, range: Range<usize>) -> Vec<&Chip>;

    /// Insert text together with the chips it carries
    fn insert_chipped(&mut self, offset: usize, fragment: ChippedText) {
        let offset = offset.min(self.len_chars());
        let (text, chips) = fragment.into_parts();
        self.insert(offset, &text);
        for (range, chip) in chips {
            self.attach_chip(chip, offset + range.start..offset + range.end);
        }
    }

    /// Replace a range with text carrying chips
    fn replace_chipped(&mut self, range: Range<usize>, fragment: ChippedText) {
        let range = clamp_range(range, self.len_chars());
        let start = range.start;
        self.remove(range);
        self.insert_chipped(start, fragment);
    }

    fn append_chipped(&mut self, fragment: ChippedText) {
        let len = self.len_chars();
        self.insert_chipped(len, fragment);
    }
}

// =============================================================================
// ChippedText - text fragment carrying chip attachments
// =============================================================================

/// A detached piece of text plus the chips to attach when it is inserted.
///
/// Chip ranges are relative to the start of the fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChippedText {
    text: String,
    chips: Vec<(Range<usize>, Chip)>,
}

impl ChippedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text without any chips
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            chips: Vec::new(),
        }
    }

    /// Text with `chip` attached across all of it
    pub fn with_chip(text: impl Into<String>, chip: Chip) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            text,
            chips: vec![(0..len, chip)],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn chips(&self) -> impl Iterator<Item = &Chip> {
        self.chips.iter().map(|(_, chip)| chip)
    }

    pub fn into_parts(self) -> (String, Vec<(Range<usize>, Chip)>) {
        (self.text, self.chips)
    }
}

impl fmt::Display for ChippedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// =============================================================================
// ChipBuffer - rope + attachment table
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Attachment {
    range: Range<usize>,
    chip: Chip,
}

/// Rope-backed buffer with chip attachments sorted by start offset.
#[derive(Debug, Clone)]
pub struct ChipBuffer {
    rope: Rope,
    attachments: Vec<Attachment>,
}

impl ChipBuffer {
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            attachments: Vec::new(),
        }
    }

    /// Create a ChipBuffer holding plain text
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
            attachments: Vec::new(),
        }
    }

    /// Number of attached chips
    pub fn chip_count(&self) -> usize {
        self.attachments.len()
    }

    /// All attached chips in buffer order
    pub fn chips(&self) -> impl Iterator<Item = (&Chip, Range<usize>)> {
        self.attachments.iter().map(|a| (&a.chip, a.range.clone()))
    }

    fn position_of(&self, id: ChipId) -> Option<usize> {
        self.attachments.iter().position(|a| a.chip.id() == id)
    }
}

impl Default for ChipBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for ChipBuffer {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

impl TextBuffer for ChipBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    fn slice(&self, range: Range<usize>) -> String {
        let range = clamp_range(range, self.len_chars());
        if range.is_empty() {
            return String::new();
        }
        self.rope.slice(range).to_string()
    }

    fn content(&self) -> String {
        self.rope.to_string()
    }
}

impl TextBufferMut for ChipBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let offset = offset.min(self.len_chars());
        let inserted = text.chars().count();
        self.rope.insert(offset, text);

        for attachment in &mut self.attachments {
            let range = &mut attachment.range;
            if offset <= range.start {
                range.start += inserted;
                range.end += inserted;
            } else if offset < range.end {
                range.end += inserted;
            }
        }
    }

    fn remove(&mut self, range: Range<usize>) {
        let range = clamp_range(range, self.len_chars());
        if range.is_empty() {
            return;
        }
        self.rope.remove(range.clone());

        let removed = range.end - range.start;
        let map = |offset: usize| {
            if offset <= range.start {
                offset
            } else if offset >= range.end {
                offset - removed
            } else {
                range.start
            }
        };
        for attachment in &mut self.attachments {
            attachment.range = map(attachment.range.start)..map(attachment.range.end);
        }
        self.attachments.retain(|a| {
            let keep = !a.range.is_empty();
            if !keep {
                tracing::trace!(chip = %a.chip.id(), "chip region collapsed, detaching");
            }
            keep
        });
    }
}

impl ChipText for ChipBuffer {
    fn attach_chip(&mut self, chip: Chip, range: Range<usize>) {
        let range = clamp_range(range, self.len_chars());
        if let Some(existing) = self.position_of(chip.id()) {
            self.attachments.remove(existing);
        }
        if range.is_empty() {
            tracing::debug!(chip = %chip.id(), "refusing to attach chip over empty range");
            return;
        }
        tracing::trace!(chip = %chip.id(), ?range, "attaching chip");
        let at = self
            .attachments
            .partition_point(|a| a.range.start <= range.start);
        self.attachments.insert(at, Attachment { range, chip });
    }

    fn detach_chip(&mut self, id: ChipId) -> Option<Chip> {
        let index = self.position_of(id)?;
        tracing::trace!(chip = %id, "detaching chip");
        Some(self.attachments.remove(index).chip)
    }

    fn chip(&self, id: ChipId) -> Option<&Chip> {
        self.attachments
            .iter()
            .find(|a| a.chip.id() == id)
            .map(|a| &a.chip)
    }

    fn chip_mut(&mut self, id: ChipId) -> Option<&mut Chip> {
        self.attachments
            .iter_mut()
            .find(|a| a.chip.id() == id)
            .map(|a| &mut a.chip)
    }

    fn chip_range(&self, id: ChipId) -> Option<Range<usize>> {
        self.attachments
            .iter()
            .find(|a| a.chip.id() == id)
            .map(|a| a.range.clone())
    }

    fn chips_in(&self, range: Range<usize>) -> Vec<&Chip> {
        if range.start > self.len_chars() {
            return Vec::new();
        }
        let range = clamp_range(range, self.len_chars());
        // Regions starting after the query end can never match
        let upper = self
            .attachments
            .partition_point(|a| a.range.start <= range.end);
        self.attachments[..upper]
            .iter()
            .filter(|a| {
                if range.is_empty() {
                    a.range.start <= range.start && range.start <= a.range.end
                } else {
                    a.range.start < range.end && a.range.end > range.start
                }
            })
            .map(|a| &a.chip)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with_chip(text: &str, range: Range<usize>) -> (ChipBuffer, ChipId) {
        let mut buf = ChipBuffer::from_text(text);
        let chip = Chip::new("chip", None);
        let id = chip.id();
        buf.attach_chip(chip, range);
        (buf, id)
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(2..10, 5), 2..5);
        assert_eq!(clamp_range(7..3, 5), 5..5);
        assert_eq!(clamp_range(4..1, 5), 4..4);
    }

    #[test]
    fn test_buffer_basic() {
        let buf = ChipBuffer::from_text("héllo");
        assert_eq!(buf.len_chars(), 5);
        assert_eq!(buf.char_at(1), Some('é'));
        assert_eq!(buf.char_at(5), None);
        assert_eq!(buf.slice(1..3), "él");
        assert_eq!(buf.slice(3..99), "lo");
    }

    #[test]
    fn test_buffer_replace() {
        let mut buf = ChipBuffer::from_text("hello world");
        buf.replace(6..11, "there");
        assert_eq!(buf.content(), "hello there");
    }

    #[test]
    fn test_insert_before_chip_shifts_region() {
        let (mut buf, id) = buffer_with_chip("ab cd", 3..5);
        buf.insert(0, "xx");
        assert_eq!(buf.chip_range(id), Some(5..7));
    }

    #[test]
    fn test_insert_at_chip_start_does_not_grow_region() {
        let (mut buf, id) = buffer_with_chip("ab cd", 3..5);
        buf.insert(3, "!");
        assert_eq!(buf.chip_range(id), Some(4..6));
    }

    #[test]
    fn test_insert_inside_chip_grows_region() {
        let (mut buf, id) = buffer_with_chip("ab cd", 3..5);
        buf.insert(4, "!!");
        assert_eq!(buf.chip_range(id), Some(3..7));
    }

    #[test]
    fn test_insert_at_chip_end_leaves_region() {
        let (mut buf, id) = buffer_with_chip("ab cd", 0..2);
        buf.insert(2, "zz");
        assert_eq!(buf.chip_range(id), Some(0..2));
    }

    #[test]
    fn test_remove_overlapping_shrinks_region() {
        let (mut buf, id) = buffer_with_chip("abcdef", 2..5);
        buf.remove(4..6);
        assert_eq!(buf.content(), "abcd");
        assert_eq!(buf.chip_range(id), Some(2..4));
    }

    #[test]
    fn test_remove_whole_region_detaches_chip() {
        let (mut buf, id) = buffer_with_chip("abcdef", 2..4);
        buf.remove(1..5);
        assert_eq!(buf.chip_range(id), None);
        assert_eq!(buf.chip_count(), 0);
    }

    #[test]
    fn test_attach_empty_range_is_ignored() {
        let (buf, id) = buffer_with_chip("abc", 1..1);
        assert!(buf.chip(id).is_none());
    }

    #[test]
    fn test_attachments_sorted_by_start() {
        let mut buf = ChipBuffer::from_text("aaaa bbbb cccc");
        let c = Chip::new("c", None);
        let a = Chip::new("a", None);
        let b = Chip::new("b", None);
        buf.attach_chip(c, 10..14);
        buf.attach_chip(a, 0..4);
        buf.attach_chip(b, 5..9);
        let texts: Vec<&str> = buf.chips().map(|(chip, _)| chip.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chips_in_intersection() {
        let mut buf = ChipBuffer::from_text("aaaa bbbb");
        let a = Chip::new("a", None);
        let b = Chip::new("b", None);
        buf.attach_chip(a, 0..4);
        buf.attach_chip(b, 5..9);

        assert_eq!(buf.chips_in(0..9).len(), 2);
        assert_eq!(buf.chips_in(3..6).len(), 2);
        assert_eq!(buf.chips_in(4..5).len(), 0);
        // Empty query touching a region boundary
        assert_eq!(buf.chips_in(4..4).len(), 1);
        assert_eq!(buf.chips_in(5..5).len(), 1);
    }

    #[test]
    fn test_chips_in_past_the_end() {
        let mut buf = ChipBuffer::from_text("aaaa bbbb");
        buf.attach_chip(Chip::new("b", None), 5..9);

        assert!(buf.chips_in(20..30).is_empty());
        assert!(buf.chips_in(10..10).is_empty());
        // Overhanging queries are clamped, not dropped
        assert_eq!(buf.chips_in(8..30).len(), 1);
        assert_eq!(buf.chips_in(9..9).len(), 1);
    }

    #[test]
    fn test_insert_chipped_attaches_relative_ranges() {
        let mut buf = ChipBuffer::from_text("ab");
        let chip = Chip::new("x", None);
        let id = chip.id();
        buf.insert_chipped(1, ChippedText::with_chip("[x]", chip));
        assert_eq!(buf.content(), "a[x]b");
        assert_eq!(buf.chip_range(id), Some(1..4));
    }

    #[test]
    fn test_replace_chipped() {
        let mut buf = ChipBuffer::from_text("hello world");
        let chip = Chip::new("world", None);
        let id = chip.id();
        buf.replace_chipped(6..11, ChippedText::with_chip("<world>", chip));
        assert_eq!(buf.content(), "hello <world>");
        assert_eq!(buf.chip_range(id), Some(6..13));
    }

    #[test]
    fn test_clear_detaches_everything() {
        let (mut buf, _) = buffer_with_chip("abc", 0..3);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.chip_count(), 0);
    }
}
