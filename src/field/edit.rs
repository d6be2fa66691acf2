//! The edit pipeline: what happens to every external change of the field.

use std::ops::Range;

use super::ChipField;
use crate::chip::Chip;
use crate::editable::{clamp_range, strip_illegal, ChipText, TextBuffer, TextBufferMut};

/// How an edit reached the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditKind {
    /// Typed by the user
    #[default]
    Typing,
    /// Pasted or otherwise inserted in bulk
    Paste,
}

/// Replace `range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: Range<usize>,
    pub text: String,
    pub kind: EditKind,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: offset..offset,
            text: text.into(),
            kind: EditKind::Typing,
        }
    }

    pub fn delete(range: Range<usize>) -> Self {
        Self {
            range,
            text: String::new(),
            kind: EditKind::Typing,
        }
    }

    pub fn paste(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            kind: EditKind::Paste,
        }
    }

    pub fn is_paste(&self) -> bool {
        self.kind == EditKind::Paste
    }
}

/// Where `offset` ends up once `removed` is cut out of the buffer
fn offset_after_removal(offset: usize, removed: &Range<usize>) -> usize {
    if offset >= removed.end {
        offset - removed.len()
    } else if offset > removed.start {
        removed.start
    } else {
        offset
    }
}

impl ChipField {
    /// Apply an external edit and run it through chip handling.
    ///
    /// While an [`UnwatchedChange`](super::UnwatchedChange) is alive the
    /// edit is applied as-is.
    pub fn edit(&mut self, edit: TextEdit) {
        let is_paste = edit.is_paste();
        let range = clamp_range(edit.range, self.buffer.len_chars());

        if !self.watcher.is_watching() {
            tracing::trace!(?range, "applying unwatched edit");
            self.buffer.replace(range.clone(), &edit.text);
            let caret = range.start + edit.text.chars().count();
            self.selection = caret..caret;
            return;
        }

        let _guard = self.watcher.unwatched();

        // Removing any part of a chip removes all of it
        let range = self.delete_chips_in(range);

        self.buffer.replace(range.clone(), &edit.text);
        let mut window = range.start..range.start + edit.text.chars().count();

        let inserted = self.buffer.slice(window.clone());
        let stripped = strip_illegal(&inserted, self.illegal_characters.as_deref());
        if stripped != inserted {
            tracing::debug!(
                removed = inserted.chars().count() - stripped.chars().count(),
                "stripped illegal characters"
            );
            self.buffer.replace(window.clone(), &stripped);
            window.end = window.start + stripped.chars().count();
        }

        let caret = window.end;
        let caret = match (self.tokenizer.as_deref_mut(), self.terminator_handler.as_deref()) {
            (Some(tokenizer), Some(handler)) if !window.is_empty() => {
                let from_end = self.buffer.len_chars().saturating_sub(caret);
                handler
                    .find_and_handle_terminators(
                        tokenizer,
                        &mut self.buffer,
                        window.start,
                        window.end,
                        is_paste,
                    )
                    .unwrap_or_else(|| self.buffer.len_chars().saturating_sub(from_end))
            }
            _ => caret,
        };

        self.set_caret(caret);
    }

    /// Type a single character over the selection
    pub fn type_char(&mut self, ch: char) {
        self.edit(TextEdit {
            range: self.selection.clone(),
            text: ch.to_string(),
            kind: EditKind::Typing,
        });
    }

    /// Type `text` one character at a time
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.type_char(ch);
        }
    }

    /// Paste `text` over the selection
    pub fn paste(&mut self, text: &str) {
        self.edit(TextEdit::paste(self.selection.clone(), text));
    }

    /// Backspace
    pub fn delete_backward(&mut self) {
        let range = if self.selection.is_empty() {
            let caret = self.selection.start;
            if caret == 0 {
                return;
            }
            caret - 1..caret
        } else {
            self.selection.clone()
        };
        self.edit(TextEdit::delete(range));
    }

    /// Forward delete
    pub fn delete_forward(&mut self) {
        let range = if self.selection.is_empty() {
            let caret = self.selection.start;
            if caret >= self.buffer.len_chars() {
                return;
            }
            caret..caret + 1
        } else {
            self.selection.clone()
        };
        self.edit(TextEdit::delete(range));
    }

    /// Delete every chip touched by `range` and return `range` mapped onto
    /// the remaining text
    fn delete_chips_in(&mut self, range: Range<usize>) -> Range<usize> {
        if range.is_empty() {
            return range;
        }
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return range;
        };

        let doomed: Vec<Chip> = self
            .buffer
            .chips_in(range.clone())
            .into_iter()
            .cloned()
            .collect();

        let mut range = range;
        for chip in doomed {
            let Some(region) = self.buffer.chip_range(chip.id()) else {
                continue;
            };
            tokenizer.delete_chip(chip.id(), &mut self.buffer);
            range = offset_after_removal(range.start, &region)
                ..offset_after_removal(range.end, &region);
            tracing::debug!(chip = %chip.id(), text = chip.text(), "chip removed by edit");
            if let Some(listener) = self.on_chip_removed.as_mut() {
                listener(&chip);
            }
        }
        range
    }
}
