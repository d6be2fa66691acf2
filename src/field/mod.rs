//! The chip field: a text buffer that turns typed tokens into chips.
//!
//! [`ChipField`] owns the [`ChipBuffer`] and the selection, and plugs the
//! tokenizer, terminator handler, validator and illegal-character filter
//! together. Every collaborator is optional; chip operations quietly do
//! nothing without a tokenizer.

mod edit;
mod messages;
mod watcher;

pub use edit::{EditKind, TextEdit};
pub use messages::FieldMsg;
pub use watcher::{ChangeWatcher, UnwatchedChange};

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::chip::{Chip, ChipConfiguration, ChipId, ChipInfo, ChipState};
use crate::editable::{
    clamp_range, ChipBuffer, ChipText, IllegalCharacterIdentifier, TextBuffer, TextBufferMut,
};
use crate::terminator::TerminatorHandler;
use crate::tokenizer::ChipTokenizer;
use crate::validator::ChipValidator;

/// Callback fired for every chip an edit removes.
pub type ChipRemovedListener = Box<dyn FnMut(&Chip)>;

/// What clicking a chip does when editing on click is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditChipOnClick {
    /// Move the chip's text to the end of the field instead of editing in place
    pub move_to_end: bool,
    /// Chipify all unterminated tokens before editing the chip
    pub chipify_unterminated: bool,
}

/// Host for a chip-tokenized text buffer.
pub struct ChipField {
    buffer: ChipBuffer,
    selection: Range<usize>,
    tokenizer: Option<Box<dyn ChipTokenizer>>,
    terminator_handler: Option<Box<dyn TerminatorHandler>>,
    validator: Option<Box<dyn ChipValidator>>,
    illegal_characters: Option<Box<dyn IllegalCharacterIdentifier>>,
    configuration: Option<ChipConfiguration>,
    on_chip_removed: Option<ChipRemovedListener>,
    edit_on_click: Option<EditChipOnClick>,
    watcher: ChangeWatcher,
}

impl Default for ChipField {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChipField")
            .field("buffer", &self.buffer)
            .field("selection", &self.selection)
            .field("has_tokenizer", &self.tokenizer.is_some())
            .field("has_terminator_handler", &self.terminator_handler.is_some())
            .field("has_validator", &self.validator.is_some())
            .field("configuration", &self.configuration)
            .field("edit_on_click", &self.edit_on_click)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ChipField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain_text(0..self.buffer.len_chars()))
    }
}

// =============================================================================
// Construction and collaborators
// =============================================================================

impl ChipField {
    /// An empty field with no collaborators
    pub fn new() -> Self {
        Self {
            buffer: ChipBuffer::new(),
            selection: 0..0,
            tokenizer: None,
            terminator_handler: None,
            validator: None,
            illegal_characters: None,
            configuration: None,
            on_chip_removed: None,
            edit_on_click: None,
            watcher: ChangeWatcher::new(),
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: impl ChipTokenizer + 'static) -> Self {
        self.set_tokenizer(Box::new(tokenizer));
        self
    }

    pub fn with_terminator_handler(mut self, handler: impl TerminatorHandler + 'static) -> Self {
        self.set_terminator_handler(Box::new(handler));
        self
    }

    pub fn with_validator(mut self, validator: impl ChipValidator + 'static) -> Self {
        self.set_validator(Box::new(validator));
        self
    }

    pub fn with_illegal_characters(
        mut self,
        illegal: impl IllegalCharacterIdentifier + 'static,
    ) -> Self {
        self.set_illegal_characters(Box::new(illegal));
        self
    }

    /// Install a tokenizer, applying the current chip configuration to it
    pub fn set_tokenizer(&mut self, tokenizer: Box<dyn ChipTokenizer>) {
        self.tokenizer = Some(tokenizer);
        self.invalidate_chips();
    }

    pub fn clear_tokenizer(&mut self) {
        self.tokenizer = None;
    }

    pub fn set_terminator_handler(&mut self, handler: Box<dyn TerminatorHandler>) {
        self.terminator_handler = Some(handler);
    }

    pub fn terminator_handler_mut(&mut self) -> Option<&mut (dyn TerminatorHandler + 'static)> {
        self.terminator_handler.as_deref_mut()
    }

    pub fn set_validator(&mut self, validator: Box<dyn ChipValidator>) {
        self.validator = Some(validator);
    }

    pub fn set_illegal_characters(&mut self, illegal: Box<dyn IllegalCharacterIdentifier>) {
        self.illegal_characters = Some(illegal);
    }

    pub fn set_on_chip_removed(&mut self, listener: impl FnMut(&Chip) + 'static) {
        self.on_chip_removed = Some(Box::new(listener));
    }

    pub fn has_tokenizer(&self) -> bool {
        self.tokenizer.is_some()
    }

    /// Watcher shared with the edit pipeline; hold an [`UnwatchedChange`]
    /// from it to apply edits without chip handling
    pub fn watcher(&self) -> &ChangeWatcher {
        &self.watcher
    }
}

// =============================================================================
// Buffer and selection access
// =============================================================================

impl ChipField {
    pub fn buffer(&self) -> &ChipBuffer {
        &self.buffer
    }

    /// Raw buffer contents, chip encodings included
    pub fn content(&self) -> String {
        self.buffer.content()
    }

    pub fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Caret offset (end of the selection)
    pub fn caret(&self) -> usize {
        self.selection.end
    }

    pub fn set_selection(&mut self, range: Range<usize>) {
        self.selection = clamp_range(range, self.buffer.len_chars());
    }

    pub fn set_caret(&mut self, offset: usize) {
        let offset = offset.min(self.buffer.len_chars());
        self.selection = offset..offset;
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.buffer.len_chars();
    }

    fn move_caret_to_end(&mut self) {
        self.set_caret(self.buffer.len_chars());
    }

    /// `range` with every chip region replaced by the chip's text.
    ///
    /// A chip only partly inside `range` contributes its whole text.
    pub fn plain_text(&self, range: Range<usize>) -> String {
        let range = clamp_range(range, self.buffer.len_chars());
        let mut out = String::new();
        let mut pos = range.start;

        for chip in self.buffer.chips_in(range.clone()) {
            let Some(region) = self.buffer.chip_range(chip.id()) else {
                continue;
            };
            if region.start > pos {
                out.push_str(&self.buffer.slice(pos..region.start));
            }
            out.push_str(chip.text());
            pos = pos.max(region.end);
        }
        if pos < range.end {
            out.push_str(&self.buffer.slice(pos..range.end));
        }
        out
    }
}

// =============================================================================
// Bulk set/get
// =============================================================================

impl ChipField {
    /// Replace the contents with one chip per value
    pub fn set_chip_values<S: AsRef<str>>(&mut self, values: &[S]) {
        let infos: Vec<ChipInfo> = values.iter().map(|v| ChipInfo::from(v.as_ref())).collect();
        self.set_chips(&infos);
    }

    /// Replace the contents with one chip per entry, carrying its data
    pub fn set_chips(&mut self, chips: &[ChipInfo]) {
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return;
        };
        let _guard = self.watcher.unwatched();

        // Through the tokenizer, so it can forget the values it handed out
        let existing: Vec<ChipId> = self.buffer.chips().map(|(chip, _)| chip.id()).collect();
        for id in existing {
            tokenizer.delete_chip(id, &mut self.buffer);
        }
        self.buffer.clear();
        for info in chips {
            let chipped = tokenizer.terminate_token(&info.text, info.data.clone());
            self.buffer.append_chipped(chipped);
        }
        tracing::debug!(count = chips.len(), "field contents replaced with chips");
        self.move_caret_to_end();
    }

    /// Texts of all chips in buffer order
    pub fn chip_values(&self) -> Vec<String> {
        if self.tokenizer.is_none() {
            return Vec::new();
        }
        self.buffer.chips().map(|(chip, _)| chip.text().to_string()).collect()
    }

    /// Trimmed texts of all unterminated tokens in buffer order
    pub fn token_values(&self) -> Vec<String> {
        let Some(tokenizer) = self.tokenizer.as_deref() else {
            return Vec::new();
        };
        let mut tokens = tokenizer.find_all_tokens(&self.buffer);
        tokens.sort_by_key(|range| range.start);
        tokens
            .into_iter()
            .map(|range| self.buffer.slice(range).trim().to_string())
            .collect()
    }

    /// Chip values followed by token values
    pub fn chip_and_token_values(&self) -> Vec<String> {
        let mut values = self.chip_values();
        values.extend(self.token_values());
        values
    }

    /// Snapshot of every attached chip in buffer order
    pub fn all_chips(&self) -> Vec<Chip> {
        if self.tokenizer.is_none() {
            return Vec::new();
        }
        self.buffer.chips().map(|(chip, _)| chip.clone()).collect()
    }

    /// Region of an attached chip
    pub fn chip_range(&self, id: ChipId) -> Option<Range<usize>> {
        self.buffer.chip_range(id)
    }

    /// Clear the field, notifying the listener about every removed chip
    pub fn clear(&mut self) {
        let len = self.buffer.len_chars();
        self.edit(TextEdit::delete(0..len));
    }
}

// =============================================================================
// Chipifying
// =============================================================================

impl ChipField {
    /// Chipify the text in `range` as a single chip
    pub fn chipify(&mut self, range: Range<usize>) {
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return;
        };
        let range = clamp_range(range, self.buffer.len_chars());
        let token = self.buffer.slice(range.clone());
        if token.trim().is_empty() {
            return;
        }
        let _guard = self.watcher.unwatched();

        let chipped = tokenizer.terminate_token(&token, None);
        let chipped_len = chipped.len_chars();
        self.buffer.replace_chipped(range.clone(), chipped);
        self.set_caret(range.start + chipped_len);
    }

    pub fn chipify_all_unterminated_tokens(&mut self) {
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return;
        };
        let _guard = self.watcher.unwatched();
        tokenizer.terminate_all_tokens(&mut self.buffer);
        self.move_caret_to_end();
    }

    /// Replace the token being typed at the caret with a chip for `text`
    pub fn commit_suggestion(&mut self, text: &str, data: Option<serde_json::Value>) {
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return;
        };
        let end = self.selection.end.min(self.buffer.len_chars());
        let start = tokenizer.find_token_start(&self.buffer, end).min(end);
        let _guard = self.watcher.unwatched();

        let chipped = tokenizer.terminate_token(text, data);
        let chipped_len = chipped.len_chars();
        self.buffer.replace_chipped(start..end, chipped);
        tracing::debug!(text, start, end, "suggestion committed");
        self.set_caret(start + chipped_len);
    }

    /// Re-create every chip with the current configuration
    pub fn invalidate_chips(&mut self) {
        let (Some(tokenizer), Some(config)) = (self.tokenizer.as_deref_mut(), self.configuration)
        else {
            return;
        };
        let _guard = self.watcher.unwatched();
        let selection = self.selection.clone();
        tokenizer.apply_configuration(&mut self.buffer, &config);
        self.set_selection(selection);
    }

    pub fn set_chip_configuration(&mut self, config: ChipConfiguration) {
        self.configuration = Some(config);
        self.invalidate_chips();
    }

    pub fn chip_configuration(&self) -> Option<&ChipConfiguration> {
        self.configuration.as_ref()
    }
}

// =============================================================================
// Editing chips
// =============================================================================

impl ChipField {
    /// Turn a chip back into editable text.
    ///
    /// In place, the caret lands at the end of the restored text. With
    /// `move_to_end` the chip is removed and its text appended to the field.
    pub fn set_editing_chip(&mut self, id: ChipId, move_to_end: bool) -> bool {
        let Some(tokenizer) = self.tokenizer.as_deref_mut() else {
            return false;
        };
        let Some(chip) = self.buffer.chip(id).cloned() else {
            return false;
        };
        let _guard = self.watcher.unwatched();

        if move_to_end {
            tokenizer.delete_chip(id, &mut self.buffer);
            self.buffer.append(chip.text());
            self.move_caret_to_end();
        } else {
            let start = tokenizer.find_chip_start(id, &self.buffer).unwrap_or(0);
            tokenizer.revert_chip_to_token(id, &mut self.buffer);
            self.set_caret(start + chip.text().chars().count());
        }
        tracing::debug!(chip = %id, move_to_end, "editing chip");
        true
    }

    pub fn enable_edit_chip_on_click(&mut self, move_to_end: bool, chipify_unterminated: bool) {
        self.edit_on_click = Some(EditChipOnClick {
            move_to_end,
            chipify_unterminated,
        });
    }

    pub fn disable_edit_chip_on_click(&mut self) {
        self.edit_on_click = None;
    }

    pub fn edit_chip_on_click(&self) -> Option<EditChipOnClick> {
        self.edit_on_click
    }

    /// Handle a click on a chip. Returns whether the chip went into editing.
    pub fn on_chip_clicked(&mut self, id: ChipId) -> bool {
        let Some(settings) = self.edit_on_click else {
            return false;
        };
        if self.tokenizer.is_none() {
            return false;
        }
        let Some(chip) = self.buffer.chip_mut(id) else {
            return false;
        };
        chip.set_state(ChipState::PRESSED | ChipState::SELECTED);

        if settings.chipify_unterminated {
            self.chipify_all_unterminated_tokens();
        }
        self.set_editing_chip(id, settings.move_to_end)
    }

    /// Reset the visual state of every chip
    pub fn clear_chip_states(&mut self) {
        let ids: Vec<ChipId> = self.buffer.chips().map(|(chip, _)| chip.id()).collect();
        for id in ids {
            if let Some(chip) = self.buffer.chip_mut(id) {
                chip.set_state(ChipState::empty());
            }
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

impl ChipField {
    pub fn is_valid(&self) -> bool {
        match (self.validator.as_deref(), self.tokenizer.as_deref()) {
            (Some(validator), Some(tokenizer)) => validator.is_valid(tokenizer, &self.buffer),
            _ => !self.buffer.is_empty(),
        }
    }

    /// Fix the contents if they are invalid. Returns whether anything changed.
    pub fn perform_validation(&mut self) -> bool {
        let (Some(validator), Some(tokenizer)) =
            (self.validator.as_deref(), self.tokenizer.as_deref_mut())
        else {
            return false;
        };
        if validator.is_valid(&*tokenizer, &self.buffer) {
            return false;
        }
        let _guard = self.watcher.unwatched();
        self.buffer = validator.fix_text(tokenizer, &self.buffer);
        tracing::info!(chips = self.buffer.chip_count(), "field contents fixed by validator");
        self.move_caret_to_end();
        true
    }
}
