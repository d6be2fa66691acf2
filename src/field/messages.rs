//! Message type for driving a [`ChipField`] from an event loop.

use std::ops::Range;

use super::ChipField;
use crate::chip::{ChipId, ChipInfo};

/// Everything a host can ask the field to do.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldMsg {
    // === Input ===
    /// A single typed character
    TypeChar(char),
    /// Text typed character by character
    TypeText(String),
    /// Text pasted in one go
    Paste(String),
    /// Commit an autocomplete suggestion at the caret
    CommitSuggestion(ChipInfo),

    // === Deletion ===
    DeleteBackward,
    DeleteForward,
    Clear,

    // === Selection ===
    SetSelection(Range<usize>),
    SelectAll,

    // === Chips ===
    ClickChip(ChipId),
    ClearChipStates,
    SetChips(Vec<ChipInfo>),
    ChipifyAll,
    Validate,
}

impl FieldMsg {
    /// Whether the message can change the buffer contents
    pub fn is_editing(&self) -> bool {
        !matches!(
            self,
            FieldMsg::SetSelection(_) | FieldMsg::SelectAll | FieldMsg::ClearChipStates
        )
    }
}

impl ChipField {
    /// Apply a message. Returns true if the contents or the selection changed.
    pub fn update(&mut self, msg: FieldMsg) -> bool {
        let before = (self.content(), self.buffer.chip_count(), self.selection());
        tracing::trace!(?msg, "field update");

        match msg {
            FieldMsg::TypeChar(ch) => self.type_char(ch),
            FieldMsg::TypeText(text) => self.type_text(&text),
            FieldMsg::Paste(text) => self.paste(&text),
            FieldMsg::CommitSuggestion(info) => self.commit_suggestion(&info.text, info.data),
            FieldMsg::DeleteBackward => self.delete_backward(),
            FieldMsg::DeleteForward => self.delete_forward(),
            FieldMsg::Clear => self.clear(),
            FieldMsg::SetSelection(range) => self.set_selection(range),
            FieldMsg::SelectAll => self.select_all(),
            FieldMsg::ClickChip(id) => {
                self.on_chip_clicked(id);
            }
            FieldMsg::ClearChipStates => self.clear_chip_states(),
            FieldMsg::SetChips(chips) => self.set_chips(&chips),
            FieldMsg::ChipifyAll => self.chipify_all_unterminated_tokens(),
            FieldMsg::Validate => {
                self.perform_validation();
            }
        }

        before != (self.content(), self.buffer.chip_count(), self.selection())
    }
}
