//! Terminator handling: turning text into chips when trigger characters
//! show up in an edit window.

mod iterator;

pub use iterator::TextIterator;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::editable::ChipText;
use crate::tokenizer::ChipTokenizer;

/// What happens when a terminator character is encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminatorBehavior {
    /// Chipify every unterminated token in the buffer
    ChipifyAll,
    /// Chipify the token around the terminator
    ChipifyCurrentToken,
    /// Chipify the text between the token start and the terminator
    ChipifyToTerminator,
}

/// Behavior applied to every terminator found while handling a paste.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PasteBehavior {
    /// Use each terminator's own behavior
    UseDefault,
    ChipifyAll,
    ChipifyCurrentToken,
    #[default]
    ChipifyToTerminator,
}

impl PasteBehavior {
    /// The behavior forced on all terminators, if any
    pub fn override_behavior(self) -> Option<TerminatorBehavior> {
        match self {
            PasteBehavior::UseDefault => None,
            PasteBehavior::ChipifyAll => Some(TerminatorBehavior::ChipifyAll),
            PasteBehavior::ChipifyCurrentToken => Some(TerminatorBehavior::ChipifyCurrentToken),
            PasteBehavior::ChipifyToTerminator => Some(TerminatorBehavior::ChipifyToTerminator),
        }
    }
}

impl From<TerminatorBehavior> for PasteBehavior {
    fn from(behavior: TerminatorBehavior) -> Self {
        match behavior {
            TerminatorBehavior::ChipifyAll => PasteBehavior::ChipifyAll,
            TerminatorBehavior::ChipifyCurrentToken => PasteBehavior::ChipifyCurrentToken,
            TerminatorBehavior::ChipifyToTerminator => PasteBehavior::ChipifyToTerminator,
        }
    }
}

/// Scans edit windows for terminator characters and chipifies accordingly.
pub trait TerminatorHandler {
    /// Replace all terminators
    fn set_terminators(&mut self, terminators: HashMap<char, TerminatorBehavior>);

    /// Add or update a single terminator
    fn add_terminator(&mut self, ch: char, behavior: TerminatorBehavior);

    fn set_paste_behavior(&mut self, behavior: PasteBehavior);

    /// Handle every terminator in `[start, end)` of `text`.
    ///
    /// Returns the new selection offset, or `None` to leave the selection to
    /// the host's usual post-edit logic.
    fn find_and_handle_terminators(
        &self,
        tokenizer: &mut dyn ChipTokenizer,
        text: &mut dyn ChipText,
        start: usize,
        end: usize,
        is_paste: bool,
    ) -> Option<usize>;
}

/// Map-based terminator handler.
#[derive(Debug, Clone, Default)]
pub struct DefaultTerminatorHandler {
    terminators: HashMap<char, TerminatorBehavior>,
    paste_behavior: PasteBehavior,
}

impl DefaultTerminatorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_terminator(mut self, ch: char, behavior: TerminatorBehavior) -> Self {
        self.add_terminator(ch, behavior);
        self
    }

    pub fn with_paste_behavior(mut self, behavior: PasteBehavior) -> Self {
        self.set_paste_behavior(behavior);
        self
    }

    pub fn terminators(&self) -> &HashMap<char, TerminatorBehavior> {
        &self.terminators
    }

    pub fn paste_behavior(&self) -> PasteBehavior {
        self.paste_behavior
    }

    pub fn remove_terminator(&mut self, ch: char) -> Option<TerminatorBehavior> {
        self.terminators.remove(&ch)
    }

    fn resolve(&self, configured: TerminatorBehavior, is_paste: bool) -> TerminatorBehavior {
        if is_paste {
            self.paste_behavior
                .override_behavior()
                .unwrap_or(configured)
        } else {
            configured
        }
    }

    fn chipify_all(iter: &mut TextIterator<'_>, tokenizer: &mut dyn ChipTokenizer) -> usize {
        iter.delete_char(true);
        tokenizer.terminate_all_tokens(iter.text_mut());
        iter.total_len()
    }

    fn chipify_current_token(
        iter: &mut TextIterator<'_>,
        tokenizer: &mut dyn ChipTokenizer,
    ) -> Option<usize> {
        iter.delete_char(true);
        let index = iter.index();
        let token_start = tokenizer.find_token_start(iter.text(), index);
        let token_end = tokenizer.find_token_end(iter.text(), index);
        if token_start >= token_end {
            return None;
        }
        let token = iter.text().slice(token_start..token_end);
        if token.trim().is_empty() {
            return None;
        }
        let chipped = tokenizer.terminate_token(&token, None);
        let chipped_len = chipped.len_chars();
        iter.replace(token_start, token_end, chipped);
        Some(token_start + chipped_len)
    }

    fn chipify_to_terminator(iter: &mut TextIterator<'_>, tokenizer: &mut dyn ChipTokenizer) {
        let index = iter.index();
        if index > 0 {
            let token_start = tokenizer.find_token_start(iter.text(), index);
            if token_start < index {
                let token = iter.text().slice(token_start..index);
                let chipped = tokenizer.terminate_token(&token, None);
                // The terminator itself is dropped with the replaced range
                iter.replace(token_start, index + 1, chipped);
                return;
            }
        }
        iter.delete_char(false);
    }
}

impl TerminatorHandler for DefaultTerminatorHandler {
    fn set_terminators(&mut self, terminators: HashMap<char, TerminatorBehavior>) {
        self.terminators = terminators;
    }

    fn add_terminator(&mut self, ch: char, behavior: TerminatorBehavior) {
        self.terminators.insert(ch, behavior);
    }

    fn set_paste_behavior(&mut self, behavior: PasteBehavior) {
        self.paste_behavior = behavior;
    }

    fn find_and_handle_terminators(
        &self,
        tokenizer: &mut dyn ChipTokenizer,
        text: &mut dyn ChipText,
        start: usize,
        end: usize,
        is_paste: bool,
    ) -> Option<usize> {
        if self.terminators.is_empty() {
            return None;
        }

        let mut iter = TextIterator::new(text, start, end);
        let mut selection = None;

        while let Some(ch) = iter.next_char() {
            let Some(&configured) = self.terminators.get(&ch) else {
                continue;
            };
            let behavior = self.resolve(configured, is_paste);
            tracing::debug!(?ch, ?behavior, index = iter.index(), is_paste, "terminator found");

            match behavior {
                TerminatorBehavior::ChipifyAll => {
                    // The whole buffer was rewritten; the window is meaningless now
                    selection = Some(Self::chipify_all(&mut iter, tokenizer));
                    break;
                }
                TerminatorBehavior::ChipifyCurrentToken => {
                    if let Some(new_selection) = Self::chipify_current_token(&mut iter, tokenizer) {
                        selection = Some(new_selection);
                    }
                }
                TerminatorBehavior::ChipifyToTerminator => {
                    Self::chipify_to_terminator(&mut iter, tokenizer);
                }
            }
        }

        selection
    }
}
