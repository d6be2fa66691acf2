//! Tokenizer engine: chip encoding and token/chip boundaries.
//!
//! A chip is stored in the buffer as
//! `<pad><SEP><chip text><SEP><pad>` with the chip attached across all of it.
//! Everything outside such regions is plain text; a *token* is a non-blank
//! run of that plain text. Tokens have no identity and are recomputed from
//! the buffer whenever they are needed.

mod span;
mod unique;

pub use span::SpanChipTokenizer;
pub use unique::UniqueChipTokenizer;

use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chip::{Chip, ChipConfiguration, ChipId};
use crate::editable::{ChipText, ChippedText};

/// Delimits chip regions. ASCII unit separator: not typable, and stripped
/// from pasted text by the host.
pub const CHIP_SEPARATOR: char = '\u{1f}';

/// Pad character placed on both sides of an encoded chip.
pub const CHIP_PADDING: char = ' ';

/// What ends a token besides a chip boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenDelimiter {
    /// Only chip separators end a token; `"aa bb"` is a single token
    #[default]
    Separator,
    /// Whitespace also ends a token; `"aa bb"` is two tokens
    Whitespace,
}

impl TokenDelimiter {
    fn ends_token(self, ch: char) -> bool {
        match self {
            TokenDelimiter::Separator => ch == CHIP_SEPARATOR,
            TokenDelimiter::Whitespace => ch == CHIP_SEPARATOR || ch.is_whitespace(),
        }
    }
}

/// Converts tokens to chips and back inside a [`ChipText`] buffer.
///
/// The buffer is borrowed for the duration of each call only.
pub trait ChipTokenizer {
    /// Store `config` and re-terminate every existing chip so it takes effect
    fn apply_configuration(&mut self, text: &mut dyn ChipText, config: &ChipConfiguration);

    /// Start of the token containing `cursor`; always in `[0, cursor]`
    fn find_token_start(&self, text: &dyn ChipText, cursor: usize) -> usize;

    /// End of the token containing `cursor` (exclusive)
    fn find_token_end(&self, text: &dyn ChipText, cursor: usize) -> usize;

    /// Every unterminated token, from the highest offset down
    fn find_all_tokens(&self, text: &dyn ChipText) -> Vec<Range<usize>>;

    /// Encode `text` (trimmed) as a chip carrying `data`
    fn terminate_token(&mut self, text: &str, data: Option<Value>) -> ChippedText;

    /// Replace every unterminated token with its chip encoding.
    ///
    /// Ranges are applied from the highest start offset down so pending
    /// ranges keep valid offsets while earlier ones are rewritten.
    fn terminate_all_tokens(&mut self, text: &mut dyn ChipText) {
        let mut tokens = self.find_all_tokens(&*text);
        tokens.sort_by(|a, b| b.start.cmp(&a.start));
        tracing::debug!(count = tokens.len(), "terminating all tokens");

        for range in tokens {
            let token = text.slice(range.clone());
            let chipped = self.terminate_token(&token, None);
            text.replace_chipped(range, chipped);
        }
    }

    fn find_chip_start(&self, chip: ChipId, text: &dyn ChipText) -> Option<usize> {
        text.chip_range(chip).map(|range| range.start)
    }

    fn find_chip_end(&self, chip: ChipId, text: &dyn ChipText) -> Option<usize> {
        text.chip_range(chip).map(|range| range.end)
    }

    /// Chips whose region intersects `[start, end)`
    fn find_all_chips(&self, start: usize, end: usize, text: &dyn ChipText) -> Vec<Chip> {
        text.chips_in(start..end).into_iter().cloned().collect()
    }

    /// Replace a chip's encoded region with its plain text
    fn revert_chip_to_token(&mut self, chip: ChipId, text: &mut dyn ChipText) {
        let Some(range) = text.chip_range(chip) else {
            return;
        };
        if let Some(chip) = text.detach_chip(chip) {
            text.replace(range, chip.text());
        }
    }

    /// Detach a chip and remove its encoded region
    fn delete_chip(&mut self, chip: ChipId, text: &mut dyn ChipText) {
        let Some(range) = text.chip_range(chip) else {
            return;
        };
        text.detach_chip(chip);
        if !range.is_empty() {
            text.remove(range);
        }
    }

    /// Like [`delete_chip`](Self::delete_chip), also removing padding added
    /// for this chip alone. The span encoding keeps its padding inside the
    /// chip region, so by default both are the same.
    fn delete_chip_and_padding(&mut self, chip: ChipId, text: &mut dyn ChipText) {
        self.delete_chip(chip, text);
    }
}
