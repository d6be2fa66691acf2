//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use chipfield::editable::{ChipBuffer, TextBuffer};
use chipfield::field::ChipField;
use chipfield::terminator::{DefaultTerminatorHandler, PasteBehavior, TerminatorBehavior};
use chipfield::tokenizer::{ChipTokenizer, SpanChipTokenizer, TokenDelimiter, CHIP_SEPARATOR};

/// Expected buffer encoding of a single chip
pub fn chip_text(text: &str) -> String {
    SpanChipTokenizer::encode_text(text)
}

/// Expected buffer encoding of consecutive chips
pub fn chips_text(texts: &[&str]) -> String {
    texts.iter().map(|t| chip_text(t)).collect()
}

/// Field with a separator-delimited tokenizer and the given terminators
pub fn field_with(terminators: &[(char, TerminatorBehavior)]) -> ChipField {
    field_with_paste(terminators, PasteBehavior::default())
}

pub fn field_with_paste(
    terminators: &[(char, TerminatorBehavior)],
    paste: PasteBehavior,
) -> ChipField {
    let mut handler = DefaultTerminatorHandler::new().with_paste_behavior(paste);
    for &(ch, behavior) in terminators {
        handler = handler.with_terminator(ch, behavior);
    }
    ChipField::new()
        .with_tokenizer(SpanChipTokenizer::new())
        .with_terminator_handler(handler)
}

/// Whitespace-delimited tokenizer
pub fn whitespace_tokenizer() -> SpanChipTokenizer {
    SpanChipTokenizer::new().with_delimiter(TokenDelimiter::Whitespace)
}

/// Chip texts in buffer order
pub fn chip_values(tokenizer: &dyn ChipTokenizer, buffer: &ChipBuffer) -> Vec<String> {
    tokenizer
        .find_all_chips(0, buffer.len_chars(), buffer)
        .iter()
        .map(|chip| chip.text().to_string())
        .collect()
}

/// Non-whitespace characters outside of chip separators
pub fn visible_chars(text: &str) -> usize {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != CHIP_SEPARATOR)
        .count()
}
