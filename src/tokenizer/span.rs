//! The default separator-encoding tokenizer.

use std::ops::Range;

use serde_json::Value;

use super::{ChipTokenizer, TokenDelimiter, CHIP_PADDING, CHIP_SEPARATOR};
use crate::chip::{Chip, ChipConfiguration, ChipFactory, DefaultChipFactory};
use crate::editable::{ChipText, ChippedText};

/// Tokenizer encoding chips as `<pad><SEP>text<SEP><pad>` regions.
#[derive(Debug, Clone, Default)]
pub struct SpanChipTokenizer<F: ChipFactory = DefaultChipFactory> {
    factory: F,
    configuration: Option<ChipConfiguration>,
    delimiter: TokenDelimiter,
}

impl SpanChipTokenizer<DefaultChipFactory> {
    pub fn new() -> Self {
        Self::with_factory(DefaultChipFactory)
    }

    /// The encoded form of `text`, without creating a chip
    pub fn encode_text(text: &str) -> String {
        encode_text(text)
    }
}

fn encode_text(text: &str) -> String {
    format!("{CHIP_PADDING}{CHIP_SEPARATOR}{text}{CHIP_SEPARATOR}{CHIP_PADDING}")
}

impl<F: ChipFactory> SpanChipTokenizer<F> {
    pub fn with_factory(factory: F) -> Self {
        Self {
            factory,
            configuration: None,
            delimiter: TokenDelimiter::default(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: TokenDelimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn delimiter(&self) -> TokenDelimiter {
        self.delimiter
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn configuration(&self) -> Option<&ChipConfiguration> {
        self.configuration.as_ref()
    }

    fn encode(&self, mut chip: Chip) -> ChippedText {
        if let Some(config) = &self.configuration {
            self.factory.configure_chip(&mut chip, config);
        }
        let encoded = encode_text(chip.text());
        ChippedText::with_chip(encoded, chip)
    }
}

impl<F: ChipFactory> ChipTokenizer for SpanChipTokenizer<F> {
    fn apply_configuration(&mut self, text: &mut dyn ChipText, config: &ChipConfiguration) {
        self.configuration = Some(*config);

        let chips = self.find_all_chips(0, text.len_chars(), &*text);
        tracing::debug!(count = chips.len(), "re-terminating chips with new configuration");
        for chip in chips {
            let Some(start) = self.find_chip_start(chip.id(), &*text) else {
                continue;
            };
            self.delete_chip(chip.id(), text);
            let recreated = self.factory.recreate_chip(&chip);
            text.insert_chipped(start, self.encode(recreated));
        }
    }

    fn find_token_start(&self, text: &dyn ChipText, cursor: usize) -> usize {
        let cursor = cursor.min(text.len_chars());
        let mut i = cursor;
        while i > 0 {
            match text.char_at(i - 1) {
                Some(ch) if self.delimiter.ends_token(ch) => break,
                _ => i -= 1,
            }
        }
        // Skip leading whitespace, never past the cursor
        while i < cursor && text.char_at(i).is_some_and(char::is_whitespace) {
            i += 1;
        }
        i
    }

    fn find_token_end(&self, text: &dyn ChipText, cursor: usize) -> usize {
        let len = text.len_chars();
        let mut i = cursor.min(len);
        while i < len {
            match text.char_at(i) {
                // The separator is preceded by the chip's pad
                Some(CHIP_SEPARATOR) => return i.saturating_sub(1),
                Some(ch) if self.delimiter.ends_token(ch) => return i,
                _ => i += 1,
            }
        }
        len
    }

    fn find_all_tokens(&self, text: &dyn ChipText) -> Vec<Range<usize>> {
        let mut tokens = Vec::new();
        let mut inside_chip = false;
        let mut idx = text.len_chars();

        while idx > 0 {
            idx -= 1;
            let Some(ch) = text.char_at(idx) else {
                continue;
            };
            if ch == CHIP_SEPARATOR {
                inside_chip = !inside_chip;
            } else if !inside_chip && !ch.is_whitespace() {
                let start = self.find_token_start(text, idx);
                let end = self.find_token_end(text, idx);
                if end > start {
                    tokens.push(start..end);
                    // Resume below the token we just found
                    idx = start;
                }
            }
        }

        tokens
    }

    fn terminate_token(&mut self, text: &str, data: Option<Value>) -> ChippedText {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            tracing::debug!("not terminating blank token");
            return ChippedText::new();
        }
        let chip = self.factory.create_chip(trimmed, data);
        tracing::trace!(chip = %chip.id(), text = trimmed, "terminating token");
        self.encode(chip)
    }
}
