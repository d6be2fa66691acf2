//! Tokenizer that never creates two chips with the same text.

use std::collections::HashSet;
use std::ops::Range;

use serde_json::Value;

use super::{ChipTokenizer, SpanChipTokenizer};
use crate::chip::{ChipConfiguration, ChipFactory, ChipId, DefaultChipFactory};
use crate::editable::{ChipText, ChippedText};

/// Wraps a [`SpanChipTokenizer`]; terminating a token whose text was already
/// chipified yields an empty encoding, so the duplicate simply disappears.
#[derive(Debug, Clone, Default)]
pub struct UniqueChipTokenizer<F: ChipFactory = DefaultChipFactory> {
    inner: SpanChipTokenizer<F>,
    seen: HashSet<String>,
}

impl UniqueChipTokenizer<DefaultChipFactory> {
    pub fn new() -> Self {
        Self::wrap(SpanChipTokenizer::new())
    }
}

impl<F: ChipFactory> UniqueChipTokenizer<F> {
    pub fn wrap(inner: SpanChipTokenizer<F>) -> Self {
        Self {
            inner,
            seen: HashSet::new(),
        }
    }

    /// Allow `text` to be chipified again
    pub fn forget(&mut self, text: &str) -> bool {
        self.seen.remove(text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    fn forget_chip(&mut self, chip: ChipId, text: &dyn ChipText) {
        if let Some(chip) = text.chip(chip) {
            self.seen.remove(chip.text());
        }
    }
}

impl<F: ChipFactory> ChipTokenizer for UniqueChipTokenizer<F> {
    fn apply_configuration(&mut self, text: &mut dyn ChipText, config: &ChipConfiguration) {
        self.inner.apply_configuration(text, config);
    }

    fn find_token_start(&self, text: &dyn ChipText, cursor: usize) -> usize {
        self.inner.find_token_start(text, cursor)
    }

    fn find_token_end(&self, text: &dyn ChipText, cursor: usize) -> usize {
        self.inner.find_token_end(text, cursor)
    }

    fn find_all_tokens(&self, text: &dyn ChipText) -> Vec<Range<usize>> {
        self.inner.find_all_tokens(text)
    }

    fn terminate_token(&mut self, text: &str, data: Option<Value>) -> ChippedText {
        let key = text.trim();
        if self.seen.contains(key) {
            tracing::debug!(text = key, "duplicate chip suppressed");
            return ChippedText::new();
        }
        let chipped = self.inner.terminate_token(text, data);
        if !chipped.is_empty() {
            self.seen.insert(key.to_string());
        }
        chipped
    }

    fn revert_chip_to_token(&mut self, chip: ChipId, text: &mut dyn ChipText) {
        self.forget_chip(chip, &*text);
        self.inner.revert_chip_to_token(chip, text);
    }

    fn delete_chip(&mut self, chip: ChipId, text: &mut dyn ChipText) {
        self.forget_chip(chip, &*text);
        self.inner.delete_chip(chip, text);
    }
}
