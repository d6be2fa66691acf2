//! Illegal-character filtering applied to freshly inserted text.
//!
//! The host runs inserted text through an [`IllegalCharacterIdentifier`]
//! before any terminator handling, so a character that is both a terminator
//! and illegal is treated as illegal.

use std::collections::BTreeSet;

use crate::tokenizer::CHIP_SEPARATOR;

/// Character filter function type. Returns true if the character is illegal.
pub type CharFilter = fn(char) -> bool;

/// Identifies characters that must never show up in the field.
pub trait IllegalCharacterIdentifier {
    fn is_illegal(&self, ch: char) -> bool;
}

impl<F> IllegalCharacterIdentifier for F
where
    F: Fn(char) -> bool,
{
    fn is_illegal(&self, ch: char) -> bool {
        self(ch)
    }
}

/// A set of explicitly illegal characters plus an optional filter function.
#[derive(Debug, Clone, Default)]
pub struct IllegalCharacters {
    chars: BTreeSet<char>,
    filter: Option<CharFilter>,
}

impl IllegalCharacters {
    /// No characters are illegal
    pub fn none() -> Self {
        Self::default()
    }

    /// Every character of `chars` is illegal
    pub fn from_chars(chars: impl IntoIterator<Item = char>) -> Self {
        Self {
            chars: chars.into_iter().collect(),
            filter: None,
        }
    }

    /// Characters for which `filter` returns true are illegal
    pub fn from_filter(filter: CharFilter) -> Self {
        Self {
            chars: BTreeSet::new(),
            filter: Some(filter),
        }
    }

    pub fn with_filter(mut self, filter: CharFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn insert(&mut self, ch: char) {
        self.chars.insert(ch);
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty() && self.filter.is_none()
    }
}

impl IllegalCharacterIdentifier for IllegalCharacters {
    fn is_illegal(&self, ch: char) -> bool {
        self.chars.contains(&ch) || self.filter.is_some_and(|filter| filter(ch))
    }
}

/// Remove every illegal character from `text`.
///
/// The chip separator is always stripped, whatever `identifier` says.
pub fn strip_illegal(text: &str, identifier: Option<&dyn IllegalCharacterIdentifier>) -> String {
    text.chars()
        .filter(|&ch| ch != CHIP_SEPARATOR && !identifier.is_some_and(|id| id.is_illegal(ch)))
        .collect()
}
