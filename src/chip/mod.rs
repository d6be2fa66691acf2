//! Chip entities.
//!
//! A [`Chip`] is the atomic unit a run of text turns into once it has been
//! "chipified". The chip carries its logical text, optional opaque data, a
//! visual state set and whatever style the [`ChipFactory`] configured on it.
//! The buffer owns chips through its attachment table; everything else
//! refers to them by [`ChipId`].

mod factory;

pub use factory::{ChipConfiguration, ChipFactory, ChipStyle, DefaultChipFactory};

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static NEXT_CHIP_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique chip identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChipId(u64);

impl ChipId {
    /// Allocate a fresh id
    pub fn next() -> Self {
        Self(NEXT_CHIP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chip#{}", self.0)
    }
}

bitflags! {
    /// Visual state flags of a chip (interpreted only by renderers).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChipState: u8 {
        const PRESSED = 0b0001;
        const SELECTED = 0b0010;
        const FOCUSED = 0b0100;
    }
}

/// An atomic, non-editable unit of converted text.
#[derive(Debug, Clone, PartialEq)]
pub struct Chip {
    id: ChipId,
    text: String,
    data: Option<Value>,
    state: ChipState,
    style: ChipStyle,
}

impl Chip {
    /// Create a chip with a fresh id and default style
    pub fn new(text: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            id: ChipId::next(),
            text: text.into(),
            data,
            state: ChipState::empty(),
            style: ChipStyle::default(),
        }
    }

    /// Duplicate `existing` under a new identity, keeping text, data, state and style
    pub fn duplicate(existing: &Chip) -> Self {
        Self {
            id: ChipId::next(),
            ..existing.clone()
        }
    }

    pub fn id(&self) -> ChipId {
        self.id
    }

    /// The logical text of the chip
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    pub fn state(&self) -> ChipState {
        self.state
    }

    pub fn set_state(&mut self, state: ChipState) {
        self.state = state;
    }

    pub fn style(&self) -> &ChipStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut ChipStyle {
        &mut self.style
    }

    /// Text + data snapshot, e.g. for restoring a field later
    pub fn info(&self) -> ChipInfo {
        ChipInfo {
            text: self.text.clone(),
            data: self.data.clone(),
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Text and optional data describing a chip to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipInfo {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ChipInfo {
    pub fn new(text: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            text: text.into(),
            data,
        }
    }
}

impl From<&str> for ChipInfo {
    fn from(text: &str) -> Self {
        Self::new(text, None)
    }
}
