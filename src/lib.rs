//! Chipfield - chip tokenization for text fields
//!
//! This crate turns runs of text in an editable buffer into atomic "chips"
//! when terminator characters are typed or pasted, and keeps chips and
//! plain text consistent while the buffer is edited.

pub mod chip;
pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod field;
pub mod terminator;
pub mod tokenizer;
pub mod tracing;
pub mod validator;

// Re-export commonly used types
pub use chip::{Chip, ChipId, ChipInfo};
pub use config::FieldConfig;
pub use editable::ChipBuffer;
pub use field::{ChipField, FieldMsg};
pub use terminator::{DefaultTerminatorHandler, PasteBehavior, TerminatorBehavior};
pub use tokenizer::{ChipTokenizer, SpanChipTokenizer};
