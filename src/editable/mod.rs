//! Editable text storage for chip fields.
//!
//! # Architecture
//!
//! - [`TextBuffer`] / [`TextBufferMut`]: character-offset buffer traits
//! - [`ChipText`]: buffer capability for attaching chips over ranges
//! - [`ChipBuffer`]: `ropey::Rope` + sorted attachment table
//! - [`ChippedText`]: a text fragment that carries chips to attach on insert
//! - [`IllegalCharacters`]: characters stripped from inserted text
//!
//! # Example
//!
//! ```
//! use chipfield::chip::Chip;
//! use chipfield::editable::{ChipBuffer, ChipText, TextBuffer, TextBufferMut};
//!
//! let mut buffer = ChipBuffer::from_text("hello world");
//! let chip = Chip::new("world", None);
//! let id = chip.id();
//! buffer.attach_chip(chip, 6..11);
//!
//! buffer.insert(0, ">> ");
//! assert_eq!(buffer.chip_range(id), Some(9..14));
//! ```

mod buffer;
mod constraints;

pub use buffer::{clamp_range, ChipBuffer, ChipText, ChippedText, TextBuffer, TextBufferMut};
pub use constraints::{strip_illegal, CharFilter, IllegalCharacterIdentifier, IllegalCharacters};
