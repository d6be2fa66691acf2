//! Whole-buffer validation and auto-correction.

use crate::editable::{ChipBuffer, TextBuffer};
use crate::tokenizer::ChipTokenizer;

/// Decides whether a buffer is acceptable and how to repair it.
pub trait ChipValidator {
    fn is_valid(&self, tokenizer: &dyn ChipTokenizer, text: &ChipBuffer) -> bool;

    /// Return a corrected copy of `invalid`
    fn fix_text(&self, tokenizer: &mut dyn ChipTokenizer, invalid: &ChipBuffer) -> ChipBuffer;
}

/// Accepts a buffer only when every token is already a chip, and fixes it
/// by chipifying whatever is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChipifyingValidator;

impl ChipValidator for ChipifyingValidator {
    fn is_valid(&self, tokenizer: &dyn ChipTokenizer, text: &ChipBuffer) -> bool {
        tokenizer.find_all_tokens(text).is_empty()
    }

    fn fix_text(&self, tokenizer: &mut dyn ChipTokenizer, invalid: &ChipBuffer) -> ChipBuffer {
        let mut fixed = invalid.clone();
        tokenizer.terminate_all_tokens(&mut fixed);
        tracing::debug!(
            before = invalid.len_chars(),
            after = fixed.len_chars(),
            "chipified unterminated tokens"
        );
        fixed
    }
}

/// Rejects nothing and changes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllValidator;

impl ChipValidator for AcceptAllValidator {
    fn is_valid(&self, _tokenizer: &dyn ChipTokenizer, _text: &ChipBuffer) -> bool {
        true
    }

    fn fix_text(&self, _tokenizer: &mut dyn ChipTokenizer, invalid: &ChipBuffer) -> ChipBuffer {
        invalid.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editable::ChipText;
    use crate::tokenizer::SpanChipTokenizer;

    #[test]
    fn test_plain_text_is_invalid() {
        let tokenizer = SpanChipTokenizer::new();
        let buf = ChipBuffer::from_text("abc");
        assert!(!ChipifyingValidator.is_valid(&tokenizer, &buf));
    }

    #[test]
    fn test_empty_and_blank_are_valid() {
        let tokenizer = SpanChipTokenizer::new();
        assert!(ChipifyingValidator.is_valid(&tokenizer, &ChipBuffer::new()));
        assert!(ChipifyingValidator.is_valid(&tokenizer, &ChipBuffer::from_text("  ")));
    }

    #[test]
    fn test_fix_text_leaves_input_untouched() {
        let mut tokenizer = SpanChipTokenizer::new();
        let buf = ChipBuffer::from_text("abc");
        let fixed = ChipifyingValidator.fix_text(&mut tokenizer, &buf);

        assert_eq!(buf.content(), "abc");
        assert_eq!(buf.chip_count(), 0);
        assert_eq!(fixed.content(), SpanChipTokenizer::encode_text("abc"));
        assert!(ChipifyingValidator.is_valid(&tokenizer, &fixed));
        assert_eq!(fixed.chips_in(0..fixed.len_chars()).len(), 1);
    }

    #[test]
    fn test_accept_all() {
        let mut tokenizer = SpanChipTokenizer::new();
        let buf = ChipBuffer::from_text("abc");
        assert!(AcceptAllValidator.is_valid(&tokenizer, &buf));
        assert_eq!(AcceptAllValidator.fix_text(&mut tokenizer, &buf).content(), "abc");
    }
}
