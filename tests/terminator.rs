//! Terminator handling tests - behaviors, paste overrides, selection results

mod common;

use common::{chip_text, chip_values, chips_text, whitespace_tokenizer};
use chipfield::editable::{ChipBuffer, TextBuffer};
use chipfield::terminator::{
    DefaultTerminatorHandler, PasteBehavior, TerminatorBehavior, TerminatorHandler,
};
use chipfield::tokenizer::{ChipTokenizer, SpanChipTokenizer};

fn handler(terminators: &[(char, TerminatorBehavior)]) -> DefaultTerminatorHandler {
    let mut handler = DefaultTerminatorHandler::new();
    for &(ch, behavior) in terminators {
        handler.add_terminator(ch, behavior);
    }
    handler
}

fn run(
    handler: &DefaultTerminatorHandler,
    tokenizer: &mut dyn ChipTokenizer,
    text: &str,
    window: std::ops::Range<usize>,
    is_paste: bool,
) -> (ChipBuffer, Option<usize>) {
    let mut buf = ChipBuffer::from_text(text);
    let selection =
        handler.find_and_handle_terminators(tokenizer, &mut buf, window.start, window.end, is_paste);
    (buf, selection)
}

// ========================================================================
// Single terminators
// ========================================================================

#[test]
fn test_newline_chipifies_everything() {
    let handler = handler(&[('\n', TerminatorBehavior::ChipifyAll)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "token\n", 5..6, false);

    assert_eq!(buf.content(), chip_text("token"));
    assert_eq!(selection, Some(buf.len_chars()));
}

#[test]
fn test_chipify_all_reaches_outside_window() {
    let handler = handler(&[('\n', TerminatorBehavior::ChipifyAll)]);
    let mut tokenizer = whitespace_tokenizer();
    let (buf, selection) = run(&handler, &mut tokenizer, "aa bb cc\n", 8..9, false);

    assert_eq!(chip_values(&tokenizer, &buf), vec!["aa", "bb", "cc"]);
    assert_eq!(selection, Some(buf.len_chars()));
}

#[test]
fn test_semicolon_chipifies_current_token() {
    let handler = handler(&[(';', TerminatorBehavior::ChipifyCurrentToken)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "token;", 5..6, false);

    assert_eq!(buf.content(), chip_text("token"));
    assert_eq!(selection, Some(chip_text("token").chars().count()));
}

#[test]
fn test_current_token_after_existing_chip() {
    let handler = handler(&[(',', TerminatorBehavior::ChipifyCurrentToken)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let text = format!("{}next,", chip_text("first"));
    let end = text.chars().count();
    let mut buf = ChipBuffer::from_text(&text);
    let selection = handler.find_and_handle_terminators(&mut tokenizer, &mut buf, end - 1, end, false);

    assert_eq!(buf.content(), chips_text(&["first", "next"]));
    assert_eq!(selection, Some(buf.len_chars()));
}

#[test]
fn test_space_chipifies_to_terminator() {
    let handler = handler(&[(' ', TerminatorBehavior::ChipifyToTerminator)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "tok en", 3..4, false);

    assert_eq!(buf.content(), format!("{}en", chip_text("tok")));
    assert_eq!(chip_values(&tokenizer, &buf), vec!["tok"]);
    assert_eq!(selection, None);
}

#[test]
fn test_terminator_at_start_is_removed() {
    let handler = handler(&[(' ', TerminatorBehavior::ChipifyToTerminator)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, " abc", 0..1, false);

    assert_eq!(buf.content(), "abc");
    assert_eq!(selection, None);
}

// ========================================================================
// Paste
// ========================================================================

#[test]
fn test_paste_override_chipifies_to_terminator() {
    let mut handler = handler(&[(' ', TerminatorBehavior::ChipifyAll)]);
    handler.set_paste_behavior(PasteBehavior::ChipifyToTerminator);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "a b", 0..3, true);

    assert_eq!(buf.content(), format!("{}b", chip_text("a")));
    assert_eq!(selection, None);
}

#[test]
fn test_paste_with_several_terminators() {
    let handler = handler(&[
        (',', TerminatorBehavior::ChipifyCurrentToken),
        (';', TerminatorBehavior::ChipifyAll),
    ]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "a,b;c,", 0..6, true);

    // Default paste behavior ignores the per-character configuration
    assert_eq!(buf.content(), chips_text(&["a", "b", "c"]));
    assert_eq!(selection, None);
}

#[test]
fn test_typing_is_not_affected_by_paste_behavior() {
    let mut handler = handler(&[(' ', TerminatorBehavior::ChipifyAll)]);
    handler.set_paste_behavior(PasteBehavior::ChipifyToTerminator);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "a b", 1..2, false);

    assert_eq!(buf.content(), chip_text("ab"));
    assert_eq!(selection, Some(buf.len_chars()));
}

// ========================================================================
// No-ops
// ========================================================================

#[test]
fn test_empty_buffer() {
    let handler = handler(&[(',', TerminatorBehavior::ChipifyAll)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "", 0..0, false);
    assert!(buf.is_empty());
    assert_eq!(selection, None);
}

#[test]
fn test_no_registered_terminators() {
    let handler = DefaultTerminatorHandler::new();
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "a,b\n", 0..4, true);
    assert_eq!(buf.content(), "a,b\n");
    assert_eq!(selection, None);
}

#[test]
fn test_window_out_of_bounds_is_clamped() {
    let handler = handler(&[(',', TerminatorBehavior::ChipifyCurrentToken)]);
    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "ab,", 2..50, false);
    assert_eq!(buf.content(), chip_text("ab"));
    assert_eq!(selection, Some(buf.len_chars()));
}

#[test]
fn test_removed_terminator_is_ignored() {
    let mut handler = handler(&[
        (',', TerminatorBehavior::ChipifyCurrentToken),
        (';', TerminatorBehavior::ChipifyCurrentToken),
    ]);
    assert_eq!(
        handler.remove_terminator(','),
        Some(TerminatorBehavior::ChipifyCurrentToken)
    );
    assert_eq!(handler.remove_terminator(','), None);

    let mut tokenizer = SpanChipTokenizer::new();
    let (buf, selection) = run(&handler, &mut tokenizer, "a,b;", 0..4, false);
    assert_eq!(buf.content(), chip_text("a,b"));
    assert_eq!(selection, Some(buf.len_chars()));
}
