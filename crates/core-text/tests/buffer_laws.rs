//! Property tests for the line buffer: splice equivalence and cursor clamping.

use core_text::{Position, TextBuffer, string_width};
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    // ASCII, newlines, Latin, combining, CJK and Hangul code points.
    proptest::collection::vec(
        prop_oneof![
            4 => proptest::char::range('a', 'z'),
            1 => Just('\n'),
            1 => Just('é'),
            1 => Just('\u{0301}'),
            1 => proptest::char::range('あ', 'ん'),
            1 => proptest::char::range('가', '힣'),
        ],
        0..40,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn insert_str_equals_repeated_insert_char(
        seed in text_strategy(),
        inserted in text_strategy(),
        row in 0usize..8,
        col in 0usize..64,
    ) {
        let mut spliced = TextBuffer::from_str("a", &seed);
        spliced.set_cursor(Position::new(row, col));
        let mut stepped = spliced.clone();

        spliced.insert_str(&inserted);
        for c in inserted.chars() {
            stepped.insert_char(c);
        }

        prop_assert_eq!(spliced.lines(), stepped.lines());
        prop_assert_eq!(spliced.cursor(), stepped.cursor());
        prop_assert_eq!(spliced.is_modified(), stepped.is_modified());
    }

    #[test]
    fn set_cursor_always_lands_on_valid_boundary(
        seed in text_strategy(),
        row in 0usize..64,
        col in 0usize..256,
    ) {
        let mut b = TextBuffer::from_str("a", &seed);
        b.set_cursor(Position::new(row, col));
        let pos = b.cursor();
        prop_assert!(pos.row < b.line_count());
        let line = b.line(pos.row).unwrap_or_default();
        prop_assert!(pos.col <= line.len());
        prop_assert!(line.is_char_boundary(pos.col));
    }

    #[test]
    fn edits_keep_cursor_valid(seed in text_strategy(), ops in proptest::collection::vec(0u8..6, 0..30)) {
        let mut b = TextBuffer::from_str("a", &seed);
        b.move_buffer_end();
        for op in ops {
            match op {
                0 => { b.delete_backward(); }
                1 => { b.delete_forward(); }
                2 => b.move_left(),
                3 => b.move_right(),
                4 => b.insert_char('あ'),
                _ => { b.kill_line(); }
            }
            let pos = b.cursor();
            prop_assert!(pos.row < b.line_count());
            let line = b.line(pos.row).unwrap_or_default();
            prop_assert!(line.is_char_boundary(pos.col));
        }
    }

    #[test]
    fn width_is_additive(a in text_strategy(), b in text_strategy()) {
        let joined = format!("{a}{b}");
        prop_assert_eq!(string_width(&joined), string_width(&a) + string_width(&b));
    }
}
