//! Property tests for viewport windowing and the cursor visibility rule.

use core_model::{Viewport, WindowId};
use core_text::width::wrap_position;
use core_text::{Position, TextBuffer};
use proptest::prelude::*;

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            6 => proptest::char::range('a', 'z'),
            2 => Just('\n'),
            1 => proptest::char::range('あ', 'ん'),
            1 => Just('\u{FF21}'),
        ],
        0..400,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

fn viewport(text: &str, width: usize, height: usize, wrap: bool) -> Viewport {
    let buf = TextBuffer::from_str("p", text).into_shared();
    let mut v = Viewport::new(WindowId(0), buf, width, height);
    v.set_line_wrap(wrap);
    v
}

proptest! {
    #[test]
    fn visible_line_count_matches_window(
        lines in 1usize..60,
        height in 1usize..20,
        top in 0usize..80,
    ) {
        let text = (0..lines).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut v = viewport(&text, 10, height, false);
        v.set_scroll_top(top);
        let visible = v.visible_lines();
        prop_assert!(visible.len() <= height);
        let top = v.scroll_top();
        let expected = if top < lines { height.min(lines - top) } else { 0 };
        prop_assert_eq!(visible.len(), expected);
        prop_assert!(top <= lines.saturating_sub(height));
    }

    #[test]
    fn scroll_adjustment_is_idempotent(
        text in text_strategy(),
        row in 0usize..50,
        col in 0usize..120,
        width in 1usize..30,
        height in 1usize..12,
        wrap in any::<bool>(),
        start_top in 0usize..50,
        start_left in 0usize..60,
    ) {
        let mut v = viewport(&text, width, height, wrap);
        v.set_scroll_top(start_top);
        v.set_scroll_left(start_left);
        v.buffer().borrow_mut().set_cursor(Position::new(row, col));
        v.ensure_cursor_visible();
        let first = (v.scroll_top(), v.scroll_left());
        prop_assert!(!v.ensure_cursor_visible());
        prop_assert_eq!((v.scroll_top(), v.scroll_left()), first);
    }

    #[test]
    fn cursor_visible_after_adjustment(
        text in text_strategy(),
        row in 0usize..50,
        col in 0usize..120,
        width in 2usize..30,
        height in 1usize..12,
        wrap in any::<bool>(),
    ) {
        let mut v = viewport(&text, width, height, wrap);
        v.buffer().borrow_mut().set_cursor(Position::new(row, col));
        v.ensure_cursor_visible();
        let pos = v.cursor_screen_position();
        let cursor = v.text().cursor();
        let sub_row = {
            let buf = v.text();
            wrap_position(buf.line(cursor.row).unwrap_or_default(), cursor.col, width).0
        };
        // only a wrapped line taller than the viewport can push the cursor out
        if !wrap || sub_row < height {
            prop_assert!(pos.is_inside(width, height), "{:?} outside {}x{}", pos, width, height);
        }
        if wrap {
            prop_assert_eq!(v.scroll_left(), 0);
        }
    }

    #[test]
    fn wrapped_positions_never_share_a_cell(
        text in text_strategy(),
        width in 2usize..30,
        height in 1usize..12,
    ) {
        let v = viewport(&text, width, height, true);
        let positions: Vec<Position> = v
            .text()
            .lines()
            .iter()
            .enumerate()
            .flat_map(|(row, line)| {
                line.char_indices()
                    .map(|(i, _)| i)
                    .chain(std::iter::once(line.len()))
                    .map(move |col| Position::new(row, col))
            })
            .collect();
        let mut cells = Vec::with_capacity(positions.len());
        for p in positions {
            v.buffer().borrow_mut().set_cursor(p);
            let pos = v.cursor_screen_position();
            prop_assert!(pos.col >= 0 && (pos.col as usize) < width, "{:?} at {:?}", pos, p);
            cells.push((pos.row, pos.col));
        }
        let total = cells.len();
        cells.sort_unstable();
        cells.dedup();
        prop_assert_eq!(cells.len(), total);
    }

    #[test]
    fn wrapped_visible_lines_cover_height(
        text in text_strategy(),
        width in 1usize..20,
        height in 1usize..10,
        top in 0usize..40,
    ) {
        let mut v = viewport(&text, width, height, true);
        v.set_scroll_top(top);
        let visible = v.visible_lines();
        prop_assert!(visible.len() <= height);
        // every returned line starts on a row inside the viewport
        let rows: usize = visible
            .iter()
            .take(visible.len().saturating_sub(1))
            .map(|l| v.rows_for_line(l))
            .sum();
        prop_assert!(rows < height || visible.len() <= 1);
    }
}

#[test]
fn newline_at_bottom_scrolls_one_line() {
    let content: Vec<String> = (0..8).map(|i| format!("row {i}")).collect();
    let mut v = viewport(&content.join("\n"), 40, 8, false);
    v.buffer().borrow_mut().move_buffer_end();
    v.ensure_cursor_visible();
    assert_eq!(v.scroll_top(), 0);
    v.buffer().borrow_mut().insert_char('\n');
    v.ensure_cursor_visible();
    assert_eq!(v.text().cursor().row, 8);
    assert_eq!(v.scroll_top(), 1);
    assert_eq!(v.visible_lines()[0], content[1]);
}
