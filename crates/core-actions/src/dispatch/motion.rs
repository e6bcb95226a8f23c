//! Cursor motions on the active window.
//!
//! Horizontal and absolute motions forget the goal column; vertical and page
//! motions keep it so a run of up/down moves returns to the column it
//! started from.

use super::DispatchResult;
use crate::Command;
use core_model::Viewport;
use core_state::EditorState;

pub(crate) fn handle_motion(command: Command, state: &mut EditorState) -> DispatchResult {
    let before = state.active_buffer().borrow().cursor();
    let top_before = state.active_viewport().scroll_top();
    let view = state.active_viewport_mut();
    match command {
        Command::MoveUp => view.move_cursor_vertical(-1),
        Command::MoveDown => view.move_cursor_vertical(1),
        Command::PageUp => page(view, -1),
        Command::PageDown => page(view, 1),
        horizontal => {
            view.clear_goal_col();
            let mut buf = view.buffer().borrow_mut();
            match horizontal {
                Command::MoveLeft => buf.move_left(),
                Command::MoveRight => buf.move_right(),
                Command::LineStart => buf.move_line_start(),
                Command::LineEnd => buf.move_line_end(),
                Command::BufferStart => buf.move_buffer_start(),
                Command::BufferEnd => buf.move_buffer_end(),
                _ => {}
            }
        }
    }
    let after = state.active_buffer().borrow().cursor();
    if after != before || state.active_viewport().scroll_top() != top_before {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

/// Move one screenful, shifting the viewport by the same amount so the
/// cursor keeps its screen row where the buffer allows.
fn page(view: &mut Viewport, direction: isize) {
    let step = view.height().max(1) as isize;
    view.move_cursor_vertical(direction * step);
    let top = view.scroll_top().saturating_add_signed(direction * step);
    view.set_scroll_top(top);
}

#[cfg(test)]
mod tests {
    use super::super::tests::{cursor, state_with};
    use super::super::dispatch;
    use crate::Command;
    use core_text::Position;

    #[test]
    fn left_right_cross_line_boundaries() {
        let mut st = state_with("ab\ncd", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        assert_eq!(cursor(&st), Position::new(0, 2));
        dispatch(Command::MoveRight, &mut st);
        assert_eq!(cursor(&st), Position::new(1, 0));
        dispatch(Command::MoveLeft, &mut st);
        assert_eq!(cursor(&st), Position::new(0, 2));
    }

    #[test]
    fn vertical_motion_keeps_goal_display_column() {
        // row 1 is shorter; row 2 uses wide characters
        let mut st = state_with("abcdef\nab\nあいうえ", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        dispatch(Command::MoveDown, &mut st);
        assert_eq!(cursor(&st), Position::new(1, 2));
        dispatch(Command::MoveDown, &mut st);
        // display column 6 is the start of the fourth wide char
        assert_eq!(cursor(&st), Position::new(2, 9));
        dispatch(Command::MoveUp, &mut st);
        dispatch(Command::MoveUp, &mut st);
        assert_eq!(cursor(&st), Position::new(0, 6));
    }

    #[test]
    fn horizontal_motion_resets_goal_column() {
        let mut st = state_with("abcdef\nab\nabcdef", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        dispatch(Command::MoveDown, &mut st);
        dispatch(Command::MoveLeft, &mut st);
        dispatch(Command::MoveDown, &mut st);
        assert_eq!(cursor(&st), Position::new(2, 1));
    }

    #[test]
    fn buffer_start_and_end() {
        let mut st = state_with("one\ntwo\nthree", 80, 24);
        dispatch(Command::BufferEnd, &mut st);
        assert_eq!(cursor(&st), Position::new(2, 5));
        dispatch(Command::BufferStart, &mut st);
        assert_eq!(cursor(&st), Position::origin());
    }

    #[test]
    fn page_down_then_up_returns_to_same_screen_row() {
        let text = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        // 10 content rows
        let mut st = state_with(&text, 80, 12);
        dispatch(Command::MoveDown, &mut st);
        dispatch(Command::MoveDown, &mut st);
        dispatch(Command::PageDown, &mut st);
        assert_eq!(cursor(&st).row, 12);
        assert_eq!(st.active_viewport().scroll_top(), 10);
        dispatch(Command::PageUp, &mut st);
        assert_eq!(cursor(&st).row, 2);
        assert_eq!(st.active_viewport().scroll_top(), 0);
    }

    #[test]
    fn page_down_clamps_at_buffer_end() {
        let text = (0..15).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut st = state_with(&text, 80, 12);
        dispatch(Command::PageDown, &mut st);
        dispatch(Command::PageDown, &mut st);
        assert_eq!(cursor(&st).row, 14);
        assert_eq!(st.active_viewport().scroll_top(), 5);
    }

    #[test]
    fn motion_at_edge_is_clean() {
        let mut st = state_with("x", 80, 24);
        let r = dispatch(Command::MoveLeft, &mut st);
        assert!(!r.dirty);
    }
}
