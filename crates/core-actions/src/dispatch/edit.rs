//! Buffer mutation through the active window.

use super::DispatchResult;
use crate::Command;
use core_state::EditorState;
use tracing::trace;

pub(crate) fn handle_edit(command: Command, state: &mut EditorState) -> DispatchResult {
    state.active_viewport_mut().clear_goal_col();
    let buffer = state.active_buffer();
    let mut buf = buffer.borrow_mut();
    let before = buf.cursor();
    let changed = match command {
        Command::InsertNewline => {
            buf.insert_char('\n');
            true
        }
        Command::DeleteBackward => buf.delete_backward(),
        Command::DeleteForward => buf.delete_forward(),
        Command::KillLine => !buf.kill_line().is_empty(),
        _ => false,
    };
    trace!(
        target: "actions.dispatch",
        op = command.name(),
        row = before.row,
        col = before.col,
        changed,
        "edit"
    );
    if changed {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn insert_char(state: &mut EditorState, c: char) -> DispatchResult {
    state.active_viewport_mut().clear_goal_col();
    state.active_buffer().borrow_mut().insert_char(c);
    DispatchResult::dirty()
}

#[cfg(test)]
mod tests {
    use super::super::tests::{cursor, state_with};
    use super::super::dispatch;
    use crate::Command;
    use core_text::Position;

    #[test]
    fn newline_splits_line() {
        let mut st = state_with("hello", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        dispatch(Command::InsertNewline, &mut st);
        assert_eq!(st.active_buffer().borrow().lines(), ["hello", ""]);
        assert_eq!(cursor(&st), Position::new(1, 0));
    }

    #[test]
    fn backspace_at_origin_is_clean() {
        let mut st = state_with("abc", 80, 24);
        let r = dispatch(Command::DeleteBackward, &mut st);
        assert!(!r.dirty);
        assert!(!st.active_buffer().borrow().is_modified());
    }

    #[test]
    fn delete_forward_joins_lines() {
        let mut st = state_with("ab\ncd", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        assert!(dispatch(Command::DeleteForward, &mut st).dirty);
        assert_eq!(st.active_buffer().borrow().lines(), ["abcd"]);
    }

    #[test]
    fn kill_line_twice_removes_line_and_break() {
        let mut st = state_with("first\nsecond", 80, 24);
        dispatch(Command::KillLine, &mut st);
        assert_eq!(st.active_buffer().borrow().lines(), ["", "second"]);
        dispatch(Command::KillLine, &mut st);
        assert_eq!(st.active_buffer().borrow().lines(), ["second"]);
        dispatch(Command::BufferEnd, &mut st);
        assert!(!dispatch(Command::KillLine, &mut st).dirty);
    }

    #[test]
    fn backspace_removes_whole_grapheme() {
        let mut st = state_with("e\u{301}x", 80, 24);
        dispatch(Command::LineEnd, &mut st);
        dispatch(Command::DeleteBackward, &mut st);
        dispatch(Command::DeleteBackward, &mut st);
        assert_eq!(st.active_buffer().borrow().text(), "");
    }
}
