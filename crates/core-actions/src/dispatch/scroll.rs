//! Viewport scrolling. The view moves first; the cursor is dragged along
//! only when the scroll pushed it out of the visible area.
//!
//! Horizontal naming follows the text: `scroll-left` moves the text left,
//! revealing columns further right.

use super::DispatchResult;
use crate::Command;
use core_state::EditorState;

pub(crate) fn handle_scroll(command: Command, state: &mut EditorState) -> DispatchResult {
    let view = state.active_viewport_mut();
    let before = (view.scroll_top(), view.scroll_left());
    match command {
        Command::ScrollUp => view.scroll_lines(-1),
        Command::ScrollDown => view.scroll_lines(1),
        Command::ScrollLeft => view.scroll_columns(1),
        Command::ScrollRight => view.scroll_columns(-1),
        _ => {}
    }
    if (view.scroll_top(), view.scroll_left()) != before {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    }
}
