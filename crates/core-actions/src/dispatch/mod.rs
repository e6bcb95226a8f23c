//! Command dispatch onto [`EditorState`].
//!
//! Sub-modules by concern:
//! * `motion` - cursor movement (goal column kept only across vertical moves)
//! * `edit`   - buffer mutation through the active window
//! * `scroll` - viewport scrolling that drags the cursor along
//! * `window` - split, close, focus and resize of layout leaves
//!
//! After every command the active viewport re-runs the scroll invariant and
//! every other viewport re-clamps its offsets, since an edit through one
//! window can shorten a buffer shown in another.

use crate::{Action, Command};
use core_state::EditorState;
use tracing::trace;

mod edit;
mod motion;
mod scroll;
mod window;

/// Result of dispatching a single command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }

    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }

    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: DispatchResult) {
        self.dirty |= other.dirty;
        self.quit |= other.quit;
    }
}

/// Apply a resolved key action.
pub fn apply(action: Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::Run(command) => dispatch(command, state),
        Action::Insert(c) => {
            let result = edit::insert_char(state, c);
            settle(state);
            result
        }
    }
}

/// Run one command against the active window.
pub fn dispatch(command: Command, state: &mut EditorState) -> DispatchResult {
    trace!(target: "actions.dispatch", %command, window = state.active_window().0, "dispatch");
    let result = match command {
        Command::MoveLeft
        | Command::MoveRight
        | Command::MoveUp
        | Command::MoveDown
        | Command::LineStart
        | Command::LineEnd
        | Command::BufferStart
        | Command::BufferEnd
        | Command::PageUp
        | Command::PageDown => motion::handle_motion(command, state),
        Command::ScrollUp | Command::ScrollDown | Command::ScrollLeft | Command::ScrollRight => {
            scroll::handle_scroll(command, state)
        }
        Command::InsertNewline
        | Command::DeleteBackward
        | Command::DeleteForward
        | Command::KillLine => edit::handle_edit(command, state),
        Command::SplitVertical
        | Command::SplitHorizontal
        | Command::DeleteWindow
        | Command::DeleteOtherWindows
        | Command::NextWindow
        | Command::PreviousWindow
        | Command::GrowWindow
        | Command::ShrinkWindow
        | Command::ToggleWrap => window::handle_window(command, state),
        Command::Quit => {
            state.request_quit();
            DispatchResult::quit()
        }
    };
    settle(state);
    result
}

/// Restore the scroll invariant everywhere after a command.
fn settle(state: &mut EditorState) {
    let active = state.active_window();
    state.layout.for_each_viewport_mut(|view| {
        if view.id() == active {
            view.ensure_cursor_visible();
        } else {
            view.set_scroll_top(view.scroll_top());
        }
    });
}
