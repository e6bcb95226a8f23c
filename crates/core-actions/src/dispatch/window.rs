//! Window management: splits, deletion, focus, resizing and wrap mode.
//!
//! Refusals (deleting the only window, resizing an unsplit one) leave the
//! layout untouched and surface as a status message.

use super::DispatchResult;
use crate::Command;
use core_model::SplitKind;
use core_state::EditorState;
use tracing::debug;

/// Split ratio change per grow/shrink command.
pub(crate) const RATIO_STEP: f32 = 0.05;

pub(crate) fn handle_window(command: Command, state: &mut EditorState) -> DispatchResult {
    match command {
        Command::SplitVertical => split(state, SplitKind::Vertical),
        Command::SplitHorizontal => split(state, SplitKind::Horizontal),
        Command::DeleteWindow => {
            if state.delete_window() {
                DispatchResult::dirty()
            } else {
                refuse(state, "Attempt to delete sole window")
            }
        }
        Command::DeleteOtherWindows => {
            if state.delete_other_windows() {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean()
            }
        }
        Command::NextWindow | Command::PreviousWindow => {
            let before = state.active_window();
            let after = if command == Command::NextWindow {
                state.layout.next_window()
            } else {
                state.layout.previous_window()
            };
            if after == before {
                DispatchResult::clean()
            } else {
                DispatchResult::dirty()
            }
        }
        Command::GrowWindow | Command::ShrinkWindow => {
            let delta = if command == Command::GrowWindow {
                RATIO_STEP
            } else {
                -RATIO_STEP
            };
            if state.layout.adjust_active_ratio(delta) {
                DispatchResult::dirty()
            } else {
                refuse(state, "Only one window")
            }
        }
        Command::ToggleWrap => {
            let on = state.toggle_wrap();
            state.set_status(if on { "Line wrap on" } else { "Line wrap off" });
            DispatchResult::dirty()
        }
        _ => DispatchResult::clean(),
    }
}

fn split(state: &mut EditorState, kind: SplitKind) -> DispatchResult {
    match state.split(kind) {
        Some(id) => {
            debug!(target: "actions.dispatch", window = id.0, ?kind, "split");
            DispatchResult::dirty()
        }
        None => refuse(state, "Cannot split window"),
    }
}

fn refuse(state: &mut EditorState, message: &str) -> DispatchResult {
    debug!(target: "actions.dispatch", message, "refused");
    state.set_status(message);
    DispatchResult::dirty()
}
