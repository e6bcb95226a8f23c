//! Commands, key handling and dispatch.
//!
//! Flow per key: [`KeyHandler`] resolves a [`KeyEvent`] through the raw and
//! chord binding tables into an [`Action`]; [`dispatch::apply`] mutates the
//! [`EditorState`] and re-runs the scroll invariant on the active window.
//! [`run_tick`] drives both for everything drained from the input queue.
//!
//! [`KeyEvent`]: core_events::KeyEvent
//! [`EditorState`]: core_state::EditorState

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub mod bindings;
pub mod dispatch;
pub mod key_handler;
pub mod tick;

pub use bindings::{bindings_from_config, default_bindings};
pub use dispatch::{DispatchResult, apply, dispatch};
pub use key_handler::{KeyHandler, KeyOutcome};
pub use tick::{apply_event, run_tick};

/// Named editor command. Names are stable; configuration refers to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    LineStart,
    LineEnd,
    BufferStart,
    BufferEnd,
    PageUp,
    PageDown,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    InsertNewline,
    DeleteBackward,
    DeleteForward,
    KillLine,
    SplitVertical,
    SplitHorizontal,
    DeleteWindow,
    DeleteOtherWindows,
    NextWindow,
    PreviousWindow,
    GrowWindow,
    ShrinkWindow,
    ToggleWrap,
    Quit,
}

impl Command {
    pub const ALL: [Command; 28] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveUp,
        Command::MoveDown,
        Command::LineStart,
        Command::LineEnd,
        Command::BufferStart,
        Command::BufferEnd,
        Command::PageUp,
        Command::PageDown,
        Command::ScrollUp,
        Command::ScrollDown,
        Command::ScrollLeft,
        Command::ScrollRight,
        Command::InsertNewline,
        Command::DeleteBackward,
        Command::DeleteForward,
        Command::KillLine,
        Command::SplitVertical,
        Command::SplitHorizontal,
        Command::DeleteWindow,
        Command::DeleteOtherWindows,
        Command::NextWindow,
        Command::PreviousWindow,
        Command::GrowWindow,
        Command::ShrinkWindow,
        Command::ToggleWrap,
        Command::Quit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::MoveLeft => "move-left",
            Command::MoveRight => "move-right",
            Command::MoveUp => "move-up",
            Command::MoveDown => "move-down",
            Command::LineStart => "line-start",
            Command::LineEnd => "line-end",
            Command::BufferStart => "buffer-start",
            Command::BufferEnd => "buffer-end",
            Command::PageUp => "page-up",
            Command::PageDown => "page-down",
            Command::ScrollUp => "scroll-up",
            Command::ScrollDown => "scroll-down",
            Command::ScrollLeft => "scroll-left",
            Command::ScrollRight => "scroll-right",
            Command::InsertNewline => "insert-newline",
            Command::DeleteBackward => "delete-backward",
            Command::DeleteForward => "delete-forward",
            Command::KillLine => "kill-line",
            Command::SplitVertical => "split-vertical",
            Command::SplitHorizontal => "split-horizontal",
            Command::DeleteWindow => "delete-window",
            Command::DeleteOtherWindows => "delete-other-windows",
            Command::NextWindow => "next-window",
            Command::PreviousWindow => "previous-window",
            Command::GrowWindow => "grow-window",
            Command::ShrinkWindow => "shrink-window",
            Command::ToggleWrap => "toggle-wrap",
            Command::Quit => "quit",
        }
    }

    pub fn from_name(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command `{0}`")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::from_name(s.trim()).ok_or_else(|| UnknownCommand(s.to_owned()))
    }
}

/// What a resolved key asks the editor to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Run(Command),
    /// Self-insert of an unbound printable code point.
    Insert(char),
}
