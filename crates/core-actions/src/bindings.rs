//! Built-in binding table.
//!
//! The table is plain data built on demand; every [`KeyHandler`] owns its
//! own copy so independent handlers (tests, several sessions) never share
//! matcher state.
//!
//! [`KeyHandler`]: crate::KeyHandler

use crate::Command;
use core_config::{Config, ConfigError};
use core_keymap::{BindingTable, KeyChord, LABEL_BACKSPACE, LABEL_ENTER};
use tracing::debug;

const RAW_DEFAULTS: &[(&str, Command)] = &[
    ("\x1b[A", Command::MoveUp),
    ("\x1b[B", Command::MoveDown),
    ("\x1b[C", Command::MoveRight),
    ("\x1b[D", Command::MoveLeft),
    ("\x1b[H", Command::LineStart),
    ("\x1b[F", Command::LineEnd),
    ("\x1b[5~", Command::PageUp),
    ("\x1b[6~", Command::PageDown),
    ("\x1b[3~", Command::DeleteForward),
];

/// `C-x` prefixed two-key commands: second key label and command.
const CTRL_X_DEFAULTS: &[(&str, Command)] = &[
    ("<", Command::ScrollLeft),
    (">", Command::ScrollRight),
    ("2", Command::SplitHorizontal),
    ("3", Command::SplitVertical),
    ("0", Command::DeleteWindow),
    ("1", Command::DeleteOtherWindows),
    ("o", Command::NextWindow),
    ("O", Command::PreviousWindow),
    ("^", Command::GrowWindow),
    ("v", Command::ShrinkWindow),
    ("w", Command::ToggleWrap),
];

/// Default raw sequences and chord bindings, in registration order.
pub fn default_bindings() -> BindingTable<Command> {
    let mut table = BindingTable::new();
    for (sequence, command) in RAW_DEFAULTS {
        table.bind_raw(*sequence, *command);
    }

    let single = [
        (KeyChord::ctrl("b"), Command::MoveLeft),
        (KeyChord::ctrl("f"), Command::MoveRight),
        (KeyChord::ctrl("p"), Command::MoveUp),
        (KeyChord::ctrl("n"), Command::MoveDown),
        (KeyChord::ctrl("a"), Command::LineStart),
        (KeyChord::ctrl("e"), Command::LineEnd),
        (KeyChord::meta("<"), Command::BufferStart),
        (KeyChord::meta(">"), Command::BufferEnd),
        (KeyChord::ctrl("v"), Command::PageDown),
        (KeyChord::meta("v"), Command::PageUp),
        (KeyChord::meta("n"), Command::ScrollDown),
        (KeyChord::meta("p"), Command::ScrollUp),
        (KeyChord::plain(LABEL_ENTER), Command::InsertNewline),
        (KeyChord::plain(LABEL_BACKSPACE), Command::DeleteBackward),
        (KeyChord::ctrl("d"), Command::DeleteForward),
        (KeyChord::ctrl("k"), Command::KillLine),
    ];
    for (chord, command) in single {
        table.bind_chords(vec![chord], command);
    }

    for (label, command) in CTRL_X_DEFAULTS {
        table.bind_chords(vec![KeyChord::ctrl("x"), KeyChord::plain(*label)], *command);
    }
    table.bind_chords(vec![KeyChord::ctrl("x"), KeyChord::ctrl("c")], Command::Quit);
    table
}

/// User bindings from `[[bindings]]` followed by the defaults.
///
/// User entries come first so they shadow a default bound to the same keys.
/// Invalid entries are dropped and returned.
pub fn bindings_from_config(config: &Config) -> (BindingTable<Command>, Vec<ConfigError>) {
    let (mut table, errors) = config.resolve_bindings(Command::from_name);
    let user = table.len();
    table.extend(default_bindings());
    debug!(target: "actions.dispatch", user, total = table.len(), "bindings_built");
    (table, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_keymap::{Binding, KeySequenceMatcher};

    #[test]
    fn every_command_has_a_default_binding() {
        let table = default_bindings();
        for c in Command::ALL {
            assert!(
                table.bindings().iter().any(|b| *b.command() == c),
                "{c} has no default binding"
            );
        }
    }

    #[test]
    fn raw_sequences_come_first() {
        let table = default_bindings();
        let raw = table
            .bindings()
            .iter()
            .take_while(|b| matches!(b, Binding::Raw { .. }))
            .count();
        assert_eq!(raw, RAW_DEFAULTS.len());
    }

    #[test]
    fn ctrl_x_prefix_waits_for_second_key() {
        let mut m = KeySequenceMatcher::new(default_bindings());
        assert!(m.process_key_press(KeyChord::ctrl("x")).continuing);
        let out = m.process_key_press(KeyChord::plain("3"));
        assert_eq!(out.command, Some(Command::SplitVertical));
        assert!(m.process_key_press(KeyChord::ctrl("x")).continuing);
        assert_eq!(
            m.process_key_press(KeyChord::ctrl("c")).command,
            Some(Command::Quit)
        );
    }

    #[test]
    fn arrow_keys_resolve_as_raw() {
        let m = KeySequenceMatcher::new(default_bindings());
        assert_eq!(m.match_raw("\x1b[A"), Some(Command::MoveUp));
        assert_eq!(m.match_raw("\x1b[6~"), Some(Command::PageDown));
        assert_eq!(m.match_raw("\x1b[Z"), None);
    }

    #[test]
    fn user_binding_shadows_default() {
        let toml = r#"
            [[bindings]]
            keys = "C-a"
            command = "buffer-start"

            [[bindings]]
            keys = "C-x 9"
            command = "no-such-command"
        "#;
        let config = Config {
            file: toml::from_str(toml).unwrap(),
            ..Config::default()
        };
        let (table, errors) = bindings_from_config(&config);
        assert_eq!(errors.len(), 1);
        let mut m = KeySequenceMatcher::new(table);
        assert_eq!(
            m.process_key_press(KeyChord::ctrl("a")).command,
            Some(Command::BufferStart)
        );
        assert_eq!(
            m.process_key_press(KeyChord::ctrl("e")).command,
            Some(Command::LineEnd)
        );
    }
}
