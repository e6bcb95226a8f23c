//! Key event resolution.
//!
//! Order of resolution for one [`KeyEvent`]:
//! 1. Escape sequences are looked up in the raw table by exact string. They
//!    never enter the chord matcher; an open chord prefix is abandoned.
//! 2. Everything else is fed to the [`KeySequenceMatcher`] as a chord.
//! 3. A chord that matches nothing self-inserts when it carries a printable,
//!    unmodified code point and no prefix was open before it.

use crate::{Action, Command};
use core_events::KeyEvent;
use core_keymap::{BindingTable, KeyChord, KeySequenceMatcher, format_sequence};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Action(Action),
    /// A chord prefix is open; wait for the next key.
    Pending,
    /// Nothing bound and nothing to insert.
    Unbound,
}

#[derive(Debug)]
pub struct KeyHandler {
    matcher: KeySequenceMatcher<Command>,
}

impl KeyHandler {
    pub fn new(table: BindingTable<Command>) -> Self {
        Self {
            matcher: KeySequenceMatcher::new(table),
        }
    }

    /// Handler over the built-in table only.
    pub fn with_defaults() -> Self {
        Self::new(crate::default_bindings())
    }

    pub fn is_pending(&self) -> bool {
        self.matcher.is_pending()
    }

    /// Chords of the open prefix, formatted for the prompt row.
    pub fn pending_display(&self) -> Option<String> {
        self.matcher
            .is_pending()
            .then(|| format_sequence(self.matcher.pending()))
    }

    pub fn reset(&mut self) {
        self.matcher.reset();
    }

    pub fn handle(&mut self, ev: &KeyEvent) -> KeyOutcome {
        if ev.is_escape_sequence() {
            self.matcher.reset();
            return match self.matcher.match_raw(&ev.label) {
                Some(command) => {
                    trace!(target: "actions.dispatch", key = %ev, %command, "raw");
                    KeyOutcome::Action(Action::Run(command))
                }
                None => {
                    trace!(target: "actions.dispatch", key = %ev, "raw_unbound");
                    KeyOutcome::Unbound
                }
            };
        }

        let was_pending = self.matcher.is_pending();
        let outcome = self.matcher.process_key_press(KeyChord::from(ev));
        if let Some(command) = outcome.command {
            return KeyOutcome::Action(Action::Run(command));
        }
        if outcome.continuing {
            return KeyOutcome::Pending;
        }
        match ev.insertable() {
            Some(c) if !was_pending => KeyOutcome::Action(Action::Insert(c)),
            _ => {
                trace!(target: "actions.dispatch", key = %ev, "unbound");
                KeyOutcome::Unbound
            }
        }
    }
}
