//! Terminal reader: turns crossterm events into normalized [`core_events`]
//! events and pushes them into the input queue from a dedicated thread.
//!
//! Mapping follows the byte-level decoding contract documented on
//! [`KeyEvent`]: navigation keys become their escape strings, control
//! letters become lettered `CTRL` chords, Alt becomes `META`. Shift is
//! already folded into the character crossterm reports.

mod reader;
pub use reader::{READ_POLL_INTERVAL, TerminalReader};

use core_events::{Event, KeyEvent, KeyModifiers, LABEL_TAB};
use crossterm::event::{
    Event as CEvent, KeyCode as CCode, KeyEvent as CKey, KeyEventKind, KeyModifiers as CMods,
};

/// Escape string for keys the terminal encodes as CSI sequences.
fn escape_sequence(code: CCode) -> Option<&'static str> {
    Some(match code {
        CCode::Up => "\x1b[A",
        CCode::Down => "\x1b[B",
        CCode::Right => "\x1b[C",
        CCode::Left => "\x1b[D",
        CCode::Home => "\x1b[H",
        CCode::End => "\x1b[F",
        CCode::Insert => "\x1b[2~",
        CCode::Delete => "\x1b[3~",
        CCode::PageUp => "\x1b[5~",
        CCode::PageDown => "\x1b[6~",
        _ => return None,
    })
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::META;
    }
    out
}

/// Map one key press; `None` for releases and keys with no encoding here
/// (function keys, media keys).
pub fn translate_key(key: CKey) -> Option<KeyEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if let Some(seq) = escape_sequence(key.code) {
        return Some(KeyEvent::escape(seq));
    }
    let mods = map_mods(key.modifiers);
    let ev = match key.code {
        CCode::Enter => KeyEvent::from_byte(13),
        CCode::Backspace => KeyEvent::from_byte(127),
        CCode::Esc => KeyEvent::from_byte(27),
        CCode::Tab => KeyEvent::chord(LABEL_TAB, KeyModifiers::empty()),
        CCode::Char(c) if mods.is_empty() => KeyEvent::from_char(c),
        CCode::Char(c) if mods == KeyModifiers::CTRL && c.is_ascii_alphabetic() => {
            KeyEvent::from_byte(c.to_ascii_lowercase() as u8 - b'a' + 1)
        }
        CCode::Char(c) => KeyEvent::chord(c.to_string(), mods),
        _ => return None,
    };
    Some(ev)
}

/// Map one terminal event; focus, mouse and paste events are not forwarded.
pub fn translate(event: CEvent) -> Option<Event> {
    match event {
        CEvent::Key(key) => translate_key(key).map(Event::Key),
        CEvent::Resize(width, height) => Some(Event::Resize { width, height }),
        _ => None,
    }
}

#[inline]
pub(crate) fn log_translated(ev: &Event) {
    tracing::trace!(target: "input", kind = ev.kind(), "event_read");
}
