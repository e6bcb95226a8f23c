//! Core event types and the input queue shared by producer threads and the
//! editor loop.
//!
//! Producers (terminal reader, resize watcher) run on their own threads and
//! push [`Event`]s through an [`EventSender`]; the single consumer drains an
//! [`EventReceiver`] once per tick. See [`queue`] for the drop policy.

use bitflags::bitflags;
use std::fmt;

pub mod queue;

pub use queue::{
    EVENTS_DRAINED, EVENTS_DROPPED, EVENTS_QUEUED, EventReceiver, EventSender, EventSource,
    EventSourceRegistry, PushOutcome, QueueStats, Shutdown, event_queue,
};

pub const LABEL_ENTER: &str = "Enter";
pub const LABEL_BACKSPACE: &str = "Backspace";
pub const LABEL_ESC: &str = "Esc";
pub const LABEL_TAB: &str = "Tab";

/// Default capacity of the bounded input queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Top-level event consumed by the editor loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal resized to `width x height` cells.
    Resize { width: u16, height: u16 },
    Quit,
}

impl Event {
    /// Short discriminant for logs; never includes key payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Key(_) => "key",
            Event::Resize { .. } => "resize",
            Event::Quit => "quit",
        }
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const META = 0b0000_0010;
    }
}

/// Normalized key press.
///
/// Contract with the decoding side:
/// * recognized escape sequences (arrows, paging, ...) arrive as one event
///   whose `label` is the whole escape string,
/// * decoded UTF-8 input arrives as one event per code point,
/// * control bytes 1..=26 arrive as a lowercase letter with `CTRL`,
/// * byte 13 is `Enter` with code point `'\n'`, 27 is `Esc`, 127 is
///   `Backspace`,
/// * printable ASCII arrives as a plain character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub label: String,
    pub codepoint: Option<char>,
    pub mods: KeyModifiers,
    pub raw: Vec<u8>,
}

impl KeyEvent {
    /// Decode one input byte.
    pub fn from_byte(byte: u8) -> Self {
        let raw = vec![byte];
        match byte {
            13 => Self {
                label: LABEL_ENTER.to_owned(),
                codepoint: Some('\n'),
                mods: KeyModifiers::empty(),
                raw,
            },
            1..=26 => Self {
                label: char::from(b'a' + byte - 1).to_string(),
                codepoint: None,
                mods: KeyModifiers::CTRL,
                raw,
            },
            27 => Self {
                label: LABEL_ESC.to_owned(),
                codepoint: None,
                mods: KeyModifiers::empty(),
                raw,
            },
            127 => Self {
                label: LABEL_BACKSPACE.to_owned(),
                codepoint: None,
                mods: KeyModifiers::empty(),
                raw,
            },
            0x20..=0x7E => Self::from_char(char::from(byte)),
            other => Self {
                label: char::from(other).to_string(),
                codepoint: None,
                mods: KeyModifiers::empty(),
                raw,
            },
        }
    }

    /// A decoded code point with no modifiers.
    pub fn from_char(c: char) -> Self {
        let mut buf = [0u8; 4];
        Self {
            label: c.to_string(),
            codepoint: Some(c),
            mods: KeyModifiers::empty(),
            raw: c.encode_utf8(&mut buf).as_bytes().to_vec(),
        }
    }

    /// An assembled escape sequence such as `"\x1b[A"`.
    pub fn escape(sequence: impl Into<String>) -> Self {
        let label = sequence.into();
        Self {
            raw: label.as_bytes().to_vec(),
            label,
            codepoint: None,
            mods: KeyModifiers::empty(),
        }
    }

    /// A labelled key with explicit modifiers (`C-x`, `M-<`, ...).
    pub fn chord(label: impl Into<String>, mods: KeyModifiers) -> Self {
        let label = label.into();
        Self {
            raw: label.as_bytes().to_vec(),
            label,
            codepoint: None,
            mods,
        }
    }

    pub fn ctrl(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    pub fn meta(&self) -> bool {
        self.mods.contains(KeyModifiers::META)
    }

    /// True when the event is an escape sequence rather than a chord.
    pub fn is_escape_sequence(&self) -> bool {
        self.label.len() > 1 && self.label.starts_with('\x1b')
    }

    /// Code point to self-insert: printable and unmodified.
    pub fn insertable(&self) -> Option<char> {
        if !self.mods.is_empty() {
            return None;
        }
        self.codepoint.filter(|c| !c.is_control())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl() {
            f.write_str("C-")?;
        }
        if self.meta() {
            f.write_str("M-")?;
        }
        if self.is_escape_sequence() {
            write!(f, "{}", self.label.escape_debug())
        } else {
            f.write_str(&self.label)
        }
    }
}
