//! core-keymap: chord sequences and raw escape strings mapped to commands.
//!
//! Design principles:
//! - Data driven: a [`BindingTable`] is built once (defaults plus user
//!   entries) and moved into a [`KeySequenceMatcher`]; there is no global
//!   registry, so independent matchers never interfere.
//! - Linear scans in registration order. The first registered binding wins
//!   every tie, which lets callers layer overrides by registering them first.
//! - Raw bindings match a whole, already assembled escape string by exact
//!   equality and are consulted before chord processing.
//! - No side effects beyond TRACE logging of matcher transitions.
//!
//! Chord notation used by [`KeyChord::parse`] and [`parse_sequence`]:
//! `C-` ctrl, `M-` meta, named keys `Enter`, `Backspace`, `Esc`, `Tab`,
//! `SPC`; anything else is a literal single code point label. Sequences are
//! whitespace separated: `"C-x C-f"`.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub const LABEL_ENTER: &str = "Enter";
pub const LABEL_BACKSPACE: &str = "Backspace";
pub const LABEL_ESC: &str = "Esc";
pub const LABEL_TAB: &str = "Tab";
const SPACE_NAME: &str = "SPC";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyParseError {
    #[error("empty key description")]
    Empty,
    #[error("missing key after modifier in `{0}`")]
    DanglingModifier(String),
    #[error("`{0}` is neither a named key nor a single character")]
    UnknownKey(String),
}

// -------------------------------------------------------------------------------------------------
// KeyChord
// -------------------------------------------------------------------------------------------------

/// One key press plus modifier flags.
///
/// Ctrl-letter chords always carry the lowercase letter as label, matching
/// how control bytes 1..=26 are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub label: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn new(label: impl Into<String>, ctrl: bool, meta: bool) -> Self {
        let mut label = label.into();
        if ctrl && label.len() == 1 && label.as_bytes()[0].is_ascii_uppercase() {
            label.make_ascii_lowercase();
        }
        Self { label, ctrl, meta }
    }

    pub fn plain(label: impl Into<String>) -> Self {
        Self::new(label, false, false)
    }

    pub fn ctrl(label: impl Into<String>) -> Self {
        Self::new(label, true, false)
    }

    pub fn meta(label: impl Into<String>) -> Self {
        Self::new(label, false, true)
    }

    /// Parse one chord such as `C-x`, `M-<`, `C-M-f`, `Enter` or `SPC`.
    pub fn parse(desc: &str) -> Result<Self, KeyParseError> {
        if desc.is_empty() {
            return Err(KeyParseError::Empty);
        }
        let (mut ctrl, mut meta) = (false, false);
        let mut rest = desc;
        loop {
            if let Some(tail) = rest.strip_prefix("C-") {
                if tail.is_empty() {
                    return Err(KeyParseError::DanglingModifier(desc.to_owned()));
                }
                ctrl = true;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("M-") {
                if tail.is_empty() {
                    return Err(KeyParseError::DanglingModifier(desc.to_owned()));
                }
                meta = true;
                rest = tail;
            } else {
                break;
            }
        }
        let label = match rest {
            SPACE_NAME => " ".to_owned(),
            LABEL_ENTER | LABEL_BACKSPACE | LABEL_ESC | LABEL_TAB => rest.to_owned(),
            other if other.chars().count() == 1 => other.to_owned(),
            other => return Err(KeyParseError::UnknownKey(other.to_owned())),
        };
        Ok(Self::new(label, ctrl, meta))
    }
}

impl FromStr for KeyChord {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("C-")?;
        }
        if self.meta {
            f.write_str("M-")?;
        }
        if self.label == " " {
            f.write_str(SPACE_NAME)
        } else {
            f.write_str(&self.label)
        }
    }
}

/// Parse a whitespace separated chord sequence (`"C-x C-f"`).
pub fn parse_sequence(desc: &str) -> Result<Vec<KeyChord>, KeyParseError> {
    let chords = desc
        .split_whitespace()
        .map(KeyChord::parse)
        .collect::<Result<Vec<_>, _>>()?;
    if chords.is_empty() {
        return Err(KeyParseError::Empty);
    }
    Ok(chords)
}

/// Render a chord sequence back into notation accepted by [`parse_sequence`].
pub fn format_sequence(chords: &[KeyChord]) -> String {
    chords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(feature = "core-events")]
impl From<&core_events::KeyEvent> for KeyChord {
    fn from(ev: &core_events::KeyEvent) -> Self {
        KeyChord::new(
            ev.label.clone(),
            ev.mods.contains(core_events::KeyModifiers::CTRL),
            ev.mods.contains(core_events::KeyModifiers::META),
        )
    }
}

// -------------------------------------------------------------------------------------------------
// Bindings
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding<C> {
    /// Ordered chord sequence, e.g. `C-x C-f`.
    Chords { keys: Vec<KeyChord>, command: C },
    /// Literal terminal escape string, e.g. `"\x1b[A"`.
    Raw { sequence: String, command: C },
}

impl<C> Binding<C> {
    pub fn command(&self) -> &C {
        match self {
            Binding::Chords { command, .. } | Binding::Raw { command, .. } => command,
        }
    }
}

/// Registration-ordered list of bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingTable<C> {
    bindings: Vec<Binding<C>>,
}

impl<C> Default for BindingTable<C> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<C> BindingTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a chord sequence. Empty sequences are ignored.
    pub fn bind_chords(&mut self, keys: Vec<KeyChord>, command: C) -> &mut Self {
        if !keys.is_empty() {
            self.bindings.push(Binding::Chords { keys, command });
        }
        self
    }

    /// Parse `desc` with [`parse_sequence`] and register it.
    pub fn bind_keys(&mut self, desc: &str, command: C) -> Result<&mut Self, KeyParseError> {
        let keys = parse_sequence(desc)?;
        Ok(self.bind_chords(keys, command))
    }

    /// Register a raw escape string. Empty strings are ignored.
    pub fn bind_raw(&mut self, sequence: impl Into<String>, command: C) -> &mut Self {
        let sequence = sequence.into();
        if !sequence.is_empty() {
            self.bindings.push(Binding::Raw { sequence, command });
        }
        self
    }

    /// Append every binding of `other` after the existing ones.
    pub fn extend(&mut self, other: BindingTable<C>) {
        self.bindings.extend(other.bindings);
    }

    pub fn bindings(&self) -> &[Binding<C>] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn chord_bindings(&self) -> impl Iterator<Item = (&[KeyChord], &C)> {
        self.bindings.iter().filter_map(|b| match b {
            Binding::Chords { keys, command } => Some((keys.as_slice(), command)),
            Binding::Raw { .. } => None,
        })
    }
}

// -------------------------------------------------------------------------------------------------
// KeySequenceMatcher
// -------------------------------------------------------------------------------------------------

/// Result of feeding one chord into the matcher.
///
/// Exactly one of three shapes occurs: a completed binding
/// (`matched`, `command` set), an open prefix (`continuing`), or a miss
/// (all false / `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome<C> {
    pub command: Option<C>,
    pub matched: bool,
    pub continuing: bool,
}

impl<C> MatchOutcome<C> {
    fn matched(command: C) -> Self {
        Self {
            command: Some(command),
            matched: true,
            continuing: false,
        }
    }

    fn continuing() -> Self {
        Self {
            command: None,
            matched: false,
            continuing: true,
        }
    }

    fn miss() -> Self {
        Self {
            command: None,
            matched: false,
            continuing: false,
        }
    }
}

#[derive(Debug)]
pub struct KeySequenceMatcher<C> {
    table: BindingTable<C>,
    pending: SmallVec<[KeyChord; 4]>,
}

impl<C: Clone> KeySequenceMatcher<C> {
    pub fn new(table: BindingTable<C>) -> Self {
        Self {
            table,
            pending: SmallVec::new(),
        }
    }

    pub fn table(&self) -> &BindingTable<C> {
        &self.table
    }

    /// Chords accumulated since the last terminal outcome.
    pub fn pending(&self) -> &[KeyChord] {
        &self.pending
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Append `chord` and resolve the accumulated sequence.
    ///
    /// An exact match takes precedence over being a prefix of a longer
    /// binding; among exact matches the first registered wins.
    pub fn process_key_press(&mut self, chord: KeyChord) -> MatchOutcome<C> {
        self.pending.push(chord);
        let seq = self.pending.as_slice();
        if let Some(command) = self
            .table
            .chord_bindings()
            .find(|(keys, _)| *keys == seq)
            .map(|(_, command)| command.clone())
        {
            trace!(target: "keymap", sequence = %format_sequence(seq), "matched");
            self.pending.clear();
            return MatchOutcome::matched(command);
        }
        let is_prefix = self
            .table
            .chord_bindings()
            .any(|(keys, _)| keys.len() > seq.len() && keys.starts_with(seq));
        if is_prefix {
            trace!(target: "keymap", sequence = %format_sequence(seq), "continuing");
            return MatchOutcome::continuing();
        }
        trace!(target: "keymap", sequence = %format_sequence(seq), "unmatched");
        self.pending.clear();
        MatchOutcome::miss()
    }

    /// Look up a raw escape string. Leaves the chord state untouched.
    pub fn match_raw(&self, sequence: &str) -> Option<C> {
        self.table.bindings.iter().find_map(|b| match b {
            Binding::Raw {
                sequence: s,
                command,
            } if s == sequence => Some(command.clone()),
            _ => None,
        })
    }
}
