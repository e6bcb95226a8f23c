//! Line-oriented text buffer with a byte-offset cursor.
//!
//! Invariants (hold after every public call):
//! * `lines` is never empty; a fresh buffer holds one blank line.
//! * `cursor.row < lines.len()`.
//! * `cursor.col <= lines[cursor.row].len()` and lies on a code point boundary.
//!
//! Out-of-range positions are clamped, never rejected. Every content mutation
//! sets `modified`; pure cursor moves do not.

use crate::Position;
use crate::grapheme;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::trace;

/// Shared handle to a buffer. Viewports hold clones of this handle so an edit
/// made through one window is visible in every window showing the buffer.
pub type BufferRef = Rc<RefCell<TextBuffer>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    pub name: String,
    lines: Vec<String>,
    cursor: Position,
    modified: bool,
}

impl TextBuffer {
    /// Empty buffer holding a single blank line.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: vec![String::new()],
            cursor: Position::origin(),
            modified: false,
        }
    }

    /// Buffer seeded from `text`, split on `\n`. The cursor starts at the
    /// origin and the buffer is not marked modified.
    pub fn from_str(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.split('\n').map(str::to_owned).collect(),
            cursor: Position::origin(),
            modified: false,
        }
    }

    /// Wrap this buffer in a shared handle.
    pub fn into_shared(self) -> BufferRef {
        Rc::new(RefCell::new(self))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Byte length of a line; 0 for rows past the end.
    pub fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, String::len)
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_clean(&mut self) {
        self.modified = false;
    }

    /// Full text joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Move the cursor, clamping row, column and code point boundary.
    pub fn set_cursor(&mut self, pos: Position) {
        let mut pos = pos;
        pos.clamp_to(self.lines.len(), |row| self.line_len(row));
        let line = &self.lines[pos.row];
        while !line.is_char_boundary(pos.col) {
            pos.col -= 1;
        }
        self.cursor = pos;
    }

    /// Insert one code point at the cursor. `'\n'` splits the current line.
    pub fn insert_char(&mut self, c: char) {
        let Position { row, col } = self.cursor;
        if c == '\n' {
            let tail = self.lines[row].split_off(col);
            self.lines.insert(row + 1, tail);
            self.cursor = Position::new(row + 1, 0);
        } else {
            self.lines[row].insert(col, c);
            self.cursor.col += c.len_utf8();
        }
        self.modified = true;
        trace!(target: "text.buffer", op = "insert_char", row, col, "edit");
    }

    /// Insert a string at the cursor in one splice.
    ///
    /// Produces the same content and cursor as calling [`insert_char`] once per
    /// code point of `s`.
    ///
    /// [`insert_char`]: TextBuffer::insert_char
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let Position { row, col } = self.cursor;
        let mut segments = s.split('\n');
        let first = segments.next().unwrap_or_default();
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            self.lines[row].insert_str(col, first);
            self.cursor.col += first.len();
        } else {
            let tail = self.lines[row].split_off(col);
            self.lines[row].push_str(first);
            let last_idx = rest.len() - 1;
            let mut new_lines: Vec<String> = rest.iter().map(|seg| (*seg).to_owned()).collect();
            let last_len = new_lines[last_idx].len();
            new_lines[last_idx].push_str(&tail);
            let inserted = new_lines.len();
            self.lines.splice(row + 1..row + 1, new_lines);
            self.cursor = Position::new(row + inserted, last_len);
        }
        self.modified = true;
        trace!(target: "text.buffer", op = "insert_str", row, col, len = s.len(), "edit");
    }

    /// Delete the grapheme cluster before the cursor; at column 0 join with the
    /// previous line. Returns false when there was nothing to delete.
    pub fn delete_backward(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        if col == 0 {
            if row == 0 {
                return false;
            }
            let line = self.lines.remove(row);
            let prev_len = self.lines[row - 1].len();
            self.lines[row - 1].push_str(&line);
            self.cursor = Position::new(row - 1, prev_len);
        } else {
            let start = grapheme::prev_boundary(&self.lines[row], col);
            self.lines[row].replace_range(start..col, "");
            self.cursor.col = start;
        }
        self.modified = true;
        trace!(target: "text.buffer", op = "delete_backward", row, col, "edit");
        true
    }

    /// Delete the grapheme cluster under the cursor; at end of line join the
    /// next line. Returns false when there was nothing to delete.
    pub fn delete_forward(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        let len = self.lines[row].len();
        if col >= len {
            if row + 1 >= self.lines.len() {
                return false;
            }
            let next = self.lines.remove(row + 1);
            self.lines[row].push_str(&next);
        } else {
            let end = grapheme::next_boundary(&self.lines[row], col);
            self.lines[row].replace_range(col..end, "");
        }
        self.modified = true;
        trace!(target: "text.buffer", op = "delete_forward", row, col, "edit");
        true
    }

    /// Delete from the cursor to end of line, or the line break when the
    /// cursor already sits at the end. Returns the removed text.
    pub fn kill_line(&mut self) -> String {
        let Position { row, col } = self.cursor;
        if col < self.lines[row].len() {
            let removed = self.lines[row].split_off(col);
            self.modified = true;
            removed
        } else if self.delete_forward() {
            "\n".to_owned()
        } else {
            String::new()
        }
    }

    /// Step one grapheme cluster left, wrapping to the end of the previous line.
    pub fn move_left(&mut self) {
        let Position { row, col } = self.cursor;
        if col > 0 {
            self.cursor.col = grapheme::prev_boundary(&self.lines[row], col);
        } else if row > 0 {
            self.cursor = Position::new(row - 1, self.lines[row - 1].len());
        }
    }

    /// Step one grapheme cluster right, wrapping to the start of the next line.
    pub fn move_right(&mut self) {
        let Position { row, col } = self.cursor;
        if col < self.lines[row].len() {
            self.cursor.col = grapheme::next_boundary(&self.lines[row], col);
        } else if row + 1 < self.lines.len() {
            self.cursor = Position::new(row + 1, 0);
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor.col = self.lines[self.cursor.row].len();
    }

    pub fn move_buffer_start(&mut self) {
        self.cursor = Position::origin();
    }

    pub fn move_buffer_end(&mut self) {
        let row = self.lines.len() - 1;
        self.cursor = Position::new(row, self.lines[row].len());
    }
}
