//! A rectangular view onto one shared buffer.
//!
//! The viewport owns presentation state only (size, scroll offsets, wrap
//! mode, vertical goal column); text and cursor live in the [`TextBuffer`]
//! behind the shared handle. Several viewports may hold the same handle.
//!
//! Coordinates:
//! * buffer space: `(row, col)` with `col` a byte offset,
//! * screen space: `(row, col)` relative to the content area, `col` in
//!   display cells as computed by [`core_text::width`].
//!
//! Invariants after [`Viewport::ensure_cursor_visible`]:
//! * `scroll_top <= max_scroll_top()`,
//! * `scroll_left == 0` whenever `line_wrap` is on,
//! * the cursor's screen position lies inside `[0,height) x [0,width)` when
//!   some scroll offset can achieve it.
//!
//! [`TextBuffer`]: core_text::TextBuffer

use crate::WindowId;
use crate::scroll;
use core_text::width::{byte_offset_for_column, string_width_up_to, wrap_position, wrapped_line_rows};
use core_text::{BufferRef, Position, TextBuffer};
use std::cell::Ref;

/// Cursor location relative to the viewport's top-left content cell.
///
/// Signed because the cursor can sit above or left of the visible area until
/// the scroll invariant runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPosition {
    pub row: isize,
    pub col: isize,
}

impl ScreenPosition {
    pub fn is_inside(&self, width: usize, height: usize) -> bool {
        self.row >= 0 && self.col >= 0 && (self.row as usize) < height && (self.col as usize) < width
    }
}

#[derive(Debug, Clone)]
pub struct Viewport {
    id: WindowId,
    buffer: BufferRef,
    width: usize,
    height: usize,
    scroll_top: usize,
    scroll_left: usize,
    line_wrap: bool,
    goal_col: Option<usize>,
}

impl Viewport {
    pub fn new(id: WindowId, buffer: BufferRef, width: usize, height: usize) -> Self {
        Self {
            id,
            buffer,
            width,
            height,
            scroll_top: 0,
            scroll_left: 0,
            line_wrap: false,
            goal_col: None,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn buffer(&self) -> &BufferRef {
        &self.buffer
    }

    /// Immutable borrow of the viewed buffer.
    pub fn text(&self) -> Ref<'_, TextBuffer> {
        self.buffer.borrow()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scroll_top(&self) -> usize {
        self.scroll_top
    }

    pub fn scroll_left(&self) -> usize {
        self.scroll_left
    }

    pub fn line_wrap(&self) -> bool {
        self.line_wrap
    }

    /// Resize the content area and restore the scroll invariant.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.ensure_cursor_visible();
    }

    /// Largest legal `scroll_top`.
    ///
    /// Without wrap the last page ends on the last line. With wrap a single
    /// line can fill the viewport, so any line may be the top line.
    pub fn max_scroll_top(&self) -> usize {
        let count = self.text().line_count();
        if self.line_wrap {
            count.saturating_sub(1)
        } else {
            count.saturating_sub(self.height)
        }
    }

    pub fn set_scroll_top(&mut self, n: usize) {
        self.scroll_top = n.min(self.max_scroll_top());
    }

    /// Horizontal offset in display columns; pinned to 0 while wrapping.
    pub fn set_scroll_left(&mut self, n: usize) {
        self.scroll_left = if self.line_wrap { 0 } else { n };
    }

    /// Toggle line wrapping. Turning wrap on resets the horizontal offset;
    /// turning it off re-applies the horizontal rule immediately.
    pub fn set_line_wrap(&mut self, on: bool) {
        self.line_wrap = on;
        if on {
            self.scroll_left = 0;
        }
        self.ensure_cursor_visible();
    }

    /// Screen rows taken by `line` under the current wrap mode.
    pub fn rows_for_line(&self, line: &str) -> usize {
        if self.line_wrap {
            wrapped_line_rows(line, self.width)
        } else {
            1
        }
    }

    /// Buffer lines rendered from `scroll_top` downward.
    ///
    /// Without wrap this is `content[scroll_top..min(scroll_top + height, len)]`.
    /// With wrap it holds every line whose first wrapped row starts inside the
    /// viewport; the last one may be only partly visible. Never padded.
    pub fn visible_lines(&self) -> Vec<String> {
        let buf = self.text();
        let lines = buf.lines();
        if self.scroll_top >= lines.len() {
            return Vec::new();
        }
        if !self.line_wrap {
            let end = (self.scroll_top + self.height).min(lines.len());
            return lines[self.scroll_top..end].to_vec();
        }
        let mut out = Vec::new();
        let mut row = 0usize;
        for line in &lines[self.scroll_top..] {
            if row >= self.height {
                break;
            }
            out.push(line.clone());
            row += self.rows_for_line(line);
        }
        out
    }

    /// Cursor position in screen cells for the current scroll state.
    pub fn cursor_screen_position(&self) -> ScreenPosition {
        self.screen_position_at(self.scroll_top)
    }

    /// Cursor position in screen cells if the viewport started at `top`.
    pub(crate) fn screen_position_at(&self, top: usize) -> ScreenPosition {
        let buf = self.text();
        let cursor = buf.cursor();
        let line = buf.line(cursor.row).unwrap_or_default();
        if !self.line_wrap || self.width == 0 {
            let display_col = string_width_up_to(line, cursor.col);
            return ScreenPosition {
                row: cursor.row as isize - top as isize,
                col: display_col as isize - self.scroll_left as isize,
            };
        }
        let (sub_row, col) = wrap_position(line, cursor.col, self.width);
        let (sub_row, col) = (sub_row as isize, col as isize);
        let lines = buf.lines();
        let row = if top <= cursor.row {
            let before: usize = lines[top..cursor.row]
                .iter()
                .map(|l| self.rows_for_line(l))
                .sum();
            before as isize + sub_row
        } else {
            let above: usize = lines[cursor.row..top.min(lines.len())]
                .iter()
                .map(|l| self.rows_for_line(l))
                .sum();
            sub_row - above as isize
        };
        ScreenPosition { row, col }
    }

    /// Display column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        let buf = self.text();
        let cursor = buf.cursor();
        string_width_up_to(buf.line(cursor.row).unwrap_or_default(), cursor.col)
    }

    /// Re-run the scroll invariant. Returns true when the scroll state changed.
    pub fn ensure_cursor_visible(&mut self) -> bool {
        scroll::ensure_cursor_visible(self)
    }

    pub(crate) fn set_scroll_raw(&mut self, top: usize, left: usize) {
        self.scroll_top = top;
        self.scroll_left = left;
    }

    /// Forget the remembered column used by vertical motions.
    pub fn clear_goal_col(&mut self) {
        self.goal_col = None;
    }

    /// Move the cursor `delta` lines, keeping the display column it had when
    /// the current run of vertical motions started.
    pub fn move_cursor_vertical(&mut self, delta: isize) {
        let goal = match self.goal_col {
            Some(goal) => goal,
            None => {
                let goal = self.cursor_display_col();
                self.goal_col = Some(goal);
                goal
            }
        };
        let mut buf = self.buffer.borrow_mut();
        let cursor = buf.cursor();
        let last = buf.line_count() - 1;
        let row = cursor.row.saturating_add_signed(delta).min(last);
        let col = byte_offset_for_column(buf.line(row).unwrap_or_default(), goal);
        buf.set_cursor(Position::new(row, col));
    }

    /// Scroll by `lines` buffer lines and drag the cursor back inside the
    /// viewport if the scroll pushed it out.
    pub fn scroll_lines(&mut self, lines: isize) {
        let target = self.scroll_top.saturating_add_signed(lines);
        self.set_scroll_top(target);
        let cursor_row = self.text().cursor().row;
        if cursor_row < self.scroll_top {
            self.move_cursor_vertical((self.scroll_top - cursor_row) as isize);
        }
        while self.cursor_screen_position().row >= self.height as isize
            && self.text().cursor().row > self.scroll_top
        {
            self.move_cursor_vertical(-1);
        }
        self.ensure_cursor_visible();
    }

    /// Scroll horizontally by `columns` cells (no-op while wrapping) and drag
    /// the cursor along when the line is long enough.
    pub fn scroll_columns(&mut self, columns: isize) {
        if self.line_wrap || self.width == 0 {
            return;
        }
        let left = self.scroll_left.saturating_add_signed(columns);
        self.set_scroll_left(left);
        let display_col = self.cursor_display_col();
        let target_col = if display_col < left {
            Some(left)
        } else if display_col >= left + self.width {
            Some(left + self.width - 1)
        } else {
            None
        };
        if let Some(target_col) = target_col {
            let mut buf = self.buffer.borrow_mut();
            let row = buf.cursor().row;
            let line = buf.line(row).unwrap_or_default();
            let mut col = byte_offset_for_column(line, target_col);
            if string_width_up_to(line, col) < left
                && let Some(c) = line[col..].chars().next()
            {
                // wide code point straddling the left edge
                col += c.len_utf8();
            }
            buf.set_cursor(Position::new(row, col));
        }
        self.ensure_cursor_visible();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_text::TextBuffer;

    fn view(text: &str, width: usize, height: usize) -> Viewport {
        let buf = TextBuffer::from_str("t", text).into_shared();
        Viewport::new(WindowId(0), buf, width, height)
    }

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn visible_lines_not_padded() {
        let mut v = view("a\nb\nc", 10, 8);
        assert_eq!(v.visible_lines(), vec!["a", "b", "c"]);
        v.set_scroll_top(99);
        assert_eq!(v.scroll_top(), 0, "clamped to max(0, len - height)");
    }

    #[test]
    fn visible_lines_count_matches_window() {
        let mut v = view(&numbered(20), 10, 8);
        v.set_scroll_top(5);
        assert_eq!(v.visible_lines().len(), 8);
        v.set_scroll_top(15);
        assert_eq!(v.scroll_top(), 12);
        assert_eq!(v.visible_lines().len(), 8);
        assert_eq!(v.visible_lines()[0], "line12");
    }

    #[test]
    fn cursor_column_uses_display_width() {
        let v = view("aあb", 10, 3);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 4)); // after あ
        assert_eq!(
            v.cursor_screen_position(),
            ScreenPosition { row: 0, col: 3 }
        );
    }

    #[test]
    fn scroll_left_offsets_column() {
        let mut v = view("0123456789abcdef", 4, 1);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 10));
        v.set_scroll_left(8);
        assert_eq!(v.cursor_screen_position().col, 2);
    }

    #[test]
    fn wrap_expands_rows() {
        let mut v = view("0123456789ABCDEFGHIJ\nx", 8, 10);
        v.set_line_wrap(true);
        assert_eq!(v.rows_for_line("0123456789ABCDEFGHIJ"), 3);
        v.buffer().borrow_mut().set_cursor(Position::new(1, 1));
        assert_eq!(
            v.cursor_screen_position(),
            ScreenPosition { row: 3, col: 1 }
        );
        v.buffer().borrow_mut().set_cursor(Position::new(0, 17));
        assert_eq!(
            v.cursor_screen_position(),
            ScreenPosition { row: 2, col: 1 }
        );
    }

    #[test]
    fn wrapped_cursor_never_shares_a_cell() {
        let mut v = view("abcd\nxy", 4, 5);
        v.set_line_wrap(true);
        assert_eq!(v.rows_for_line("abcd"), 2);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 4));
        let end_of_full_line = v.cursor_screen_position();
        v.buffer().borrow_mut().set_cursor(Position::new(1, 0));
        let next_line = v.cursor_screen_position();
        assert_eq!(end_of_full_line, ScreenPosition { row: 1, col: 0 });
        assert_eq!(next_line, ScreenPosition { row: 2, col: 0 });
    }

    #[test]
    fn wrapped_wide_codepoint_starts_next_row() {
        let mut v = view("abcあ", 4, 5);
        v.set_line_wrap(true);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 3));
        assert_eq!(
            v.cursor_screen_position(),
            ScreenPosition { row: 1, col: 0 }
        );
    }

    #[test]
    fn wrap_visible_lines_stop_at_height() {
        let text = ["x".repeat(10), "y".repeat(10), "z".repeat(10)].join("\n");
        let mut v = view(&text, 4, 5);
        v.set_line_wrap(true);
        // rows: 3 + 3 -> second line starts at row 3 (< 5), third at row 6
        assert_eq!(v.visible_lines().len(), 2);
    }

    #[test]
    fn wrap_on_resets_scroll_left() {
        let mut v = view(&"w".repeat(50), 10, 3);
        v.buffer().borrow_mut().move_line_end();
        v.ensure_cursor_visible();
        assert_eq!(v.scroll_left(), 41);
        v.set_line_wrap(true);
        assert_eq!(v.scroll_left(), 0);
        v.set_line_wrap(false);
        assert_eq!(v.scroll_left(), 41);
    }

    #[test]
    fn vertical_motion_keeps_goal_column() {
        let mut v = view("abcdef\nab\nabcdef", 10, 5);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 5));
        v.move_cursor_vertical(1);
        assert_eq!(v.text().cursor(), Position::new(1, 2));
        v.move_cursor_vertical(1);
        assert_eq!(v.text().cursor(), Position::new(2, 5));
        v.clear_goal_col();
        v.move_cursor_vertical(-9);
        assert_eq!(v.text().cursor(), Position::new(0, 5));
    }

    #[test]
    fn vertical_motion_lands_on_wide_codepoint_start() {
        let mut v = view("abcd\nあいう", 10, 5);
        v.buffer().borrow_mut().set_cursor(Position::new(0, 3));
        v.move_cursor_vertical(1);
        // column 3 is the second cell of い (bytes 3..6)
        assert_eq!(v.text().cursor(), Position::new(1, 3));
    }

    #[test]
    fn scroll_lines_drags_cursor() {
        let mut v = view(&numbered(30), 10, 5);
        v.scroll_lines(3);
        assert_eq!(v.scroll_top(), 3);
        assert_eq!(v.text().cursor().row, 3);
        v.buffer().borrow_mut().set_cursor(Position::new(7, 0));
        v.scroll_lines(-2);
        assert_eq!(v.scroll_top(), 1);
        assert_eq!(v.text().cursor().row, 5);
    }

    #[test]
    fn scroll_columns_drags_cursor() {
        let mut v = view(&"abcdefghij".repeat(3), 5, 1);
        v.scroll_columns(4);
        assert_eq!(v.scroll_left(), 4);
        assert_eq!(v.text().cursor().col, 4);
    }
}
