//! Screen rows of one viewport.
//!
//! Without wrap every visible buffer line becomes one row clipped to
//! `[scroll_left, scroll_left + width)`. With wrap a line is split at the
//! byte offsets from [`wrap_row_starts`]: a wide code point that would cross
//! the right edge starts the next row, and a line that exactly fills its last
//! row gets one more (empty) row for its end. The cursor math in `core_model`
//! uses the same split, so rows and cursor always agree.

use core_model::Viewport;
use core_text::width::{slice_columns, wrap_row_starts};

/// At most `view.height()` rows, each at most `view.width()` cells wide.
pub fn viewport_rows(view: &Viewport) -> Vec<String> {
    let width = view.width();
    let height = view.height();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let mut rows = Vec::with_capacity(height);
    for line in view.visible_lines() {
        if !view.line_wrap() {
            rows.push(slice_columns(&line, view.scroll_left(), width));
            continue;
        }
        let starts = wrap_row_starts(&line, width);
        let ends = starts.iter().skip(1).copied().chain(std::iter::once(line.len()));
        for (start, end) in starts.iter().copied().zip(ends) {
            if rows.len() == height {
                break;
            }
            rows.push(slice_columns(&line[start..end], 0, width));
        }
    }
    rows.truncate(height);
    rows
}
