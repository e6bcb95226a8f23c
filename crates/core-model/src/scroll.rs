//! Cursor visibility: the minimal scroll adjustment after an edit or motion.
//!
//! Rules, applied in order by [`ensure_cursor_visible`]:
//! 1. Re-clamp `scroll_top` to the legal range (the buffer may have shrunk).
//! 2. Vertical, no wrap: closed form via [`compute_scroll_intent`].
//! 3. Vertical, wrap: bounded search via [`search_wrapped_top`], since a
//!    single buffer line may expand into several screen rows.
//! 4. Horizontal (no wrap only): [`compute_hscroll_intent`] on the cursor's
//!    display column.
//!
//! The adjustment never re-centers and is idempotent: a second call with no
//! intervening mutation changes nothing.

use crate::viewport::Viewport;
use tracing::trace;

/// New first visible line keeping `cursor_row` inside `[first, first + height)`,
/// or `None` when no scroll is needed.
pub fn compute_scroll_intent(first: usize, cursor_row: usize, height: usize) -> Option<usize> {
    if height == 0 {
        return None;
    }
    if cursor_row < first {
        Some(cursor_row)
    } else if cursor_row >= first + height {
        Some(cursor_row + 1 - height)
    } else {
        None
    }
}

/// New horizontal offset keeping `display_col` inside `[left, left + width)`,
/// or `None` when no scroll is needed.
pub fn compute_hscroll_intent(left: usize, display_col: usize, width: usize) -> Option<usize> {
    if width == 0 {
        return None;
    }
    if display_col < left {
        Some(display_col)
    } else if display_col >= left + width {
        Some(display_col + 1 - width)
    } else {
        None
    }
}

/// Search for the closest `scroll_top` under which the cursor's wrapped
/// screen row falls inside `[0, height)`.
///
/// Walks forward from the current top when the cursor is below the viewport
/// and backward when it is above. Falls back to the cursor's own line when
/// no candidate works (a single line taller than the viewport).
pub fn search_wrapped_top(view: &Viewport) -> usize {
    let height = view.height() as isize;
    let current = view.scroll_top();
    let cursor_row = view.text().cursor().row;
    let fits = |top: usize| {
        let row = view.screen_position_at(top).row;
        (0..height).contains(&row)
    };
    if fits(current) {
        return current;
    }
    if cursor_row < current {
        let mut candidate = current;
        while candidate > 0 {
            candidate -= 1;
            if fits(candidate) {
                return candidate;
            }
        }
    } else {
        for candidate in current + 1..=cursor_row {
            if fits(candidate) {
                return candidate;
            }
        }
    }
    cursor_row
}

/// Apply the scroll rules to `view`. Returns true when scroll state changed.
pub fn ensure_cursor_visible(view: &mut Viewport) -> bool {
    let before = (view.scroll_top(), view.scroll_left());
    let mut top = before.0.min(view.max_scroll_top());
    let mut left = if view.line_wrap() { 0 } else { before.1 };
    view.set_scroll_raw(top, left);

    if view.line_wrap() {
        if view.height() > 0 && view.width() > 0 {
            top = search_wrapped_top(view);
        }
    } else {
        let cursor_row = view.text().cursor().row;
        if let Some(new_top) = compute_scroll_intent(top, cursor_row, view.height()) {
            top = new_top;
        }
        let display_col = view.cursor_display_col();
        if let Some(new_left) = compute_hscroll_intent(left, display_col, view.width()) {
            left = new_left;
        }
    }
    view.set_scroll_raw(top, left);

    let changed = (top, left) != before;
    if changed {
        trace!(
            target: "model.scroll",
            window = view.id().0,
            from_top = before.0,
            from_left = before.1,
            top,
            left,
            wrap = view.line_wrap(),
            "scroll_adjust"
        );
    }
    changed
}
