//! Build a [`Frame`] from the editor state.

use crate::status::{StatusContext, build_status};
use crate::viewport::viewport_rows;
use crate::{CellFlags, Frame};
use core_model::{LayoutRegion, Viewport};
use core_state::EditorState;
use std::time::Instant;
use tracing::trace;

/// Compose the whole screen. `pending_keys` is the open chord prefix, shown
/// in the active window's prompt row in place of the status message.
pub fn compose(state: &EditorState, pending_keys: Option<&str>) -> Frame {
    let started = Instant::now();
    let layout = &state.layout;
    let mut frame = Frame::new(layout.total_width(), layout.total_height());
    let active = layout.active();
    let prompt = pending_keys
        .map(|keys| format!("{keys}-"))
        .or_else(|| state.status_text().map(str::to_owned));

    for leaf in layout.leaves() {
        let Some(view) = leaf.viewport() else {
            continue;
        };
        let is_active = view.id() == active;
        let region = leaf.region();
        let content_rows = draw_content(&mut frame, view, region);
        let mut y = region.y + content_rows;
        let bottom = region.y.saturating_add(region.height);

        if layout.reserved_rows() >= 1 && y < bottom {
            let flags = if is_active {
                CellFlags::REVERSE
            } else {
                CellFlags::DIM
            };
            frame.fill(region.x, y, region.width, flags);
            frame.put_str(region.x, y, &status_line(view), region.width, flags);
            y += 1;
        }
        if layout.reserved_rows() >= 2
            && y < bottom
            && is_active
            && let Some(text) = &prompt
        {
            frame.put_str(region.x, y, text, region.width, CellFlags::empty());
        }

        if is_active {
            frame.cursor = cursor_cell(view, region, content_rows);
        }
    }
    crate::timing::record_last_compose_ns(started.elapsed().as_nanos() as u64);
    trace!(target: "render", leaves = layout.leaf_count(), cursor = ?frame.cursor, "compose");
    frame
}

/// Draw content rows; returns the rows the content area occupies.
fn draw_content(frame: &mut Frame, view: &Viewport, region: LayoutRegion) -> u16 {
    let rows = (view.height() as u16).min(region.height);
    for (i, text) in viewport_rows(view).iter().take(rows as usize).enumerate() {
        frame.put_str(region.x, region.y + i as u16, text, region.width, CellFlags::empty());
    }
    rows
}

fn status_line(view: &Viewport) -> String {
    let buf = view.text();
    let cursor = buf.cursor();
    build_status(&StatusContext {
        name: &buf.name,
        modified: buf.is_modified(),
        line: cursor.row,
        col: view.cursor_display_col(),
        line_wrap: view.line_wrap(),
    })
}

fn cursor_cell(view: &Viewport, region: LayoutRegion, content_rows: u16) -> Option<(u16, u16)> {
    let pos = view.cursor_screen_position();
    if !pos.is_inside(region.width as usize, content_rows as usize) {
        return None;
    }
    Some((region.x + pos.col as u16, region.y + pos.row as u16))
}
