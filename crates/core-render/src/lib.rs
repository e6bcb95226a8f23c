//! Frame composition and terminal emission.
//!
//! A [`Frame`] is a logical cell grid covering the whole terminal. It is
//! rebuilt from [`EditorState`] once per tick by [`compose`] and written by
//! [`writer::write_frame`] in a single flush.
//!
//! Per layout leaf the frame holds, top to bottom inside the leaf's region:
//! the viewport's content rows, a status row, then a prompt row (as many of
//! the two as the layout reserves). Text is clipped to the leaf width with
//! [`core_text::width::slice_columns`], so a wide code point is never split.
//!
//! Invariants:
//! - Leader: width >= 1, `symbol` non-empty.
//! - Continuation: width == 0, `symbol` empty; always directly right of its
//!   leader.
//! - `Frame::cursor`, when set, lies inside the active leaf's content area.
//!
//! [`EditorState`]: core_state::EditorState

use bitflags::bitflags;
use core_text::codepoint_width;

pub mod compose;
pub mod status;
pub mod timing;
pub mod viewport;
pub mod writer;

pub use compose::compose;
pub use status::{StatusContext, build_status};
pub use writer::{WriteStats, write_frame};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // status row of the active window
        const DIM     = 0b0000_0010; // status rows of other windows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Printed text for leader cells; empty for continuation cells.
    pub symbol: String,
    /// Cells covered. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    pub fn leader(symbol: char, width: usize, flags: CellFlags) -> Self {
        Self {
            symbol: symbol.to_string(),
            width: width.clamp(1, 2) as u8,
            flags,
        }
    }

    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            symbol: String::new(),
            width: 0,
            flags,
        }
    }

    pub fn blank(flags: CellFlags) -> Self {
        Self {
            symbol: " ".to_owned(),
            width: 1,
            flags,
        }
    }

    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(CellFlags::empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
    /// Absolute terminal cell of the cursor; `None` hides it.
    pub cursor: Option<(u16, u16)>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
            cursor: None,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Write `text` starting at `(x, y)`, using at most `max_cols` cells.
    ///
    /// A wide code point that would cross `max_cols` (or the frame edge) is
    /// replaced by a blank. Returns the number of cells written.
    pub fn put_str(&mut self, x: u16, y: u16, text: &str, max_cols: u16, flags: CellFlags) -> u16 {
        let limit = max_cols.min(self.width.saturating_sub(x));
        let mut col = 0u16;
        for c in text.chars() {
            let w = codepoint_width(c) as u16;
            if w == 0 {
                continue;
            }
            if col + w > limit {
                if col < limit {
                    self.set(x + col, y, Cell::blank(flags));
                    col += 1;
                }
                break;
            }
            self.set(x + col, y, Cell::leader(c, w as usize, flags));
            for dx in 1..w {
                self.set(x + col + dx, y, Cell::continuation(flags));
            }
            col += w;
        }
        col
    }

    /// Fill `cols` cells from `(x, y)` with blanks carrying `flags`.
    pub fn fill(&mut self, x: u16, y: u16, cols: u16, flags: CellFlags) {
        for dx in 0..cols {
            self.set(x.saturating_add(dx), y, Cell::blank(flags));
        }
    }

    fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Leader cells of row `y` as `(symbol, width, flags, x)`.
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (&str, u16, CellFlags, u16)> + '_ {
        let start = y as usize * self.width as usize;
        let row = if y < self.height {
            &self.cells[start..start + self.width as usize]
        } else {
            &[]
        };
        row.iter()
            .enumerate()
            .filter(|(_, c)| c.is_leader())
            .map(|(x, c)| (c.symbol.as_str(), c.width as u16, c.flags, x as u16))
    }

    /// Row `y` as plain text; trailing blanks kept.
    pub fn row_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(s, _, _, _)| s).collect()
    }
}
