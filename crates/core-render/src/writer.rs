//! Frame emission through crossterm.
//!
//! Rules:
//! * One `MoveTo` per row; cells of a row are batched into one `Print` per
//!   run of equal flags.
//! * The cursor is hidden while painting and shown again at
//!   [`Frame::cursor`] (left hidden when that is `None`).
//! * Everything is queued and flushed once at the end.

use crate::{CellFlags, Frame};
use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
};
use std::io::Write;
use std::time::Instant;

/// Counters for one written frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteStats {
    pub print_commands: u64,
    pub cells: u64,
}

pub fn write_frame<W: Write>(out: &mut W, frame: &Frame) -> Result<WriteStats> {
    let started = Instant::now();
    let mut stats = WriteStats::default();
    queue!(out, Hide)?;
    for y in 0..frame.height {
        queue!(out, MoveTo(0, y))?;
        let mut run = String::new();
        let mut run_flags = CellFlags::empty();
        for (symbol, width, flags, _) in frame.row_leaders(y) {
            if flags != run_flags && !run.is_empty() {
                print_run(out, &run, run_flags, &mut stats)?;
                run.clear();
            }
            run_flags = flags;
            run.push_str(symbol);
            stats.cells += width as u64;
        }
        if !run.is_empty() {
            print_run(out, &run, run_flags, &mut stats)?;
        }
    }
    if let Some((x, y)) = frame.cursor {
        queue!(out, MoveTo(x, y), Show)?;
    }
    out.flush()?;
    crate::timing::record_last_write_ns(started.elapsed().as_nanos() as u64);
    Ok(stats)
}

fn print_run<W: Write>(out: &mut W, run: &str, flags: CellFlags, stats: &mut WriteStats) -> Result<()> {
    if flags.contains(CellFlags::REVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if flags.contains(CellFlags::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    queue!(out, Print(run))?;
    if !flags.is_empty() {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    stats.print_commands += 1;
    Ok(())
}
