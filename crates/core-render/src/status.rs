//! Per-window status row.
//!
//! Format: ` <name>[*]  L<line>:<col>[  Wrap]`
//! * `*` appears only when the buffer is modified.
//! * `line` and `col` are 1-based; `col` counts display cells, so a wide
//!   character advances it by two.
//! * `Wrap` appears while the window wraps long lines.
//!
//! Two stages as elsewhere in the renderer: [`compose_status`] yields ordered
//! segments and [`format_status`] joins them, which keeps truncation a single
//! concern of the frame writer.

use std::fmt::Write as _;

/// What the status row needs to know about one window.
#[derive(Debug, Clone, Copy)]
pub struct StatusContext<'a> {
    pub name: &'a str,
    pub modified: bool,
    /// 0-based buffer row.
    pub line: usize,
    /// 0-based display column.
    pub col: usize,
    pub line_wrap: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Name { name: &'a str, modified: bool },
    Position { line_1: usize, col_1: usize },
    Wrap,
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let mut out = Vec::with_capacity(3);
    out.push(StatusSegment::Name {
        name: ctx.name,
        modified: ctx.modified,
    });
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        col_1: ctx.col + 1,
    });
    if ctx.line_wrap {
        out.push(StatusSegment::Wrap);
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(32);
    for seg in segments {
        match seg {
            StatusSegment::Name { name, modified } => {
                s.push(' ');
                s.push_str(if name.is_empty() { "[No Name]" } else { name });
                if *modified {
                    s.push('*');
                }
            }
            StatusSegment::Position { line_1, col_1 } => {
                let _ = write!(s, "  L{line_1}:{col_1}");
            }
            StatusSegment::Wrap => s.push_str("  Wrap"),
        }
    }
    s
}

pub fn build_status(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx))
}
