//! Terminal display width of code points and strings.
//!
//! Every column decision in the workspace (cursor placement, horizontal
//! scroll, wrap row counts, render clipping) flows through this module so the
//! model and the renderer never disagree about where a cell lands.
//!
//! Classification:
//! * control code points below U+0020 occupy 0 columns,
//! * code points inside [`WIDE_RANGES`] (East Asian Wide / Fullwidth) occupy 2,
//! * everything else (ASCII, Latin, combining marks, emoji outside the table)
//!   occupies 1.
//!
//! The table is fixed rather than derived from a Unicode property crate:
//! column math must stay bit-compatible across builds and Unicode versions.

/// Inclusive code point ranges rendered two columns wide.
///
/// Sorted and non-overlapping; [`codepoint_width`] binary-searches it.
pub const WIDE_RANGES: &[(u32, u32)] = &[
    (0x1100, 0x115F),   // Hangul Jamo initial consonants
    (0x2329, 0x232A),   // angle brackets
    (0x2E80, 0x303E),   // CJK radicals, Kangxi radicals, CJK symbols and punctuation
    (0x3041, 0x33FF),   // Hiragana, Katakana, Bopomofo, Hangul compat Jamo, CJK compat
    (0x3400, 0x4DBF),   // CJK unified ideographs extension A
    (0x4E00, 0x9FFF),   // CJK unified ideographs
    (0xA000, 0xA4CF),   // Yi syllables and radicals
    (0xAC00, 0xD7A3),   // Hangul syllables
    (0xF900, 0xFAFF),   // CJK compatibility ideographs
    (0xFE10, 0xFE19),   // vertical forms
    (0xFE30, 0xFE6F),   // CJK compatibility forms, small form variants
    (0xFF00, 0xFF60),   // fullwidth ASCII variants
    (0xFFE0, 0xFFE6),   // fullwidth signs
    (0x20000, 0x2FFFD), // supplementary ideographic plane
    (0x30000, 0x3FFFD), // tertiary ideographic plane
];

fn is_wide(cp: u32) -> bool {
    WIDE_RANGES
        .binary_search_by(|&(lo, hi)| {
            if hi < cp {
                core::cmp::Ordering::Less
            } else if lo > cp {
                core::cmp::Ordering::Greater
            } else {
                core::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Column width of a single code point: 0, 1 or 2.
#[inline]
pub fn codepoint_width(c: char) -> usize {
    let cp = c as u32;
    if cp < 0x20 {
        0
    } else if cp <= 0x7E {
        1
    } else if is_wide(cp) {
        2
    } else {
        1
    }
}

/// Sum of [`codepoint_width`] over every code point of `s`.
pub fn string_width(s: &str) -> usize {
    s.chars().map(codepoint_width).sum()
}

/// Width of the code points whose byte span ends at or before `byte_offset`.
///
/// A code point straddling `byte_offset` is not counted. Offsets past the end
/// yield the width of the whole string.
pub fn string_width_up_to(s: &str, byte_offset: usize) -> usize {
    s.char_indices()
        .take_while(|(idx, c)| idx + c.len_utf8() <= byte_offset)
        .map(|(_, c)| codepoint_width(c))
        .sum()
}

/// Byte offset of the code point covering display column `col`.
///
/// When `col` falls on the second cell of a wide code point the offset of that
/// code point is returned, so the result is always a code point boundary.
/// Columns at or past the end of the line map to `s.len()`.
pub fn byte_offset_for_column(s: &str, col: usize) -> usize {
    let mut acc = 0usize;
    for (idx, c) in s.char_indices() {
        let w = codepoint_width(c);
        if w > 0 && col < acc + w {
            return idx;
        }
        acc += w;
    }
    s.len()
}

/// Wrapped placement of a code point of width `w` arriving at `(row, col)`.
///
/// A code point that would cross the right edge moves to the start of the next
/// row, unless the row is still empty.
#[inline]
fn wrap_place(row: usize, col: usize, w: usize, columns: usize) -> (usize, usize) {
    if col > 0 && col + w > columns {
        (row + 1, 0)
    } else {
        (row, col)
    }
}

/// `(row, col)` of `byte_offset` when `s` is wrapped at `columns` cells.
///
/// Rows break before a code point that does not fit, so a wide code point is
/// never split across rows. The end of a line that exactly fills its last row
/// sits at column 0 of one more row, which keeps every cursor position on its
/// own cell.
pub fn wrap_position(s: &str, byte_offset: usize, columns: usize) -> (usize, usize) {
    let columns = columns.max(1);
    let (mut row, mut col) = (0usize, 0usize);
    for (idx, c) in s.char_indices() {
        let w = codepoint_width(c);
        if idx >= byte_offset {
            return wrap_place(row, col, w.max(1), columns);
        }
        (row, col) = wrap_place(row, col, w, columns);
        col += w;
    }
    wrap_place(row, col, 1, columns)
}

/// Byte offsets where the wrapped rows of `s` start; the first is always 0.
///
/// A trailing offset equal to `s.len()` marks the empty row holding the end
/// of a line that exactly fills its last row.
pub fn wrap_row_starts(s: &str, columns: usize) -> Vec<usize> {
    let columns = columns.max(1);
    let mut starts = vec![0];
    let (mut row, mut col) = (0usize, 0usize);
    for (idx, c) in s.char_indices() {
        let w = codepoint_width(c);
        let (r, placed) = wrap_place(row, col, w, columns);
        if r != row {
            starts.push(idx);
        }
        row = r;
        col = placed + w;
    }
    if wrap_place(row, col, 1, columns).0 != row {
        starts.push(s.len());
    }
    starts
}

/// Screen rows `s` occupies when wrapped at `columns`. Empty lines still take
/// one row.
#[inline]
pub fn wrapped_line_rows(s: &str, columns: usize) -> usize {
    wrap_position(s, s.len(), columns).0 + 1
}

/// Render the cells `[start_col, start_col + columns)` of `s`.
///
/// The result never exceeds `columns` cells and is never padded past the end
/// of the line. A wide code point cut by either edge is replaced by spaces for
/// the cells that fall inside the range, so cell positions stay exact. Control
/// code points are dropped.
pub fn slice_columns(s: &str, start_col: usize, columns: usize) -> String {
    let end_col = start_col.saturating_add(columns);
    let mut out = String::new();
    let mut col = 0usize;
    for c in s.chars() {
        if col >= end_col {
            break;
        }
        let w = codepoint_width(c);
        if w == 0 {
            continue;
        }
        let next = col + w;
        if col >= start_col && next <= end_col {
            out.push(c);
        } else if next > start_col {
            // straddles an edge: emit only the covered cells
            let covered = next.min(end_col) - col.max(start_col);
            out.extend(std::iter::repeat_n(' ', covered));
        }
        col = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_hiragana() {
        assert_eq!(codepoint_width('a'), 1);
        assert_eq!(codepoint_width('あ'), 2);
        assert_eq!(string_width("aあ"), 3);
    }

    #[test]
    fn control_is_zero() {
        assert_eq!(codepoint_width('\t'), 0);
        assert_eq!(codepoint_width('\u{1b}'), 0);
        assert_eq!(codepoint_width('\u{7f}'), 1);
    }

    #[test]
    fn range_edges() {
        assert_eq!(codepoint_width('\u{10FF}'), 1);
        assert_eq!(codepoint_width('\u{1100}'), 2);
        assert_eq!(codepoint_width('\u{115F}'), 2);
        assert_eq!(codepoint_width('\u{1160}'), 1);
        assert_eq!(codepoint_width('\u{303E}'), 2);
        assert_eq!(codepoint_width('\u{303F}'), 1);
        assert_eq!(codepoint_width('\u{D7A3}'), 2);
        assert_eq!(codepoint_width('\u{D7A4}'), 1);
        assert_eq!(codepoint_width('Ａ'), 2); // U+FF21 fullwidth A
        assert_eq!(codepoint_width('\u{FF61}'), 1); // halfwidth ideographic full stop
        assert_eq!(codepoint_width('\u{20000}'), 2);
        assert_eq!(codepoint_width('\u{3FFFE}'), 1);
    }

    #[test]
    fn latin_and_combining_are_narrow() {
        assert_eq!(codepoint_width('é'), 1);
        assert_eq!(codepoint_width('\u{0301}'), 1);
        assert_eq!(string_width("e\u{0301}"), 2);
    }

    #[test]
    fn wide_table_sorted_and_disjoint() {
        for pair in WIDE_RANGES.windows(2) {
            assert!(pair[0].0 <= pair[0].1);
            assert!(pair[0].1 < pair[1].0, "overlap at {:x?}", pair);
        }
    }

    #[test]
    fn width_up_to_skips_straddling_codepoint() {
        let s = "aあb"; // bytes: a=0, あ=1..4, b=4
        assert_eq!(string_width_up_to(s, 0), 0);
        assert_eq!(string_width_up_to(s, 1), 1);
        assert_eq!(string_width_up_to(s, 2), 1);
        assert_eq!(string_width_up_to(s, 4), 3);
        assert_eq!(string_width_up_to(s, 5), 4);
        assert_eq!(string_width_up_to(s, 500), 4);
    }

    #[test]
    fn column_to_byte_offset() {
        let s = "aあb";
        assert_eq!(byte_offset_for_column(s, 0), 0);
        assert_eq!(byte_offset_for_column(s, 1), 1);
        assert_eq!(byte_offset_for_column(s, 2), 1);
        assert_eq!(byte_offset_for_column(s, 3), 4);
        assert_eq!(byte_offset_for_column(s, 4), 5);
        assert_eq!(byte_offset_for_column(s, 40), 5);
    }

    #[test]
    fn wrapped_row_counts() {
        assert_eq!(wrapped_line_rows("", 10), 1);
        assert_eq!(wrapped_line_rows("abcdefghi", 10), 1);
        // the end of a full row needs a row of its own
        assert_eq!(wrapped_line_rows("abcdefghij", 10), 2);
        assert_eq!(wrapped_line_rows(&"x".repeat(25), 10), 3);
        assert_eq!(wrapped_line_rows("", 0), 1);
    }

    #[test]
    fn wide_codepoint_moves_to_next_row() {
        let s = "abcあ"; // あ at byte 3 does not fit in column 3 of 4
        assert_eq!(wrap_row_starts(s, 4), vec![0, 3]);
        assert_eq!(wrap_position(s, 3, 4), (1, 0));
        assert_eq!(wrap_position(s, s.len(), 4), (1, 2));
        assert_eq!(wrapped_line_rows(s, 4), 2);
    }

    #[test]
    fn exact_fill_ends_on_next_row() {
        assert_eq!(wrap_row_starts("abcd", 4), vec![0, 4]);
        assert_eq!(wrap_position("abcd", 3, 4), (0, 3));
        assert_eq!(wrap_position("abcd", 4, 4), (1, 0));
        assert_eq!(wrap_row_starts("abcdef", 4), vec![0, 4]);
        assert_eq!(wrap_position("abcdef", 6, 4), (1, 2));
    }

    #[test]
    fn wrap_positions_are_distinct() {
        let s = "aあいbうcdえ";
        let mut seen: Vec<(usize, usize)> = s
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(s.len()))
            .map(|i| wrap_position(s, i, 3))
            .collect();
        let total = seen.len();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert!(seen.iter().all(|&(_, col)| col < 3));
    }

    #[test]
    fn slice_plain_and_wide() {
        assert_eq!(slice_columns("hello world", 0, 5), "hello");
        assert_eq!(slice_columns("hello world", 6, 20), "world");
        assert_eq!(slice_columns("hello", 9, 3), "");
        assert_eq!(slice_columns("あいう", 0, 4), "あい");
    }

    #[test]
    fn slice_never_splits_wide_codepoint() {
        // right edge cuts い in half
        assert_eq!(slice_columns("あいう", 0, 3), "あ ");
        // left edge cuts あ in half
        assert_eq!(slice_columns("あいう", 1, 3), " い");
        assert_eq!(string_width(&slice_columns("aあいう", 2, 3)), 3);
    }

    #[test]
    fn slice_drops_controls() {
        assert_eq!(slice_columns("a\tb", 0, 10), "ab");
    }
}
