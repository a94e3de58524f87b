use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Next grapheme boundary after `byte_offset`. Returns None if at end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    match s[byte_offset..].grapheme_indices(true).nth(1) {
        Some((i, _)) => Some(byte_offset + i),
        None => Some(s.len()),
    }
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .last()
        .map(|(i, _)| i)
}

/// Start of the space-delimited word before `byte_offset`, skipping spaces
/// directly behind it
pub fn word_start_before(s: &str, byte_offset: usize) -> usize {
    let before = s[..byte_offset].trim_end_matches(' ');
    before.rfind(' ').map_or(0, |i| i + 1)
}

/// Start of the next space-delimited word after `byte_offset`, or the end of
/// the line when there is none
pub fn word_start_after(s: &str, byte_offset: usize) -> usize {
    let after = &s[byte_offset..];
    let trimmed = after.trim_end_matches(' ');
    match trimmed.find(' ') {
        Some(i) => {
            let rest = &after[i..];
            byte_offset + i + (rest.len() - rest.trim_start_matches(' ').len())
        }
        None => s.len(),
    }
}

/// Split `line` into rows of at most `width` cells, breaking after spaces
/// where possible and between graphemes otherwise. Always returns at least
/// one (possibly empty) row.
pub fn wrap_ranges(line: &str, width: usize) -> Vec<Range<usize>> {
    if width == 0 || display_width(line) <= width {
        return vec![0..line.len()];
    }

    let mut rows = Vec::new();
    let mut row_start = 0;
    let mut row_width = 0;
    // Byte offset just after the last space in the current row
    let mut last_break: Option<usize> = None;

    for (i, g) in line.grapheme_indices(true) {
        let gw = display_width(g);
        if row_width + gw > width && i > row_start {
            let cut = match last_break {
                Some(b) if b > row_start => b,
                _ => i,
            };
            rows.push(row_start..cut);
            row_start = cut;
            row_width = display_width(&line[cut..i]);
            last_break = None;
        }
        row_width += gw;
        if g == " " {
            last_break = Some(i + g.len());
        }
    }
    rows.push(row_start..line.len());
    rows
}
