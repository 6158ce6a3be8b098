//! Gutter formatting for quoted content and column alignment for tables.

use unicode_width::UnicodeWidthStr;

/// Format multi-line content with a gutter on the left.
///
/// Used for quoting git output and hook commands under an error or progress line.
/// Each line is prefixed with a background-colored cell and a space:
///
/// ```text
/// ✗ git worktree add failed
///   fatal: '.wt/feature' already exists
/// ```
pub fn format_with_gutter(content: &str) -> String {
    let gutter = super::GUTTER;
    content
        .lines()
        .map(|line| format!("{gutter} {gutter:#} {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display width of a string in terminal columns.
pub fn visual_width(s: &str) -> usize {
    s.width()
}

/// Render rows as left-aligned columns separated by two spaces.
///
/// Trailing whitespace is trimmed from each line so the last column never
/// carries padding.
pub fn align_columns(rows: &[Vec<String>]) -> Vec<String> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| visual_width(cell))
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    line.push_str("  ");
                }
                line.push_str(cell);
                let pad = widths[i].saturating_sub(visual_width(cell));
                line.extend(std::iter::repeat_n(' ', pad));
            }
            line.trim_end().to_string()
        })
        .collect()
}
