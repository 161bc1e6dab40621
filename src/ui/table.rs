use std::fmt::Write as _;

use crate::columns::{Align, ColumnSpec};
use crate::state::AppState;
use crate::ui::{NO_DATA, NO_DATA_HINT};

pub const NO_RESULTS: &str = "No results found.";

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Right => format!("{text:>width$}"),
        Align::Center => format!("{text:^width$}"),
    }
}

/// Render one page of the visible rows as an aligned text table.
///
/// The first column shows `[x]` for selected rows followed by the record
/// index, which is what `--rows` refers to.
pub fn render_table(state: &AppState, page: usize) -> String {
    if state.columns.is_empty() || state.records.is_empty() {
        return format!("{NO_DATA}\n{NO_DATA_HINT}\n");
    }

    let columns: &[ColumnSpec] = &state.columns.columns;
    let rows = state.page(page);

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|&i| columns.iter().map(|c| c.render(&state.records[i])).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(ci, c)| {
            cells
                .iter()
                .map(|row| row[ci].chars().count())
                .chain(std::iter::once(c.label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let index_width = state.records.len().saturating_sub(1).to_string().len();

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| pad(&c.label, w, c.align))
        .collect();
    let _ = writeln!(out, "    {:>index_width$}  {}", "#", header.join(" | "));
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    let _ = writeln!(out, "    {}  {}", "-".repeat(index_width), rule.join("-+-"));

    if rows.is_empty() {
        let _ = writeln!(out, "{NO_RESULTS}");
    }
    for (&index, row) in rows.iter().zip(&cells) {
        let mark = if state.selected_rows.contains(&index) { "[x]" } else { "[ ]" };
        let line: Vec<String> = row
            .iter()
            .zip(columns.iter().zip(&widths))
            .map(|(text, (c, &w))| pad(text, w, c.align))
            .collect();
        let _ = writeln!(out, "{mark} {index:>index_width$}  {}", line.join(" | "));
    }

    let _ = writeln!(
        out,
        "{} • Page {} of {}",
        state.selection_summary(),
        page + 1,
        state.page_count().max(1)
    );
    out
}
