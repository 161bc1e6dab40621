use std::fmt::Write as _;

use crate::columns::ColumnSpec;
use crate::data::filter::ColumnFilter;
use crate::facets::FacetIcon;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Toolbar – search box and facet controls
// ---------------------------------------------------------------------------

pub fn icon_glyph(icon: FacetIcon) -> &'static str {
    match icon {
        FacetIcon::Check => "✓",
        FacetIcon::CircleOff => "○",
        FacetIcon::Hash => "#",
        FacetIcon::Dollar => "$",
        FacetIcon::Calendar => "▦",
        FacetIcon::Text => "¶",
    }
}

/// Placeholder of the search box, e.g. `Filter company name...`.
pub fn search_placeholder(search: Option<&ColumnSpec>) -> String {
    let label = search.map_or_else(|| "data".to_string(), |c| c.label.to_lowercase());
    format!("Filter {label}...")
}

/// Render the search line and one line per faceted column.
/// Active facet values are marked with `*`.
pub fn toolbar(state: &AppState) -> String {
    let mut out = String::new();
    let search = state.columns.search_spec();

    let query = search
        .and_then(|c| state.filters.get(&c.key))
        .and_then(|f| match f {
            ColumnFilter::Search(text) => Some(text.as_str()),
            ColumnFilter::Facet(_) => None,
        })
        .unwrap_or("");
    let _ = writeln!(out, "Search: [{}] {query}", search_placeholder(search));

    for column in state.columns.faceted() {
        let Some(options) = &column.facet else {
            continue;
        };
        let active = match state.filters.get(&column.key) {
            Some(ColumnFilter::Facet(values)) => Some(values),
            _ => None,
        };
        let rendered: Vec<String> = options
            .iter()
            .map(|opt| {
                let mark = if active.is_some_and(|v| v.contains(&opt.value)) {
                    "*"
                } else {
                    ""
                };
                format!("{mark}{} {}", icon_glyph(opt.icon), opt.label)
            })
            .collect();
        let _ = writeln!(out, "{} ({}): {}", column.label, column.key, rendered.join(", "));
    }

    if state.has_filters() {
        let active = state.filters.values().filter(|f| f.is_active()).count();
        let _ = writeln!(out, "{active} filter(s) active");
    }
    out
}

/// `Query executed in 3.10ms • 91 rows`, or the error message.
pub fn status_line(state: &AppState) -> String {
    if let Some(message) = &state.status_message {
        return format!("Error: {message}");
    }
    match &state.result {
        Some(result) => format!(
            "Query executed in {} • {} rows",
            result.execution_time.as_deref().unwrap_or("-"),
            result.rows.len()
        ),
        None => String::new(),
    }
}
