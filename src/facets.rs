use std::collections::HashSet;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::model::{CellValue, ColumnKind, HeaderDefinition, Record};
use crate::format::{format_currency, format_date, format_number, yes_no};

// ---------------------------------------------------------------------------
// Facet options
// ---------------------------------------------------------------------------

/// Glyph a surface may show next to a facet option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetIcon {
    Check,
    CircleOff,
    Hash,
    Dollar,
    Calendar,
    Text,
}

/// One selectable facet entry. `value` is the canonical string compared
/// against cells when filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
    pub icon: FacetIcon,
}

impl FilterOption {
    fn new(label: impl Into<String>, value: impl Into<String>, icon: FacetIcon) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            icon,
        }
    }
}

/// Distinct values of a column in the order they first appear.
/// Absent keys count as null.
pub fn unique_values(records: &[Record], key: &str) -> Vec<CellValue> {
    let mut seen: HashSet<&CellValue> = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        let value = record.value(key);
        if seen.insert(value) {
            out.push(value.clone());
        }
    }
    out
}

/// Build the facet options for a column from its distinct values.
///
/// Sorting is stable, so values with equal sort keys keep the order they
/// were first encountered in.
pub fn filter_options(unique: &[CellValue], header: &HeaderDefinition) -> Vec<FilterOption> {
    match header.kind {
        ColumnKind::Boolean => vec![
            FilterOption::new(yes_no(true), "true", FacetIcon::Check),
            FilterOption::new(yes_no(false), "false", FacetIcon::CircleOff),
        ],
        ColumnKind::Number | ColumnKind::Currency => {
            let mut values: Vec<&CellValue> = unique.iter().filter(|v| !v.is_null()).collect();
            values.sort_by(|a, b| compare_numeric(a.coerce_f64(), b.coerce_f64()));

            let currency = header.kind == ColumnKind::Currency;
            values
                .into_iter()
                .map(|v| {
                    let n = v.coerce_f64();
                    let label = match (currency, n.is_nan()) {
                        (_, true) => v.to_string(),
                        (true, false) => format_currency(n),
                        (false, false) => format_number(n),
                    };
                    let icon = if currency { FacetIcon::Dollar } else { FacetIcon::Hash };
                    FilterOption::new(label, v.to_string(), icon)
                })
                .collect()
        }
        ColumnKind::Date => {
            let mut values: Vec<String> = unique
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .collect();
            values.sort();
            values
                .into_iter()
                .map(|v| {
                    let label = format_date(&v).unwrap_or_else(|| v.clone());
                    FilterOption::new(label, v, FacetIcon::Calendar)
                })
                .collect()
        }
        ColumnKind::String => {
            let mut values: Vec<String> = unique
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| v.to_string())
                .filter(|s| !s.trim().is_empty())
                .collect();
            values.sort();
            values
                .into_iter()
                .map(|v| FilterOption::new(v.clone(), v, FacetIcon::Text))
                .collect()
        }
    }
}

/// Ascending numeric order; values that do not coerce to a number (NaN)
/// sort after every number and keep their relative order.
pub(crate) fn compare_numeric(a: f64, b: f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.total_cmp(&b),
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
    }
}

// ---------------------------------------------------------------------------
// Filterability policy
// ---------------------------------------------------------------------------

/// Whether a column gets a facet control in a schema of `column_count` columns.
pub fn is_filterable(header: &HeaderDefinition, column_count: usize, config: &PipelineConfig) -> bool {
    match header.kind {
        ColumnKind::String | ColumnKind::Boolean => true,
        ColumnKind::Number | ColumnKind::Currency => column_count < config.facet_column_limit,
        ColumnKind::Date => false,
    }
}

/// The faceted columns of a schema, in schema order.
pub fn filterable_columns<'a>(
    schema: &'a [HeaderDefinition],
    config: &PipelineConfig,
) -> Vec<&'a HeaderDefinition> {
    schema
        .iter()
        .filter(|h| is_filterable(h, schema.len(), config))
        .collect()
}

// ---------------------------------------------------------------------------
// Search column selection
// ---------------------------------------------------------------------------

/// Pick the one column that gets a free-text search box.
///
/// String columns whose key or label mention a search keyword come first,
/// then string columns that do not look like identifiers, then any string
/// column, then whatever column comes first.
pub fn select_search_column<'a>(
    schema: &'a [HeaderDefinition],
    config: &PipelineConfig,
) -> Option<&'a HeaderDefinition> {
    let strings: Vec<&HeaderDefinition> =
        schema.iter().filter(|h| h.kind == ColumnKind::String).collect();

    if strings.is_empty() {
        return schema.first();
    }

    let mentions = |header: &HeaderDefinition, needle: &str| {
        let needle = needle.to_lowercase();
        header.key.to_lowercase().contains(&needle) || header.label.to_lowercase().contains(&needle)
    };

    if let Some(preferred) = strings
        .iter()
        .copied()
        .find(|h| config.search_keywords.iter().any(|k| mentions(h, k)))
    {
        return Some(preferred);
    }

    if let Some(non_id) = strings
        .iter()
        .copied()
        .find(|h| !mentions(h, &config.id_marker))
    {
        return Some(non_id);
    }

    strings.first().copied()
}
