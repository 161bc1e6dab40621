//! Chart axis classification, point projection and chart description.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::color::series_color;
use crate::data::model::{find_header, CellValue, ColumnKind, HeaderDefinition, Record};

/// Maximum number of points handed to a chart surface.
pub const CHART_POINT_LIMIT: usize = 100;

/// X tick labels longer than this are cut and suffixed with `...`.
pub const TICK_LABEL_MAX_CHARS: usize = 10;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewKind {
    #[default]
    Table,
    BarChart,
    LineChart,
}

impl ViewKind {
    pub fn is_chart(self) -> bool {
        matches!(self, ViewKind::BarChart | ViewKind::LineChart)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewKind::Table => "table",
            ViewKind::BarChart => "bar-chart",
            ViewKind::LineChart => "line-chart",
        })
    }
}

impl FromStr for ViewKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(ViewKind::Table),
            "bar-chart" | "bar" => Ok(ViewKind::BarChart),
            "line-chart" | "line" => Ok(ViewKind::LineChart),
            other => Err(format!("unknown view '{other}'")),
        }
    }
}

/// The view actually shown: chart views fall back to the table whenever the
/// schema cannot be charted.
pub fn resolve_view(requested: ViewKind, can_chart: bool) -> ViewKind {
    if requested.is_chart() && !can_chart {
        ViewKind::Table
    } else {
        requested
    }
}

// ---------------------------------------------------------------------------
// Axis classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisClassification {
    /// Categorical columns (string, date).
    pub x_candidates: Vec<HeaderDefinition>,
    /// Numeric columns (number, currency).
    pub y_candidates: Vec<HeaderDefinition>,
    pub can_chart: bool,
}

impl AxisClassification {
    pub fn is_x_candidate(&self, key: &str) -> bool {
        self.x_candidates.iter().any(|h| h.key == key)
    }

    pub fn is_y_candidate(&self, key: &str) -> bool {
        self.y_candidates.iter().any(|h| h.key == key)
    }
}

/// Partition the schema into x and y axis candidates, keeping schema order.
pub fn classify_axes(schema: &[HeaderDefinition]) -> AxisClassification {
    let x_candidates: Vec<HeaderDefinition> = schema
        .iter()
        .filter(|h| matches!(h.kind, ColumnKind::String | ColumnKind::Date))
        .cloned()
        .collect();
    let y_candidates: Vec<HeaderDefinition> =
        schema.iter().filter(|h| h.kind.is_numeric()).cloned().collect();
    let can_chart = !x_candidates.is_empty() && !y_candidates.is_empty();

    AxisClassification {
        x_candidates,
        y_candidates,
        can_chart,
    }
}

/// The active axis keys. `None` means no column is selected for that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl AxisSelection {
    /// First candidate of each axis; an axis without candidates is cleared.
    pub fn defaults(axes: &AxisClassification) -> Self {
        Self {
            x: axes.x_candidates.first().map(|h| h.key.clone()),
            y: axes.y_candidates.first().map(|h| h.key.clone()),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }
}

// ---------------------------------------------------------------------------
// Point projection
// ---------------------------------------------------------------------------

/// One chart point, pointing back at the record it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint<'a> {
    pub x: &'a CellValue,
    pub y: &'a CellValue,
    pub original: &'a Record,
}

/// Project records onto the selected axes.
///
/// Points with a null or absent x or y are dropped; the rest keep row order
/// and are cut at [`CHART_POINT_LIMIT`].
pub fn project_points<'a>(records: &'a [Record], x_key: &str, y_key: &str) -> Vec<ChartPoint<'a>> {
    records
        .iter()
        .filter_map(|record| {
            let x = record.get(x_key)?;
            let y = record.get(y_key)?;
            if x.is_null() || y.is_null() {
                return None;
            }
            Some(ChartPoint {
                x,
                y,
                original: record,
            })
        })
        .take(CHART_POINT_LIMIT)
        .collect()
}

/// Points for the current selection; empty unless both axes are set.
pub fn project_selection<'a>(records: &'a [Record], selection: &AxisSelection) -> Vec<ChartPoint<'a>> {
    match (&selection.x, &selection.y) {
        (Some(x), Some(y)) => project_points(records, x, y),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Chart description
// ---------------------------------------------------------------------------

/// Shortened x tick label: text longer than ten characters keeps its first
/// ten followed by `...`; other values render as their canonical string.
pub fn tick_label(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) if s.chars().count() > TICK_LABEL_MAX_CHARS => {
            let head: String = s.chars().take(TICK_LABEL_MAX_CHARS).collect();
            format!("{head}...")
        }
        other => other.to_string(),
    }
}

/// Everything a chart surface needs besides the points themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ViewKind,
    pub title: String,
    pub description: String,
    pub x_key: Option<String>,
    pub y_key: Option<String>,
    pub series_label: String,
    pub series_color: String,
    pub footer: String,
    /// Set when there is nothing to draw.
    pub empty_message: Option<String>,
}

impl ChartSpec {
    pub fn new(
        kind: ViewKind,
        schema: &[HeaderDefinition],
        selection: &AxisSelection,
        points: &[ChartPoint<'_>],
    ) -> Self {
        let label_of = |key: &Option<String>, fallback: &str| {
            key.as_deref()
                .and_then(|k| find_header(schema, k))
                .map(|h| h.label.clone())
                .unwrap_or_else(|| fallback.to_string())
        };
        let x_label = label_of(&selection.x, "Category");
        let y_label = label_of(&selection.y, "Data");

        let (title, description) = match kind {
            ViewKind::LineChart => ("Line Chart", format!("{y_label} trend by {x_label}")),
            ViewKind::BarChart | ViewKind::Table => ("Bar Chart", format!("{y_label} by {x_label}")),
        };

        let empty_message = points
            .is_empty()
            .then(|| "No data available. Configure chart axes to display data".to_string());

        ChartSpec {
            kind,
            title: title.to_string(),
            description,
            x_key: selection.x.clone(),
            y_key: selection.y.clone(),
            series_label: selection.y.clone().unwrap_or_default(),
            series_color: series_color(),
            footer: format!("Showing {} data points", points.len()),
            empty_message,
        }
    }
}
