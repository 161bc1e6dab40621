use std::fmt::Write as _;

use crate::chart::{tick_label, ChartPoint, ChartSpec, ViewKind};
use crate::data::model::find_header;
use crate::format::format_cell;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Text chart
// ---------------------------------------------------------------------------

/// Width of the longest bar, in characters.
pub const PLOT_WIDTH: usize = 40;

/// Column a value lands in, scaled between the smallest and largest value
/// (or zero, whichever is further out).
fn scale(value: f64, min: f64, max: f64) -> usize {
    let lo = min.min(0.0);
    let hi = max.max(0.0);
    if !value.is_finite() || hi <= lo {
        return 0;
    }
    (((value - lo) / (hi - lo)) * PLOT_WIDTH as f64).round() as usize
}

/// Render the current chart view, or `None` when the table is shown.
pub fn render_chart(state: &AppState) -> Option<String> {
    let spec = state.chart_spec()?;
    let points = state.chart_points();
    Some(render_points(state, &spec, &points))
}

fn render_points(state: &AppState, spec: &ChartSpec, points: &[ChartPoint<'_>]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", spec.title);
    let _ = writeln!(out, "{}", spec.description);

    if let Some(message) = &spec.empty_message {
        let _ = writeln!(out, "{message}");
        return out;
    }

    let y_kind = spec
        .y_key
        .as_deref()
        .and_then(|k| find_header(state.schema(), k))
        .map(|h| h.kind);

    let values: Vec<f64> = points.iter().map(|p| p.y.coerce_f64()).collect();
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);

    let labels: Vec<String> = points.iter().map(|p| tick_label(p.x)).collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for ((point, label), value) in points.iter().zip(&labels).zip(&values) {
        let shown = match y_kind {
            Some(kind) => format_cell(point.y, kind),
            None => point.y.to_string(),
        };
        let column = scale(*value, min, max);
        let glyphs = match spec.kind {
            ViewKind::LineChart => format!("{}●", " ".repeat(column)),
            ViewKind::BarChart | ViewKind::Table => "█".repeat(column),
        };
        let _ = writeln!(out, "{label:>label_width$} │{glyphs} {shown}");
    }

    let _ = writeln!(out, "{} ({})", spec.series_label, spec.series_color);
    let _ = writeln!(out, "{}", spec.footer);
    out
}
