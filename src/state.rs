use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::chart::{
    classify_axes, project_selection, resolve_view, AxisClassification, AxisSelection,
    ChartPoint, ChartSpec, ViewKind,
};
use crate::columns::{build_column_model, ColumnModel};
use crate::config::PipelineConfig;
use crate::data::filter::{filtered_indices, has_filters, ColumnFilter, FilterState};
use crate::data::materialize::materialize;
use crate::data::model::{find_header, HeaderDefinition, Record, ResultSet};
use crate::data::sort::{sort_indices, SortSpec};
use crate::error::Result;
use crate::export::{export_selection, ExportArtifact};
use crate::query::QueryResponse;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything derived from the current query result, independent of rendering.
///
/// Derived fields are recomputed wholesale whenever a new result arrives;
/// filter, sort and selection changes only touch `visible_indices` and
/// `selected_rows`.
#[derive(Debug, Default)]
pub struct AppState {
    /// Last successful result (None until a query succeeds).
    pub result: Option<ResultSet>,

    /// Result rows keyed by column.
    pub records: Vec<Record>,

    pub columns: ColumnModel,

    pub axes: AxisClassification,

    /// Active chart axes.
    pub selection: AxisSelection,

    /// The view being shown, after the table fallback.
    pub view: ViewKind,

    /// Per-column filter selections.
    pub filters: FilterState,

    pub sort: Option<SortSpec>,

    /// Indices into `records` passing the filters, in sorted order (cached).
    pub visible_indices: Vec<usize>,

    /// Selected record indices. Survives filtering.
    pub selected_rows: BTreeSet<usize>,

    /// Status / error message for the surface.
    pub status_message: Option<String>,

    pub config: PipelineConfig,
}

impl AppState {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn schema(&self) -> &[HeaderDefinition] {
        self.result.as_ref().map(|r| r.headers.as_slice()).unwrap_or_default()
    }

    /// Ingest a query response: a usable result replaces everything, anything
    /// else clears the state and keeps the message.
    pub fn apply_response(&mut self, response: QueryResponse) {
        match response.into_result_set() {
            Ok(result) => self.set_result(result),
            Err(e) => {
                log::warn!("Query failed: {e}");
                self.clear_with_error(e.to_string());
            }
        }
    }

    /// Ingest a new result and recompute every derived field.
    pub fn set_result(&mut self, result: ResultSet) {
        self.records = materialize(&result.headers, &result.rows);
        self.columns = build_column_model(&result.headers, &self.records, &self.config);
        self.axes = classify_axes(&result.headers);
        self.selection = AxisSelection::defaults(&self.axes);
        self.view = resolve_view(self.view, self.axes.can_chart);
        self.filters.clear();
        self.sort = None;
        self.selected_rows.clear();
        self.visible_indices = (0..self.records.len()).collect();
        self.status_message = None;

        log::debug!(
            "State holds {} records, {} faceted columns, can_chart={}",
            self.records.len(),
            self.columns.faceted().count(),
            self.axes.can_chart
        );
        self.result = Some(result);
    }

    /// Drop the result and every derived field, keeping only `message`.
    pub fn clear_with_error(&mut self, message: impl Into<String>) {
        let config = std::mem::take(&mut self.config);
        *self = Self::new(config);
        self.status_message = Some(message.into());
    }

    /// Switch views. Chart views fall back to the table when the schema
    /// cannot be charted; returns the view actually shown.
    pub fn set_view(&mut self, requested: ViewKind) -> ViewKind {
        self.view = resolve_view(requested, self.axes.can_chart);
        if self.view != requested {
            log::info!("{requested} unavailable for this result, showing {}", self.view);
        }
        self.view
    }

    /// Select the x axis. Keys that are not x candidates are rejected.
    pub fn set_x_axis(&mut self, key: &str) -> bool {
        let accepted = self.axes.is_x_candidate(key);
        if accepted {
            self.selection.x = Some(key.to_string());
        } else {
            log::warn!("'{key}' cannot be used as the x axis");
        }
        accepted
    }

    /// Select the y axis. Keys that are not y candidates are rejected.
    pub fn set_y_axis(&mut self, key: &str) -> bool {
        let accepted = self.axes.is_y_candidate(key);
        if accepted {
            self.selection.y = Some(key.to_string());
        } else {
            log::warn!("'{key}' cannot be used as the y axis");
        }
        accepted
    }

    /// Set or clear one column's filter.
    pub fn set_filter(&mut self, key: &str, filter: Option<ColumnFilter>) {
        match filter {
            Some(f) => {
                self.filters.insert(key.to_string(), f);
            }
            None => {
                self.filters.remove(key);
            }
        }
        self.refilter();
    }

    /// Replace all filters at once.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.refilter();
    }

    /// Search the configured search column, if there is one.
    pub fn set_search(&mut self, text: &str) {
        let Some(key) = self.columns.search_column.clone() else {
            log::warn!("No searchable column in this result");
            return;
        };
        let filter = (!text.is_empty()).then(|| ColumnFilter::Search(text.to_string()));
        self.set_filter(&key, filter);
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
        self.refilter();
    }

    /// Recompute `visible_indices` after a filter or sort change.
    pub fn refilter(&mut self) {
        let mut indices = filtered_indices(&self.records, &self.filters);
        if let Some(sort) = &self.sort {
            match find_header(self.schema(), &sort.key) {
                Some(header) => sort_indices(&self.records, header, sort.direction, &mut indices),
                None => log::warn!("Ignoring sort on unknown column '{}'", sort.key),
            }
        }
        self.visible_indices = indices;
    }

    pub fn has_filters(&self) -> bool {
        has_filters(&self.filters)
    }

    // -- Paging -------------------------------------------------------------

    pub fn page_count(&self) -> usize {
        let size = self.config.page_size.max(1);
        self.visible_indices.len().div_ceil(size)
    }

    /// Record indices shown on a zero-based page.
    pub fn page(&self, page: usize) -> &[usize] {
        let size = self.config.page_size.max(1);
        let start = page.saturating_mul(size).min(self.visible_indices.len());
        let end = start.saturating_add(size).min(self.visible_indices.len());
        &self.visible_indices[start..end]
    }

    // -- Row selection ------------------------------------------------------

    /// Toggle selection of a record; out-of-range indices are ignored.
    pub fn toggle_row(&mut self, index: usize) {
        if index >= self.records.len() {
            return;
        }
        if !self.selected_rows.remove(&index) {
            self.selected_rows.insert(index);
        }
    }

    /// Select or deselect every row on a page.
    pub fn select_page(&mut self, page: usize, selected: bool) {
        let rows: Vec<usize> = self.page(page).to_vec();
        for index in rows {
            if selected {
                self.selected_rows.insert(index);
            } else {
                self.selected_rows.remove(&index);
            }
        }
    }

    /// Select or deselect every visible row.
    pub fn select_all_visible(&mut self, selected: bool) {
        if selected {
            self.selected_rows.extend(self.visible_indices.iter().copied());
        } else {
            for index in &self.visible_indices {
                self.selected_rows.remove(index);
            }
        }
    }

    /// Selected rows that pass the current filters, in display order.
    pub fn selected_visible(&self) -> Vec<&Record> {
        self.visible_indices
            .iter()
            .filter(|&&i| self.selected_rows.contains(&i))
            .map(|&i| &self.records[i])
            .collect()
    }

    /// "`N` of `M` row(s) selected"
    pub fn selection_summary(&self) -> String {
        format!(
            "{} of {} row(s) selected",
            self.selected_visible().len(),
            self.visible_indices.len()
        )
    }

    /// Export the visible selection; `None` when nothing is selected.
    pub fn export_selected(&self, at: DateTime<Utc>) -> Result<Option<ExportArtifact>> {
        export_selection(&self.selected_visible(), self.schema(), at)
    }

    // -- Charting -----------------------------------------------------------

    /// Points for the active axes, over all records.
    pub fn chart_points(&self) -> Vec<ChartPoint<'_>> {
        project_selection(&self.records, &self.selection)
    }

    /// Chart description for the current view, if a chart is being shown.
    pub fn chart_spec(&self) -> Option<ChartSpec> {
        self.view
            .is_chart()
            .then(|| ChartSpec::new(self.view, self.schema(), &self.selection, &self.chart_points()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnKind};
    use crate::data::sort::SortDirection;
    use chrono::TimeZone;

    fn result() -> ResultSet {
        ResultSet::new(
            vec![
                HeaderDefinition::new("id", "ID", ColumnKind::Number),
                HeaderDefinition::new("city", "City", ColumnKind::String),
                HeaderDefinition::new("freight", "Freight", ColumnKind::Currency),
            ],
            vec![
                vec![CellValue::Integer(1), CellValue::from("Berlin"), CellValue::Float(32.38)],
                vec![CellValue::Integer(2), CellValue::from("Lyon"), CellValue::Float(11.61)],
                vec![CellValue::Integer(3), CellValue::from("Berlin"), CellValue::Float(65.83)],
            ],
        )
    }

    fn numbers_only() -> ResultSet {
        ResultSet::new(
            vec![HeaderDefinition::new("n", "N", ColumnKind::Number)],
            vec![vec![CellValue::Integer(1)]],
        )
    }

    #[test]
    fn test_set_result_derives_everything() {
        let mut state = AppState::default();
        state.set_result(result());
        assert_eq!(state.records.len(), 3);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert!(state.axes.can_chart);
        assert_eq!(state.selection.x.as_deref(), Some("city"));
        assert_eq!(state.selection.y.as_deref(), Some("id"));
        assert_eq!(state.columns.search_column.as_deref(), Some("city"));
    }

    #[test]
    fn test_chart_view_falls_back_to_table() {
        let mut state = AppState::default();
        state.set_result(result());
        assert_eq!(state.set_view(ViewKind::BarChart), ViewKind::BarChart);
        assert!(state.chart_spec().is_some());

        // New result that cannot be charted forces the table view.
        state.set_result(numbers_only());
        assert_eq!(state.view, ViewKind::Table);
        assert_eq!(state.set_view(ViewKind::LineChart), ViewKind::Table);
        assert!(state.chart_spec().is_none());
    }

    #[test]
    fn test_axis_changes_are_validated() {
        let mut state = AppState::default();
        state.set_result(result());
        assert!(state.set_y_axis("freight"));
        assert!(!state.set_x_axis("freight"));
        assert_eq!(state.selection.x.as_deref(), Some("city"));
        assert_eq!(state.chart_points().len(), 3);
    }

    #[test]
    fn test_filter_and_sort() {
        let mut state = AppState::default();
        state.set_result(result());
        state.set_filter(
            "city",
            Some(ColumnFilter::Facet(["Berlin".to_string()].into_iter().collect())),
        );
        assert_eq!(state.visible_indices, vec![0, 2]);
        assert!(state.has_filters());

        state.set_sort(Some(SortSpec {
            key: "freight".to_string(),
            direction: SortDirection::Desc,
        }));
        assert_eq!(state.visible_indices, vec![2, 0]);

        state.set_filter("city", None);
        assert_eq!(state.visible_indices, vec![2, 0, 1]);
    }

    #[test]
    fn test_search_uses_search_column() {
        let mut state = AppState::default();
        state.set_result(result());
        state.set_search("LY");
        assert_eq!(state.visible_indices, vec![1]);
        state.set_search("");
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn test_export_only_visible_selection() {
        let mut state = AppState::default();
        state.set_result(result());
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
        assert!(state.export_selected(at).unwrap().is_none());

        state.toggle_row(0);
        state.toggle_row(1);
        state.toggle_row(99);
        state.set_search("berlin");
        assert_eq!(state.selection_summary(), "1 of 2 row(s) selected");

        let artifact = state.export_selected(at).unwrap().unwrap();
        assert_eq!(artifact.filename, "selected-data-2024-05-01T08-30-00.csv");
        assert_eq!(artifact.content, "\"ID\",\"City\",\"Freight\"\n\"1\",\"Berlin\",\"32.38\"");
    }

    #[test]
    fn test_paging() {
        let mut state = AppState::new(PipelineConfig {
            page_size: 2,
            ..Default::default()
        });
        state.set_result(result());
        assert_eq!(state.page_count(), 2);
        assert_eq!(state.page(1), &[2]);
        assert!(state.page(5).is_empty());

        state.select_page(0, true);
        assert_eq!(state.selected_rows.len(), 2);
        state.select_all_visible(false);
        assert!(state.selected_rows.is_empty());
    }

    #[test]
    fn test_failed_response_clears_state() {
        let mut state = AppState::default();
        state.set_result(result());
        state.apply_response(QueryResponse::failure("select 1", "Query pattern not recognized"));
        assert!(state.result.is_none());
        assert!(state.records.is_empty());
        assert!(state.columns.is_empty());
        assert!(!state.axes.can_chart);
        assert_eq!(state.status_message.as_deref(), Some("Query pattern not recognized"));
    }
}
