//! Column, sort and filter model consumed by a table surface.

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::data::model::{ColumnKind, HeaderDefinition, Record};
use crate::facets::{
    filter_options, is_filterable, select_search_column, unique_values, FilterOption,
};
use crate::format::format_cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

impl Align {
    pub fn for_kind(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Number | ColumnKind::Currency => Align::Right,
            ColumnKind::Boolean => Align::Center,
            ColumnKind::Date | ColumnKind::String => Align::Left,
        }
    }
}

/// Everything a table surface needs to render and interact with one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSpec {
    pub key: String,
    pub label: String,
    pub kind: ColumnKind,
    pub align: Align,
    pub sortable: bool,
    pub hideable: bool,
    /// Facet options, present only for filterable columns that have any.
    pub facet: Option<Vec<FilterOption>>,
}

impl ColumnSpec {
    /// Display string for this column's cell in `record`.
    pub fn render(&self, record: &Record) -> String {
        format_cell(record.value(&self.key), self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnModel {
    pub columns: Vec<ColumnSpec>,
    /// Key of the column that gets the free-text search box.
    pub search_column: Option<String>,
}

impl ColumnModel {
    pub fn column(&self, key: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Columns that ended up with a facet control, in schema order.
    pub fn faceted(&self) -> impl Iterator<Item = &ColumnSpec> {
        self.columns.iter().filter(|c| c.facet.is_some())
    }

    pub fn search_spec(&self) -> Option<&ColumnSpec> {
        self.search_column.as_deref().and_then(|k| self.column(k))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Derive the column model from the schema, using the records only for the
/// distinct values behind each facet.
pub fn build_column_model(
    schema: &[HeaderDefinition],
    records: &[Record],
    config: &PipelineConfig,
) -> ColumnModel {
    let columns = schema
        .iter()
        .map(|header| {
            // No rows, nothing to facet over.
            let facet = if !records.is_empty() && is_filterable(header, schema.len(), config) {
                let options = filter_options(&unique_values(records, &header.key), header);
                (!options.is_empty()).then_some(options)
            } else {
                None
            };

            ColumnSpec {
                key: header.key.clone(),
                label: header.label.clone(),
                kind: header.kind,
                align: Align::for_kind(header.kind),
                sortable: true,
                hideable: true,
                facet,
            }
        })
        .collect();

    ColumnModel {
        columns,
        search_column: select_search_column(schema, config).map(|h| h.key.clone()),
    }
}
