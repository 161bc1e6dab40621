use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{CellValue, Record};

// ---------------------------------------------------------------------------
// Filter predicate: what each column is constrained to
// ---------------------------------------------------------------------------

/// Constraint on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum ColumnFilter {
    /// Cell's canonical string must be one of these facet values.
    Facet(BTreeSet<String>),
    /// Cell's canonical string must contain this text, ignoring case.
    Search(String),
}

impl ColumnFilter {
    /// An empty facet set or empty search text constrains nothing.
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Facet(values) => !values.is_empty(),
            ColumnFilter::Search(text) => !text.is_empty(),
        }
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        match self {
            ColumnFilter::Facet(values) => values.is_empty() || values.contains(&value.to_string()),
            ColumnFilter::Search(text) => {
                text.is_empty()
                    || value
                        .to_string()
                        .to_lowercase()
                        .contains(&text.to_lowercase())
            }
        }
    }
}

/// Per-column filters: column key → constraint. Absent columns are unconstrained.
pub type FilterState = BTreeMap<String, ColumnFilter>;

/// Return indices of records that pass every active filter.
pub fn filtered_indices(records: &[Record], filters: &FilterState) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            filters
                .iter()
                .all(|(key, filter)| filter.matches(record.value(key)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Whether any filter actually constrains rows.
pub fn has_filters(filters: &FilterState) -> bool {
    filters.values().any(ColumnFilter::is_active)
}

/// Parse `key=value` facet arguments into a filter state.
/// Repeated keys accumulate values (OR within a column); malformed
/// arguments are skipped.
pub fn parse_facet_filters(facet_strings: &[String]) -> FilterState {
    let mut filters = FilterState::new();

    for facet_str in facet_strings {
        let Some((key, value)) = facet_str.split_once('=') else {
            log::warn!("Ignoring malformed facet filter '{facet_str}' (expected key=value)");
            continue;
        };
        let entry = filters
            .entry(key.trim().to_string())
            .or_insert_with(|| ColumnFilter::Facet(BTreeSet::new()));
        if let ColumnFilter::Facet(values) = entry {
            values.insert(value.trim().to_string());
        }
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<Record> {
        [
            ("Alfreds", "Germany", CellValue::Bool(true)),
            ("Berglunds", "Sweden", CellValue::Bool(false)),
            ("Blauer See", "Germany", CellValue::Null),
        ]
        .into_iter()
        .map(|(name, country, active)| {
            [
                ("name".to_string(), CellValue::from(name)),
                ("country".to_string(), CellValue::from(country)),
                ("active".to_string(), active),
            ]
            .into_iter()
            .collect()
        })
        .collect()
    }

    #[test]
    fn test_no_filters_pass_everything() {
        assert_eq!(filtered_indices(&records(), &FilterState::new()), vec![0, 1, 2]);
    }

    #[test]
    fn test_facet_filter() {
        let filters = parse_facet_filters(&["country=Germany".to_string()]);
        assert_eq!(filtered_indices(&records(), &filters), vec![0, 2]);
    }

    #[test]
    fn test_facet_matches_false_boolean() {
        let filters = parse_facet_filters(&["active=false".to_string()]);
        assert_eq!(filtered_indices(&records(), &filters), vec![1]);
    }

    #[test]
    fn test_facets_and_across_columns_or_within() {
        let filters = parse_facet_filters(&[
            "country=Germany".to_string(),
            "country=Sweden".to_string(),
            "name=Berglunds".to_string(),
        ]);
        assert_eq!(filtered_indices(&records(), &filters), vec![1]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut filters = FilterState::new();
        filters.insert("name".to_string(), ColumnFilter::Search("BL".to_string()));
        assert_eq!(filtered_indices(&records(), &filters), vec![2]);
    }

    #[test]
    fn test_empty_constraints_are_inactive() {
        let mut filters = FilterState::new();
        filters.insert("name".to_string(), ColumnFilter::Search(String::new()));
        filters.insert("country".to_string(), ColumnFilter::Facet(BTreeSet::new()));
        assert!(!has_filters(&filters));
        assert_eq!(filtered_indices(&records(), &filters).len(), 3);
    }

    #[test]
    fn test_malformed_facet_is_skipped() {
        let filters = parse_facet_filters(&["country".to_string(), " city = Berlin ".to_string()]);
        assert_eq!(filters.len(), 1);
        assert_eq!(
            filters.get("city"),
            Some(&ColumnFilter::Facet(BTreeSet::from(["Berlin".to_string()])))
        );
    }
}
