use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;

use super::model::{CellValue, ColumnKind, HeaderDefinition, Record};
use crate::facets::compare_numeric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Column ordering requested by the table surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl FromStr for SortSpec {
    type Err = String;

    /// `key`, `key:asc` or `key:desc`. Any other suffix is part of the key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, direction) = match s.rsplit_once(':') {
            Some((key, "asc")) => (key, SortDirection::Asc),
            Some((key, "desc")) => (key, SortDirection::Desc),
            _ => (s, SortDirection::Asc),
        };
        if key.is_empty() {
            return Err("sort key is empty".to_string());
        }
        Ok(SortSpec {
            key: key.to_string(),
            direction,
        })
    }
}

/// Compare two cells of a column according to its type.
/// Nulls are not handled here; see [`sort_indices`].
pub fn compare_cells(a: &CellValue, b: &CellValue, kind: ColumnKind) -> Ordering {
    match kind {
        ColumnKind::Number | ColumnKind::Currency => compare_numeric(a.coerce_f64(), b.coerce_f64()),
        ColumnKind::Boolean => truthy(a).cmp(&truthy(b)),
        ColumnKind::Date | ColumnKind::String => a.to_string().cmp(&b.to_string()),
    }
}

fn truthy(value: &CellValue) -> bool {
    match value {
        CellValue::Bool(b) => *b,
        other => other.to_string().eq_ignore_ascii_case("true"),
    }
}

/// Order row indices by one column. Stable; nulls go last in either direction.
pub fn sort_indices(
    records: &[Record],
    header: &HeaderDefinition,
    direction: SortDirection,
    indices: &mut [usize],
) {
    indices.sort_by(|&a, &b| {
        let va = records[a].value(&header.key);
        let vb = records[b].value(&header.key);
        match (va.is_null(), vb.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_cells(va, vb, header.kind);
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            }
        }
    });
}
