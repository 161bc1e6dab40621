use super::model::{CellValue, HeaderDefinition, Record};

/// Zip each positional row against the schema keys.
///
/// Never fails: an empty schema or an empty matrix yields no records, and a
/// row whose length differs from the schema only contributes its first
/// `min(row.len(), schema.len())` values.
pub fn materialize(schema: &[HeaderDefinition], rows: &[Vec<CellValue>]) -> Vec<Record> {
    if schema.is_empty() || rows.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            if row.len() != schema.len() {
                log::debug!(
                    "Row {i}: {} values for {} columns, using the first {}",
                    row.len(),
                    schema.len(),
                    row.len().min(schema.len())
                );
            }
            schema
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.key.clone(), value.clone()))
                .collect()
        })
        .collect()
}
