//! CSV export of selected records.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::data::model::{HeaderDefinition, Record};
use crate::error::{LensError, Result};

pub const CSV_MIME: &str = "text/csv";

/// A serialized export, ready to be written or handed to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its own filename.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content).map_err(|e| LensError::io(&path, e))?;
        log::info!("Wrote {} bytes to {}", self.content.len(), path.display());
        Ok(path)
    }
}

/// Render records as CSV, every field quoted, labels as the header row.
///
/// Nulls become empty fields and embedded quotes are doubled. Rows are
/// separated by `\n` with no trailing newline. Returns `None` when there are
/// no records or no columns.
pub fn to_csv(records: &[&Record], schema: &[HeaderDefinition]) -> Result<Option<String>> {
    if records.is_empty() || schema.is_empty() {
        return Ok(None);
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(schema.iter().map(|h| h.label.as_str()))?;
    for record in records {
        writer.write_record(schema.iter().map(|h| record.value(&h.key).to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LensError::CsvWrite(e.into_error()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(Some(text))
}

/// `selected-data-<YYYY-MM-DDTHH-MM-SS>.csv`
pub fn export_filename(at: DateTime<Utc>) -> String {
    format!("selected-data-{}.csv", at.format("%Y-%m-%dT%H-%M-%S"))
}

/// Serialize a selection into a named artifact; `None` for an empty selection.
pub fn export_selection(
    records: &[&Record],
    schema: &[HeaderDefinition],
    at: DateTime<Utc>,
) -> Result<Option<ExportArtifact>> {
    let Some(content) = to_csv(records, schema)? else {
        log::debug!("Nothing selected, skipping export");
        return Ok(None);
    };
    Ok(Some(ExportArtifact {
        filename: export_filename(at),
        mime: CSV_MIME,
        content,
    }))
}
