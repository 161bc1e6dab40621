use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::ResultSet;
use crate::query::{QueryPayload, QueryResponse};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a saved query result from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.json` – either a full service response
///   (`{ "success": true, "result": { "headers": [...], "rows": [...] }, ... }`)
///   or a bare `{ "headers": [...], "rows": [...] }` payload
pub fn load_file(path: &Path) -> Result<ResultSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<ResultSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    parse_result(root)
}

/// Interpret a JSON document as a response or a bare payload.
pub fn parse_result(root: JsonValue) -> Result<ResultSet> {
    let obj = root.as_object().context("Expected top-level JSON object")?;

    let response = if obj.contains_key("success") {
        serde_json::from_value::<QueryResponse>(root).context("decoding query response")?
    } else {
        let payload: QueryPayload =
            serde_json::from_value(root).context("decoding headers/rows payload")?;
        let row_count = payload.rows.len();
        QueryResponse {
            success: true,
            execution_time: None,
            row_count: Some(row_count),
            message: None,
            error: None,
            query: String::new(),
            result: payload,
        }
    };

    let result = response.into_result_set()?;
    log::info!(
        "Loaded result with {} columns and {} rows",
        result.headers.len(),
        result.rows.len()
    );
    Ok(result)
}
