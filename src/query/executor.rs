use std::path::{Path, PathBuf};
use std::time::Instant;

use serde_json::Value as JsonValue;

use super::catalog::{match_table, TableDef};
use super::{QueryRequest, QueryResponse, QueryService};
use crate::data::model::RowMatrix;
use crate::error::{LensError, Result};

pub const QUERY_REQUIRED: &str = "Query is required and must be a string";
pub const PATTERN_NOT_RECOGNIZED: &str = "Query pattern not recognized";
const INTERNAL_ERROR: &str = "Internal server error";

/// Answers `select * from <table>` queries from JSON files in a directory.
///
/// Each table lives in `<data_dir>/<table>.json` as an array of objects.
/// No parsing happens beyond recognizing the table name.
#[derive(Debug, Clone)]
pub struct StaticQueryExecutor {
    data_dir: PathBuf,
}

impl StaticQueryExecutor {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn load_table(&self, table: &TableDef) -> Result<RowMatrix> {
        let path = self.data_dir.join(table.file_name());
        let text = std::fs::read_to_string(&path).map_err(|e| LensError::io(&path, e))?;
        let objects: Vec<JsonValue> = serde_json::from_str(&text)?;
        log::debug!("Read {} objects from {}", objects.len(), path.display());
        Ok(objects.iter().map(|o| table.project(o)).collect())
    }
}

impl QueryService for StaticQueryExecutor {
    fn execute(&self, request: &QueryRequest) -> QueryResponse {
        let start = Instant::now();
        let query = request.query.as_str();

        if query.trim().is_empty() {
            return QueryResponse::failure(query, QUERY_REQUIRED);
        }

        let Some(table) = match_table(query) else {
            log::info!("No table pattern in query '{query}'");
            return QueryResponse::failure(query, PATTERN_NOT_RECOGNIZED);
        };

        match self.load_table(table) {
            Ok(rows) => {
                let response =
                    QueryResponse::success(query, start.elapsed(), table.headers(), rows);
                log::info!(
                    "Query on '{}' returned {} rows in {}",
                    table.name,
                    response.result.rows.len(),
                    response.execution_time.as_deref().unwrap_or_default()
                );
                response
            }
            Err(e) => {
                log::error!("Failed to load table '{}': {e}", table.name);
                let mut response = QueryResponse::failure(query, e.to_string());
                response.error = Some(INTERNAL_ERROR.to_string());
                response
            }
        }
    }
}
