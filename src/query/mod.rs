//! Query service contract and the static executor behind it.
//!
//! The pipeline never executes queries itself; it consumes a
//! [`QueryResponse`] from anything implementing [`QueryService`] and turns
//! it into a [`ResultSet`] with [`QueryResponse::into_result_set`].

pub mod catalog;
pub mod executor;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::model::{HeaderSchema, ResultSet, RowMatrix};
use crate::error::QueryError;

pub use executor::StaticQueryExecutor;

/// Shown when a failed response carries neither `error` nor `message`.
const UNKNOWN_ERROR: &str = "Unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Column schema and positional rows of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryPayload {
    #[serde(default)]
    pub headers: HeaderSchema,
    #[serde(default)]
    pub rows: RowMatrix,
}

/// Wire form of a query service answer, success or failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub result: QueryPayload,
}

impl QueryResponse {
    pub fn success(
        query: impl Into<String>,
        elapsed: Duration,
        headers: HeaderSchema,
        rows: RowMatrix,
    ) -> Self {
        Self {
            success: true,
            execution_time: Some(format_execution_time(elapsed)),
            row_count: Some(rows.len()),
            message: None,
            error: None,
            query: query.into(),
            result: QueryPayload { headers, rows },
        }
    }

    pub fn failure(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            execution_time: None,
            row_count: None,
            message: Some(message.into()),
            error: None,
            query: query.into(),
            result: QueryPayload::default(),
        }
    }

    /// Validate the response into a displayable result.
    ///
    /// A success flag with no declared columns is still an error: there is
    /// nothing any downstream stage could derive from it.
    pub fn into_result_set(self) -> Result<ResultSet, QueryError> {
        if !self.success {
            let message = self
                .error
                .or(self.message)
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
            return Err(QueryError::Rejected(message));
        }
        if self.result.headers.is_empty() {
            return Err(QueryError::NoHeaders);
        }

        let row_count = self.row_count.unwrap_or(self.result.rows.len());
        Ok(ResultSet {
            headers: self.result.headers,
            rows: self.result.rows,
            execution_time: self.execution_time,
            row_count,
        })
    }
}

/// Milliseconds with two decimals, e.g. `"1.27ms"`.
pub fn format_execution_time(elapsed: Duration) -> String {
    format!("{:.2}ms", elapsed.as_secs_f64() * 1000.0)
}

/// Anything that can answer a free-text query with a result or a failure.
pub trait QueryService {
    fn execute(&self, request: &QueryRequest) -> QueryResponse;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnKind, HeaderDefinition};
    use serde_json::json;

    #[test]
    fn test_success_response_wire_shape() {
        let response = QueryResponse::success(
            "SELECT * FROM categories",
            Duration::from_micros(1500),
            vec![HeaderDefinition::new("categoryID", "Category ID", ColumnKind::Number)],
            vec![vec![CellValue::Integer(1)]],
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["executionTime"], "1.50ms");
        assert_eq!(value["rowCount"], 1);
        assert_eq!(value["result"]["headers"][0]["type"], "number");
        assert_eq!(value["result"]["rows"], json!([[1]]));
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_failure_response_wire_shape() {
        let response = QueryResponse::failure("DROP TABLE x", "Query pattern not recognized");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["message"], "Query pattern not recognized");
        assert_eq!(value["result"], json!({"headers": [], "rows": []}));
    }

    #[test]
    fn test_failure_becomes_rejected() {
        let response = QueryResponse::failure("q", "Query pattern not recognized");
        assert_eq!(
            response.into_result_set(),
            Err(QueryError::Rejected("Query pattern not recognized".to_string()))
        );
    }

    #[test]
    fn test_success_without_headers_is_an_error() {
        let response = QueryResponse::success("q", Duration::ZERO, vec![], vec![]);
        assert_eq!(response.into_result_set(), Err(QueryError::NoHeaders));
    }

    #[test]
    fn test_parse_service_json() {
        let response: QueryResponse = serde_json::from_value(json!({
            "success": true,
            "executionTime": "0.42ms",
            "rowCount": 2,
            "query": "SELECT * FROM products",
            "result": {
                "headers": [
                    {"key": "name", "label": "Product Name", "type": "string"},
                    {"key": "unitPrice", "label": "Unit Price", "type": "currency"}
                ],
                "rows": [["Chai", 18], ["Chang", null]]
            }
        }))
        .unwrap();

        let result = response.into_result_set().unwrap();
        assert_eq!(result.headers.len(), 2);
        assert_eq!(result.rows[1][1], CellValue::Null);
        assert_eq!(result.execution_time.as_deref(), Some("0.42ms"));
        assert_eq!(result.row_count, 2);
    }

    #[test]
    fn test_error_field_wins_over_message() {
        let response: QueryResponse = serde_json::from_value(json!({
            "success": false,
            "error": "Internal server error",
            "message": "disk on fire"
        }))
        .unwrap();
        assert_eq!(
            response.into_result_set(),
            Err(QueryError::Rejected("Internal server error".to_string()))
        );
    }
}
