use std::path::PathBuf;

use chrono::{TimeZone, Utc};
use query_lens::chart::{classify_axes, project_points, ViewKind, CHART_POINT_LIMIT};
use query_lens::columns::build_column_model;
use query_lens::config::PipelineConfig;
use query_lens::data::materialize::materialize;
use query_lens::data::model::{CellValue, ColumnKind, HeaderDefinition, Record};
use query_lens::export::to_csv;
use query_lens::facets::{filter_options, select_search_column};
use query_lens::format::{format_cell, NOT_AVAILABLE};
use query_lens::query::{QueryRequest, QueryService, StaticQueryExecutor};
use query_lens::state::AppState;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn header(key: &str, kind: ColumnKind) -> HeaderDefinition {
    HeaderDefinition::new(key, key, kind)
}

const ALL_KINDS: [ColumnKind; 5] = [
    ColumnKind::String,
    ColumnKind::Number,
    ColumnKind::Currency,
    ColumnKind::Date,
    ColumnKind::Boolean,
];

#[test]
fn test_short_and_long_rows_use_common_prefix() {
    let schema = vec![header("a", ColumnKind::String), header("b", ColumnKind::Number)];
    let rows = vec![
        vec![CellValue::from("only a")],
        vec![CellValue::from("x"), CellValue::Integer(1), CellValue::from("extra")],
    ];
    let records = materialize(&schema, &rows);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].len(), 1);
    assert_eq!(records[1].len(), 2);
    assert!(records[1].get("extra").is_none());
}

#[test]
fn test_null_formats_as_sentinel_for_every_kind() {
    for kind in ALL_KINDS {
        assert_eq!(format_cell(&CellValue::Null, kind), NOT_AVAILABLE);
    }
}

#[test]
fn test_formatting_is_deterministic() {
    let samples = [
        CellValue::Float(1234.5),
        CellValue::from("1996-07-04 00:00:00.000"),
        CellValue::from("TRUE"),
        CellValue::Bool(false),
        CellValue::from("plain"),
    ];
    for kind in ALL_KINDS {
        for value in &samples {
            assert_eq!(format_cell(value, kind), format_cell(value, kind));
        }
    }
}

#[test]
fn test_boolean_facets_ignore_observed_values() {
    let h = header("flag", ColumnKind::Boolean);
    for observed in [vec![], vec![CellValue::Bool(true)], vec![CellValue::from("maybe")]] {
        let values: Vec<String> = filter_options(&observed, &h).into_iter().map(|o| o.value).collect();
        assert_eq!(values, ["true", "false"]);
    }
}

#[test]
fn test_number_facets_sort_numerically() {
    let unique = [CellValue::Integer(30), CellValue::Integer(5), CellValue::Integer(100)];
    let values: Vec<String> = filter_options(&unique, &header("n", ColumnKind::Number))
        .into_iter()
        .map(|o| o.value)
        .collect();
    assert_eq!(values, ["5", "30", "100"]);
}

#[test]
fn test_search_keyword_beats_leading_id_column() {
    let schema = [header("id", ColumnKind::String), header("companyName", ColumnKind::String)];
    let chosen = select_search_column(&schema, &PipelineConfig::default()).unwrap();
    assert_eq!(chosen.key, "companyName");
}

#[test]
fn test_chart_availability() {
    assert!(classify_axes(&[header("a", ColumnKind::String), header("b", ColumnKind::Currency)]).can_chart);
    assert!(!classify_axes(&[header("a", ColumnKind::Number), header("b", ColumnKind::Number)]).can_chart);
}

#[test]
fn test_projection_keeps_first_hundred_in_order() {
    let schema = vec![header("x", ColumnKind::String), header("y", ColumnKind::Currency)];
    let rows: Vec<Vec<CellValue>> = (0..150)
        .map(|i| vec![CellValue::from(format!("c{i}")), CellValue::Float(i as f64)])
        .collect();
    let records = materialize(&schema, &rows);
    let points = project_points(&records, "x", "y");
    assert_eq!(points.len(), CHART_POINT_LIMIT);
    for (point, record) in points.iter().zip(&records) {
        assert_eq!(point.original, record);
        assert_eq!(point.x, record.value("x"));
    }
}

#[test]
fn test_csv_quotes_and_nulls() {
    let schema = vec![
        HeaderDefinition::new("a", "A", ColumnKind::String),
        HeaderDefinition::new("b", "B", ColumnKind::String),
    ];
    let record: Record = [
        ("a".to_string(), CellValue::from("He said \"hi\"")),
        ("b".to_string(), CellValue::Null),
    ]
    .into_iter()
    .collect();
    let csv = to_csv(&[&record], &schema).unwrap().unwrap();
    assert_eq!(csv, "\"A\",\"B\"\n\"He said \"\"hi\"\"\",\"\"");
}

#[test]
fn test_empty_inputs_give_empty_outputs() {
    let config = PipelineConfig::default();
    let schema = vec![header("a", ColumnKind::String), header("b", ColumnKind::Number)];

    for (schema, rows) in [
        (vec![], vec![vec![CellValue::from("x")]]),
        (schema.clone(), vec![]),
    ] {
        let records = materialize(&schema, &rows);
        assert!(records.is_empty());
        assert_eq!(build_column_model(&schema, &records, &config).faceted().count(), 0);
        assert!(project_points(&records, "a", "b").is_empty());
        let refs: Vec<&Record> = records.iter().collect();
        assert_eq!(to_csv(&refs, &schema).unwrap(), None);
    }
}

#[test]
fn test_sample_tables_answer_select_star() {
    let executor = StaticQueryExecutor::new(data_dir());
    for table in ["customers", "orders", "products", "categories", "employees", "suppliers"] {
        let response = executor.execute(&QueryRequest::new(format!("SELECT * FROM {table}")));
        assert!(response.success, "{table}: {:?}", response.message);
        let result = response.into_result_set().unwrap();
        for row in &result.rows {
            assert_eq!(row.len(), result.headers.len(), "{table}");
        }
    }
}

#[test]
fn test_orders_end_to_end() {
    let executor = StaticQueryExecutor::new(data_dir());
    let mut state = AppState::default();
    state.apply_response(executor.execute(&QueryRequest::new("select * from orders")));
    assert!(state.status_message.is_none());

    // Orders carry dates and currency, so they chart.
    assert_eq!(state.set_view(ViewKind::LineChart), ViewKind::LineChart);
    assert_eq!(state.selection.x.as_deref(), Some("customerID"));
    assert_eq!(state.selection.y.as_deref(), Some("orderID"));
    assert!(state.set_y_axis("freight"));
    let spec = state.chart_spec().unwrap();
    assert_eq!(spec.description, "Freight trend by Customer ID");

    // Order dates are never faceted.
    assert!(state.columns.column("orderDate").unwrap().facet.is_none());
    assert!(state.columns.column("freight").unwrap().facet.is_some());

    let first = &state.records[0];
    let date = state.columns.column("orderDate").unwrap();
    assert_eq!(date.render(first), "7/4/1996");
    assert_eq!(state.columns.column("freight").unwrap().render(first), "$32.38");

    state.toggle_row(0);
    let at = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
    let artifact = state.export_selected(at).unwrap().unwrap();
    assert_eq!(artifact.filename, "selected-data-2024-02-29T23-59-59.csv");
    assert!(artifact.content.starts_with("\"Order ID\",\"Customer ID\""));
    assert_eq!(artifact.content.lines().count(), 2);
}

#[test]
fn test_unknown_query_clears_state() {
    let executor = StaticQueryExecutor::new(data_dir());
    let mut state = AppState::default();
    state.apply_response(executor.execute(&QueryRequest::new("select * from customers")));
    assert!(!state.records.is_empty());

    state.apply_response(executor.execute(&QueryRequest::new("show tables")));
    assert!(state.records.is_empty());
    assert_eq!(state.status_message.as_deref(), Some("Query pattern not recognized"));
}

#[test]
fn test_missing_region_reads_as_empty_string() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("customers.json"),
        r#"[{"customerID": "X", "companyName": "X Co", "address": {"city": "Bern", "region": null}}]"#,
    )
    .unwrap();
    let executor = StaticQueryExecutor::new(dir.path());
    let result = executor
        .execute(&QueryRequest::new("select * from customers"))
        .into_result_set()
        .unwrap();
    let records = materialize(&result.headers, &result.rows);
    assert_eq!(records[0].value("region"), &CellValue::from(""));
    assert_eq!(records[0].value("city"), &CellValue::from("Bern"));
    assert_eq!(records[0].value("contactName"), &CellValue::Null);
}
