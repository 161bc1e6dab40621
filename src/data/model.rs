use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// ColumnKind – the type tag every derived behaviour dispatches on
// ---------------------------------------------------------------------------

/// The closed set of column types a query result can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Number,
    Currency,
    Date,
    Boolean,
}

impl ColumnKind {
    /// Number and currency columns hold quantities.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Number | ColumnKind::Currency)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::String => "string",
            ColumnKind::Number => "number",
            ColumnKind::Currency => "currency",
            ColumnKind::Date => "date",
            ColumnKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HeaderDefinition / HeaderSchema
// ---------------------------------------------------------------------------

/// One column declaration of a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDefinition {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
}

impl HeaderDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }
}

/// Ordered column declarations; order is display and export order.
pub type HeaderSchema = Vec<HeaderDefinition>;

/// Positional row values, one inner vector per row.
pub type RowMatrix = Vec<Vec<CellValue>>;

/// Look up a column declaration by key.
pub fn find_header<'a>(schema: &'a [HeaderDefinition], key: &str) -> Option<&'a HeaderDefinition> {
    schema.iter().find(|h| h.key == key)
}

// ---------------------------------------------------------------------------
// CellValue – a single cell of the row matrix
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as delivered by the query service.
///
/// The declared [`ColumnKind`] says how a value should be presented; the
/// variant says what actually arrived. The two are allowed to disagree.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Shared null returned for keys a record does not carry.
pub static NULL: CellValue = CellValue::Null;

// -- Manual Eq/Ord so values can be deduplicated and kept in ordered sets --
//
// Values of different variants never compare equal, even when their
// canonical strings match: `Integer(5)` and `Text("5")` are two distinct
// facet values.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Canonical string form: the text used for facet values, filtering and CSV.
/// Null renders as the empty string.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// The value as a number, only for native numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Loose numeric coercion: native numbers as-is, booleans as 0/1, text
    /// parsed after trimming with blank text as zero. Anything else is NaN.
    pub fn coerce_f64(&self) -> f64 {
        match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
            CellValue::Null => f64::NAN,
        }
    }
}

impl From<&JsonValue> for CellValue {
    fn from(val: &JsonValue) -> Self {
        match val {
            JsonValue::String(s) => CellValue::Text(s.clone()),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    CellValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    CellValue::Float(f)
                } else {
                    CellValue::Text(n.to_string())
                }
            }
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Null => CellValue::Null,
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Null => serializer.serialize_none(),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Integer(i) => serializer.serialize_i64(*i),
            CellValue::Float(v) => serializer.serialize_f64(*v),
            CellValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for CellValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = JsonValue::deserialize(deserializer)?;
        Ok(CellValue::from(&json))
    }
}

// ---------------------------------------------------------------------------
// Record – one materialized row
// ---------------------------------------------------------------------------

/// One row keyed by column key. Keys missing from the row (a short source
/// row) are absent and read back as [`NULL`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, CellValue>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.get(key)
    }

    /// The value for `key`, with absent keys reading as null.
    pub fn value(&self, key: &str) -> &CellValue {
        self.fields.get(key).unwrap_or(&NULL)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// ResultSet – a validated query result
// ---------------------------------------------------------------------------

/// Schema and rows of a successful query, plus the service's timing metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    pub headers: HeaderSchema,
    pub rows: RowMatrix,
    pub execution_time: Option<String>,
    pub row_count: usize,
}

impl ResultSet {
    pub fn new(headers: HeaderSchema, rows: RowMatrix) -> Self {
        let row_count = rows.len();
        Self {
            headers,
            rows,
            execution_time: None,
            row_count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() || self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_roundtrips_lowercase_tags() {
        let header: HeaderDefinition =
            serde_json::from_value(json!({"key": "freight", "label": "Freight", "type": "currency"}))
                .unwrap();
        assert_eq!(header.kind, ColumnKind::Currency);
        assert_eq!(serde_json::to_value(&header).unwrap()["type"], "currency");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<HeaderDefinition, _> =
            serde_json::from_value(json!({"key": "a", "label": "A", "type": "json"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_cell_value_from_json() {
        assert_eq!(CellValue::from(&json!(5)), CellValue::Integer(5));
        assert_eq!(CellValue::from(&json!(5.5)), CellValue::Float(5.5));
        assert_eq!(CellValue::from(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from(&json!(true)), CellValue::Bool(true));
        assert_eq!(CellValue::from(&json!([1, 2])), CellValue::Text("[1,2]".into()));
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(CellValue::Integer(42).to_string(), "42");
        assert_eq!(CellValue::Float(32.38).to_string(), "32.38");
        assert_eq!(CellValue::Float(5.0).to_string(), "5");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
        assert_eq!(CellValue::Null.to_string(), "");
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(CellValue::Text(" 12.5 ".into()).coerce_f64(), 12.5);
        assert_eq!(CellValue::Text("".into()).coerce_f64(), 0.0);
        assert_eq!(CellValue::Bool(true).coerce_f64(), 1.0);
        assert!(CellValue::Text("n/a".into()).coerce_f64().is_nan());
    }

    #[test]
    fn test_record_absent_key_reads_null() {
        let record: Record = [("a".to_string(), CellValue::Integer(1))].into_iter().collect();
        assert!(record.value("missing").is_null());
        assert!(record.get("missing").is_none());
        assert_eq!(record.value("a"), &CellValue::Integer(1));
    }

    #[test]
    fn test_variants_stay_distinct_with_same_string() {
        let number = CellValue::Integer(5);
        let text = CellValue::from("5");
        assert_eq!(number.to_string(), text.to_string());
        assert_ne!(number, text);
        assert_ne!(CellValue::Integer(1), CellValue::Float(1.0));
        assert!(number < text);
    }
}
