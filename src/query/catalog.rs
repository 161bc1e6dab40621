//! Tables the static executor knows about and how their JSON objects map
//! onto result columns.

use serde_json::Value as JsonValue;

use crate::data::model::ColumnKind::{Currency, Date, Number, String as Text};
use crate::data::model::{CellValue, ColumnKind, HeaderDefinition, HeaderSchema};

/// Where a column's value comes from in a source object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Top-level field; missing reads as null.
    Field(&'static str),
    /// Top-level field; missing or falsy reads as an empty string.
    FieldOrEmpty(&'static str),
    /// Field of a nested object; missing or falsy reads as an empty string.
    Nested(&'static str, &'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ColumnKind,
    pub source: Source,
}

const fn col(key: &'static str, label: &'static str, kind: ColumnKind) -> ColumnDef {
    ColumnDef {
        key,
        label,
        kind,
        source: Source::Field(key),
    }
}

const fn addr(key: &'static str, label: &'static str, field: &'static str) -> ColumnDef {
    ColumnDef {
        key,
        label,
        kind: ColumnKind::String,
        source: Source::Nested("address", field),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Data file holding the table's objects, relative to the data directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn headers(&self) -> HeaderSchema {
        self.columns
            .iter()
            .map(|c| HeaderDefinition::new(c.key, c.label, c.kind))
            .collect()
    }

    /// Flatten one source object into a positional row.
    pub fn project(&self, object: &JsonValue) -> Vec<CellValue> {
        self.columns
            .iter()
            .map(|c| match c.source {
                Source::Field(field) => object
                    .get(field)
                    .map(CellValue::from)
                    .unwrap_or(CellValue::Null),
                Source::FieldOrEmpty(field) => or_empty(object.get(field)),
                Source::Nested(parent, field) => {
                    or_empty(object.get(parent).and_then(|p| p.get(field)))
                }
            })
            .collect()
    }
}

fn or_empty(value: Option<&JsonValue>) -> CellValue {
    match value {
        Some(v) if is_truthy(v) => CellValue::from(v),
        _ => CellValue::Text(String::new()),
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

const CUSTOMERS: &[ColumnDef] = &[
    col("customerID", "Customer ID", Text),
    col("companyName", "Company Name", Text),
    col("contactName", "Contact Name", Text),
    col("contactTitle", "Contact Title", Text),
    addr("address", "Address", "street"),
    addr("city", "City", "city"),
    addr("region", "Region", "region"),
    addr("postalCode", "Postal Code", "postalCode"),
    addr("country", "Country", "country"),
    addr("phone", "Phone", "phone"),
];

const ORDERS: &[ColumnDef] = &[
    col("orderID", "Order ID", Number),
    col("customerID", "Customer ID", Text),
    col("employeeID", "Employee ID", Number),
    col("orderDate", "Order Date", Date),
    col("requiredDate", "Required Date", Date),
    col("shippedDate", "Shipped Date", Date),
    col("shipVia", "Ship Via", Number),
    col("freight", "Freight", Currency),
    col("shipName", "Ship Name", Text),
];

const PRODUCTS: &[ColumnDef] = &[
    col("productID", "Product ID", Number),
    col("name", "Product Name", Text),
    col("supplierID", "Supplier ID", Number),
    col("categoryID", "Category ID", Number),
    col("quantityPerUnit", "Quantity Per Unit", Text),
    col("unitPrice", "Unit Price", Currency),
    col("unitsInStock", "Units in Stock", Number),
    col("unitsOnOrder", "Units on Order", Number),
    col("reorderLevel", "Reorder Level", Number),
    col("discontinued", "Discontinued", Text),
];

const CATEGORIES: &[ColumnDef] = &[
    col("categoryID", "Category ID", Number),
    col("name", "Category Name", Text),
    col("description", "Description", Text),
];

const EMPLOYEES: &[ColumnDef] = &[
    col("employeeID", "Employee ID", Number),
    col("lastName", "Last Name", Text),
    col("firstName", "First Name", Text),
    col("title", "Title", Text),
    col("titleOfCourtesy", "Title of Courtesy", Text),
    col("birthDate", "Birth Date", Date),
    col("hireDate", "Hire Date", Date),
    addr("address", "Address", "street"),
    addr("city", "City", "city"),
    addr("region", "Region", "region"),
    addr("postalCode", "Postal Code", "postalCode"),
    addr("country", "Country", "country"),
    addr("homePhone", "Home Phone", "phone"),
    ColumnDef {
        key: "reportsTo",
        label: "Reports To",
        kind: Number,
        source: Source::FieldOrEmpty("reportsTo"),
    },
];

const SUPPLIERS: &[ColumnDef] = &[
    col("supplierID", "Supplier ID", Number),
    col("companyName", "Company Name", Text),
    col("contactName", "Contact Name", Text),
    col("contactTitle", "Contact Title", Text),
    addr("address", "Address", "street"),
    addr("city", "City", "city"),
    addr("region", "Region", "region"),
    addr("postalCode", "Postal Code", "postalCode"),
    addr("country", "Country", "country"),
    addr("phone", "Phone", "phone"),
];

/// Every table the static executor can serve.
pub const TABLES: &[TableDef] = &[
    TableDef { name: "customers", columns: CUSTOMERS },
    TableDef { name: "orders", columns: ORDERS },
    TableDef { name: "products", columns: PRODUCTS },
    TableDef { name: "categories", columns: CATEGORIES },
    TableDef { name: "employees", columns: EMPLOYEES },
    TableDef { name: "suppliers", columns: SUPPLIERS },
];

/// Recognize `select * from <table>` anywhere in the query, ignoring case
/// and surrounding whitespace.
pub fn match_table(query: &str) -> Option<&'static TableDef> {
    let normalized = query.trim().to_lowercase();
    TABLES
        .iter()
        .find(|t| normalized.contains(&format!("select * from {}", t.name)))
}
