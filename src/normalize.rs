//! Result normalizer.
//!
//! Raw rows are positional tuples whose meaning depends on the statement that
//! produced them. Every profile of a family selects the same columns in the
//! same order, so the family alone decides how a row is named and typed:
//!
//! | Family            | Columns                                           |
//! |-------------------|---------------------------------------------------|
//! | `monthly-revenue` | year, month, revenue                              |
//! | `filtered-sales`  | sale_date, product_name, revenue, region_name     |
//! | `top-products`    | product_name, total_revenue                       |
//!
//! Money is stored as integer cents and comes out as a two-place
//! [`Decimal`].

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::QueryFamily;
use crate::error::{QueryError, QueryResult};
use crate::storage::{RawRow, RawValue};

/// Decimal places of every money column.
pub const MONEY_SCALE: u32 = 2;

/// How a raw cell is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    /// Integer minor units, rendered with [`MONEY_SCALE`] decimals.
    Money,
}

/// A named output column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Text,
    }
}

const fn money(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Money,
    }
}

static MONTHLY_REVENUE_COLUMNS: [Column; 3] = [text("year"), text("month"), money("revenue")];

static FILTERED_SALES_COLUMNS: [Column; 4] = [
    text("sale_date"),
    text("product_name"),
    money("revenue"),
    text("region_name"),
];

static TOP_PRODUCTS_COLUMNS: [Column; 2] = [text("product_name"), money("total_revenue")];

/// The output columns of `family`, in select order.
pub fn columns(family: QueryFamily) -> &'static [Column] {
    match family {
        QueryFamily::MonthlyRevenue => &MONTHLY_REVENUE_COLUMNS,
        QueryFamily::FilteredSales => &FILTERED_SALES_COLUMNS,
        QueryFamily::TopProducts => &TOP_PRODUCTS_COLUMNS,
    }
}

/// A normalized cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Text(String),
    /// Serialized as a decimal string so the two-place scale survives JSON.
    Money(#[serde(with = "rust_decimal::serde::str")] Decimal),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<Decimal> {
        match self {
            FieldValue::Money(value) => Some(*value),
            _ => None,
        }
    }
}

/// One normalized row: column name to value.
pub type Record = BTreeMap<String, FieldValue>;

/// Name and type every row with the family's column list.
///
/// Row order is kept as returned by storage.
pub fn normalize_rows(family: QueryFamily, rows: Vec<RawRow>) -> QueryResult<Vec<Record>> {
    let columns = columns(family);
    rows.into_iter()
        .enumerate()
        .map(|(index, row)| normalize_row(columns, index, row))
        .collect()
}

fn normalize_row(columns: &[Column], index: usize, row: RawRow) -> QueryResult<Record> {
    if row.len() != columns.len() {
        return Err(QueryError::Decode {
            column: format!("row {index}"),
            message: format!("expected {} values, got {}", columns.len(), row.len()),
        });
    }
    columns
        .iter()
        .zip(row)
        .map(|(column, value)| Ok((column.name.to_string(), convert(column, value)?)))
        .collect()
}

fn convert(column: &Column, value: RawValue) -> QueryResult<FieldValue> {
    let mismatch = |found: &str| QueryError::Decode {
        column: column.name.to_string(),
        message: format!("expected {:?}, found {found}", column.kind),
    };
    match (column.kind, value) {
        (_, RawValue::Null) => Ok(FieldValue::Null),
        (ColumnKind::Text, RawValue::Text(text)) => Ok(FieldValue::Text(text)),
        (ColumnKind::Text, RawValue::Integer(n)) => Ok(FieldValue::Text(n.to_string())),
        (ColumnKind::Money, RawValue::Integer(cents)) => {
            Ok(FieldValue::Money(Decimal::new(cents, MONEY_SCALE)))
        }
        (_, RawValue::Real(_)) => Err(mismatch("a floating-point value")),
        (ColumnKind::Money, RawValue::Text(_)) => Err(mismatch("text")),
    }
}
