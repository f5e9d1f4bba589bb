//! Physical layout the query profiles read.
//!
//! Loading data belongs to ingestion tooling; this module only creates the
//! tables and indexes so tools and tests can start from an empty file.
//!
//! Every sale lives in the canonical `sales` table (with plain and indexed
//! duplicate columns) and in exactly one year partition.

use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::QueryResult;
use crate::sql::Table;

const DDL: &str = "
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS regions (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS sales (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    product_id INTEGER NOT NULL REFERENCES products (id),
    region_id INTEGER NOT NULL REFERENCES regions (id),
    revenue_cents INTEGER NOT NULL,
    indexed_date TEXT NOT NULL,
    indexed_product_id INTEGER NOT NULL REFERENCES products (id),
    indexed_region_id INTEGER NOT NULL REFERENCES regions (id),
    indexed_revenue_cents INTEGER NOT NULL,
    year TEXT NOT NULL,
    month TEXT NOT NULL,
    indexed_year TEXT NOT NULL,
    indexed_month TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sales_indexed_date ON sales (indexed_date);
CREATE INDEX IF NOT EXISTS idx_sales_indexed_product_id ON sales (indexed_product_id);
CREATE INDEX IF NOT EXISTS idx_sales_indexed_region_id ON sales (indexed_region_id);
CREATE INDEX IF NOT EXISTS idx_sales_indexed_year ON sales (indexed_year);
CREATE INDEX IF NOT EXISTS idx_sales_indexed_month ON sales (indexed_month);
CREATE INDEX IF NOT EXISTS idx_sales_indexed_year_month ON sales (indexed_year, indexed_month);

CREATE TABLE IF NOT EXISTS sales_before_current_year (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    product_id INTEGER NOT NULL REFERENCES products (id),
    region_id INTEGER NOT NULL REFERENCES regions (id),
    revenue_cents INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sales_before_current_year_date
    ON sales_before_current_year (date);

CREATE TABLE IF NOT EXISTS sales_current_year (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,
    product_id INTEGER NOT NULL REFERENCES products (id),
    region_id INTEGER NOT NULL REFERENCES regions (id),
    revenue_cents INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sales_current_year_date
    ON sales_current_year (date);
";

/// Create every table and index. Safe to run on an already provisioned file.
pub fn provision(conn: &Connection) -> QueryResult<()> {
    conn.execute_batch(DDL)?;
    Ok(())
}

/// Create or open the database at `path` and provision it.
pub fn provision_path(path: &Path) -> QueryResult<()> {
    let conn = Connection::open(path)?;
    provision(&conn)?;
    info!(path = %path.display(), "provisioned sales schema");
    Ok(())
}

/// The partition a sale dated in `year` belongs to.
pub fn partition_for(year: i32, current_year: i32) -> Table {
    if year >= current_year {
        Table::SalesCurrentYear
    } else {
        Table::SalesBeforeCurrentYear
    }
}
