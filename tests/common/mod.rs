//! Shared fixture: a temporary SQLite file provisioned with the sales schema
//! and seeded the way ingestion would, every sale in the canonical table and
//! in exactly one year partition.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rusqlite::{params, Connection};
use tempfile::TempDir;

use sales_profiles::cache::MemoryCache;
use sales_profiles::normalize::{normalize_rows, Record};
use sales_profiles::sql::Statement;
use sales_profiles::storage::{self, schema, Connector, Session, SqliteConnector};
use sales_profiles::{BuildContext, QueryController, QueryFamily, QueryResult};

pub const CURRENT_YEAR: i32 = 2025;

pub const PRODUCTS: [&str; 5] = ["Laptop", "Phone", "Tablet", "Monitor", "Keyboard"];
pub const REGIONS: [&str; 3] = ["North", "South", "Pacific"];

/// (date, product, region, revenue in cents), in insertion order.
///
/// Tablet and Keyboard both total 890.50.
pub const SALES: [(&str, &str, &str, i64); 11] = [
    ("2023-11-15", "Laptop", "North", 120_000),
    ("2024-01-10", "Phone", "South", 80_000),
    ("2024-06-01", "Tablet", "North", 45_050),
    ("2024-06-15", "Laptop", "Pacific", 119_999),
    ("2024-12-31", "Monitor", "South", 30_000),
    ("2025-01-01", "Phone", "North", 79_900),
    ("2025-02-14", "Keyboard", "South", 89_050),
    ("2025-03-20", "Laptop", "North", 125_000),
    ("2025-06-01", "Tablet", "Pacific", 44_000),
    ("2025-06-02", "Monitor", "North", 29_999),
    ("2025-09-09", "Phone", "Pacific", 10_001),
];

/// A seeded database that lives as long as the fixture.
pub struct SalesDb {
    _dir: TempDir,
    pub path: PathBuf,
}

impl SalesDb {
    pub fn seeded() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.db");
        let conn = Connection::open(&path).unwrap();
        schema::provision(&conn).unwrap();
        seed(&conn);
        Self { _dir: dir, path }
    }

    /// Empty database whose file does not exist, so every open fails.
    pub fn missing() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        Self { _dir: dir, path }
    }

    pub fn controller(&self) -> QueryController {
        controller_with(Arc::new(SqliteConnector::new(&self.path)))
    }

    pub fn counting(&self) -> Arc<CountingConnector> {
        Arc::new(CountingConnector::new(&self.path))
    }

    /// Run raw SQL and normalize it as `family`.
    pub fn query(&self, family: QueryFamily, statement: &Statement) -> Vec<Record> {
        let connector = SqliteConnector::new(&self.path);
        let raw = storage::fetch_all(&connector, statement).unwrap();
        normalize_rows(family, raw).unwrap()
    }
}

pub fn controller_with(connector: Arc<dyn Connector>) -> QueryController {
    QueryController::new(
        connector,
        Arc::new(MemoryCache::new()),
        BuildContext::new(CURRENT_YEAR),
    )
}

fn seed(conn: &Connection) {
    for (id, name) in PRODUCTS.iter().enumerate() {
        conn.execute(
            "INSERT INTO products (id, name) VALUES (?1, ?2)",
            params![id as i64 + 1, name],
        )
        .unwrap();
    }
    for (id, name) in REGIONS.iter().enumerate() {
        conn.execute(
            "INSERT INTO regions (id, name) VALUES (?1, ?2)",
            params![id as i64 + 1, name],
        )
        .unwrap();
    }
    for (date, product, region, cents) in SALES {
        insert_sale(conn, date, id_of(&PRODUCTS, product), id_of(&REGIONS, region), cents);
    }
}

fn id_of(names: &[&str], name: &str) -> i64 {
    names.iter().position(|n| *n == name).unwrap() as i64 + 1
}

fn insert_sale(conn: &Connection, date: &str, product_id: i64, region_id: i64, cents: i64) {
    let year = &date[..4];
    let month = &date[5..7];
    conn.execute(
        "INSERT INTO sales (
            date, product_id, region_id, revenue_cents,
            indexed_date, indexed_product_id, indexed_region_id, indexed_revenue_cents,
            year, month, indexed_year, indexed_month
        ) VALUES (?1, ?2, ?3, ?4, ?1, ?2, ?3, ?4, ?5, ?6, ?5, ?6)",
        params![date, product_id, region_id, cents, year, month],
    )
    .unwrap();

    let partition = schema::partition_for(year.parse().unwrap(), CURRENT_YEAR);
    conn.execute(
        &format!(
            "INSERT INTO {} (date, product_id, region_id, revenue_cents) VALUES (?1, ?2, ?3, ?4)",
            partition.ident()
        ),
        params![date, product_id, region_id, cents],
    )
    .unwrap();
}

/// Wraps the SQLite connector and counts opened sessions.
pub struct CountingConnector {
    inner: SqliteConnector,
    opens: AtomicUsize,
}

impl CountingConnector {
    pub fn new(path: &Path) -> Self {
        Self {
            inner: SqliteConnector::new(path),
            opens: AtomicUsize::new(0),
        }
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl Connector for CountingConnector {
    fn open(&self) -> QueryResult<Box<dyn Session + '_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open()
    }
}

/// Sort key for comparing row multisets regardless of order.
pub fn sorted(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
    records
}

pub fn text<'a>(record: &'a Record, column: &str) -> &'a str {
    record[column].as_text().unwrap()
}
