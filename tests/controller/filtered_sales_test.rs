// tests/controller/filtered_sales_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::{sorted, text, SalesDb};
use sales_profiles::catalog::QueryFamily;
use sales_profiles::normalize::Record;
use sales_profiles::sql::{Statement, Table};
use sales_profiles::{ProfileIndex, QueryController, QueryError, QueryRequest, SalesFilter};

const PLAIN_SELECT: &str = "SELECT s.date AS sale_date, p.name AS product_name, s.revenue_cents AS revenue, r.name AS region_name
FROM {table} s
JOIN products p ON s.product_id = p.id
JOIN regions r ON s.region_id = r.id";

fn run(controller: &QueryController, profile: i64, filter: SalesFilter) -> Vec<Record> {
    controller
        .filtered_sales(filter, Some(ProfileIndex::new(profile).unwrap()), false)
        .unwrap()
        .records()
        .to_vec()
}

fn dates(start: Option<&str>, end: Option<&str>) -> SalesFilter {
    SalesFilter::new().with_dates(start, end).unwrap()
}

fn partition_query(table: Table, clause: &str, params: &[&str]) -> Statement {
    let mut sql = table.render(PLAIN_SELECT);
    if !clause.is_empty() {
        sql.push_str("\nWHERE ");
        sql.push_str(clause);
    }
    params
        .iter()
        .fold(Statement::new(sql), |stmt, param| stmt.bind(*param))
}

#[test]
fn test_spanning_range_is_union_of_partitions() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        3,
        dates(Some("2024-06-01"), Some("2025-06-01")),
    );

    let before = db.query(
        QueryFamily::FilteredSales,
        &partition_query(Table::SalesBeforeCurrentYear, "s.date >= ?", &["2024-06-01"]),
    );
    let current = db.query(
        QueryFamily::FilteredSales,
        &partition_query(Table::SalesCurrentYear, "s.date <= ?", &["2025-06-01"]),
    );

    assert_eq!(before.len(), 3);
    assert_eq!(current.len(), 4);
    assert_eq!(rows.len(), before.len() + current.len());
    assert_eq!(rows, [before, current].concat());
}

#[test]
fn test_range_before_current_year_reads_past_partition_only() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        3,
        dates(Some("2023-01-01"), Some("2024-12-31")),
    );
    let past = db.query(
        QueryFamily::FilteredSales,
        &partition_query(Table::SalesBeforeCurrentYear, "", &[]),
    );
    assert_eq!(rows.len(), 5);
    assert_eq!(sorted(rows), sorted(past));
}

#[test]
fn test_range_in_current_year_reads_current_partition_only() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        3,
        dates(Some("2025-01-01"), Some("2025-12-31")),
    );
    let current = db.query(
        QueryFamily::FilteredSales,
        &partition_query(Table::SalesCurrentYear, "", &[]),
    );
    assert_eq!(rows.len(), 6);
    assert_eq!(sorted(rows), sorted(current));
}

#[test]
fn test_profiles_return_same_rows() {
    let db = SalesDb::seeded();
    let controller = db.controller();
    let filters = [
        SalesFilter::new(),
        dates(Some("2024-06-01"), Some("2025-06-01")),
        dates(Some("2024-06-15"), None),
        dates(None, Some("2024-06-15")),
        SalesFilter::new().with_product("Laptop").with_region("North"),
        dates(Some("2024-01-01"), Some("2025-12-31")).with_region("Pacific"),
    ];

    for filter in filters {
        let plain = sorted(run(&controller, 1, filter.clone()));
        let indexed = sorted(run(&controller, 2, filter.clone()));
        let partitioned = sorted(run(&controller, 3, filter.clone()));
        assert_eq!(plain, indexed, "{filter:?}");
        assert_eq!(plain, partitioned, "{filter:?}");
    }
}

#[test]
fn test_product_and_region_filters() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        1,
        SalesFilter::new().with_product("Laptop").with_region("North"),
    );
    let mut dates: Vec<_> = rows.iter().map(|r| text(r, "sale_date")).collect();
    dates.sort();
    assert_eq!(dates, vec!["2023-11-15", "2025-03-20"]);
    assert!(rows.iter().all(|r| text(r, "region_name") == "North"));
}

#[test]
fn test_bounds_are_inclusive() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        2,
        dates(Some("2024-06-01"), Some("2024-06-15")),
    );
    let mut dates: Vec<_> = rows.iter().map(|r| text(r, "sale_date")).collect();
    dates.sort();
    assert_eq!(dates, vec!["2024-06-01", "2024-06-15"]);
}

#[test]
fn test_filter_values_are_bound_not_spliced() {
    let db = SalesDb::seeded();
    let rows = run(
        &db.controller(),
        1,
        SalesFilter::new().with_product("Laptop' OR '1'='1"),
    );
    assert!(rows.is_empty());
}

#[test]
fn test_normalized_columns() {
    let db = SalesDb::seeded();
    let rows = run(&db.controller(), 3, SalesFilter::new());
    assert_eq!(rows.len(), common::SALES.len());
    for row in &rows {
        let columns: Vec<_> = row.keys().map(String::as_str).collect();
        assert_eq!(columns, ["product_name", "region_name", "revenue", "sale_date"]);
    }
}

#[test]
fn test_request_validation() {
    let cases: [(&[(&str, &str)], fn(&QueryError) -> bool); 4] = [
        (
            &[("start_date", "2025-06-01"), ("end_date", "2025-06-01")],
            |e| matches!(e, QueryError::InvalidRange { .. }),
        ),
        (
            &[("start_date", "2025-06-02"), ("end_date", "2025-06-01")],
            |e| matches!(e, QueryError::InvalidRange { .. }),
        ),
        (&[("end_date", "06/01/2025")], |e| {
            matches!(e, QueryError::InvalidDate { .. })
        }),
        (&[("category", "books")], |e| {
            matches!(e, QueryError::UnknownParameter { .. })
        }),
    ];

    for (pairs, expected) in cases {
        let err = QueryRequest::from_pairs(QueryFamily::FilteredSales, pairs.iter().copied())
            .unwrap_err();
        assert!(expected(&err), "{pairs:?} gave {err:?}");
        assert!(err.is_validation());
    }
}
