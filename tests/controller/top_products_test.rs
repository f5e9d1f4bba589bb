// tests/controller/top_products_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::{text, SalesDb};
use rust_decimal::Decimal;
use sales_profiles::catalog::QueryFamily;
use sales_profiles::{ProfileIndex, QueryError, QueryOutput, QueryRequest, TopProductsParams};

fn top(db: &SalesDb, limit: u32, profile: i64) -> QueryOutput {
    db.controller()
        .top_products(
            TopProductsParams::new(limit).unwrap(),
            Some(ProfileIndex::new(profile).unwrap()),
            false,
        )
        .unwrap()
}

fn ranking(output: &QueryOutput) -> Vec<(String, Decimal)> {
    output
        .records()
        .iter()
        .map(|r| {
            (
                text(r, "product_name").to_string(),
                r["total_revenue"].as_money().unwrap(),
            )
        })
        .collect()
}

#[test]
fn test_top_three_with_tie_broken_by_name() {
    let db = SalesDb::seeded();
    let output = top(&db, 3, 1);
    assert_eq!(
        ranking(&output),
        vec![
            ("Laptop".to_string(), Decimal::new(364_999, 2)),
            ("Phone".to_string(), Decimal::new(169_901, 2)),
            ("Keyboard".to_string(), Decimal::new(89_050, 2)),
        ]
    );
}

#[test]
fn test_tied_products_keep_name_order() {
    let db = SalesDb::seeded();
    let names: Vec<_> = ranking(&top(&db, 4, 2))
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, ["Laptop", "Phone", "Keyboard", "Tablet"]);
}

#[test]
fn test_default_limit_is_five() {
    let db = SalesDb::seeded();
    let request = QueryRequest::from_pairs(QueryFamily::TopProducts, [("profile", "1")]).unwrap();
    let output = db.controller().run(&request).unwrap();
    assert_eq!(output.records().len(), 5);
    assert_eq!(ranking(&output).last().unwrap().0, "Monitor");
}

#[test]
fn test_limit_larger_than_catalog() {
    let db = SalesDb::seeded();
    assert_eq!(top(&db, 50, 1).records().len(), common::PRODUCTS.len());
}

#[test]
fn test_plain_and_indexed_profiles_agree() {
    let db = SalesDb::seeded();
    for limit in [1, 3, 5] {
        assert_eq!(top(&db, limit, 1).records(), top(&db, limit, 2).records());
    }
}

#[test]
fn test_indexed_profile_aggregates_indexed_revenue() {
    let db = SalesDb::seeded();
    let conn = rusqlite::Connection::open(&db.path).unwrap();
    conn.execute(
        "UPDATE sales SET indexed_revenue_cents = 0 WHERE product_id = 1",
        [],
    )
    .unwrap();
    drop(conn);

    let plain = ranking(&top(&db, 1, 1));
    let indexed = ranking(&top(&db, 1, 2));
    assert_eq!(plain[0].0, "Laptop");
    assert_eq!(indexed[0], ("Phone".to_string(), Decimal::new(169_901, 2)));
}

#[test]
fn test_invalid_limits() {
    for value in ["0", "-2", "ten"] {
        let err = QueryRequest::from_pairs(QueryFamily::TopProducts, [("limit", value)]).unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidParameter { ref name, .. } if name == "limit"),
            "{value:?} gave {err:?}"
        );
    }
}
