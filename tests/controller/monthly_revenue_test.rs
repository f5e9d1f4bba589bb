// tests/controller/monthly_revenue_test.rs
#[path = "../common/mod.rs"]
mod common;

use common::{text, SalesDb};
use rust_decimal::Decimal;
use sales_profiles::ProfileIndex;

fn profile(index: i64) -> Option<ProfileIndex> {
    Some(ProfileIndex::new(index).unwrap())
}

#[test]
fn test_monthly_revenue_values() {
    let db = SalesDb::seeded();
    let output = db.controller().monthly_revenue(profile(1), false).unwrap();

    let triples: Vec<_> = output
        .records()
        .iter()
        .map(|r| {
            (
                text(r, "year").to_string(),
                text(r, "month").to_string(),
                r["revenue"].as_money().unwrap(),
            )
        })
        .collect();

    let expected = [
        ("2023", "11", 120_000),
        ("2024", "01", 80_000),
        ("2024", "06", 165_049),
        ("2024", "12", 30_000),
        ("2025", "01", 79_900),
        ("2025", "02", 89_050),
        ("2025", "03", 125_000),
        ("2025", "06", 73_999),
        ("2025", "09", 10_001),
    ]
    .map(|(y, m, cents)| (y.to_string(), m.to_string(), Decimal::new(cents, 2)));

    assert_eq!(triples, expected);
}

#[test]
fn test_date_function_and_indexed_profiles_agree() {
    let db = SalesDb::seeded();
    let controller = db.controller();

    let date_function = controller.monthly_revenue(profile(1), false).unwrap();
    let decomposed = controller.monthly_revenue(profile(2), false).unwrap();
    let indexed = controller.monthly_revenue(profile(3), false).unwrap();

    assert_eq!(date_function.records(), indexed.records());
    assert_eq!(date_function.records(), decomposed.records());
    assert_eq!(
        serde_json::to_string(date_function.records()).unwrap(),
        serde_json::to_string(indexed.records()).unwrap()
    );
}

#[test]
fn test_revenue_sum_is_exact() {
    let db = SalesDb::seeded();
    let output = db.controller().monthly_revenue(None, false).unwrap();

    let total: Decimal = output
        .records()
        .iter()
        .map(|r| r["revenue"].as_money().unwrap())
        .sum();
    let cents: i64 = common::SALES.iter().map(|(_, _, _, cents)| cents).sum();
    assert_eq!(total, Decimal::new(cents, 2));
    assert_eq!(total.scale(), 2);
}

#[test]
fn test_default_profile_is_indexed() {
    let db = SalesDb::seeded();
    let output = db.controller().monthly_revenue(None, false).unwrap();
    assert_eq!(output.profile.get(), 3);
}
