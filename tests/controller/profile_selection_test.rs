// tests/controller/profile_selection_test.rs
#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{controller_with, SalesDb};
use sales_profiles::normalize;
use sales_profiles::storage::Connector;
use sales_profiles::{ProfileIndex, QueryError, QueryFamily, QueryRequest};

fn request(family: QueryFamily, profile: &str) -> QueryRequest {
    QueryRequest::from_pairs(family, [("profile", profile)]).unwrap()
}

#[test]
fn test_every_profile_yields_the_family_columns() {
    let db = SalesDb::seeded();
    let controller = db.controller();

    for family in QueryFamily::ALL {
        let expected: Vec<_> = {
            let mut names: Vec<_> = normalize::columns(family).iter().map(|c| c.name).collect();
            names.sort();
            names
        };
        for index in 1..=family.profiles().len() {
            let output = controller
                .run(&request(family, &index.to_string()))
                .unwrap();
            assert_eq!(output.family, family);
            assert_eq!(output.profile.get(), index);
            assert!(!output.records().is_empty(), "{family} profile {index}");
            for row in output.records() {
                let columns: Vec<_> = row.keys().map(String::as_str).collect();
                assert_eq!(columns, expected, "{family} profile {index}");
            }
        }
    }
}

#[test]
fn test_default_profile_is_reported() {
    let db = SalesDb::seeded();
    let controller = db.controller();
    for family in QueryFamily::ALL {
        let request = QueryRequest::from_pairs(family, std::iter::empty()).unwrap();
        let output = controller.run(&request).unwrap();
        assert_eq!(output.profile, family.default_profile());
    }
}

#[test]
fn test_non_positive_profiles_are_invalid() {
    for value in ["0", "-1", "two", "1.5"] {
        let err = QueryRequest::from_pairs(QueryFamily::MonthlyRevenue, [("profile", value)])
            .unwrap_err();
        assert!(
            matches!(err, QueryError::InvalidProfile { .. }),
            "{value:?} gave {err:?}"
        );
    }
    assert!(matches!(
        ProfileIndex::new(0),
        Err(QueryError::InvalidProfile { .. })
    ));
}

#[test]
fn test_profile_past_catalog_end_is_not_found() {
    let db = SalesDb::seeded();
    let controller = db.controller();
    for family in QueryFamily::ALL {
        let available = family.profiles().len();
        let err = controller
            .run(&request(family, &(available + 1).to_string()))
            .unwrap_err();
        match err {
            QueryError::ProfileNotFound {
                requested,
                available: reported,
            } => {
                assert_eq!(requested, available + 1);
                assert_eq!(reported, available);
            }
            other => panic!("{family}: unexpected {other:?}"),
        }
    }
}

#[test]
fn test_rejected_requests_never_open_storage() {
    let db = SalesDb::seeded();
    let connector = db.counting();
    let shared: Arc<dyn Connector> = connector.clone();
    let controller = controller_with(shared);

    let requests = [
        QueryRequest::from_pairs(QueryFamily::TopProducts, [("profile", "3")]),
        QueryRequest::from_pairs(QueryFamily::MonthlyRevenue, [("profile", "4")]),
        QueryRequest::from_pairs(QueryFamily::FilteredSales, [("profile", "99")]),
    ];
    for request in requests {
        let err = controller.run(&request.unwrap()).unwrap_err();
        assert!(err.is_validation());
    }
    assert_eq!(connector.opens(), 0);

    controller.monthly_revenue(None, false).unwrap();
    assert_eq!(connector.opens(), 1);
}
