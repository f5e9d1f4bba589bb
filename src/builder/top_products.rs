//! Top products: revenue ranking with a bound `LIMIT`.

use super::ResolvedQuery;
use crate::error::{QueryError, QueryResult};
use crate::sql::{Statement, Table};

/// Number of products returned when no limit is given.
pub const DEFAULT_LIMIT: u32 = 5;

/// Parameters for the top-products family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopProductsParams {
    limit: u32,
}

impl TopProductsParams {
    pub fn new(limit: u32) -> QueryResult<Self> {
        if limit == 0 {
            return Err(QueryError::invalid_parameter(
                "limit",
                "0",
                "must be at least 1",
            ));
        }
        Ok(Self { limit })
    }

    pub(super) fn parse_limit(value: &str) -> QueryResult<Self> {
        let limit = value
            .trim()
            .parse::<u32>()
            .map_err(|_| QueryError::invalid_parameter("limit", value, "expected a positive integer"))?;
        Self::new(limit)
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for TopProductsParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

pub(super) fn build(sql: &str, params: &TopProductsParams) -> ResolvedQuery {
    ResolvedQuery {
        statement: Statement::new(sql).bind(i64::from(params.limit)),
        tables: vec![Table::Sales],
    }
}
