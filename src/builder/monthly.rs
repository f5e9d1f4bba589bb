//! Monthly revenue: no parameters, the template is the statement.

use super::ResolvedQuery;
use crate::sql::{Statement, Table};

pub(super) fn build(sql: &str) -> ResolvedQuery {
    ResolvedQuery {
        statement: Statement::new(sql),
        tables: vec![Table::Sales],
    }
}
