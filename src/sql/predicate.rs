//! Filter conditions and `WHERE` clause assembly.

use super::statement::{SqlParam, Statement};

/// A single filter condition against a template column.
///
/// Columns are `&'static str` because they always come from catalog
/// templates; values are bound as parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq {
        column: &'static str,
        value: SqlParam,
    },
    Between {
        column: &'static str,
        low: SqlParam,
        high: SqlParam,
    },
    AtLeast {
        column: &'static str,
        value: SqlParam,
    },
    AtMost {
        column: &'static str,
        value: SqlParam,
    },
}

impl Predicate {
    pub fn eq(column: &'static str, value: impl Into<SqlParam>) -> Self {
        Predicate::Eq {
            column,
            value: value.into(),
        }
    }

    fn render(&self, params: &mut Vec<SqlParam>) -> String {
        match self {
            Predicate::Eq { column, value } => {
                params.push(value.clone());
                format!("{column} = ?")
            }
            Predicate::Between { column, low, high } => {
                params.push(low.clone());
                params.push(high.clone());
                format!("{column} BETWEEN ? AND ?")
            }
            Predicate::AtLeast { column, value } => {
                params.push(value.clone());
                format!("{column} >= ?")
            }
            Predicate::AtMost { column, value } => {
                params.push(value.clone());
                format!("{column} <= ?")
            }
        }
    }
}

/// Range condition over an inclusive date interval.
///
/// `BETWEEN` when both bounds are set, a one-sided comparison when only one
/// is, nothing when neither is.
pub fn date_range(column: &'static str, start: Option<&str>, end: Option<&str>) -> Option<Predicate> {
    match (start, end) {
        (Some(start), Some(end)) => Some(Predicate::Between {
            column,
            low: start.into(),
            high: end.into(),
        }),
        (Some(start), None) => Some(Predicate::AtLeast {
            column,
            value: start.into(),
        }),
        (None, Some(end)) => Some(Predicate::AtMost {
            column,
            value: end.into(),
        }),
        (None, None) => None,
    }
}

/// Conditions joined with `AND`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    predicates: Vec<Predicate>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn and_maybe(self, predicate: Option<Predicate>) -> Self {
        match predicate {
            Some(predicate) => self.and(predicate),
            None => self,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Append `WHERE ...` to the statement. An empty clause appends nothing.
    pub fn apply(&self, statement: &mut Statement) {
        if self.is_empty() {
            return;
        }
        let mut params = Vec::new();
        let conditions: Vec<String> = self
            .predicates
            .iter()
            .map(|p| p.render(&mut params))
            .collect();
        statement.push_clause(&format!("WHERE {}", conditions.join(" AND ")), params);
    }
}
