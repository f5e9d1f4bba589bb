//! Resolved statements and their bind parameters.

use serde::Serialize;

/// Separator between the parts of a partition-spanning query.
const UNION_ALL: &str = "\nUNION ALL\n";

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Integer(value)
    }
}

/// SQL text with positional `?` placeholders and the values bound to them, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[must_use = "statements have no effect until executed"]
pub struct Statement {
    sql: String,
    params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append a bind value for the next placeholder in the text.
    pub fn bind(mut self, param: impl Into<SqlParam>) -> Self {
        self.params.push(param.into());
        self
    }

    /// Append a clause on its own line, along with the values it binds.
    pub fn push_clause(&mut self, clause: &str, params: impl IntoIterator<Item = SqlParam>) {
        self.sql.push('\n');
        self.sql.push_str(clause);
        self.params.extend(params);
    }

    /// Combine statements with `UNION ALL`, keeping duplicate rows.
    ///
    /// Parameters are concatenated in the same order as the parts, so the
    /// placeholders of the combined text still line up.
    pub fn union_all(parts: Vec<Statement>) -> Statement {
        let mut sql = Vec::with_capacity(parts.len());
        let mut params = Vec::new();
        for part in parts {
            sql.push(part.sql);
            params.extend(part.params);
        }
        Statement {
            sql: sql.join(UNION_ALL),
            params,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    /// Number of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}
