//! SQLite connector.

use std::path::{Path, PathBuf};

use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use tracing::{debug, warn};

use super::{Connector, RawRow, RawValue, Session};
use crate::error::{QueryError, QueryResult};
use crate::sql::{SqlParam, Statement};

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Text(value) => ToSqlOutput::from(value.as_str()),
            SqlParam::Integer(value) => ToSqlOutput::from(*value),
        })
    }
}

/// Opens read-only sessions on a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SqliteConnector {
    fn open(&self) -> QueryResult<Box<dyn Session + '_>> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        debug!(path = %self.path.display(), "opened sqlite session");
        Ok(Box::new(SqliteSession::new(conn)))
    }
}

/// A single SQLite connection, closed on `close()` or drop.
#[derive(Debug)]
pub struct SqliteSession {
    conn: Option<Connection>,
}

impl SqliteSession {
    pub fn new(conn: Connection) -> Self {
        Self { conn: Some(conn) }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }
}

impl Session for SqliteSession {
    fn execute_and_fetch_all(&mut self, statement: &Statement) -> QueryResult<Vec<RawRow>> {
        let conn = self.conn.as_ref().ok_or(QueryError::NotConnected)?;
        let mut stmt = conn.prepare(statement.sql())?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let mut rows = stmt.query(params_from_iter(statement.params()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(names.len());
            for (index, name) in names.iter().enumerate() {
                values.push(raw_value(name, row.get_ref(index)?)?);
            }
            out.push(values);
        }
        Ok(out)
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                warn!(error = %e, "failed to close sqlite connection");
            }
        }
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        self.close();
    }
}

fn raw_value(column: &str, value: ValueRef<'_>) -> QueryResult<RawValue> {
    match value {
        ValueRef::Null => Ok(RawValue::Null),
        ValueRef::Integer(n) => Ok(RawValue::Integer(n)),
        ValueRef::Real(f) => Ok(RawValue::Real(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|text| RawValue::Text(text.to_string()))
            .map_err(|e| QueryError::Decode {
                column: column.to_string(),
                message: e.to_string(),
            }),
        ValueRef::Blob(_) => Err(QueryError::Decode {
            column: column.to_string(),
            message: "binary values are not supported".to_string(),
        }),
    }
}
