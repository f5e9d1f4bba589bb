//! Storage connector.
//!
//! A [`Connector`] hands out one [`Session`] per query execution. Sessions
//! are never shared: the controller opens one, runs a single statement, and
//! closes it before returning, whether the statement succeeded or not.

pub mod schema;
mod sqlite;

pub use sqlite::{SqliteConnector, SqliteSession};

use crate::error::QueryResult;
use crate::sql::Statement;

/// An untyped cell as returned by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

/// A positional row tuple.
pub type RawRow = Vec<RawValue>;

/// Opens sessions against a provisioned store.
pub trait Connector: Send + Sync {
    /// Acquire a new session. Each call gets its own connection.
    fn open(&self) -> QueryResult<Box<dyn Session + '_>>;
}

/// An open handle to the store.
pub trait Session {
    /// Run `statement` and collect every row.
    ///
    /// Fails with `NotConnected` once the session has been closed.
    fn execute_and_fetch_all(&mut self, statement: &Statement) -> QueryResult<Vec<RawRow>>;

    /// Release the connection. Closing twice is a no-op.
    fn close(&mut self);
}

/// Open a session, run `statement`, and close the session on every path.
pub fn fetch_all(connector: &dyn Connector, statement: &Statement) -> QueryResult<Vec<RawRow>> {
    let mut session = connector.open()?;
    let rows = session.execute_and_fetch_all(statement);
    session.close();
    rows
}
