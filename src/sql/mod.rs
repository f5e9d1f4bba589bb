//! SQL composition.
//!
//! Statements are assembled from static catalog templates plus runtime
//! filters. Caller-supplied values never enter the SQL text: they travel as
//! positional `?` bind parameters. Table names are substituted only from the
//! closed [`Table`] set.
//!
//! - [`statement`] - statement text with its bind parameters, `UNION ALL`
//! - [`predicate`] - filter conditions and `WHERE` clause assembly
//! - [`table`] - identifiers of the sale tables and partitions

pub mod predicate;
pub mod statement;
pub mod table;


pub use predicate::{date_range, Predicate, WhereClause};
pub use statement::{SqlParam, Statement};
pub use table::Table;
