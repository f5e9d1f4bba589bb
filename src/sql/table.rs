//! Sale table identifiers.

use serde::Serialize;

/// Placeholder in catalog templates where the sale table name is substituted.
pub const TABLE_SLOT: &str = "{table}";

/// The physical tables that hold sale records.
///
/// This is the only way a table name reaches generated SQL, so the set of
/// identifiers that can be substituted is fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    /// Canonical table, every sale with plain and indexed duplicate columns.
    Sales,
    /// Partition holding sales dated before the current year.
    SalesBeforeCurrentYear,
    /// Partition holding sales dated in the current year or later.
    SalesCurrentYear,
}

impl Table {
    pub fn ident(&self) -> &'static str {
        match self {
            Table::Sales => "sales",
            Table::SalesBeforeCurrentYear => "sales_before_current_year",
            Table::SalesCurrentYear => "sales_current_year",
        }
    }

    /// Substitute this table into a template's `{table}` slot.
    pub fn render(&self, template: &str) -> String {
        template.replace(TABLE_SLOT, self.ident())
    }
}
