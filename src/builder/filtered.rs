//! Filtered sales: optional product, region and date-range filters.
//!
//! The partitioned profile reads one or both year partitions depending on
//! where the date range falls relative to the current year:
//!
//! ```text
//!   start.year >= current           -> sales_current_year only
//!   end.year   <  current           -> sales_before_current_year only
//!   otherwise (range spans, or open) -> before WHERE date >= start
//!                                       UNION ALL
//!                                       current WHERE date <= end
//! ```

use super::{BuildContext, ResolvedQuery};
use crate::catalog::Source;
use crate::date::{parse_date_param, DateParam};
use crate::error::{QueryError, QueryResult};
use crate::sql::{date_range, Predicate, Statement, Table, WhereClause};

const PRODUCT_COLUMN: &str = "p.name";
const REGION_COLUMN: &str = "r.name";

/// Filters for the filtered-sales family. All are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesFilter {
    product_name: Option<String>,
    region_name: Option<String>,
    start_date: Option<DateParam>,
    end_date: Option<DateParam>,
}

impl SalesFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the product name exactly.
    pub fn with_product(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    /// Match the region name exactly.
    pub fn with_region(mut self, name: impl Into<String>) -> Self {
        self.region_name = Some(name.into());
        self
    }

    /// Set the inclusive date bounds.
    ///
    /// Both must be `YYYY-MM-DD`; when both are given, start must be strictly
    /// before end.
    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> QueryResult<Self> {
        let start = start.map(parse_date_param).transpose()?;
        let end = end.map(parse_date_param).transpose()?;
        if let (Some(start), Some(end)) = (&start, &end) {
            if start.date() >= end.date() {
                return Err(QueryError::InvalidRange {
                    start: start.as_str().to_string(),
                    end: end.as_str().to_string(),
                });
            }
        }
        self.start_date = start;
        self.end_date = end;
        Ok(self)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    pub fn region_name(&self) -> Option<&str> {
        self.region_name.as_deref()
    }

    pub fn start_date(&self) -> Option<&DateParam> {
        self.start_date.as_ref()
    }

    pub fn end_date(&self) -> Option<&DateParam> {
        self.end_date.as_ref()
    }

    /// Product and region equality conditions.
    fn attribute_conditions(&self) -> WhereClause {
        WhereClause::new()
            .and_maybe(
                self.product_name
                    .as_deref()
                    .map(|name| Predicate::eq(PRODUCT_COLUMN, name)),
            )
            .and_maybe(
                self.region_name
                    .as_deref()
                    .map(|name| Predicate::eq(REGION_COLUMN, name)),
            )
    }
}

/// Which partitions a partitioned read touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionPlan {
    /// The whole range falls in one partition.
    Single(Table),
    /// The range reaches both partitions.
    Split,
}

/// Decide which year partitions the filter's date range reaches.
pub fn plan_partitions(filter: &SalesFilter, current_year: i32) -> PartitionPlan {
    let starts_in_current = filter
        .start_date
        .as_ref()
        .is_some_and(|d| d.year() >= current_year);
    let ends_in_past = filter
        .end_date
        .as_ref()
        .is_some_and(|d| d.year() < current_year);

    if starts_in_current {
        PartitionPlan::Single(Table::SalesCurrentYear)
    } else if ends_in_past {
        PartitionPlan::Single(Table::SalesBeforeCurrentYear)
    } else {
        PartitionPlan::Split
    }
}

pub(super) fn build(
    select: &str,
    source: Source,
    date_column: &'static str,
    filter: &SalesFilter,
    ctx: &BuildContext,
) -> ResolvedQuery {
    let start = filter.start_date.as_ref().map(DateParam::as_str);
    let end = filter.end_date.as_ref().map(DateParam::as_str);

    let table = match source {
        Source::Table(table) => table,
        Source::Partitioned => match plan_partitions(filter, ctx.current_year) {
            PartitionPlan::Single(table) => table,
            PartitionPlan::Split => {
                // Each half only needs the bound that can cut into it.
                let before = select_from(
                    select,
                    Table::SalesBeforeCurrentYear,
                    filter
                        .attribute_conditions()
                        .and_maybe(date_range(date_column, start, None)),
                );
                let current = select_from(
                    select,
                    Table::SalesCurrentYear,
                    filter
                        .attribute_conditions()
                        .and_maybe(date_range(date_column, None, end)),
                );
                return ResolvedQuery {
                    statement: Statement::union_all(vec![before, current]),
                    tables: vec![Table::SalesBeforeCurrentYear, Table::SalesCurrentYear],
                };
            }
        },
    };

    let clause = filter
        .attribute_conditions()
        .and_maybe(date_range(date_column, start, end));
    ResolvedQuery {
        statement: select_from(select, table, clause),
        tables: vec![table],
    }
}

fn select_from(select: &str, table: Table, clause: WhereClause) -> Statement {
    let mut statement = Statement::new(table.render(select));
    clause.apply(&mut statement);
    statement
}
