//! Query builders.
//!
//! A builder turns a selected profile plus the caller's parameters into a
//! [`ResolvedQuery`]: final SQL text, its bind values, and the sale tables it
//! reads. Dispatch is a `match` over the family's parameters; each family
//! has its own module.

mod filtered;
mod monthly;
mod top_products;

pub use filtered::{plan_partitions, PartitionPlan, SalesFilter};
pub use top_products::{TopProductsParams, DEFAULT_LIMIT};

use tracing::debug;

use crate::catalog::{QueryFamily, SelectedProfile, Template};
use crate::error::{QueryError, QueryResult};
use crate::sql::{Statement, Table};

/// Runtime context shared by all builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildContext {
    /// Sales dated in this year or later live in the current-year partition.
    pub current_year: i32,
}

impl BuildContext {
    pub fn new(current_year: i32) -> Self {
        Self { current_year }
    }
}

/// Validated parameters for one query family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParams {
    MonthlyRevenue,
    FilteredSales(SalesFilter),
    TopProducts(TopProductsParams),
}

impl QueryParams {
    pub fn family(&self) -> QueryFamily {
        match self {
            QueryParams::MonthlyRevenue => QueryFamily::MonthlyRevenue,
            QueryParams::FilteredSales(_) => QueryFamily::FilteredSales,
            QueryParams::TopProducts(_) => QueryFamily::TopProducts,
        }
    }

    /// Build parameters from string pairs, e.g. a parsed query string.
    ///
    /// Keys not accepted by `family` fail with `UnknownParameter`; empty
    /// values count as absent.
    pub fn from_pairs<'a, I>(family: QueryFamily, pairs: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut accepted = Vec::new();
        for (name, value) in pairs {
            if !family.parameters().contains(&name) {
                return Err(QueryError::UnknownParameter {
                    name: name.to_string(),
                    family: family.name(),
                });
            }
            if !value.is_empty() {
                accepted.push((name, value));
            }
        }
        let lookup = |key: &str| {
            accepted
                .iter()
                .rev()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| *value)
        };

        match family {
            QueryFamily::MonthlyRevenue => Ok(QueryParams::MonthlyRevenue),
            QueryFamily::FilteredSales => {
                let mut filter = SalesFilter::new();
                if let Some(product) = lookup("product_name") {
                    filter = filter.with_product(product);
                }
                if let Some(region) = lookup("region_name") {
                    filter = filter.with_region(region);
                }
                let filter = filter.with_dates(lookup("start_date"), lookup("end_date"))?;
                Ok(QueryParams::FilteredSales(filter))
            }
            QueryFamily::TopProducts => {
                let params = match lookup("limit") {
                    Some(limit) => TopProductsParams::parse_limit(limit)?,
                    None => TopProductsParams::default(),
                };
                Ok(QueryParams::TopProducts(params))
            }
        }
    }
}

/// A profile template with every runtime parameter substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub statement: Statement,
    /// Sale tables the statement reads, in `UNION ALL` order.
    pub tables: Vec<Table>,
}

/// Resolve the selected profile's template with `params`.
///
/// `selected` must come from `params.family().select(..)`; every catalog
/// template has the shape of its own family's parameters.
pub(crate) fn resolve(
    selected: &SelectedProfile,
    params: &QueryParams,
    ctx: &BuildContext,
) -> ResolvedQuery {
    let template = &selected.profile.template;
    let resolved = match (params, template) {
        (QueryParams::MonthlyRevenue, Template::Aggregate { sql }) => monthly::build(sql),
        (
            QueryParams::FilteredSales(filter),
            Template::Filterable {
                select,
                source,
                date_column,
            },
        ) => filtered::build(select, *source, *date_column, filter, ctx),
        (QueryParams::TopProducts(params), Template::Ranked { sql }) => {
            top_products::build(sql, params)
        }
        (params, template) => unreachable!(
            "{} parameters cannot fill a {template:?} template",
            params.family()
        ),
    };

    debug!(
        family = %selected.family,
        profile = %selected.index,
        tables = ?resolved.tables,
        params = resolved.statement.params().len(),
        "resolved query"
    );
    resolved
}
