//! Query profile catalog.
//!
//! Every logical query is a [`QueryFamily`]. A family owns a fixed, ordered
//! list of [`Profile`]s: physically different statements that return the same
//! normalized result. Callers pick a profile by its 1-based index, or get the
//! family's declared default.
//!
//! | Family            | Profiles                                    | Default |
//! |-------------------|---------------------------------------------|---------|
//! | `monthly-revenue` | date-function, decomposed, indexed-decomposed | 3     |
//! | `filtered-sales`  | plain, indexed, partitioned                 | 3       |
//! | `top-products`    | plain, indexed                              | 2       |

mod profiles;

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{QueryError, QueryResult};
use crate::sql::Table;

/// A logical query, independent of how it is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryFamily {
    /// Revenue summed per (year, month), ascending.
    MonthlyRevenue,
    /// Individual sales matching optional product, region and date filters.
    FilteredSales,
    /// Products ranked by total revenue.
    TopProducts,
}

impl QueryFamily {
    pub const ALL: [QueryFamily; 3] = [
        QueryFamily::MonthlyRevenue,
        QueryFamily::FilteredSales,
        QueryFamily::TopProducts,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryFamily::MonthlyRevenue => "monthly-revenue",
            QueryFamily::FilteredSales => "filtered-sales",
            QueryFamily::TopProducts => "top-products",
        }
    }

    /// The family's profiles, in index order.
    pub fn profiles(&self) -> &'static [Profile] {
        match self {
            QueryFamily::MonthlyRevenue => &profiles::MONTHLY_REVENUE,
            QueryFamily::FilteredSales => &profiles::FILTERED_SALES,
            QueryFamily::TopProducts => &profiles::TOP_PRODUCTS,
        }
    }

    /// Profile used when the caller does not choose one.
    ///
    /// Declared per family rather than derived: each points at the family's
    /// most optimized profile.
    pub fn default_profile(&self) -> ProfileIndex {
        match self {
            QueryFamily::MonthlyRevenue => ProfileIndex::at(3),
            QueryFamily::FilteredSales => ProfileIndex::at(3),
            QueryFamily::TopProducts => ProfileIndex::at(2),
        }
    }

    /// Filter parameter names the family accepts.
    pub fn parameters(&self) -> &'static [&'static str] {
        match self {
            QueryFamily::MonthlyRevenue => &[],
            QueryFamily::FilteredSales => &["product_name", "region_name", "start_date", "end_date"],
            QueryFamily::TopProducts => &["limit"],
        }
    }

    /// Resolve a profile index against this family's catalog.
    ///
    /// `None` selects [`QueryFamily::default_profile`].
    pub fn select(&self, requested: Option<ProfileIndex>) -> QueryResult<SelectedProfile> {
        let index = requested.unwrap_or_else(|| self.default_profile());
        let profiles = self.profiles();
        let profile = profiles
            .get(index.get() - 1)
            .ok_or(QueryError::ProfileNotFound {
                requested: index.get(),
                available: profiles.len(),
            })?;
        Ok(SelectedProfile {
            family: *self,
            index,
            profile,
        })
    }
}

impl fmt::Display for QueryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QueryFamily::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| format!("unknown query family: {s}"))
    }
}

/// A 1-based position in a family's profile list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProfileIndex(NonZeroUsize);

impl ProfileIndex {
    const fn at(index: usize) -> Self {
        match NonZeroUsize::new(index) {
            Some(index) => ProfileIndex(index),
            None => panic!("profile indexes start at 1"),
        }
    }

    /// Validate an integer profile index.
    pub fn new(value: i64) -> QueryResult<Self> {
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(ProfileIndex)
            .ok_or_else(|| QueryError::InvalidProfile {
                value: value.to_string(),
            })
    }

    /// Validate a profile index given as text, e.g. from a query string.
    pub fn parse(value: &str) -> QueryResult<Self> {
        let parsed: i64 = value.trim().parse().map_err(|_| QueryError::InvalidProfile {
            value: value.to_string(),
        })?;
        Self::new(parsed)
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for ProfileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One physical execution strategy.
#[derive(Debug)]
pub struct Profile {
    /// Short identifier, unique within the family.
    pub name: &'static str,
    /// One-line description of the physical layout it reads.
    pub summary: &'static str,
    pub template: Template,
}

/// Statement template for a profile.
#[derive(Debug)]
pub enum Template {
    /// Complete statement without runtime parameters.
    Aggregate { sql: &'static str },
    /// Row source that takes a `WHERE` clause. `select` reads from the
    /// `{table}` slot, which is filled from `source`.
    Filterable {
        select: &'static str,
        source: Source,
        date_column: &'static str,
    },
    /// Ranking statement ending in `LIMIT ?`.
    Ranked { sql: &'static str },
}

/// Where a filterable template reads its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Table(Table),
    /// One or both year partitions, chosen from the date range.
    Partitioned,
}

/// A profile resolved against its family's catalog.
#[derive(Debug, Clone, Copy)]
pub struct SelectedProfile {
    pub family: QueryFamily,
    pub index: ProfileIndex,
    pub profile: &'static Profile,
}

/// One row of the catalog listing.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub family: QueryFamily,
    pub index: ProfileIndex,
    pub name: &'static str,
    pub summary: &'static str,
    pub is_default: bool,
}

/// Every profile of every family, in catalog order.
pub fn listing() -> Vec<ProfileInfo> {
    QueryFamily::ALL
        .into_iter()
        .flat_map(|family| {
            let default = family.default_profile();
            family
                .profiles()
                .iter()
                .enumerate()
                .map(move |(position, profile)| {
                    let index = ProfileIndex::at(position + 1);
                    ProfileInfo {
                        family,
                        index,
                        name: profile.name,
                        summary: profile.summary,
                        is_default: index == default,
                    }
                })
        })
        .collect()
}
