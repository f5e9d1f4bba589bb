//! Static profile tables, one per query family.
//!
//! Each entry is one physical strategy for the same logical query. Order is
//! significant: a profile's 1-based position is its public index.

use super::{Profile, Source, Template};
use crate::sql::Table;

pub(super) static MONTHLY_REVENUE: [Profile; 3] = [
    Profile {
        name: "date-function",
        summary: "Extracts year and month from the sale date with strftime()",
        template: Template::Aggregate {
            sql: "SELECT strftime('%Y', s.date) AS selected_year, strftime('%m', s.date) AS selected_month, SUM(s.revenue_cents) AS revenue\n\
                  FROM sales s\n\
                  GROUP BY selected_year, selected_month\n\
                  ORDER BY selected_year, selected_month",
        },
    },
    Profile {
        name: "decomposed",
        summary: "Groups on the pre-populated year and month columns",
        template: Template::Aggregate {
            sql: "SELECT s.year AS selected_year, s.month AS selected_month, SUM(s.revenue_cents) AS revenue\n\
                  FROM sales s\n\
                  GROUP BY selected_year, selected_month\n\
                  ORDER BY selected_year, selected_month",
        },
    },
    Profile {
        name: "indexed-decomposed",
        summary: "Groups on indexed year and month columns covered by a composite index",
        template: Template::Aggregate {
            sql: "SELECT s.indexed_year AS selected_year, s.indexed_month AS selected_month, SUM(s.revenue_cents) AS revenue\n\
                  FROM sales s\n\
                  GROUP BY selected_year, selected_month\n\
                  ORDER BY selected_year, selected_month",
        },
    },
];

const PLAIN_SALES_SELECT: &str =
    "SELECT s.date AS sale_date, p.name AS product_name, s.revenue_cents AS revenue, r.name AS region_name\n\
     FROM {table} s\n\
     JOIN products p ON s.product_id = p.id\n\
     JOIN regions r ON s.region_id = r.id";

pub(super) static FILTERED_SALES: [Profile; 3] = [
    Profile {
        name: "plain",
        summary: "Joins and filters on the unindexed columns",
        template: Template::Filterable {
            select: PLAIN_SALES_SELECT,
            source: Source::Table(Table::Sales),
            date_column: "s.date",
        },
    },
    Profile {
        name: "indexed",
        summary: "Joins and filters on the indexed duplicate columns",
        template: Template::Filterable {
            select: "SELECT s.indexed_date AS sale_date, p.name AS product_name, s.revenue_cents AS revenue, r.name AS region_name\n\
                     FROM {table} s\n\
                     JOIN products p ON s.indexed_product_id = p.id\n\
                     JOIN regions r ON s.indexed_region_id = r.id",
            source: Source::Table(Table::Sales),
            date_column: "s.indexed_date",
        },
    },
    Profile {
        name: "partitioned",
        summary: "Reads only the year partitions the date range touches",
        template: Template::Filterable {
            select: PLAIN_SALES_SELECT,
            source: Source::Partitioned,
            date_column: "s.date",
        },
    },
];

pub(super) static TOP_PRODUCTS: [Profile; 2] = [
    Profile {
        name: "plain",
        summary: "Aggregates revenue per product through the unindexed join",
        template: Template::Ranked {
            sql: "SELECT p.name AS product_name, SUM(s.revenue_cents) AS total_revenue\n\
                  FROM sales s\n\
                  JOIN products p ON s.product_id = p.id\n\
                  GROUP BY p.id, p.name\n\
                  ORDER BY total_revenue DESC, product_name ASC\n\
                  LIMIT ?",
        },
    },
    Profile {
        name: "indexed",
        summary: "Aggregates the indexed revenue column through the indexed join column",
        template: Template::Ranked {
            sql: "SELECT p.name AS product_name, SUM(s.indexed_revenue_cents) AS total_revenue\n\
                  FROM sales s\n\
                  JOIN products p ON s.indexed_product_id = p.id\n\
                  GROUP BY p.id, p.name\n\
                  ORDER BY total_revenue DESC, product_name ASC\n\
                  LIMIT ?",
        },
    },
];
