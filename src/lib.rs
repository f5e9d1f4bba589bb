//! # sales-profiles
//!
//! Sales analytics over interchangeable physical query profiles.
//!
//! ## Architecture
//!
//! One logical query (monthly revenue, filtered sales, top products) can run
//! against several physical layouts: plain tables, indexed duplicate
//! columns, or year partitions. Callers pick the layout by profile index and
//! always get the same normalized result shape back.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          QueryRequest (family, profile, params)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [catalog]
//! ┌─────────────────────────────────────────────────────────┐
//! │        SelectedProfile (1-based, per-family default)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder]
//! ┌─────────────────────────────────────────────────────────┐
//! │   ResolvedQuery (SQL + bind values, UNION ALL across     │
//! │                  partitions when the range spans them)   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [cache] ─── hit ───┐
//! ┌──────────────────────────────────┐          │
//! │  storage session ─▶ normalize    │          │
//! └──────────────────────────────────┘          │
//!                          │                    │
//!                          ▼                    ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Vec<Record> (named, typed)              │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod builder;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod date;
pub mod error;
pub mod normalize;
pub mod sql;
pub mod storage;

#[cfg(feature = "server")]
pub mod web;

pub use builder::{BuildContext, QueryParams, SalesFilter, TopProductsParams};
pub use cache::{CacheProvider, Fingerprint, MemoryCache};
pub use catalog::{ProfileIndex, QueryFamily};
pub use controller::{QueryController, QueryOutput, QueryRequest};
pub use error::{QueryError, QueryResult};
pub use normalize::{FieldValue, Record};
