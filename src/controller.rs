//! Query controller.
//!
//! One call runs one logical query end to end:
//!
//! ```text
//! QueryRequest ──prepare──▶ PreparedQuery ──execute──▶ QueryOutput
//!   (profile selected,        (cache checked, storage read,
//!    params validated,         rows normalized, cache filled)
//!    statement resolved)
//! ```
//!
//! Everything in `prepare` happens before any I/O, so a bad request never
//! opens a storage session.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::builder::{self, BuildContext, QueryParams, ResolvedQuery, SalesFilter, TopProductsParams};
use crate::cache::{CacheProvider, CachedRows, Fingerprint, MemoryCache};
use crate::catalog::{ProfileIndex, QueryFamily, SelectedProfile};
use crate::config::{Settings, SettingsError};
use crate::error::{QueryError, QueryResult};
use crate::normalize::{normalize_rows, Record};
use crate::storage::{self, Connector, SqliteConnector};

/// A request for one logical query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub params: QueryParams,
    /// `None` selects the family's default profile.
    pub profile: Option<ProfileIndex>,
    /// Read and fill the response cache.
    pub cache: bool,
}

impl QueryRequest {
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            profile: None,
            cache: false,
        }
    }

    pub fn with_profile(mut self, profile: ProfileIndex) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled;
        self
    }

    pub fn family(&self) -> QueryFamily {
        self.params.family()
    }

    /// Build a request from string pairs such as a parsed query string.
    ///
    /// `profile` and `cache` are handled here; every other key must be a
    /// parameter of `family`. Empty values count as absent.
    pub fn from_pairs<'a, I>(family: QueryFamily, pairs: I) -> QueryResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut profile = None;
        let mut cache = false;
        let mut rest = Vec::new();
        for (name, value) in pairs {
            match name {
                "profile" if !value.is_empty() => profile = Some(ProfileIndex::parse(value)?),
                "cache" if !value.is_empty() => cache = parse_flag(name, value)?,
                "profile" | "cache" => {}
                _ => rest.push((name, value)),
            }
        }
        Ok(Self {
            params: QueryParams::from_pairs(family, rest)?,
            profile,
            cache,
        })
    }
}

fn parse_flag(name: &str, value: &str) -> QueryResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(QueryError::invalid_parameter(
            name,
            value,
            "expected one of 1/true/on or 0/false/off",
        )),
    }
}

/// A validated request, ready to execute.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    pub selected: SelectedProfile,
    pub resolved: ResolvedQuery,
    pub fingerprint: Fingerprint,
    pub use_cache: bool,
}

/// Normalized rows plus how they were produced.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub family: QueryFamily,
    pub profile: ProfileIndex,
    pub rows: CachedRows,
    /// Rows were served from the cache without touching storage.
    pub from_cache: bool,
}

impl QueryOutput {
    pub fn records(&self) -> &[Record] {
        &self.rows
    }
}

/// Runs logical queries against a store, with an optional shared cache.
#[derive(Clone)]
pub struct QueryController {
    connector: Arc<dyn Connector>,
    cache: Arc<dyn CacheProvider>,
    ctx: BuildContext,
}

impl QueryController {
    pub fn new(
        connector: Arc<dyn Connector>,
        cache: Arc<dyn CacheProvider>,
        ctx: BuildContext,
    ) -> Self {
        Self {
            connector,
            cache,
            ctx,
        }
    }

    /// SQLite store and in-memory cache as configured.
    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        let path = settings.database.resolved_path()?;
        Ok(Self::new(
            Arc::new(SqliteConnector::new(path)),
            Arc::new(MemoryCache::with_limits(
                settings.cache.timeout(),
                settings.cache.max_entries,
            )),
            BuildContext::new(settings.current_year()),
        ))
    }

    pub fn context(&self) -> BuildContext {
        self.ctx
    }

    /// Select the profile and resolve the statement. Performs no I/O.
    pub fn prepare(&self, request: &QueryRequest) -> QueryResult<PreparedQuery> {
        let selected = request.family().select(request.profile)?;
        let resolved = builder::resolve(&selected, &request.params, &self.ctx);
        let fingerprint = Fingerprint::of(&resolved.statement);
        debug!(
            family = %selected.family,
            profile = %selected.index,
            profile_name = selected.profile.name,
            fingerprint = %fingerprint,
            "prepared query"
        );
        Ok(PreparedQuery {
            selected,
            resolved,
            fingerprint,
            use_cache: request.cache,
        })
    }

    /// Serve from cache, or read storage and normalize.
    pub fn execute(&self, prepared: PreparedQuery) -> QueryResult<QueryOutput> {
        let family = prepared.selected.family;
        let profile = prepared.selected.index;

        if prepared.use_cache {
            if let Some(rows) = self.cache.get(&prepared.fingerprint) {
                info!(%family, %profile, rows = rows.len(), from_cache = true, "query served");
                return Ok(QueryOutput {
                    family,
                    profile,
                    rows,
                    from_cache: true,
                });
            }
        }

        let raw = storage::fetch_all(self.connector.as_ref(), &prepared.resolved.statement)
            .inspect_err(|e| warn!(%family, %profile, error = %e, "query failed"))?;
        let rows = Arc::new(normalize_rows(family, raw)?);

        if prepared.use_cache {
            self.cache.set(prepared.fingerprint, Arc::clone(&rows));
        }
        info!(%family, %profile, rows = rows.len(), from_cache = false, "query served");
        Ok(QueryOutput {
            family,
            profile,
            rows,
            from_cache: false,
        })
    }

    /// Prepare and execute `request`.
    pub fn run(&self, request: &QueryRequest) -> QueryResult<QueryOutput> {
        let prepared = self.prepare(request)?;
        self.execute(prepared)
    }

    pub fn monthly_revenue(
        &self,
        profile: Option<ProfileIndex>,
        cache: bool,
    ) -> QueryResult<QueryOutput> {
        self.run(&QueryRequest {
            params: QueryParams::MonthlyRevenue,
            profile,
            cache,
        })
    }

    pub fn filtered_sales(
        &self,
        filter: SalesFilter,
        profile: Option<ProfileIndex>,
        cache: bool,
    ) -> QueryResult<QueryOutput> {
        self.run(&QueryRequest {
            params: QueryParams::FilteredSales(filter),
            profile,
            cache,
        })
    }

    pub fn top_products(
        &self,
        params: TopProductsParams,
        profile: Option<ProfileIndex>,
        cache: bool,
    ) -> QueryResult<QueryOutput> {
        self.run(&QueryRequest {
            params: QueryParams::TopProducts(params),
            profile,
            cache,
        })
    }
}
