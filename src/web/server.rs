//! Axum web server for the sales endpoints.
//!
//! Each endpoint maps its query string onto a [`QueryRequest`] and runs it
//! on the blocking pool, since storage reads are synchronous.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::catalog::{self, ProfileInfo, QueryFamily};
use crate::config::{Settings, SettingsError};
use crate::controller::{QueryController, QueryRequest};
use crate::error::QueryError;

/// Header carrying the shared secret.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: QueryController,
    /// Required value of [`API_KEY_HEADER`]; `None` disables authentication.
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(controller: QueryController, api_key: Option<String>) -> Self {
        Self {
            controller,
            api_key: api_key.map(Arc::from),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SettingsError> {
        Ok(Self::new(
            QueryController::from_settings(settings)?,
            settings.server.resolved_api_key()?,
        ))
    }
}

/// Build the axum router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/sales/", get(filtered_sales))
        .route("/sales/monthly-revenue/", get(monthly_revenue))
        .route("/sales/top-products/", get(top_products))
        .route("/profiles", get(list_profiles))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(state: AppState, bind: &str) -> Result<(), Box<dyn std::error::Error>> {
    if state.api_key.is_none() {
        warn!("no server.api_key configured, requests are not authenticated");
    }
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "sales-profiles listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}

// ============================================================================
// Errors and authentication
// ============================================================================

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// An error rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unauthorized(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.to_string(),
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());
    match provided {
        None => return Err(ApiError::unauthorized("Authentication required")),
        Some(key) if key != expected => return Err(ApiError::unauthorized("Invalid secret key")),
        Some(_) => {}
    }

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

type QueryPairs = Query<Vec<(String, String)>>;

/// GET /sales/ - Filtered sales
async fn filtered_sales(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    run_family(state, QueryFamily::FilteredSales, pairs).await
}

/// GET /sales/monthly-revenue/ - Revenue per month
async fn monthly_revenue(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    run_family(state, QueryFamily::MonthlyRevenue, pairs).await
}

/// GET /sales/top-products/ - Products ranked by revenue
async fn top_products(State(state): State<AppState>, Query(pairs): QueryPairs) -> Response {
    run_family(state, QueryFamily::TopProducts, pairs).await
}

/// GET /profiles - The profile catalog
async fn list_profiles() -> Json<Vec<ProfileInfo>> {
    Json(catalog::listing())
}

async fn run_family(state: AppState, family: QueryFamily, pairs: Vec<(String, String)>) -> Response {
    let controller = state.controller;
    let result = tokio::task::spawn_blocking(move || {
        let request = QueryRequest::from_pairs(
            family,
            pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;
        controller.run(&request)
    })
    .await;

    match result {
        Ok(Ok(output)) => Json(output.records()).into_response(),
        Ok(Err(e)) => ApiError::from(e).into_response(),
        Err(e) => ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
        .into_response(),
    }
}
