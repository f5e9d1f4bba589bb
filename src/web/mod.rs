//! HTTP surface over the query controller.
//!
//! Only built with the `server` feature.

mod server;

pub use server::{router, serve, ApiError, AppState, API_KEY_HEADER};
