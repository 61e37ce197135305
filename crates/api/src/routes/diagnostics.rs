//! Route definitions for the store diagnostics endpoint.
//!
//! Mounted at `/test` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::diagnostics;
use crate::state::AppState;

/// Diagnostics routes.
///
/// ```text
/// GET    /                  -> run_diagnostics (X-Diagnostics-Token required)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(diagnostics::run_diagnostics))
}
