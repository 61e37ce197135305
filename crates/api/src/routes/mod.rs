pub mod contact;
pub mod diagnostics;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /contact                                         submit (POST)
/// /test                                            store diagnostics (GET, token required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/contact", contact::router())
        .nest("/test", diagnostics::router())
}
