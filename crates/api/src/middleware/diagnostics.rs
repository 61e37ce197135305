//! Access guard for the diagnostics endpoint.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use folio_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the diagnostics token.
pub const DIAGNOSTICS_TOKEN_HEADER: &str = "x-diagnostics-token";

/// Proof that the caller may use the diagnostics endpoint.
///
/// Rejects with 404 when no `DIAGNOSTICS_TOKEN` is configured, so the
/// endpoint is invisible by default, and with 401 when the header is
/// missing or does not match.
///
/// ```ignore
/// async fn probe(_access: DiagnosticsAccess, State(state): State<AppState>) -> Response {
///     // caller presented the configured token
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticsAccess;

impl FromRequestParts<AppState> for DiagnosticsAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .diagnostics_token
            .as_deref()
            .ok_or_else(|| AppError::Core(CoreError::NotFound("Not found".into())))?;

        let presented = parts
            .headers
            .get(DIAGNOSTICS_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing X-Diagnostics-Token header".into(),
                ))
            })?;

        if !tokens_match(presented, expected) {
            tracing::warn!("Diagnostics request with invalid token");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid diagnostics token".into(),
            )));
        }

        Ok(DiagnosticsAccess)
    }
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
