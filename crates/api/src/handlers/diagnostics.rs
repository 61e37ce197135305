//! Store smoke test: write a synthetic contact, then read back the newest
//! rows. Guarded by [`DiagnosticsAccess`] because every call mutates the
//! store and exposes recent submissions.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use folio_core::contact::NewContact;
use folio_db::models::contact::Contact;
use folio_db::repositories::ContactRepo;
use folio_db::DbPool;

use crate::middleware::diagnostics::DiagnosticsAccess;
use crate::response::{DiagnosticsFailure, DiagnosticsReport};
use crate::state::AppState;

/// How many recent contacts the report includes.
pub const RECENT_CONTACTS_LIMIT: i64 = 5;

// ---------------------------------------------------------------------------
// GET /api/test
// ---------------------------------------------------------------------------

pub async fn run_diagnostics(
    _access: DiagnosticsAccess,
    State(state): State<AppState>,
) -> Response {
    match probe(&state.pool).await {
        Ok((test_document, recent_contacts)) => {
            tracing::info!(
                contact_id = test_document.id,
                recent = recent_contacts.len(),
                "Database diagnostics passed"
            );
            (
                StatusCode::OK,
                Json(DiagnosticsReport {
                    success: true,
                    message: "Database connection is working!",
                    test_document,
                    recent_contacts,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Database diagnostics failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DiagnosticsFailure {
                    success: false,
                    message: "Database connection test failed",
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn probe(pool: &DbPool) -> Result<(Contact, Vec<Contact>), sqlx::Error> {
    let written = ContactRepo::create(pool, &NewContact::diagnostic_probe()).await?;
    let recent = ContactRepo::list_recent(pool, RECENT_CONTACTS_LIMIT).await?;
    Ok((written, recent))
}
