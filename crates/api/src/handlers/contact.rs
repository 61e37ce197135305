//! Handler for contact-form submissions.
//!
//! Validation failures return 400 with no side effects. Once the row is
//! stored the request succeeds; the owner notification is best-effort and
//! its outcome never reaches the caller.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use folio_core::contact;
use folio_db::models::contact::{Contact, CreateContact};
use folio_db::repositories::ContactRepo;
use folio_notify::ContactNotification;

use crate::error::AppResult;
use crate::response::StatusResponse;
use crate::state::AppState;

/// Shown in the success toast.
pub const SUCCESS_MESSAGE: &str = "Your message was sent successfully!";

// ---------------------------------------------------------------------------
// POST /api/contact
// ---------------------------------------------------------------------------

/// Store a contact submission and notify the site owner.
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<CreateContact>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;

    let submission = contact::validate_submission(
        input.name.as_deref(),
        input.email.as_deref(),
        input.message.as_deref(),
    )?;

    let stored = ContactRepo::create(&state.pool, &submission).await?;

    tracing::info!(contact_id = stored.id, "Contact submission stored");

    state.notifications.submit(notification_for(&stored)).await;

    Ok((StatusCode::CREATED, Json(StatusResponse::ok(SUCCESS_MESSAGE))))
}

fn notification_for(contact: &Contact) -> ContactNotification {
    ContactNotification {
        contact_id: contact.id,
        name: contact.name.clone(),
        email: contact.email.clone(),
        message: contact.message.clone(),
        submitted_at: contact.created_at,
    }
}
