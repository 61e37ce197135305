//! Contact submission entity model and DTOs.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `contacts` table.
///
/// Serialized with a camelCase `createdAt` to match the client contract.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: Timestamp,
}

/// Raw contact-form body as sent by the browser.
///
/// Every field is optional so that a missing field reaches validation
/// instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateContact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}
