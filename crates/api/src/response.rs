//! Response envelope types for API handlers.
//!
//! Every JSON body carries a boolean `success` and a human-readable
//! `message`; the portfolio front-end shows `message` in a toast and picks
//! the toast style from `success`.

use folio_db::models::contact::Contact;
use serde::Serialize;

/// Standard `{ "success": bool, "message": string }` envelope.
///
/// Error responses add a machine-readable `code`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }
}

/// Body of a successful `GET /api/test`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsReport {
    pub success: bool,
    pub message: &'static str,
    /// The synthetic record written by this call.
    pub test_document: Contact,
    /// Up to five most recent records, newest first.
    pub recent_contacts: Vec<Contact>,
}

/// Body of a failed `GET /api/test`. Unlike other errors it exposes the
/// underlying error text, since the endpoint exists to debug the store.
#[derive(Debug, Serialize)]
pub struct DiagnosticsFailure {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
}
