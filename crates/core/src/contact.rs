//! Contact submission rules.
//!
//! Turns the raw, possibly incomplete fields of a contact form into a
//! [`NewContact`] that is safe to persist. Every stored submission passes
//! through [`validate_submission`].

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Returned to the client whenever a required field is missing or blank.
pub const MISSING_FIELDS_MESSAGE: &str = "Please provide name, email and message";

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Maximum length of the submitter's name (characters, after trimming).
pub const MAX_NAME_LENGTH: usize = 200;
/// Maximum length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 320;
/// Maximum length of the free-text message (characters, after trimming).
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

// ---------------------------------------------------------------------------
// Diagnostic probe
// ---------------------------------------------------------------------------

/// Name of the synthetic record written by the diagnostics endpoint.
pub const PROBE_NAME: &str = "Test User";
/// Email of the synthetic record written by the diagnostics endpoint.
pub const PROBE_EMAIL: &str = "test@example.com";
/// Message of the synthetic record written by the diagnostics endpoint.
pub const PROBE_MESSAGE: &str = "This is a test message to verify database connection";

// ---------------------------------------------------------------------------
// NewContact
// ---------------------------------------------------------------------------

/// A validated, normalized contact submission ready for insertion.
///
/// `name` is trimmed, `email` is trimmed and lowercased, `message` is kept
/// exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl NewContact {
    /// The fixed record the diagnostics endpoint writes on every call.
    pub fn diagnostic_probe() -> Self {
        Self {
            name: PROBE_NAME.to_string(),
            email: PROBE_EMAIL.to_string(),
            message: PROBE_MESSAGE.to_string(),
        }
    }
}

/// Validate and normalize the three contact-form fields.
///
/// A field that is absent, or blank after trimming, yields
/// [`CoreError::Validation`] carrying [`MISSING_FIELDS_MESSAGE`]. Fields over
/// their length limit are rejected with a field-specific message.
pub fn validate_submission(
    name: Option<&str>,
    email: Option<&str>,
    message: Option<&str>,
) -> Result<NewContact, CoreError> {
    let name = name.map(str::trim).unwrap_or_default();
    let email = email.map(str::trim).unwrap_or_default();
    let message = message.unwrap_or_default();

    if name.is_empty() || email.is_empty() || message.trim().is_empty() {
        return Err(CoreError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }

    validate_length("Name", name, MAX_NAME_LENGTH)?;
    validate_length("Email", email, MAX_EMAIL_LENGTH)?;
    validate_length("Message", message.trim(), MAX_MESSAGE_LENGTH)?;

    Ok(NewContact {
        name: name.to_string(),
        email: normalize_email(email),
        message: message.to_string(),
    })
}

/// Trim and lowercase an email address.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn validate_length(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    let len = value.chars().count();
    if len > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {max} characters (got {len})"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
