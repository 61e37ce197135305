//! The notification seam.

use async_trait::async_trait;
use folio_core::types::{DbId, Timestamp};

use crate::email::EmailError;

/// Error returned by a [`ContactNotifier`].
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The SMTP delivery failed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// The notifier could not be reached or refused the notification.
    #[error("Notifier unavailable: {0}")]
    Unavailable(String),
}

/// Everything the site owner is told about a new submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactNotification {
    /// Id of the stored `contacts` row.
    pub contact_id: DbId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: Timestamp,
}

/// Delivers a [`ContactNotification`] somewhere outside the process.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, notification: &ContactNotification) -> Result<(), NotifyError>;
}

/// Run `notifier` and log the outcome. Never fails.
pub(crate) async fn deliver_logged(notifier: &dyn ContactNotifier, notification: &ContactNotification) {
    match notifier.notify(notification).await {
        Ok(()) => {
            tracing::info!(
                contact_id = notification.contact_id,
                "Contact notification sent"
            );
        }
        Err(e) => {
            tracing::error!(
                error = %e,
                contact_id = notification.contact_id,
                "Failed to send contact notification"
            );
        }
    }
}
