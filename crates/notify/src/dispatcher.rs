//! Queued, best-effort notification delivery.
//!
//! [`NotificationDispatcher`] owns the sending half of a bounded
//! `tokio::sync::mpsc` channel. A single background worker drains the
//! channel and hands each item to the configured [`ContactNotifier`]. The
//! worker exits once every dispatcher clone has been dropped and the queue
//! is empty, so shutdown is "drop the handles, then await the task".

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::notifier::{deliver_logged, ContactNotification, ContactNotifier};

/// Default queue capacity. Submissions beyond this while the relay is slow
/// are dropped with a warning rather than delaying responses.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// NotificationDispatcher
// ---------------------------------------------------------------------------

/// Cheap-to-clone handle for enqueueing notifications.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<ContactNotification>,
}

impl NotificationDispatcher {
    /// Spawn the delivery worker and return a handle to its queue.
    pub fn spawn(
        notifier: Arc<dyn ContactNotifier>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let handle = tokio::spawn(Self::run(notifier, receiver));
        (Self { sender }, handle)
    }

    /// Enqueue a notification without waiting.
    ///
    /// A full or closed queue is logged and the notification is dropped.
    pub fn dispatch(&self, notification: ContactNotification) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                tracing::warn!(
                    contact_id = n.contact_id,
                    "Notification queue full, dropping contact notification"
                );
            }
            Err(TrySendError::Closed(n)) => {
                tracing::warn!(
                    contact_id = n.contact_id,
                    "Notification worker stopped, dropping contact notification"
                );
            }
        }
    }

    async fn run(
        notifier: Arc<dyn ContactNotifier>,
        mut receiver: mpsc::Receiver<ContactNotification>,
    ) {
        tracing::debug!("Notification worker started");
        while let Some(notification) = receiver.recv().await {
            deliver_logged(notifier.as_ref(), &notification).await;
        }
        tracing::info!("Notification queue closed, worker shutting down");
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// How request handlers reach the notifier.
#[derive(Clone)]
pub enum Notifications {
    /// No credentials configured; nothing is sent.
    Disabled,
    /// Delivery is awaited inside the request. Errors are still swallowed.
    Inline(Arc<dyn ContactNotifier>),
    /// Delivery is handed to the background worker.
    Queued(NotificationDispatcher),
}

impl Notifications {
    /// Notify the owner about a stored submission. Never fails.
    pub async fn submit(&self, notification: ContactNotification) {
        match self {
            Notifications::Disabled => {
                tracing::debug!(
                    contact_id = notification.contact_id,
                    "Email notification skipped, credentials not set"
                );
            }
            Notifications::Inline(notifier) => {
                deliver_logged(notifier.as_ref(), &notification).await;
            }
            Notifications::Queued(dispatcher) => dispatcher.dispatch(notification),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
