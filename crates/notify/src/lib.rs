//! Owner notifications for new contact submissions.
//!
//! - [`ContactNotifier`]: the delivery seam; anything that can tell the site
//!   owner about a submission.
//! - [`EmailDelivery`]: SMTP implementation backed by `lettre`.
//! - [`NotificationDispatcher`]: bounded queue plus background worker that
//!   moves delivery off the request path.
//! - [`Notifications`]: the handle request handlers hold; hides whether
//!   delivery is disabled, inline or queued.
//!
//! Delivery is best-effort everywhere: failures are logged and never
//! propagated to the caller that submitted the contact.

pub mod dispatcher;
pub mod email;
pub mod notifier;

pub use dispatcher::{NotificationDispatcher, Notifications};
pub use email::{EmailConfig, EmailDelivery, EmailError};
pub use notifier::{ContactNotification, ContactNotifier, NotifyError};
