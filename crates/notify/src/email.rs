//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send the site
//! owner a notification for every new contact submission. Configuration is
//! loaded from environment variables; if `EMAIL_USER` or `EMAIL_PASS` is not
//! set, [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::notifier::{ContactNotification, ContactNotifier, NotifyError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP relay.
const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// SMTP username.
    pub smtp_user: String,
    /// SMTP password.
    pub smtp_password: String,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Where notifications are sent.
    pub to_address: String,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if either credential is missing, signalling that email
    /// notification is disabled.
    ///
    /// | Variable     | Required | Default          |
    /// |--------------|----------|------------------|
    /// | `EMAIL_USER` | yes      |                  |
    /// | `EMAIL_PASS` | yes      |                  |
    /// | `SMTP_HOST`  | no       | `smtp.gmail.com` |
    /// | `SMTP_PORT`  | no       | `587`            |
    /// | `EMAIL_FROM` | no       | `EMAIL_USER`     |
    /// | `EMAIL_TO`   | no       | `EMAIL_USER`     |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let smtp_user = var("EMAIL_USER")?;
        let smtp_password = var("EMAIL_PASS")?;

        Some(Self {
            smtp_host: var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: var("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: var("EMAIL_FROM").unwrap_or_else(|| smtp_user.clone()),
            to_address: var("EMAIL_TO").unwrap_or_else(|| smtp_user.clone()),
            smtp_user,
            smtp_password,
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends contact notifications to the site owner via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Create the delivery service and its STARTTLS transport.
    ///
    /// No connection is opened until the first send.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        Ok(Self { config, mailer })
    }

    /// Assemble the notification email without sending it.
    pub fn build_message(&self, notification: &ContactNotification) -> Result<Message, EmailError> {
        let from: Mailbox = self.config.from_address.parse()?;
        let to: Mailbox = self.config.to_address.parse()?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(format!(
                "New Contact Form Submission from {}",
                notification.name
            ));

        // Replying should reach the submitter, but a malformed address must
        // not stop the owner from being notified.
        if let Ok(reply_to) = notification.email.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(
                plain_body(notification),
                html_body(notification),
            ))
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl ContactNotifier for EmailDelivery {
    async fn notify(&self, notification: &ContactNotification) -> Result<(), NotifyError> {
        let email = self.build_message(notification)?;
        self.mailer.send(email).await.map_err(EmailError::from)?;

        tracing::debug!(
            to = %self.config.to_address,
            contact_id = notification.contact_id,
            "Notification email accepted by relay"
        );
        Ok(())
    }
}

fn plain_body(n: &ContactNotification) -> String {
    format!(
        "New Contact Form Submission\n\nName: {}\nEmail: {}\nReceived: {}\n\nMessage:\n{}\n",
        n.name,
        n.email,
        n.submitted_at.to_rfc3339(),
        n.message
    )
}

fn html_body(n: &ContactNotification) -> String {
    format!(
        "<h3>New Contact Form Submission</h3>\n\
         <p><strong>Name:</strong> {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Message:</strong> {}</p>\n",
        escape_html(&n.name),
        escape_html(&n.email),
        escape_html(&n.message).replace('\n', "<br>")
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn test_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 2525,
            smtp_user: "owner@example.com".to_string(),
            smtp_password: "secret".to_string(),
            from_address: "owner@example.com".to_string(),
            to_address: "owner@example.com".to_string(),
        }
    }

    fn notification(name: &str, email: &str, message: &str) -> ContactNotification {
        ContactNotification {
            contact_id: 1,
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[test]
    fn from_lookup_returns_none_without_credentials() {
        assert!(EmailConfig::from_lookup(lookup(&[])).is_none());
        assert!(EmailConfig::from_lookup(lookup(&[("EMAIL_USER", "me@example.com")])).is_none());
        assert!(EmailConfig::from_lookup(lookup(&[("EMAIL_PASS", "pw")])).is_none());
    }

    #[test]
    fn from_lookup_treats_blank_credentials_as_missing() {
        let config = EmailConfig::from_lookup(lookup(&[("EMAIL_USER", "  "), ("EMAIL_PASS", "pw")]));
        assert!(config.is_none());
    }

    #[test]
    fn from_lookup_defaults_sender_and_recipient_to_user() {
        let config = EmailConfig::from_lookup(lookup(&[
            ("EMAIL_USER", "me@example.com"),
            ("EMAIL_PASS", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(config.smtp_port, DEFAULT_SMTP_PORT);
        assert_eq!(config.from_address, "me@example.com");
        assert_eq!(config.to_address, "me@example.com");
    }

    #[test]
    fn from_lookup_honours_overrides() {
        let config = EmailConfig::from_lookup(lookup(&[
            ("EMAIL_USER", "me@example.com"),
            ("EMAIL_PASS", "pw"),
            ("SMTP_HOST", "mail.example.com"),
            ("SMTP_PORT", "2525"),
            ("EMAIL_TO", "inbox@example.com"),
        ]))
        .unwrap();

        assert_eq!(config.smtp_host, "mail.example.com");
        assert_eq!(config.smtp_port, 2525);
        assert_eq!(config.to_address, "inbox@example.com");
    }

    #[test]
    fn message_contains_subject_and_escaped_fields() {
        let delivery = EmailDelivery::new(test_config()).unwrap();
        let message = delivery
            .build_message(&notification("Ada", "ada@x.com", "<script>hi</script>"))
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: New Contact Form Submission from Ada"));
        assert!(raw.contains("Reply-To: ada@x.com"));
        assert!(raw.contains("&lt;script&gt;"));
    }

    #[test]
    fn malformed_submitter_address_still_builds() {
        let delivery = EmailDelivery::new(test_config()).unwrap();
        let message = delivery.build_message(&notification("Ada", "not-an-email", "hi"));
        assert!(message.is_ok());
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let mut config = test_config();
        config.to_address = "not-an-email".to_string();
        let delivery = EmailDelivery::new(config).unwrap();

        let err = delivery
            .build_message(&notification("Ada", "ada@x.com", "hi"))
            .unwrap_err();
        assert!(err.to_string().contains("Email address parse error"));
    }

    #[test]
    fn escape_html_replaces_special_characters() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
