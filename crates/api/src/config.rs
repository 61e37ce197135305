use std::fmt::Display;
use std::str::FromStr;

use axum::http::HeaderValue;

/// Upper bound for `CONTACT_RETENTION_DAYS` (roughly a century).
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Default CORS origins: the portfolio front-end in local development.
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Startup configuration error. Raised once, before the server binds.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How contact notifications are delivered relative to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationMode {
    /// Enqueue and respond immediately; a worker sends in the background.
    Background,
    /// Await the send before responding. Failures are still swallowed.
    Inline,
}

impl FromStr for NotificationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "background" => Ok(Self::Background),
            "inline" => Ok(Self::Inline),
            other => Err(format!("expected 'background' or 'inline', got '{other}'")),
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<HeaderValue>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Budget for draining background tasks on shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Maximum pooled database connections (default: `10`).
    pub db_max_connections: u32,
    /// Shared secret enabling `GET /api/test`. `None` hides the endpoint.
    pub diagnostics_token: Option<String>,
    /// Delete contacts older than this many days. `None` keeps them forever.
    pub contact_retention_days: Option<i64>,
    /// Delivery mode for owner notifications (default: background).
    pub notification_mode: NotificationMode,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                                          |
    /// |----------------------------|--------------------------------------------------|
    /// | `HOST`                     | `0.0.0.0`                                        |
    /// | `PORT`                     | `5000`                                           |
    /// | `CORS_ORIGINS`             | `http://localhost:3000,http://127.0.0.1:3000`    |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                                             |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `10`                                             |
    /// | `DATABASE_MAX_CONNECTIONS` | `10`                                             |
    /// | `DIAGNOSTICS_TOKEN`        | unset                                            |
    /// | `CONTACT_RETENTION_DAYS`   | unset                                            |
    /// | `NOTIFICATION_MODE`        | `background`                                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                if origin == "*" {
                    return Err(ConfigError::Invalid {
                        var: "CORS_ORIGINS",
                        value: origin.to_string(),
                        reason: "wildcard origin cannot be combined with credentials".into(),
                    });
                }
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    var: "CORS_ORIGINS",
                    value: origin.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let contact_retention_days = parse_optional::<i64>(&var, "CONTACT_RETENTION_DAYS")?;
        if let Some(days) = contact_retention_days {
            if !(1..=MAX_RETENTION_DAYS).contains(&days) {
                return Err(ConfigError::Invalid {
                    var: "CONTACT_RETENTION_DAYS",
                    value: days.to_string(),
                    reason: format!("must be between 1 and {MAX_RETENTION_DAYS} days"),
                });
            }
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "PORT", 5000)?,
            cors_origins,
            request_timeout_secs: parse_or(&var, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&var, "SHUTDOWN_TIMEOUT_SECS", 10)?,
            db_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            diagnostics_token: var("DIAGNOSTICS_TOKEN"),
            contact_retention_days,
            notification_mode: parse_or(&var, "NOTIFICATION_MODE", NotificationMode::Background)?,
        })
    }
}

fn parse_optional<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var: key,
                value: raw.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    Ok(parse_optional(var, key)?.unwrap_or(default))
}
