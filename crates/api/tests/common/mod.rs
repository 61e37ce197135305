#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use folio_api::config::{NotificationMode, ServerConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_notify::{ContactNotification, ContactNotifier, Notifications, NotifyError};

/// Diagnostics token configured by [`test_config`].
pub const TEST_DIAGNOSTICS_TOKEN: &str = "test-diagnostics-token";

/// Origin allowed by [`test_config`].
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults and diagnostics enabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static(TEST_ORIGIN)],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        db_max_connections: 5,
        diagnostics_token: Some(TEST_DIAGNOSTICS_TOKEN.to_string()),
        contact_retention_days: None,
        notification_mode: NotificationMode::Inline,
    }
}

/// Full application router with notifications disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, Notifications::Disabled)
}

/// Full application router with the given notification handle.
pub fn build_test_app_with(pool: PgPool, notifications: Notifications) -> Router {
    build_test_app_with_config(pool, test_config(), notifications)
}

/// Full application router with an explicit config.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack (CORS, request ID, timeout, tracing, panic recovery) as production.
pub fn build_test_app_with_config(
    pool: PgPool,
    config: ServerConfig,
    notifications: Notifications,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        notifications,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_with_header(app: Router, uri: &str, name: &str, value: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(name, value)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    post_raw(app, uri, "application/json", &body.to_string()).await
}

pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Database helpers
// ---------------------------------------------------------------------------

pub async fn count_contacts(pool: &PgPool) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

// ---------------------------------------------------------------------------
// RecordingNotifier
// ---------------------------------------------------------------------------

/// Notifier that records every call and can simulate a relay failure.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<ContactNotification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<ContactNotification> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, notification: &ContactNotification) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(NotifyError::Unavailable("simulated relay failure".into()));
        }
        Ok(())
    }
}
