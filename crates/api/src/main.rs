use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_api::background::contact_retention;
use folio_api::config::{NotificationMode, ServerConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_notify::dispatcher::DEFAULT_QUEUE_CAPACITY;
use folio_notify::{EmailConfig, EmailDelivery, NotificationDispatcher, Notifications};

const DEFAULT_LOG_FILTER: &str = "folio_api=debug,folio_notify=debug,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = folio_db::create_pool(&database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    folio_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    folio_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Notifications ---
    let (notifications, notify_handle) = build_notifications(config.notification_mode)?;

    // --- Retention ---
    let retention_cancel = CancellationToken::new();
    let retention_handle = config.contact_retention_days.map(|days| {
        tokio::spawn(contact_retention::run(
            pool.clone(),
            days,
            retention_cancel.clone(),
        ))
    });
    if retention_handle.is_none() {
        tracing::info!("Contact retention disabled, submissions are kept indefinitely");
    }

    if config.diagnostics_token.is_none() {
        tracing::info!("DIAGNOSTICS_TOKEN not set, /api/test is disabled");
    }

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        notifications,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let drain_timeout = Duration::from_secs(config.shutdown_timeout_secs);

    retention_cancel.cancel();
    if let Some(handle) = retention_handle {
        match tokio::time::timeout(drain_timeout, handle).await {
            Ok(Ok(())) => tracing::info!("Contact retention job stopped"),
            Ok(Err(e)) => tracing::error!(error = %e, "Contact retention job failed"),
            Err(_) => tracing::warn!("Contact retention job did not stop before shutdown timeout"),
        }
    }

    // The router (and with it every dispatcher clone) is gone, so the
    // worker finishes once the queue is drained.
    if let Some(handle) = notify_handle {
        if tokio::time::timeout(drain_timeout, handle).await.is_err() {
            tracing::warn!("Notification queue not drained before shutdown timeout");
        } else {
            tracing::info!("Notification worker stopped");
        }
    }

    pool.close().await;
    tracing::info!("Database pool closed");

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// Filter comes from `RUST_LOG` when set. `LOG_FORMAT=json` switches to
/// structured JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Build the notification handle from `EMAIL_*` settings.
///
/// Missing credentials disable notifications without failing startup.
fn build_notifications(
    mode: NotificationMode,
) -> anyhow::Result<(Notifications, Option<JoinHandle<()>>)> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::info!("Email notification disabled, EMAIL_USER/EMAIL_PASS not set");
        return Ok((Notifications::Disabled, None));
    };

    tracing::info!(
        smtp_host = %email_config.smtp_host,
        to = %email_config.to_address,
        ?mode,
        "Email notification enabled"
    );
    let delivery = Arc::new(EmailDelivery::new(email_config).context("Invalid SMTP settings")?);

    Ok(match mode {
        NotificationMode::Inline => (Notifications::Inline(delivery), None),
        NotificationMode::Background => {
            let (dispatcher, handle) =
                NotificationDispatcher::spawn(delivery, DEFAULT_QUEUE_CAPACITY);
            (Notifications::Queued(dispatcher), Some(handle))
        }
    })
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
