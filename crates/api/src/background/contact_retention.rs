//! Periodic cleanup of old contact submissions.
//!
//! Only spawned when `CONTACT_RETENTION_DAYS` is configured. Deletes rows
//! from `contacts` older than the retention period on a fixed interval using
//! `tokio::time::interval`.

use std::time::Duration;

use chrono::{TimeDelta, Utc};
use folio_core::types::Timestamp;
use folio_db::repositories::ContactRepo;
use folio_db::DbPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Oldest `created_at` that survives a sweep at `now`.
///
/// `None` when the period does not fit in the calendar range.
pub fn retention_cutoff(now: Timestamp, retention_days: i64) -> Option<Timestamp> {
    TimeDelta::try_days(retention_days).and_then(|period| now.checked_sub_signed(period))
}

/// Run one sweep. Returns the number of rows removed.
pub async fn sweep(pool: &DbPool, retention_days: i64) -> Result<u64, sqlx::Error> {
    let Some(cutoff) = retention_cutoff(Utc::now(), retention_days) else {
        tracing::error!(retention_days, "Contact retention: period out of range, skipping sweep");
        return Ok(0);
    };
    ContactRepo::delete_older_than(pool, cutoff).await
}

/// Run the retention loop until `cancel` is triggered.
pub async fn run(pool: DbPool, retention_days: i64, cancel: CancellationToken) {
    tracing::info!(
        retention_days,
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Contact retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Contact retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep(&pool, retention_days).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "Contact retention: purged old rows");
                        } else {
                            tracing::debug!("Contact retention: no rows to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Contact retention: cleanup failed");
                    }
                }
            }
        }
    }
}
