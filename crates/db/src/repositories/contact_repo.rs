//! Repository for the `contacts` table.

use chrono::Utc;
use folio_core::contact::NewContact;
use folio_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::contact::Contact;

/// Column list for `contacts` queries.
const COLUMNS: &str = "id, name, email, message, created_at";

/// Insert, read-back and retention operations for contact submissions.
pub struct ContactRepo;

impl ContactRepo {
    /// Insert a validated submission, returning the full row.
    ///
    /// `created_at` is stamped with the server clock at insertion time.
    pub async fn create(pool: &PgPool, input: &NewContact) -> Result<Contact, sqlx::Error> {
        let query = format!(
            "INSERT INTO contacts (name, email, message, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.message)
            .bind(Utc::now())
            .fetch_one(pool)
            .await
    }

    /// List the most recently created submissions, newest first.
    ///
    /// Rows with identical timestamps are ordered by descending id so the
    /// latest insert always comes first.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<Contact>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contacts \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, Contact>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete submissions created before `cutoff`. Returns the number of rows removed.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contacts WHERE created_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        tracing::debug!(%cutoff, deleted = result.rows_affected(), "Deleted expired contacts");
        Ok(result.rows_affected())
    }
}
