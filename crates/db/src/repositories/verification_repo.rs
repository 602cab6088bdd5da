//! Repository for the `email_verifications` table.

use dormex_core::types::Timestamp;
use sqlx::PgExecutor;

use crate::models::verification::EmailVerification;

const COLUMNS: &str = "uid, email, pin, verified, expires_at, created_at";

/// Provides PIN storage for email verification.
pub struct VerificationRepo;

impl VerificationRepo {
    /// Store a fresh PIN for a user, replacing any previous row.
    pub async fn upsert_pin(
        exec: impl PgExecutor<'_>,
        uid: &str,
        email: &str,
        pin: &str,
        expires_at: Timestamp,
    ) -> Result<EmailVerification, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_verifications (uid, email, pin, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (uid) DO UPDATE
             SET email = EXCLUDED.email,
                 pin = EXCLUDED.pin,
                 verified = FALSE,
                 expires_at = EXCLUDED.expires_at,
                 created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailVerification>(&query)
            .bind(uid)
            .bind(email)
            .bind(pin)
            .bind(expires_at)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_uid(
        exec: impl PgExecutor<'_>,
        uid: &str,
    ) -> Result<Option<EmailVerification>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_verifications WHERE uid = $1");
        sqlx::query_as::<_, EmailVerification>(&query)
            .bind(uid)
            .fetch_optional(exec)
            .await
    }

    /// Mark a user's email verified. Returns `true` if the row was updated.
    pub async fn mark_verified(exec: impl PgExecutor<'_>, uid: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE email_verifications SET verified = TRUE WHERE uid = $1")
            .bind(uid)
            .execute(exec)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
