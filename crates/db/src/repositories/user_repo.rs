//! Repository for the `users` table.

use dormex_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{CreateProfile, UpdateProfile, UserProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "uid, email, full_name, student_id, phone, role, \
                       current_room_id, created_at, updated_at";

/// Provides CRUD operations for user profiles.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new profile, returning the created row. A duplicate uid
    /// surfaces as a unique violation.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        uid: &str,
        email: &str,
        input: &CreateProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (uid, email, full_name, student_id, phone)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(uid)
            .bind(email)
            .bind(&input.full_name)
            .bind(&input.student_id)
            .bind(&input.phone)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_uid(
        exec: impl PgExecutor<'_>,
        uid: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE uid = $1");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(uid)
            .fetch_optional(exec)
            .await
    }

    /// Patch a profile's editable fields. Returns `None` if the row does
    /// not exist.
    pub async fn update(
        exec: impl PgExecutor<'_>,
        uid: &str,
        patch: &UpdateProfile,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                 full_name = COALESCE($2, full_name),
                 student_id = COALESCE($3, student_id),
                 phone = COALESCE($4, phone),
                 updated_at = NOW()
             WHERE uid = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(uid)
            .bind(&patch.full_name)
            .bind(&patch.student_id)
            .bind(&patch.phone)
            .fetch_optional(exec)
            .await
    }

    /// Point (or clear) a user's current room. Only the transaction service
    /// calls this.
    pub async fn set_current_room(
        exec: impl PgExecutor<'_>,
        uid: &str,
        room_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET current_room_id = $2, updated_at = NOW() WHERE uid = $1")
                .bind(uid)
                .bind(room_id)
                .execute(exec)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
