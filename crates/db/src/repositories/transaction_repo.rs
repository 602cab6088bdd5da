//! Repository for the `transactions` table.

use dormex_core::status::TransactionStatus;
use dormex_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::transaction::{NewTransaction, Transaction};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, transaction_type, status, match_id, match_ids, from_uid, \
                       to_uid, room_id, party_a_uid, party_b_uid, party_a_room_id, \
                       party_b_room_id, lease_start_date, lease_end_date, initiated_at, \
                       completed_at, failed_at, failure_reason, created_at, updated_at";

/// Provides CRUD operations for transactions.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Insert a new transaction in PENDING status, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &NewTransaction,
    ) -> Result<Transaction, sqlx::Error> {
        let query = format!(
            "INSERT INTO transactions (id, transaction_type, match_id, match_ids,
                                       from_uid, to_uid, room_id, party_a_uid,
                                       party_b_uid, party_a_room_id, party_b_room_id,
                                       lease_start_date, lease_end_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(input.id)
            .bind(input.transaction_type)
            .bind(input.match_id)
            .bind(&input.match_ids)
            .bind(&input.from_uid)
            .bind(&input.to_uid)
            .bind(input.room_id)
            .bind(&input.party_a_uid)
            .bind(&input.party_b_uid)
            .bind(input.party_a_room_id)
            .bind(input.party_b_room_id)
            .bind(input.lease_start_date)
            .bind(input.lease_end_date)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM transactions WHERE id = $1");
        sqlx::query_as::<_, Transaction>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Mark a transaction COMPLETED and stamp `completed_at`.
    pub async fn complete(exec: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE transactions SET status = $2, completed_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(TransactionStatus::Completed)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark a transaction CANCELLED.
    pub async fn cancel(exec: impl PgExecutor<'_>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE transactions SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(TransactionStatus::Cancelled)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel every other PENDING transaction touching a room. Stale-record
    /// cleanup at confirmation time. Returns the count of cancelled rows.
    pub async fn cancel_pending_for_room(
        exec: impl PgExecutor<'_>,
        room_id: DbId,
        exclude_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE transactions SET status = $3, updated_at = NOW()
             WHERE id <> $2
               AND status = $4
               AND (room_id = $1 OR party_a_room_id = $1 OR party_b_room_id = $1)",
        )
        .bind(room_id)
        .bind(exclude_id)
        .bind(TransactionStatus::Cancelled)
        .bind(TransactionStatus::Pending)
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// Transactions naming the user in any party role, optionally filtered
    /// by status.
    pub async fn list_for_user(
        exec: impl PgExecutor<'_>,
        uid: &str,
        status: Option<TransactionStatus>,
    ) -> Result<Vec<Transaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM transactions
             WHERE (from_uid = $1 OR to_uid = $1 OR party_a_uid = $1 OR party_b_uid = $1)
               AND ($2::transaction_status IS NULL OR status = $2)
             ORDER BY initiated_at DESC"
        );
        sqlx::query_as::<_, Transaction>(&query)
            .bind(uid)
            .bind(status)
            .fetch_all(exec)
            .await
    }
}
