//! Repository for the `matches` table.

use dormex_core::status::MatchStatus;
use dormex_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::matches::{Match, NewMatch};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, match_type, status, listing_id, claimant_uid, \
                       claimant_listing_id, offered_room_id, offered_room_category, \
                       offered_room_building, paired_match_id, message, proposed_at, \
                       responded_at, expires_at, version, created_at, updated_at";

/// Provides CRUD operations for matches.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert a new match in PROPOSED status, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &NewMatch,
    ) -> Result<Match, sqlx::Error> {
        let query = format!(
            "INSERT INTO matches (id, match_type, listing_id, claimant_uid,
                                  claimant_listing_id, offered_room_id,
                                  offered_room_category, offered_room_building,
                                  paired_match_id, message, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(input.id)
            .bind(input.match_type)
            .bind(input.listing_id)
            .bind(&input.claimant_uid)
            .bind(input.claimant_listing_id)
            .bind(input.offered_room_id)
            .bind(input.offered_room_category)
            .bind(&input.offered_room_building)
            .bind(input.paired_match_id)
            .bind(&input.message)
            .bind(input.expires_at)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Match>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM matches WHERE id = $1");
        sqlx::query_as::<_, Match>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Set the match status without touching `responded_at`. Used for
    /// cascades (sibling cancellation, listing cancellation).
    pub async fn set_status(
        exec: impl PgExecutor<'_>,
        id: DbId,
        status: MatchStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE matches SET status = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record the owner's or claimant's response: set the status and stamp
    /// `responded_at`.
    pub async fn respond(
        exec: impl PgExecutor<'_>,
        id: DbId,
        status: MatchStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE matches SET status = $2, responded_at = NOW(),
                                version = version + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel every PROPOSED match on a listing except the given one.
    /// Returns the count of cancelled rows.
    pub async fn cancel_proposed_for_listing(
        exec: impl PgExecutor<'_>,
        listing_id: DbId,
        exclude_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE matches SET status = $3, version = version + 1, updated_at = NOW()
             WHERE listing_id = $1
               AND status = $4
               AND ($2::uuid IS NULL OR id <> $2)",
        )
        .bind(listing_id)
        .bind(exclude_id)
        .bind(MatchStatus::Cancelled)
        .bind(MatchStatus::Proposed)
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// Cancel every open (PROPOSED or ACCEPTED) match on a listing. Used by
    /// the listing-cancellation cascade. Returns the count of cancelled rows.
    pub async fn cancel_open_for_listing(
        exec: impl PgExecutor<'_>,
        listing_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE matches SET status = $2, version = version + 1, updated_at = NOW()
             WHERE listing_id = $1 AND status = ANY($3)",
        )
        .bind(listing_id)
        .bind(MatchStatus::Cancelled)
        .bind([MatchStatus::Proposed, MatchStatus::Accepted].as_slice())
        .execute(exec)
        .await?;
        Ok(result.rows_affected())
    }

    /// All matches on a listing, newest first.
    pub async fn list_for_listing(
        exec: impl PgExecutor<'_>,
        listing_id: DbId,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches
             WHERE listing_id = $1
             ORDER BY proposed_at DESC"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(listing_id)
            .fetch_all(exec)
            .await
    }

    /// Matches where the user is the claimant or owns the listing,
    /// optionally filtered by status.
    pub async fn list_for_user(
        exec: impl PgExecutor<'_>,
        uid: &str,
        status: Option<MatchStatus>,
    ) -> Result<Vec<Match>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches
             WHERE (claimant_uid = $1
                    OR listing_id IN (SELECT id FROM listings WHERE owner_uid = $1))
               AND ($2::match_status IS NULL OR status = $2)
             ORDER BY proposed_at DESC"
        );
        sqlx::query_as::<_, Match>(&query)
            .bind(uid)
            .bind(status)
            .fetch_all(exec)
            .await
    }
}
