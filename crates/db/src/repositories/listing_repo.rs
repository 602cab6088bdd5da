//! Repository for the `listings` table.

use dormex_core::status::{ListingStatus, ListingType};
use dormex_core::types::DbId;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::models::listing::{Listing, ListingFilters, NewListing, UpdateListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_type, status, version, owner_uid, room_id, \
                       room_category, room_building, lease_start_date, lease_end_date, \
                       description, asking_price, move_in_date, desired_categories, \
                       desired_buildings, desired_min_start, desired_max_end, \
                       replacement_match_id, target_match_id, expires_at, \
                       created_at, updated_at";

/// Provides CRUD and browse operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &NewListing,
    ) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings (id, listing_type, owner_uid, room_id, room_category,
                                   room_building, lease_start_date, lease_end_date,
                                   description, asking_price, move_in_date,
                                   desired_categories, desired_buildings,
                                   desired_min_start, desired_max_end, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.id)
            .bind(input.listing_type)
            .bind(&input.owner_uid)
            .bind(input.room_id)
            .bind(input.room_category)
            .bind(&input.room_building)
            .bind(input.lease_start_date)
            .bind(input.lease_end_date)
            .bind(&input.description)
            .bind(input.asking_price)
            .bind(input.move_in_date)
            .bind(&input.desired_categories)
            .bind(&input.desired_buildings)
            .bind(input.desired_min_start)
            .bind(input.desired_max_end)
            .bind(input.expires_at)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Find the owner's listing in an active status, if any. Backs the
    /// one-active-listing-per-user rule.
    pub async fn find_active_for_owner(
        exec: impl PgExecutor<'_>,
        owner_uid: &str,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE owner_uid = $1 AND status = ANY($2)
             LIMIT 1"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_uid)
            .bind(ListingStatus::ACTIVE)
            .fetch_optional(exec)
            .await
    }

    /// All of a user's listings, newest first.
    pub async fn list_for_owner(
        exec: impl PgExecutor<'_>,
        owner_uid: &str,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE owner_uid = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(owner_uid)
            .fetch_all(exec)
            .await
    }

    /// One page of OPEN listings matching the browse filters, excluding the
    /// viewer's own listings.
    pub async fn browse(
        exec: impl PgExecutor<'_>,
        filters: &ListingFilters,
        exclude_uid: &str,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!("SELECT {COLUMNS} FROM listings"));
        push_browse_filters(&mut qb, filters, exclude_uid);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
        qb.build_query_as::<Listing>().fetch_all(exec).await
    }

    /// Total count for the same filter set as [`browse`](Self::browse).
    pub async fn count_browse(
        exec: impl PgExecutor<'_>,
        filters: &ListingFilters,
        exclude_uid: &str,
    ) -> Result<i64, sqlx::Error> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM listings");
        push_browse_filters(&mut qb, filters, exclude_uid);
        let (count,): (i64,) = qb.build_query_as().fetch_one(exec).await?;
        Ok(count)
    }

    /// Patch an OPEN listing's mutable fields, bumping its version. Returns
    /// `None` if the row no longer exists.
    pub async fn update(
        exec: impl PgExecutor<'_>,
        id: DbId,
        patch: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                 lease_start_date = COALESCE($2, lease_start_date),
                 lease_end_date = COALESCE($3, lease_end_date),
                 description = COALESCE($4, description),
                 asking_price = COALESCE($5, asking_price),
                 move_in_date = COALESCE($6, move_in_date),
                 desired_categories = COALESCE($7, desired_categories),
                 desired_buildings = COALESCE($8, desired_buildings),
                 desired_min_start = COALESCE($9, desired_min_start),
                 desired_max_end = COALESCE($10, desired_max_end),
                 version = version + 1,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(patch.lease_start_date)
            .bind(patch.lease_end_date)
            .bind(&patch.description)
            .bind(patch.asking_price)
            .bind(patch.move_in_date)
            .bind(&patch.desired_categories)
            .bind(&patch.desired_buildings)
            .bind(patch.desired_min_start)
            .bind(patch.desired_max_end)
            .fetch_optional(exec)
            .await
    }

    /// Set the listing status, bumping its version. Returns `true` if the
    /// row was updated. Transition legality is the caller's responsibility.
    pub async fn set_status(
        exec: impl PgExecutor<'_>,
        id: DbId,
        status: ListingStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET status = $2, version = version + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Stamp the match cross-references written when a swap pair forms.
    pub async fn stamp_match_refs(
        exec: impl PgExecutor<'_>,
        id: DbId,
        replacement_match_id: Option<DbId>,
        target_match_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE listings SET
                 replacement_match_id = $2,
                 target_match_id = $3,
                 version = version + 1,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(replacement_match_id)
        .bind(target_match_id)
        .execute(exec)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Swap-request listings still open to pairing, excluding the given
    /// owner. Compatibility filtering happens in the caller.
    pub async fn find_swap_candidates(
        exec: impl PgExecutor<'_>,
        exclude_uid: &str,
        limit: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM listings
             WHERE listing_type = $1
               AND status = ANY($2)
               AND owner_uid <> $3
             ORDER BY created_at
             LIMIT $4"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(ListingType::SwapRequest)
            .bind([ListingStatus::Open, ListingStatus::PartialMatch].as_slice())
            .bind(exclude_uid)
            .bind(limit)
            .fetch_all(exec)
            .await
    }
}

/// Shared WHERE clause for browse and its count query.
fn push_browse_filters<'a>(
    qb: &mut QueryBuilder<'a, Postgres>,
    filters: &'a ListingFilters,
    exclude_uid: &'a str,
) {
    qb.push(" WHERE status = ");
    qb.push_bind(ListingStatus::Open);
    qb.push(" AND owner_uid <> ");
    qb.push_bind(exclude_uid);
    if let Some(listing_type) = filters.listing_type {
        qb.push(" AND listing_type = ");
        qb.push_bind(listing_type);
    }
    if let Some(category) = filters.category {
        qb.push(" AND room_category = ");
        qb.push_bind(category);
    }
    if let Some(building) = &filters.building {
        qb.push(" AND room_building = ");
        qb.push_bind(building);
    }
    // Inclusive overlap with the requested window.
    if let Some(start) = filters.start_date {
        qb.push(" AND lease_end_date >= ");
        qb.push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(" AND lease_start_date <= ");
        qb.push_bind(end);
    }
}
