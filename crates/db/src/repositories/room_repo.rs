//! Repository for the `rooms` table.

use dormex_core::types::DbId;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::models::room::{CreateRoom, Room, RoomFilters, UpdateRoom};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, building, floor, room_number, category, description, \
                       amenities, occupant_uid, is_active, created_at, updated_at";

/// Provides CRUD operations for rooms.
pub struct RoomRepo;

impl RoomRepo {
    /// Insert a new room, returning the created row.
    pub async fn create(
        exec: impl PgExecutor<'_>,
        input: &CreateRoom,
    ) -> Result<Room, sqlx::Error> {
        let query = format!(
            "INSERT INTO rooms (building, floor, room_number, category, description,
                                amenities, occupant_uid)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(&input.building)
            .bind(input.floor)
            .bind(&input.room_number)
            .bind(input.category)
            .bind(&input.description)
            .bind(&input.amenities)
            .bind(&input.occupant_uid)
            .fetch_one(exec)
            .await
    }

    pub async fn find_by_id(
        exec: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rooms WHERE id = $1");
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Active rooms matching the filters.
    pub async fn list(
        exec: impl PgExecutor<'_>,
        filters: &RoomFilters,
    ) -> Result<Vec<Room>, sqlx::Error> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM rooms WHERE is_active = TRUE"));
        if let Some(building) = &filters.building {
            qb.push(" AND building = ");
            qb.push_bind(building);
        }
        if let Some(category) = filters.category {
            qb.push(" AND category = ");
            qb.push_bind(category);
        }
        if filters.available == Some(true) {
            qb.push(" AND occupant_uid IS NULL");
        }
        qb.push(" ORDER BY building, room_number");
        qb.build_query_as::<Room>().fetch_all(exec).await
    }

    /// Patch a room's fields. Returns `None` if the row does not exist.
    pub async fn update(
        exec: impl PgExecutor<'_>,
        id: DbId,
        patch: &UpdateRoom,
    ) -> Result<Option<Room>, sqlx::Error> {
        let query = format!(
            "UPDATE rooms SET
                 building = COALESCE($2, building),
                 floor = COALESCE($3, floor),
                 room_number = COALESCE($4, room_number),
                 category = COALESCE($5, category),
                 description = COALESCE($6, description),
                 amenities = COALESCE($7, amenities),
                 is_active = COALESCE($8, is_active),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Room>(&query)
            .bind(id)
            .bind(&patch.building)
            .bind(patch.floor)
            .bind(&patch.room_number)
            .bind(patch.category)
            .bind(&patch.description)
            .bind(&patch.amenities)
            .bind(patch.is_active)
            .fetch_optional(exec)
            .await
    }

    /// Reassign (or clear) a room's occupant. Only the transaction service
    /// and room admin paths call this.
    pub async fn set_occupant(
        exec: impl PgExecutor<'_>,
        id: DbId,
        occupant_uid: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE rooms SET occupant_uid = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(occupant_uid)
                .execute(exec)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
