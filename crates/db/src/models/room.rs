//! Room model and DTOs.

use dormex_core::status::RoomCategory;
use dormex_core::types::{DbId, Timestamp, Uid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A room row from the `rooms` table. Rooms are deactivated, never deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Room {
    pub id: DbId,
    pub building: String,
    pub floor: i32,
    pub room_number: String,
    pub category: RoomCategory,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub occupant_uid: Option<Uid>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a room (admin only).
#[derive(Debug, Deserialize)]
pub struct CreateRoom {
    pub building: String,
    pub floor: i32,
    pub room_number: String,
    pub category: RoomCategory,
    pub description: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    pub occupant_uid: Option<Uid>,
}

/// Input for updating a room (admin only, all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateRoom {
    pub building: Option<String>,
    pub floor: Option<i32>,
    pub room_number: Option<String>,
    pub category: Option<RoomCategory>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Query parameters for listing rooms.
#[derive(Debug, Default, Deserialize)]
pub struct RoomFilters {
    pub building: Option<String>,
    pub category: Option<RoomCategory>,
    /// Only rooms with no current occupant.
    pub available: Option<bool>,
}
