//! Listing models and DTOs.

use chrono::NaiveDate;
use dormex_core::status::{ListingStatus, ListingType, RoomCategory};
use dormex_core::types::{DbId, Timestamp, Uid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A listing row from the `listings` table. `room_category`/`room_building`
/// are snapshots taken at creation time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Listing {
    pub id: DbId,
    pub listing_type: ListingType,
    pub status: ListingStatus,
    pub version: i32,
    pub owner_uid: Uid,
    pub room_id: DbId,
    pub room_category: RoomCategory,
    pub room_building: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub description: Option<String>,
    pub asking_price: Option<f64>,
    pub move_in_date: Option<NaiveDate>,
    pub desired_categories: Vec<RoomCategory>,
    pub desired_buildings: Vec<String>,
    pub desired_min_start: Option<NaiveDate>,
    pub desired_max_end: Option<NaiveDate>,
    pub replacement_match_id: Option<DbId>,
    pub target_match_id: Option<DbId>,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Insert form
// ---------------------------------------------------------------------------

/// Fully resolved insert form for a listing. The listing service builds this
/// after snapshotting room fields and computing the expiry.
#[derive(Debug)]
pub struct NewListing {
    pub id: DbId,
    pub listing_type: ListingType,
    pub owner_uid: Uid,
    pub room_id: DbId,
    pub room_category: RoomCategory,
    pub room_building: String,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub description: Option<String>,
    pub asking_price: Option<f64>,
    pub move_in_date: Option<NaiveDate>,
    pub desired_categories: Vec<RoomCategory>,
    pub desired_buildings: Vec<String>,
    pub desired_min_start: Option<NaiveDate>,
    pub desired_max_end: Option<NaiveDate>,
    pub expires_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body for creating a lease-transfer listing.
#[derive(Debug, Deserialize)]
pub struct CreateLeaseTransfer {
    pub room_id: DbId,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub description: Option<String>,
    pub asking_price: Option<f64>,
    pub move_in_date: Option<NaiveDate>,
}

/// Body for creating a swap-request listing.
#[derive(Debug, Deserialize)]
pub struct CreateSwapRequest {
    pub room_id: DbId,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    pub description: Option<String>,
    #[serde(default)]
    pub desired_categories: Vec<RoomCategory>,
    #[serde(default)]
    pub desired_buildings: Vec<String>,
    pub desired_min_start: Option<NaiveDate>,
    pub desired_max_end: Option<NaiveDate>,
}

/// Body for updating an OPEN listing (all fields optional).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateListing {
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub asking_price: Option<f64>,
    pub move_in_date: Option<NaiveDate>,
    pub desired_categories: Option<Vec<RoomCategory>>,
    pub desired_buildings: Option<Vec<String>>,
    pub desired_min_start: Option<NaiveDate>,
    pub desired_max_end: Option<NaiveDate>,
}

/// Query parameters for browsing listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilters {
    pub listing_type: Option<ListingType>,
    pub category: Option<RoomCategory>,
    pub building: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// One page of browse results.
#[derive(Debug, Serialize)]
pub struct PaginatedListings {
    pub items: Vec<Listing>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub has_next: bool,
}
