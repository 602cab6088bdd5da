//! Match (bid/proposal) models and DTOs.

use dormex_core::status::{MatchStatus, MatchType, RoomCategory};
use dormex_core::types::{DbId, Timestamp, Uid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A match row from the `matches` table. A lease-transfer match is a single
/// bid; a swap match is one leg of a pair linked via `paired_match_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Match {
    pub id: DbId,
    pub match_type: MatchType,
    pub status: MatchStatus,
    pub listing_id: DbId,
    pub claimant_uid: Uid,
    pub claimant_listing_id: Option<DbId>,
    pub offered_room_id: Option<DbId>,
    pub offered_room_category: Option<RoomCategory>,
    pub offered_room_building: Option<String>,
    pub paired_match_id: Option<DbId>,
    pub message: Option<String>,
    pub proposed_at: Timestamp,
    pub responded_at: Option<Timestamp>,
    pub expires_at: Timestamp,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fully resolved insert form for a match. Ids are generated by the caller so
/// paired swap legs can reference each other before either row exists.
#[derive(Debug)]
pub struct NewMatch {
    pub id: DbId,
    pub match_type: MatchType,
    pub listing_id: DbId,
    pub claimant_uid: Uid,
    pub claimant_listing_id: Option<DbId>,
    pub offered_room_id: Option<DbId>,
    pub offered_room_category: Option<RoomCategory>,
    pub offered_room_building: Option<String>,
    pub paired_match_id: Option<DbId>,
    pub message: Option<String>,
    pub expires_at: Timestamp,
}

/// Body for claiming a listing. `claimant_listing_id` is required for swap
/// claims and ignored for lease transfers.
#[derive(Debug, Default, Deserialize)]
pub struct ClaimRequest {
    pub message: Option<String>,
    pub claimant_listing_id: Option<DbId>,
}

/// Counterparty contact details, released only after acceptance.
#[derive(Debug, Serialize)]
pub struct ContactInfo {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// Query parameters for a user's match list.
#[derive(Debug, Default, Deserialize)]
pub struct MatchFilters {
    pub status: Option<MatchStatus>,
}
