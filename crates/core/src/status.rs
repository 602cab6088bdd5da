//! Status and type enums for every exchange entity.
//!
//! Each enum maps to a Postgres enum type of the same snake_case name (see
//! the db crate's initial migration) and serializes as SCREAMING_SNAKE_CASE
//! over the wire, so the JSON surface matches the stored values exactly.

use serde::{Deserialize, Serialize};

/// Dormitory room category. Pricing and desirability tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_category")]
pub enum RoomCategory {
    A,
    B,
    C,
}

/// What kind of exchange a listing offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingType {
    LeaseTransfer,
    SwapRequest,
}

/// Listing lifecycle status. One enum covers both listing types; the state
/// machine decides which statuses are reachable for which type
/// (`PartialMatch`/`FullyMatched` are swap-only, `Matched` is transfer-only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "listing_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Open,
    Matched,
    PartialMatch,
    FullyMatched,
    PendingApproval,
    Completed,
    Cancelled,
    Expired,
}

impl ListingStatus {
    /// Statuses that count against the one-active-listing-per-user rule.
    pub const ACTIVE: &'static [ListingStatus] = &[
        ListingStatus::Open,
        ListingStatus::PartialMatch,
        ListingStatus::Matched,
        ListingStatus::FullyMatched,
    ];
}

/// A match is a single bid on a lease transfer, or one leg of a paired swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchType {
    LeaseTransfer,
    SwapLeg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "match_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Proposed,
    Accepted,
    Rejected,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    LeaseTransfer,
    Swap,
}

/// Execution-record status. `Failed` has no producing transition yet; it is
/// reserved for timeout/automation sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
    Failed,
}
