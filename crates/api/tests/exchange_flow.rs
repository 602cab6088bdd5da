//! Service-level tests for the exchange's transactional behaviour.
//!
//! These drive the business services against a real database (one throwaway
//! database per test, migrations applied by `#[sqlx::test]`), covering the
//! properties the pure unit tests cannot: sibling-bid exclusivity on accept,
//! paired swap legs moving in lockstep, reject leaving an OPEN listing on
//! the market, the one-active-listing rule, and the stale-occupant guard at
//! confirmation time.

mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use sqlx::PgPool;

use dormex_api::error::AppError;
use dormex_api::services::{listing_service, match_service, transaction_service};
use dormex_core::error::CoreError;
use dormex_core::status::{
    ListingStatus, MatchStatus, RoomCategory, TransactionStatus, TransactionType,
};
use dormex_db::models::listing::{CreateLeaseTransfer, CreateSwapRequest};
use dormex_db::models::room::{CreateRoom, Room};
use dormex_db::repositories::{ListingRepo, MatchRepo, RoomRepo, TransactionRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn make_room(
    pool: &PgPool,
    building: &str,
    room_number: &str,
    category: RoomCategory,
    occupant_uid: &str,
) -> Room {
    RoomRepo::create(
        pool,
        &CreateRoom {
            building: building.to_string(),
            floor: 2,
            room_number: room_number.to_string(),
            category,
            description: None,
            amenities: Vec::new(),
            occupant_uid: Some(occupant_uid.to_string()),
        },
    )
    .await
    .unwrap()
}

fn lease_transfer_input(room: &Room) -> CreateLeaseTransfer {
    CreateLeaseTransfer {
        room_id: room.id,
        lease_start_date: date(2026, 9, 1),
        lease_end_date: date(2027, 6, 30),
        description: None,
        asking_price: Some(450.0),
        move_in_date: None,
    }
}

fn swap_request_input(room: &Room, desired: RoomCategory) -> CreateSwapRequest {
    CreateSwapRequest {
        room_id: room.id,
        lease_start_date: date(2026, 9, 1),
        lease_end_date: date(2027, 6, 30),
        description: None,
        desired_categories: vec![desired],
        desired_buildings: Vec::new(),
        desired_min_start: None,
        desired_max_end: None,
    }
}

// ---------------------------------------------------------------------------
// Test: accepting one bid cancels every sibling bid and creates exactly one
// pending transaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn accept_cancels_sibling_bids(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room = make_room(&pool, "North", "204", RoomCategory::A, "owner-1").await;
    let listing = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room))
        .await
        .unwrap();

    let first = listing_service::claim_lease_transfer(&state, listing.id, "bidder-1", None)
        .await
        .unwrap();
    let second = listing_service::claim_lease_transfer(&state, listing.id, "bidder-2", None)
        .await
        .unwrap();

    let transaction = match_service::accept_match(&state, first.id, "owner-1")
        .await
        .unwrap();

    let accepted = MatchRepo::find_by_id(&pool, first.id).await.unwrap().unwrap();
    let sibling = MatchRepo::find_by_id(&pool, second.id).await.unwrap().unwrap();
    let listing = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();

    assert_eq!(accepted.status, MatchStatus::Accepted);
    assert_eq!(
        sibling.status,
        MatchStatus::Cancelled,
        "the losing bid must be cancelled when a sibling is accepted"
    );
    assert_eq!(listing.status, ListingStatus::PendingApproval);

    assert_eq!(transaction.status, TransactionStatus::Pending);
    assert_eq!(transaction.transaction_type, TransactionType::LeaseTransfer);
    assert_eq!(transaction.from_uid.as_deref(), Some("owner-1"));
    assert_eq!(transaction.to_uid.as_deref(), Some("bidder-1"));
    assert_eq!(transaction.room_id, Some(room.id));
}

// ---------------------------------------------------------------------------
// Test: a lease-transfer bid snapshots the listing's room
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn bid_snapshots_listing_room(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room = make_room(&pool, "East", "112", RoomCategory::B, "owner-1").await;
    let listing = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room))
        .await
        .unwrap();

    let bid = listing_service::claim_lease_transfer(&state, listing.id, "bidder-1", Some("hi"))
        .await
        .unwrap();

    assert_eq!(bid.offered_room_id, Some(room.id));
    assert_eq!(bid.offered_room_category, Some(RoomCategory::B));
    assert_eq!(bid.offered_room_building.as_deref(), Some("East"));
    assert_eq!(bid.message.as_deref(), Some("hi"));
}

// ---------------------------------------------------------------------------
// Test: accepting one swap leg moves both legs, both listings, and creates a
// single SWAP transaction naming both
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn swap_accept_moves_both_legs_in_lockstep(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room_a = make_room(&pool, "North", "204", RoomCategory::A, "owner-a").await;
    let room_b = make_room(&pool, "South", "310", RoomCategory::B, "owner-b").await;

    let listing_a =
        listing_service::create_swap_request(&state, "owner-a", &swap_request_input(&room_a, RoomCategory::B))
            .await
            .unwrap();
    let listing_b =
        listing_service::create_swap_request(&state, "owner-b", &swap_request_input(&room_b, RoomCategory::A))
            .await
            .unwrap();

    // owner-b proposes a swap against owner-a's listing.
    let leg = listing_service::claim_swap(&state, listing_a.id, "owner-b", listing_b.id, None)
        .await
        .unwrap();
    let pair_id = leg.paired_match_id.expect("swap leg must name its pair");

    let listing_a_now = ListingRepo::find_by_id(&pool, listing_a.id).await.unwrap().unwrap();
    let listing_b_now = ListingRepo::find_by_id(&pool, listing_b.id).await.unwrap().unwrap();
    assert_eq!(listing_a_now.status, ListingStatus::FullyMatched);
    assert_eq!(listing_b_now.status, ListingStatus::FullyMatched);

    let transaction = match_service::accept_match(&state, leg.id, "owner-a")
        .await
        .unwrap();

    let leg_now = MatchRepo::find_by_id(&pool, leg.id).await.unwrap().unwrap();
    let pair_now = MatchRepo::find_by_id(&pool, pair_id).await.unwrap().unwrap();
    assert_eq!(leg_now.status, MatchStatus::Accepted);
    assert_eq!(
        pair_now.status,
        MatchStatus::Accepted,
        "the paired leg must move together with the accepted one"
    );

    let listing_a_now = ListingRepo::find_by_id(&pool, listing_a.id).await.unwrap().unwrap();
    let listing_b_now = ListingRepo::find_by_id(&pool, listing_b.id).await.unwrap().unwrap();
    assert_eq!(listing_a_now.status, ListingStatus::PendingApproval);
    assert_eq!(listing_b_now.status, ListingStatus::PendingApproval);

    assert_eq!(transaction.transaction_type, TransactionType::Swap);
    assert_eq!(transaction.status, TransactionStatus::Pending);
    assert!(transaction.match_ids.contains(&leg.id));
    assert!(transaction.match_ids.contains(&pair_id));
    assert_eq!(transaction.party_a_uid.as_deref(), Some("owner-a"));
    assert_eq!(transaction.party_b_uid.as_deref(), Some("owner-b"));
    assert_eq!(transaction.party_a_room_id, Some(room_a.id));
    assert_eq!(transaction.party_b_room_id, Some(room_b.id));
}

// ---------------------------------------------------------------------------
// Test: rejecting a bid keeps an OPEN listing on the market
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_keeps_listing_open(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room = make_room(&pool, "West", "101", RoomCategory::C, "owner-1").await;
    let listing = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room))
        .await
        .unwrap();

    let bid = listing_service::claim_lease_transfer(&state, listing.id, "bidder-1", None)
        .await
        .unwrap();
    let rejected = match_service::reject_match(&state, bid.id, "owner-1")
        .await
        .unwrap();

    assert_eq!(rejected.status, MatchStatus::Rejected);
    let listing_now = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(
        listing_now.status,
        ListingStatus::Open,
        "a rejected bid must leave the listing on the market"
    );

    // And a fresh bid is still possible.
    listing_service::claim_lease_transfer(&state, listing.id, "bidder-2", None)
        .await
        .expect("listing must accept new bids after a rejection");
}

// ---------------------------------------------------------------------------
// Test: a user cannot hold two active listings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn second_active_listing_is_a_conflict(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room_a = make_room(&pool, "North", "204", RoomCategory::A, "owner-1").await;
    let room_b = make_room(&pool, "North", "205", RoomCategory::A, "owner-1").await;

    listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room_a))
        .await
        .unwrap();

    let err = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room_b))
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Conflict(_)));
}

// ---------------------------------------------------------------------------
// Test: confirmation fails with a Conflict when the room's occupant changed
// after acceptance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirm_rejects_stale_occupancy(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room = make_room(&pool, "North", "204", RoomCategory::A, "owner-1").await;
    let listing = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room))
        .await
        .unwrap();
    let bid = listing_service::claim_lease_transfer(&state, listing.id, "bidder-1", None)
        .await
        .unwrap();
    let transaction = match_service::accept_match(&state, bid.id, "owner-1")
        .await
        .unwrap();

    // The room changes hands out of band before anyone confirms.
    RoomRepo::set_occupant(&pool, room.id, Some("someone-else"))
        .await
        .unwrap();

    let err = transaction_service::confirm_transaction(&state, transaction.id, "bidder-1")
        .await
        .unwrap_err();
    assert_matches!(err, AppError::Core(CoreError::Conflict(_)));

    // The transaction is untouched by the failed confirmation.
    let still_pending = TransactionRepo::find_by_id(&pool, transaction.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_pending.status, TransactionStatus::Pending);
}

// ---------------------------------------------------------------------------
// Test: a clean confirmation hands the room over and completes everything
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn confirm_executes_the_handover(pool: PgPool) {
    let state = common::test_state(pool.clone());
    let room = make_room(&pool, "North", "204", RoomCategory::A, "owner-1").await;
    let listing = listing_service::create_lease_transfer(&state, "owner-1", &lease_transfer_input(&room))
        .await
        .unwrap();
    let bid = listing_service::claim_lease_transfer(&state, listing.id, "bidder-1", None)
        .await
        .unwrap();
    let transaction = match_service::accept_match(&state, bid.id, "owner-1")
        .await
        .unwrap();

    let confirmed = transaction_service::confirm_transaction(&state, transaction.id, "bidder-1")
        .await
        .unwrap();
    assert_eq!(confirmed.status, TransactionStatus::Completed);
    assert!(confirmed.completed_at.is_some());

    let room_now = RoomRepo::find_by_id(&pool, room.id).await.unwrap().unwrap();
    assert_eq!(room_now.occupant_uid.as_deref(), Some("bidder-1"));

    let listing_now = ListingRepo::find_by_id(&pool, listing.id).await.unwrap().unwrap();
    assert_eq!(listing_now.status, ListingStatus::Completed);
}
