//! Listing lifecycle: create, browse, update, cancel, and the two claim
//! operations that open the matching flow.

use chrono::{Duration, Utc};
use dormex_core::error::CoreError;
use dormex_core::matching::{self, SwapProfile};
use dormex_core::state_machine;
use dormex_core::status::{ListingStatus, ListingType, MatchType};
use dormex_core::types::DbId;
use dormex_db::models::listing::{
    CreateLeaseTransfer, CreateSwapRequest, Listing, ListingFilters, NewListing,
    PaginatedListings, UpdateListing,
};
use dormex_db::models::matches::{Match, NewMatch};
use dormex_db::repositories::{ListingRepo, MatchRepo, RoomRepo};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::with_tx_retry;
use crate::state::AppState;

/// Maximum browse page size.
const MAX_PAGE_SIZE: i64 = 100;

/// Default browse page size.
const DEFAULT_PAGE_SIZE: i64 = 20;

pub async fn create_lease_transfer(
    state: &AppState,
    owner_uid: &str,
    input: &CreateLeaseTransfer,
) -> AppResult<Listing> {
    if input.lease_end_date <= input.lease_start_date {
        return Err(CoreError::Validation(
            "lease end date must be after the start date".into(),
        )
        .into());
    }
    with_tx_retry(|| try_create_lease_transfer(state, owner_uid, input)).await
}

async fn try_create_lease_transfer(
    state: &AppState,
    owner_uid: &str,
    input: &CreateLeaseTransfer,
) -> AppResult<Listing> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let room = RoomRepo::find_by_id(&mut *tx, input.room_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    ensure_no_active_listing(&mut tx, owner_uid).await?;

    let listing = ListingRepo::create(
        &mut *tx,
        &NewListing {
            id: Uuid::new_v4(),
            listing_type: ListingType::LeaseTransfer,
            owner_uid: owner_uid.to_string(),
            room_id: room.id,
            room_category: room.category,
            room_building: room.building.clone(),
            lease_start_date: input.lease_start_date,
            lease_end_date: input.lease_end_date,
            description: input.description.clone(),
            asking_price: input.asking_price,
            move_in_date: input.move_in_date,
            desired_categories: Vec::new(),
            desired_buildings: Vec::new(),
            desired_min_start: None,
            desired_max_end: None,
            expires_at: Utc::now() + Duration::days(state.config.exchange.listing_expiry_days),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(listing_id = %listing.id, owner = owner_uid, "Lease-transfer listing created");
    Ok(listing)
}

pub async fn create_swap_request(
    state: &AppState,
    owner_uid: &str,
    input: &CreateSwapRequest,
) -> AppResult<Listing> {
    if input.lease_end_date <= input.lease_start_date {
        return Err(CoreError::Validation(
            "lease end date must be after the start date".into(),
        )
        .into());
    }
    if input.desired_categories.is_empty() {
        return Err(CoreError::Validation(
            "a swap request must name at least one desired category".into(),
        )
        .into());
    }
    with_tx_retry(|| try_create_swap_request(state, owner_uid, input)).await
}

async fn try_create_swap_request(
    state: &AppState,
    owner_uid: &str,
    input: &CreateSwapRequest,
) -> AppResult<Listing> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let room = RoomRepo::find_by_id(&mut *tx, input.room_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    ensure_no_active_listing(&mut tx, owner_uid).await?;

    let listing = ListingRepo::create(
        &mut *tx,
        &NewListing {
            id: Uuid::new_v4(),
            listing_type: ListingType::SwapRequest,
            owner_uid: owner_uid.to_string(),
            room_id: room.id,
            room_category: room.category,
            room_building: room.building.clone(),
            lease_start_date: input.lease_start_date,
            lease_end_date: input.lease_end_date,
            description: input.description.clone(),
            asking_price: None,
            move_in_date: None,
            desired_categories: input.desired_categories.clone(),
            desired_buildings: input.desired_buildings.clone(),
            desired_min_start: input.desired_min_start,
            desired_max_end: input.desired_max_end,
            expires_at: Utc::now() + Duration::days(state.config.exchange.listing_expiry_days),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(listing_id = %listing.id, owner = owner_uid, "Swap-request listing created");
    Ok(listing)
}

pub async fn get_listing(state: &AppState, id: DbId) -> AppResult<Listing> {
    ListingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()).into())
}

pub async fn get_user_listings(state: &AppState, owner_uid: &str) -> AppResult<Vec<Listing>> {
    Ok(ListingRepo::list_for_owner(&state.pool, owner_uid).await?)
}

/// Paginated browse over OPEN listings, excluding the viewer's own.
pub async fn list_listings(
    state: &AppState,
    viewer_uid: &str,
    filters: &ListingFilters,
) -> AppResult<PaginatedListings> {
    let page = filters.page.unwrap_or(1).max(1);
    let limit = filters
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * limit;

    let items = ListingRepo::browse(&state.pool, filters, viewer_uid, offset, limit).await?;
    let total = ListingRepo::count_browse(&state.pool, filters, viewer_uid).await?;

    Ok(PaginatedListings {
        has_next: offset + (items.len() as i64) < total,
        items,
        total,
        page,
        limit,
    })
}

/// Owner-only patch of an OPEN listing.
pub async fn update_listing(
    state: &AppState,
    id: DbId,
    owner_uid: &str,
    patch: &UpdateListing,
) -> AppResult<Listing> {
    with_tx_retry(|| try_update_listing(state, id, owner_uid, patch)).await
}

async fn try_update_listing(
    state: &AppState,
    id: DbId,
    owner_uid: &str,
    patch: &UpdateListing,
) -> AppResult<Listing> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let listing = ListingRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != owner_uid {
        return Err(CoreError::Forbidden("only the owner may edit a listing".into()).into());
    }
    if listing.status != ListingStatus::Open {
        return Err(CoreError::Conflict("only OPEN listings can be edited".into()).into());
    }
    let start = patch.lease_start_date.unwrap_or(listing.lease_start_date);
    let end = patch.lease_end_date.unwrap_or(listing.lease_end_date);
    if end <= start {
        return Err(CoreError::Validation(
            "lease end date must be after the start date".into(),
        )
        .into());
    }

    let updated = ListingRepo::update(&mut *tx, id, patch)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;

    tx.commit().await?;
    Ok(updated)
}

/// Owner-only cancel; cascades to every open match on the listing.
pub async fn cancel_listing(state: &AppState, id: DbId, owner_uid: &str) -> AppResult<Listing> {
    with_tx_retry(|| try_cancel_listing(state, id, owner_uid)).await
}

async fn try_cancel_listing(state: &AppState, id: DbId, owner_uid: &str) -> AppResult<Listing> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let listing = ListingRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != owner_uid {
        return Err(CoreError::Forbidden("only the owner may cancel a listing".into()).into());
    }
    state_machine::assert_allowed(
        listing.listing_type,
        listing.status,
        ListingStatus::Cancelled,
    )?;

    ListingRepo::set_status(&mut *tx, id, ListingStatus::Cancelled).await?;
    let cancelled_matches = MatchRepo::cancel_open_for_listing(&mut *tx, id).await?;

    tx.commit().await?;
    tracing::info!(listing_id = %id, cancelled_matches, "Listing cancelled");
    get_listing(state, id).await
}

/// Place a bid on an OPEN lease-transfer listing. The listing stays OPEN:
/// several bids may coexist, and only acceptance advances the listing.
pub async fn claim_lease_transfer(
    state: &AppState,
    listing_id: DbId,
    claimant_uid: &str,
    message: Option<&str>,
) -> AppResult<Match> {
    let (created, listing) =
        with_tx_retry(|| try_claim_lease_transfer(state, listing_id, claimant_uid, message)).await?;
    state
        .notifier
        .bid_received(&listing, claimant_uid, message.map(str::to_string));
    Ok(created)
}

async fn try_claim_lease_transfer(
    state: &AppState,
    listing_id: DbId,
    claimant_uid: &str,
    message: Option<&str>,
) -> AppResult<(Match, Listing)> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let listing = ListingRepo::find_by_id(&mut *tx, listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.listing_type != ListingType::LeaseTransfer {
        return Err(AppError::BadRequest(
            "this listing is not a lease transfer".into(),
        ));
    }
    if listing.owner_uid == claimant_uid {
        return Err(AppError::BadRequest("you cannot claim your own listing".into()));
    }
    if listing.status != ListingStatus::Open {
        return Err(CoreError::Conflict("listing is not open for claims".into()).into());
    }

    // A bid carries the listing's own room snapshot: the room changing hands.
    let created = MatchRepo::create(
        &mut *tx,
        &NewMatch {
            id: Uuid::new_v4(),
            match_type: MatchType::LeaseTransfer,
            listing_id,
            claimant_uid: claimant_uid.to_string(),
            claimant_listing_id: None,
            offered_room_id: Some(listing.room_id),
            offered_room_category: Some(listing.room_category),
            offered_room_building: Some(listing.room_building.clone()),
            paired_match_id: None,
            message: message.map(str::to_string),
            expires_at: Utc::now() + Duration::hours(state.config.exchange.match_expiry_hours),
        },
    )
    .await?;

    tx.commit().await?;
    tracing::info!(match_id = %created.id, listing_id = %listing_id, "Lease-transfer bid placed");
    Ok((created, listing))
}

/// Propose a swap between the claimant's own listing and the target listing.
/// Creates two paired SWAP_LEG matches and moves both listings to
/// FULLY_MATCHED. Returns the leg on the target listing.
pub async fn claim_swap(
    state: &AppState,
    listing_id: DbId,
    claimant_uid: &str,
    claimant_listing_id: DbId,
    message: Option<&str>,
) -> AppResult<Match> {
    let (created, target) = with_tx_retry(|| {
        try_claim_swap(state, listing_id, claimant_uid, claimant_listing_id, message)
    })
    .await?;
    state.notifier.swap_proposed(&target, claimant_uid);
    Ok(created)
}

async fn try_claim_swap(
    state: &AppState,
    listing_id: DbId,
    claimant_uid: &str,
    claimant_listing_id: DbId,
    message: Option<&str>,
) -> AppResult<(Match, Listing)> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    // Consistent read order: target listing first, then the claimant's.
    let target = ListingRepo::find_by_id(&mut *tx, listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    let own = ListingRepo::find_by_id(&mut *tx, claimant_listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;

    if target.listing_type != ListingType::SwapRequest
        || own.listing_type != ListingType::SwapRequest
    {
        return Err(AppError::BadRequest(
            "both listings must be swap requests".into(),
        ));
    }
    if target.owner_uid == claimant_uid {
        return Err(AppError::BadRequest("you cannot claim your own listing".into()));
    }
    if own.owner_uid != claimant_uid {
        return Err(AppError::BadRequest(
            "claimant listing does not belong to you".into(),
        ));
    }
    const CLAIMABLE: [ListingStatus; 2] = [ListingStatus::Open, ListingStatus::PartialMatch];
    if !CLAIMABLE.contains(&target.status) {
        return Err(CoreError::Conflict("listing is not open for claims".into()).into());
    }
    if !CLAIMABLE.contains(&own.status) {
        return Err(CoreError::Conflict("your listing is not open for claims".into()).into());
    }
    if !matching::swaps_compatible(&swap_profile(&target), &swap_profile(&own)) {
        return Err(AppError::BadRequest(
            "the listings are not mutually compatible".into(),
        ));
    }
    state_machine::assert_allowed(
        target.listing_type,
        target.status,
        ListingStatus::FullyMatched,
    )?;
    state_machine::assert_allowed(own.listing_type, own.status, ListingStatus::FullyMatched)?;

    // Ids are pre-generated so each leg can name its pair on insert.
    let target_leg_id = Uuid::new_v4();
    let own_leg_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(state.config.exchange.match_expiry_hours);

    // Leg on the target listing: the claimant offers their own room.
    let created = MatchRepo::create(
        &mut *tx,
        &NewMatch {
            id: target_leg_id,
            match_type: MatchType::SwapLeg,
            listing_id: target.id,
            claimant_uid: claimant_uid.to_string(),
            claimant_listing_id: Some(own.id),
            offered_room_id: Some(own.room_id),
            offered_room_category: Some(own.room_category),
            offered_room_building: Some(own.room_building.clone()),
            paired_match_id: Some(own_leg_id),
            message: message.map(str::to_string),
            expires_at,
        },
    )
    .await?;

    // Mirror leg on the claimant's listing: the target owner offers theirs.
    MatchRepo::create(
        &mut *tx,
        &NewMatch {
            id: own_leg_id,
            match_type: MatchType::SwapLeg,
            listing_id: own.id,
            claimant_uid: target.owner_uid.clone(),
            claimant_listing_id: Some(target.id),
            offered_room_id: Some(target.room_id),
            offered_room_category: Some(target.room_category),
            offered_room_building: Some(target.room_building.clone()),
            paired_match_id: Some(target_leg_id),
            message: None,
            expires_at,
        },
    )
    .await?;

    ListingRepo::set_status(&mut *tx, target.id, ListingStatus::FullyMatched).await?;
    ListingRepo::set_status(&mut *tx, own.id, ListingStatus::FullyMatched).await?;
    ListingRepo::stamp_match_refs(&mut *tx, target.id, Some(target_leg_id), Some(own_leg_id))
        .await?;
    ListingRepo::stamp_match_refs(&mut *tx, own.id, Some(own_leg_id), Some(target_leg_id)).await?;

    tx.commit().await?;
    tracing::info!(
        target_leg = %target_leg_id,
        own_leg = %own_leg_id,
        "Swap proposed"
    );
    Ok((created, target))
}

/// One-active-listing-per-user invariant.
async fn ensure_no_active_listing(
    tx: &mut sqlx::Transaction<'static, sqlx::Postgres>,
    owner_uid: &str,
) -> AppResult<()> {
    if ListingRepo::find_active_for_owner(&mut **tx, owner_uid)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict("you already have an active listing".into()).into());
    }
    Ok(())
}

/// The compatibility-relevant slice of a swap listing.
pub(crate) fn swap_profile(listing: &Listing) -> SwapProfile {
    SwapProfile {
        owner_uid: listing.owner_uid.clone(),
        room_category: listing.room_category,
        room_building: listing.room_building.clone(),
        desired_categories: listing.desired_categories.clone(),
        desired_buildings: listing.desired_buildings.clone(),
        lease_start_date: listing.lease_start_date,
        lease_end_date: listing.lease_end_date,
    }
}
