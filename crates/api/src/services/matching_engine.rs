//! Read-only compatibility search over listings.

use dormex_core::error::CoreError;
use dormex_core::matching;
use dormex_core::status::ListingType;
use dormex_core::types::DbId;
use dormex_db::models::listing::{Listing, ListingFilters};
use dormex_db::repositories::ListingRepo;

use crate::error::{AppError, AppResult};
use crate::services::listing_service::swap_profile;
use crate::state::AppState;

/// Candidate rows fetched per compatibility query before in-memory
/// filtering.
const CANDIDATE_FETCH_LIMIT: i64 = 200;

/// OPEN lease transfers matching the filters, excluding the requester's own
/// listings.
pub async fn find_compatible_lease_transfers(
    state: &AppState,
    requester_uid: &str,
    filters: &ListingFilters,
    limit: i64,
) -> AppResult<Vec<Listing>> {
    let narrowed = ListingFilters {
        listing_type: Some(ListingType::LeaseTransfer),
        ..filters.clone()
    };
    Ok(ListingRepo::browse(&state.pool, &narrowed, requester_uid, 0, limit).await?)
}

/// Swap listings mutually compatible with the given swap listing, in
/// candidate order, bounded by `limit`.
pub async fn find_compatible_swaps(
    state: &AppState,
    listing_id: DbId,
    requester_uid: &str,
    limit: i64,
) -> AppResult<Vec<Listing>> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != requester_uid {
        return Err(
            CoreError::Forbidden("only the owner may search for swap partners".into()).into(),
        );
    }
    if listing.listing_type != ListingType::SwapRequest {
        return Err(AppError::BadRequest(
            "compatibility search applies to swap requests".into(),
        ));
    }

    let own = swap_profile(&listing);
    let candidates = ListingRepo::find_swap_candidates(
        &state.pool,
        &listing.owner_uid,
        CANDIDATE_FETCH_LIMIT,
    )
    .await?;

    Ok(candidates
        .into_iter()
        .filter(|candidate| matching::swaps_compatible(&own, &swap_profile(candidate)))
        .take(limit as usize)
        .collect())
}
