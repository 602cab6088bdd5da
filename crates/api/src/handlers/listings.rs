//! Handlers for the `/listings` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dormex_core::status::ListingType;
use dormex_core::types::DbId;
use dormex_db::models::listing::{
    CreateLeaseTransfer, CreateSwapRequest, Listing, ListingFilters, PaginatedListings,
    UpdateListing,
};
use dormex_db::models::matches::{ClaimRequest, Match};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::{listing_service, match_service, matching_engine};
use crate::state::AppState;

/// Result rows returned by a compatibility search.
const COMPATIBLE_LIMIT: i64 = 20;

/// POST /api/v1/listings/lease-transfer
pub async fn create_lease_transfer(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateLeaseTransfer>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    let listing = listing_service::create_lease_transfer(&state, &auth.uid, &body).await?;
    tracing::info!(listing_id = %listing.id, owner = %auth.uid, "Lease transfer listed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// POST /api/v1/listings/swap-request
pub async fn create_swap_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateSwapRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    let listing = listing_service::create_swap_request(&state, &auth.uid, &body).await?;
    tracing::info!(listing_id = %listing.id, owner = %auth.uid, "Swap request listed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// GET /api/v1/listings
///
/// Paginated browse over OPEN listings, excluding the caller's own.
pub async fn list_listings(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<ListingFilters>,
) -> AppResult<Json<DataResponse<PaginatedListings>>> {
    let page = listing_service::list_listings(&state, &auth.uid, &filters).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/listings/my
pub async fn my_listings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let listings = listing_service::get_user_listings(&state, &auth.uid).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/{id}
pub async fn get_listing(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Listing>>> {
    let listing = listing_service::get_listing(&state, id).await?;
    Ok(Json(DataResponse { data: listing }))
}

/// PUT /api/v1/listings/{id}
pub async fn update_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateListing>,
) -> AppResult<Json<DataResponse<Listing>>> {
    let listing = listing_service::update_listing(&state, id, &auth.uid, &body).await?;
    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/listings/{id}/cancel
pub async fn cancel_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Listing>>> {
    let listing = listing_service::cancel_listing(&state, id, &auth.uid).await?;
    tracing::info!(listing_id = %id, "Listing cancelled");
    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/listings/{id}/claim
///
/// Claims dispatch on the body: a `claimant_listing_id` makes this a swap
/// proposal, otherwise it is a lease-transfer bid.
pub async fn claim_listing(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ClaimRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Match>>)> {
    let created = match body.claimant_listing_id {
        Some(claimant_listing_id) => {
            listing_service::claim_swap(
                &state,
                id,
                &auth.uid,
                claimant_listing_id,
                body.message.as_deref(),
            )
            .await?
        }
        None => {
            listing_service::claim_lease_transfer(&state, id, &auth.uid, body.message.as_deref())
                .await?
        }
    };
    tracing::info!(listing_id = %id, match_id = %created.id, claimant = %auth.uid, "Listing claimed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/listings/{id}/bids (owner only)
pub async fn listing_bids(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Match>>>> {
    let bids = match_service::get_listing_bids(&state, id, &auth.uid).await?;
    Ok(Json(DataResponse { data: bids }))
}

/// GET /api/v1/listings/{id}/compatible (owner only)
///
/// Swap listings get a mutual-compatibility search; lease transfers get open
/// listings overlapping their lease window.
pub async fn compatible_listings(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let listing = listing_service::get_listing(&state, id).await?;
    let results = match listing.listing_type {
        ListingType::SwapRequest => {
            matching_engine::find_compatible_swaps(&state, id, &auth.uid, COMPATIBLE_LIMIT).await?
        }
        ListingType::LeaseTransfer => {
            let filters = ListingFilters {
                start_date: Some(listing.lease_start_date),
                end_date: Some(listing.lease_end_date),
                ..Default::default()
            };
            matching_engine::find_compatible_lease_transfers(
                &state,
                &auth.uid,
                &filters,
                COMPATIBLE_LIMIT,
            )
            .await?
        }
    };
    Ok(Json(DataResponse { data: results }))
}
