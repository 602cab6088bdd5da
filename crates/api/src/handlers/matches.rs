//! Handlers for the `/matches` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use dormex_core::types::DbId;
use dormex_db::models::matches::{ContactInfo, Match, MatchFilters};
use dormex_db::models::transaction::Transaction;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::match_service;
use crate::state::AppState;

/// GET /api/v1/matches/my
pub async fn my_matches(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<MatchFilters>,
) -> AppResult<Json<DataResponse<Vec<Match>>>> {
    let matches = match_service::get_user_matches(&state, &auth.uid, filters.status).await?;
    Ok(Json(DataResponse { data: matches }))
}

/// GET /api/v1/matches/{id}
pub async fn get_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Match>>> {
    let found = match_service::get_match(&state, id, &auth.uid).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/matches/{id}/accept (listing owner only)
///
/// Acceptance creates the PENDING transaction, which is what the caller gets
/// back.
pub async fn accept_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let transaction = match_service::accept_match(&state, id, &auth.uid).await?;
    tracing::info!(match_id = %id, transaction_id = %transaction.id, "Match accepted");
    Ok(Json(DataResponse { data: transaction }))
}

/// POST /api/v1/matches/{id}/reject (listing owner only)
pub async fn reject_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Match>>> {
    let rejected = match_service::reject_match(&state, id, &auth.uid).await?;
    tracing::info!(match_id = %id, "Match rejected");
    Ok(Json(DataResponse { data: rejected }))
}

/// POST /api/v1/matches/{id}/cancel (claimant only)
pub async fn cancel_match(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Match>>> {
    let cancelled = match_service::cancel_match(&state, id, &auth.uid).await?;
    tracing::info!(match_id = %id, "Match cancelled");
    Ok(Json(DataResponse { data: cancelled }))
}

/// GET /api/v1/matches/{id}/contact
///
/// Counterparty contact details, released only once the match is ACCEPTED.
pub async fn match_contact(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactInfo>>> {
    let contact = match_service::get_match_contact(&state, id, &auth.uid).await?;
    Ok(Json(DataResponse { data: contact }))
}
