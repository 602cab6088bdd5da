//! Handlers for the `/transactions` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use dormex_core::types::DbId;
use dormex_db::models::transaction::{Transaction, TransactionFilters};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::transaction_service;
use crate::state::AppState;

/// GET /api/v1/transactions/my
pub async fn my_transactions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<TransactionFilters>,
) -> AppResult<Json<DataResponse<Vec<Transaction>>>> {
    let transactions =
        transaction_service::get_user_transactions(&state, &auth.uid, filters.status).await?;
    Ok(Json(DataResponse { data: transactions }))
}

/// GET /api/v1/transactions/{id}
pub async fn get_transaction(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let found = transaction_service::get_transaction(&state, id, &auth.uid).await?;
    Ok(Json(DataResponse { data: found }))
}

/// POST /api/v1/transactions/{id}/confirm
///
/// Executes the occupancy handover for a PENDING transaction.
pub async fn confirm_transaction(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let transaction = transaction_service::confirm_transaction(&state, id, &auth.uid).await?;
    tracing::info!(transaction_id = %id, "Transaction confirmed");
    Ok(Json(DataResponse { data: transaction }))
}

/// POST /api/v1/transactions/{id}/cancel
pub async fn cancel_transaction(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Transaction>>> {
    let transaction = transaction_service::cancel_transaction(&state, id, &auth.uid).await?;
    tracing::info!(transaction_id = %id, "Transaction cancelled");
    Ok(Json(DataResponse { data: transaction }))
}
