//! Handlers for the `/rooms` resource. Writes are admin-only; rooms are
//! deactivated, never deleted.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use dormex_core::error::CoreError;
use dormex_core::types::DbId;
use dormex_db::models::room::{CreateRoom, Room, RoomFilters, UpdateRoom};
use dormex_db::repositories::{RoomRepo, UserRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/rooms
pub async fn list_rooms(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filters): Query<RoomFilters>,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let rooms = RoomRepo::list(&state.pool, &filters).await?;
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/rooms/{id}
pub async fn get_room(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Room>>> {
    let room = RoomRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    Ok(Json(DataResponse { data: room }))
}

/// POST /api/v1/rooms (admin only)
pub async fn create_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateRoom>,
) -> AppResult<(StatusCode, Json<DataResponse<Room>>)> {
    require_admin(&state, &auth.uid).await?;
    let room = RoomRepo::create(&state.pool, &body).await?;
    tracing::info!(room_id = %room.id, "Room created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: room })))
}

/// PUT /api/v1/rooms/{id} (admin only)
pub async fn update_room(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateRoom>,
) -> AppResult<Json<DataResponse<Room>>> {
    require_admin(&state, &auth.uid).await?;
    let room = RoomRepo::update(&state.pool, id, &body)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    Ok(Json(DataResponse { data: room }))
}

/// Room writes require the `admin` role on the caller's profile.
async fn require_admin(state: &AppState, uid: &str) -> AppResult<()> {
    let profile = UserRepo::find_by_uid(&state.pool, uid)
        .await?
        .ok_or_else(|| CoreError::Forbidden("room management requires an admin profile".into()))?;
    if !profile.is_admin() {
        return Err(CoreError::Forbidden("room management requires the admin role".into()).into());
    }
    Ok(())
}
