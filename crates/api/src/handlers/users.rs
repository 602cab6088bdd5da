//! Handlers for the `/users` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dormex_core::error::CoreError;
use dormex_db::models::user::{CreateProfile, UpdateProfile, UserProfile};
use dormex_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Public projection of a profile: what other residents may see.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub uid: String,
    pub full_name: String,
    pub current_room_id: Option<dormex_core::types::DbId>,
}

/// POST /api/v1/users
///
/// Create the authenticated user's profile. Uid and email come from the
/// verified token; a duplicate create maps to 409.
pub async fn create_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateProfile>,
) -> AppResult<(StatusCode, Json<DataResponse<UserProfile>>)> {
    let profile = UserRepo::create(&state.pool, &auth.uid, &auth.email, &body).await?;
    tracing::info!(uid = %auth.uid, "Profile created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: profile })))
}

/// GET /api/v1/users/me
pub async fn get_me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = UserRepo::find_by_uid(&state.pool, &auth.uid)
        .await?
        .ok_or_else(|| CoreError::NotFound("Profile".into()))?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/users/me
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateProfile>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let profile = UserRepo::update(&state.pool, &auth.uid, &body)
        .await?
        .ok_or_else(|| CoreError::NotFound("Profile".into()))?;
    Ok(Json(DataResponse { data: profile }))
}

/// GET /api/v1/users/{uid}
///
/// Public projection of another resident's profile.
pub async fn get_user(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let profile = UserRepo::find_by_uid(&state.pool, &uid)
        .await?
        .ok_or_else(|| CoreError::NotFound("Profile".into()))?;
    Ok(Json(DataResponse {
        data: PublicProfile {
            uid: profile.uid,
            full_name: profile.full_name,
            current_room_id: profile.current_room_id,
        },
    }))
}
