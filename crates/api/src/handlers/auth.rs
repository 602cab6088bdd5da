//! Handlers for the `/auth` resource: email verification and identity
//! status. Token issuance itself belongs to the identity provider.

use axum::extract::State;
use axum::Json;
use dormex_db::models::verification::VerifyPinRequest;
use dormex_db::repositories::UserRepo;
use serde::Serialize;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::services::verification_service;
use crate::state::AppState;

/// Response for `GET /auth/status`.
#[derive(Debug, Serialize)]
pub struct AuthStatus {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub has_profile: bool,
}

/// POST /api/v1/auth/send-verification
///
/// Email a verification PIN to the authenticated user's address.
pub async fn send_verification(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let record = verification_service::send_pin(&state, &auth.uid, &auth.email).await?;
    Ok(Json(json!({
        "data": { "email": record.email, "expires_at": record.expires_at }
    })))
}

/// POST /api/v1/auth/verify-pin
///
/// Submit the PIN received by email.
pub async fn verify_pin(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<VerifyPinRequest>,
) -> AppResult<Json<serde_json::Value>> {
    verification_service::verify_pin(&state, &auth.uid, &body.pin).await?;
    Ok(Json(json!({ "data": { "verified": true } })))
}

/// GET /api/v1/auth/verification-status
pub async fn verification_status(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let verified = verification_service::is_verified(&state, &auth.uid).await?;
    Ok(Json(json!({ "data": { "verified": verified } })))
}

/// GET /api/v1/auth/status
///
/// Combined identity snapshot: token subject, verification, profile
/// existence.
pub async fn status(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let email_verified = verification_service::is_verified(&state, &auth.uid).await?;
    let has_profile = UserRepo::find_by_uid(&state.pool, &auth.uid).await?.is_some();
    let status = AuthStatus {
        uid: auth.uid,
        email: auth.email,
        email_verified,
        has_profile,
    };
    Ok(Json(json!({ "data": status })))
}
