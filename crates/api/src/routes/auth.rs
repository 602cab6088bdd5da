//! Route definitions for the `/auth` resource.
//!
//! Token issuance lives with the identity provider; these endpoints cover
//! email verification and identity status for an already-authenticated user.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /send-verification    -> send_verification
/// POST   /verify-pin           -> verify_pin
/// GET    /verification-status  -> verification_status
/// GET    /status               -> status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-verification", post(auth::send_verification))
        .route("/verify-pin", post(auth::verify_pin))
        .route("/verification-status", get(auth::verification_status))
        .route("/status", get(auth::status))
}
