//! Route definitions for the `/matches` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::matches;
use crate::state::AppState;

/// Routes mounted at `/matches`.
///
/// ```text
/// GET    /my             -> my_matches (?status)
/// GET    /{id}           -> get_match
/// POST   /{id}/accept    -> accept_match (owner only, returns transaction)
/// POST   /{id}/reject    -> reject_match (owner only)
/// POST   /{id}/cancel    -> cancel_match (claimant only)
/// GET    /{id}/contact   -> match_contact (accepted matches only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my", get(matches::my_matches))
        .route("/{id}", get(matches::get_match))
        .route("/{id}/accept", post(matches::accept_match))
        .route("/{id}/reject", post(matches::reject_match))
        .route("/{id}/cancel", post(matches::cancel_match))
        .route("/{id}/contact", get(matches::match_contact))
}
