//! Route definitions for the `/users` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /        -> create_profile
/// GET    /me      -> get_me
/// PUT    /me      -> update_me
/// GET    /{uid}   -> get_user (public projection)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create_profile))
        .route("/me", get(users::get_me))
        .route("/me", put(users::update_me))
        .route("/{uid}", get(users::get_user))
}
