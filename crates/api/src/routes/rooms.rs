//! Route definitions for the `/rooms` resource.
//!
//! Reads are open to any authenticated user; writes require the admin role.
//! Rooms are deactivated through updates, never deleted.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET    /       -> list_rooms
/// POST   /       -> create_room (admin)
/// GET    /{id}   -> get_room
/// PUT    /{id}   -> update_room (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list_rooms))
        .route("/", post(rooms::create_room))
        .route("/{id}", get(rooms::get_room))
        .route("/{id}", put(rooms::update_room))
}
