//! Route definitions for the `/listings` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                  -> list_listings (paginated browse)
/// POST   /lease-transfer    -> create_lease_transfer
/// POST   /swap-request      -> create_swap_request
/// GET    /my                -> my_listings
/// GET    /{id}              -> get_listing
/// PUT    /{id}              -> update_listing
/// POST   /{id}/cancel       -> cancel_listing
/// POST   /{id}/claim        -> claim_listing
/// GET    /{id}/bids         -> listing_bids (owner only)
/// GET    /{id}/compatible   -> compatible_listings (owner only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::list_listings))
        .route("/lease-transfer", post(listings::create_lease_transfer))
        .route("/swap-request", post(listings::create_swap_request))
        .route("/my", get(listings::my_listings))
        .route("/{id}", get(listings::get_listing))
        .route("/{id}", put(listings::update_listing))
        .route("/{id}/cancel", post(listings::cancel_listing))
        .route("/{id}/claim", post(listings::claim_listing))
        .route("/{id}/bids", get(listings::listing_bids))
        .route("/{id}/compatible", get(listings::compatible_listings))
}
