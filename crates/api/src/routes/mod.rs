pub mod auth;
pub mod health;
pub mod listings;
pub mod matches;
pub mod rooms;
pub mod transactions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/send-verification                send PIN email (POST)
/// /auth/verify-pin                       submit PIN (POST)
/// /auth/verification-status              verification flag (GET)
/// /auth/status                           identity snapshot (GET)
///
/// /users                                 create profile (POST)
/// /users/me                              get, update own profile
/// /users/{uid}                           public projection (GET)
///
/// /rooms                                 list (GET), create (POST, admin)
/// /rooms/{id}                            get (GET), update (PUT, admin)
///
/// /listings                              browse open listings (GET, paginated)
/// /listings/lease-transfer               create lease transfer (POST)
/// /listings/swap-request                 create swap request (POST)
/// /listings/my                           own listings (GET)
/// /listings/{id}                         get, update
/// /listings/{id}/cancel                  cancel (POST)
/// /listings/{id}/claim                   bid or swap proposal (POST)
/// /listings/{id}/bids                    bids on own listing (GET)
/// /listings/{id}/compatible              compatibility search (GET)
///
/// /matches/my                            own matches (GET, ?status)
/// /matches/{id}                          get
/// /matches/{id}/accept                   accept, creates transaction (POST)
/// /matches/{id}/reject                   reject (POST)
/// /matches/{id}/cancel                   withdraw (POST)
/// /matches/{id}/contact                  counterparty contact (GET)
///
/// /transactions/my                       own transactions (GET, ?status)
/// /transactions/{id}                     get
/// /transactions/{id}/confirm             execute handover (POST)
/// /transactions/{id}/cancel              cancel (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Email verification and identity status.
        .nest("/auth", auth::router())
        // User profiles.
        .nest("/users", users::router())
        // Room inventory (writes are admin-only).
        .nest("/rooms", rooms::router())
        // Listings: creation, browse, claims.
        .nest("/listings", listings::router())
        // Matches: bids and swap legs.
        .nest("/matches", matches::router())
        // Transactions: execution records.
        .nest("/transactions", transactions::router())
}
