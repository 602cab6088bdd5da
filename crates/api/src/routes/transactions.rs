//! Route definitions for the `/transactions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::transactions;
use crate::state::AppState;

/// Routes mounted at `/transactions`.
///
/// ```text
/// GET    /my             -> my_transactions (?status)
/// GET    /{id}           -> get_transaction
/// POST   /{id}/confirm   -> confirm_transaction
/// POST   /{id}/cancel    -> cancel_transaction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/my", get(transactions::my_transactions))
        .route("/{id}", get(transactions::get_transaction))
        .route("/{id}/confirm", post(transactions::confirm_transaction))
        .route("/{id}/cancel", post(transactions::cancel_transaction))
}
