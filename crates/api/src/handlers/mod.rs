//! Request handlers, grouped by resource.

pub mod auth;
pub mod listings;
pub mod matches;
pub mod rooms;
pub mod transactions;
pub mod users;
