//! HTTP surface for the dorm lease exchange: axum routes and handlers, the
//! transactional business services, JWT auth, and server configuration.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
