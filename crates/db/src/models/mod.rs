//! Row structs and request/response DTOs shared by the repositories and the
//! API layer.

pub mod listing;
pub mod matches;
pub mod room;
pub mod transaction;
pub mod user;
pub mod verification;
