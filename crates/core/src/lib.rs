//! Pure domain layer for the dorm lease exchange: shared types, the error
//! taxonomy, listing/match/transaction status enums, the listing state
//! machine, and the swap compatibility rules.
//!
//! Nothing in this crate performs I/O; the db and api crates build on it.

pub mod error;
pub mod matching;
pub mod state_machine;
pub mod status;
pub mod types;
