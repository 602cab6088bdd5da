//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods. The
//! first argument is any Postgres executor, so the same query runs against
//! the pool or inside an open transaction.

pub mod listing_repo;
pub mod match_repo;
pub mod room_repo;
pub mod transaction_repo;
pub mod user_repo;
pub mod verification_repo;

pub use listing_repo::ListingRepo;
pub use match_repo::MatchRepo;
pub use room_repo::RoomRepo;
pub use transaction_repo::TransactionRepo;
pub use user_repo::UserRepo;
pub use verification_repo::VerificationRepo;
