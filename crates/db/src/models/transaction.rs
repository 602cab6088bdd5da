//! Transaction (execution record) models.

use chrono::NaiveDate;
use dormex_core::status::{TransactionStatus, TransactionType};
use dormex_core::types::{DbId, Timestamp, Uid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A transaction row from the `transactions` table. Lease transfers fill the
/// from/to/room columns; swaps fill the party columns and `match_ids`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: DbId,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub match_id: Option<DbId>,
    pub match_ids: Vec<DbId>,
    pub from_uid: Option<Uid>,
    pub to_uid: Option<Uid>,
    pub room_id: Option<DbId>,
    pub party_a_uid: Option<Uid>,
    pub party_b_uid: Option<Uid>,
    pub party_a_room_id: Option<DbId>,
    pub party_b_room_id: Option<DbId>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
    pub initiated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub failed_at: Option<Timestamp>,
    pub failure_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Transaction {
    /// Whether `uid` is one of the transaction's named parties.
    pub fn involves(&self, uid: &str) -> bool {
        [
            self.from_uid.as_deref(),
            self.to_uid.as_deref(),
            self.party_a_uid.as_deref(),
            self.party_b_uid.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|p| p == uid)
    }
}

/// Fully resolved insert form for a transaction, built by the match service
/// at acceptance time.
#[derive(Debug)]
pub struct NewTransaction {
    pub id: DbId,
    pub transaction_type: TransactionType,
    pub match_id: Option<DbId>,
    pub match_ids: Vec<DbId>,
    pub from_uid: Option<Uid>,
    pub to_uid: Option<Uid>,
    pub room_id: Option<DbId>,
    pub party_a_uid: Option<Uid>,
    pub party_b_uid: Option<Uid>,
    pub party_a_room_id: Option<DbId>,
    pub party_b_room_id: Option<DbId>,
    pub lease_start_date: Option<NaiveDate>,
    pub lease_end_date: Option<NaiveDate>,
}

/// Query parameters for a user's transaction list.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionFilters {
    pub status: Option<TransactionStatus>,
}
