//! Email verification PIN model.

use dormex_core::types::{Timestamp, Uid};
use serde::Deserialize;
use sqlx::FromRow;

/// A verification row from the `email_verifications` table. One row per uid;
/// requesting a fresh PIN after expiry overwrites it.
#[derive(Debug, Clone, FromRow)]
pub struct EmailVerification {
    pub uid: Uid,
    pub email: String,
    pub pin: String,
    pub verified: bool,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl EmailVerification {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// Body for submitting a verification PIN.
#[derive(Debug, Deserialize)]
pub struct VerifyPinRequest {
    pub pin: String,
}
