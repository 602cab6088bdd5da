//! User profile model and DTOs.

use dormex_core::types::{DbId, Timestamp, Uid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A profile row from the `users` table, keyed by the identity provider's
/// subject string.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct UserProfile {
    pub uid: Uid,
    pub email: String,
    pub full_name: String,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub current_room_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Input for creating a profile. Uid and email come from the verified token,
/// never from the body.
#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub full_name: String,
    pub student_id: Option<String>,
    pub phone: Option<String>,
}

/// Input for updating a profile (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
}
