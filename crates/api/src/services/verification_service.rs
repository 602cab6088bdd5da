//! Email verification by 6-digit PIN.

use chrono::{Duration, Utc};
use dormex_core::error::CoreError;
use dormex_db::models::verification::EmailVerification;
use dormex_db::repositories::VerificationRepo;
use rand::Rng;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Send a verification PIN to the user's email. An unexpired, unverified PIN
/// is re-sent instead of rotated, so repeated requests cannot be used to
/// fish for fresh codes.
pub async fn send_pin(state: &AppState, uid: &str, email: &str) -> AppResult<EmailVerification> {
    let now = Utc::now();
    let existing = VerificationRepo::find_by_uid(&state.pool, uid).await?;

    let record = match existing {
        Some(record) if record.verified => {
            return Err(CoreError::Conflict("email is already verified".into()).into());
        }
        Some(record) if !record.is_expired(now) => record,
        _ => {
            let pin = generate_pin();
            let expires_at = now + Duration::minutes(state.config.exchange.pin_expiry_minutes);
            VerificationRepo::upsert_pin(&state.pool, uid, email, &pin, expires_at).await?
        }
    };

    state
        .notifier
        .send_verification_pin(
            &record.email,
            &record.pin,
            state.config.exchange.pin_expiry_minutes,
        )
        .await
        .map_err(|err| AppError::InternalError(format!("failed to send PIN email: {err}")))?;

    Ok(record)
}

/// Check a submitted PIN and mark the email verified on success.
pub async fn verify_pin(state: &AppState, uid: &str, pin: &str) -> AppResult<()> {
    let record = VerificationRepo::find_by_uid(&state.pool, uid)
        .await?
        .ok_or_else(|| CoreError::NotFound("Verification".into()))?;

    if record.verified {
        return Err(CoreError::Conflict("email is already verified".into()).into());
    }
    if record.is_expired(Utc::now()) {
        return Err(CoreError::Conflict("verification code has expired".into()).into());
    }
    if record.pin != pin {
        return Err(CoreError::Conflict("verification code does not match".into()).into());
    }

    VerificationRepo::mark_verified(&state.pool, uid).await?;
    tracing::info!(uid, "Email verified");
    Ok(())
}

pub async fn is_verified(state: &AppState, uid: &str) -> AppResult<bool> {
    Ok(VerificationRepo::find_by_uid(&state.pool, uid)
        .await?
        .map(|record| record.verified)
        .unwrap_or(false))
}

/// Zero-padded 6-digit PIN.
fn generate_pin() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_is_six_digits() {
        for _ in 0..100 {
            let pin = generate_pin();
            assert_eq!(pin.len(), 6);
            assert!(pin.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
