//! Business services.
//!
//! Every mutating operation runs inside a SERIALIZABLE transaction and
//! performs all of its reads before its first write, so the store's conflict
//! detection covers the whole read set. Business errors abort the transaction
//! and propagate untouched; only serialization conflicts are retried, up to
//! [`dormex_db::MAX_TX_ATTEMPTS`].

pub mod listing_service;
pub mod match_service;
pub mod matching_engine;
pub mod transaction_service;
pub mod verification_service;

use std::future::Future;

use crate::error::AppError;

/// Re-run a transactional operation while it fails with a retryable
/// serialization conflict. Any other outcome is returned as-is.
pub(crate) async fn with_tx_retry<T, F, Fut>(mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(AppError::Database(err))
                if dormex_db::is_retryable(&err) && attempt < dormex_db::MAX_TX_ATTEMPTS =>
            {
                tracing::warn!(attempt, "Serialization conflict, retrying transaction");
                attempt += 1;
            }
            other => return other,
        }
    }
}
