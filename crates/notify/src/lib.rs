//! Best-effort notification service.
//!
//! Business notifications (bids, swap proposals, accept/reject outcomes) are
//! dispatched on a detached task after the owning database transaction has
//! committed; delivery failures are logged and never surface to the request.
//! The verification-PIN email is the one synchronous path, since the caller
//! needs to know whether the code went out.

pub mod email;
pub mod messages;

use dormex_db::models::listing::Listing;
use dormex_db::repositories::UserRepo;
use dormex_db::DbPool;

pub use email::{EmailConfig, EmailDelivery, EmailError};
use messages::EmailContent;

/// Fallback display name when the counterparty has no profile row.
const ANONYMOUS_NAME: &str = "A fellow resident";

/// Dispatches emails for exchange events. Construct once and share behind an
/// `Arc`.
pub struct Notifier {
    pool: DbPool,
    delivery: Option<EmailDelivery>,
}

impl Notifier {
    /// Build a notifier, reading SMTP settings from the environment. Without
    /// `SMTP_HOST` the notifier runs in log-only mode.
    pub fn from_env(pool: DbPool) -> Self {
        let delivery = EmailConfig::from_env().map(EmailDelivery::new);
        if delivery.is_none() {
            tracing::warn!("SMTP not configured; emails will be logged, not sent");
        }
        Self { pool, delivery }
    }

    pub fn new(pool: DbPool, delivery: Option<EmailDelivery>) -> Self {
        Self { pool, delivery }
    }

    /// Tell a listing owner about a new lease-transfer bid.
    pub fn bid_received(&self, listing: &Listing, claimant_uid: &str, message: Option<String>) {
        let listing = listing.clone();
        let claimant_uid = claimant_uid.to_string();
        self.spawn_to_user(listing.owner_uid.clone(), move |claimant_name| {
            messages::bid_received(&listing, &claimant_name, message.as_deref())
        }, Some(claimant_uid));
    }

    /// Tell a listing owner about a new swap proposal.
    pub fn swap_proposed(&self, listing: &Listing, claimant_uid: &str) {
        let listing = listing.clone();
        let claimant_uid = claimant_uid.to_string();
        self.spawn_to_user(listing.owner_uid.clone(), move |claimant_name| {
            messages::swap_proposed(&listing, &claimant_name)
        }, Some(claimant_uid));
    }

    /// Tell a claimant their bid was accepted.
    pub fn bid_accepted(&self, listing: &Listing, claimant_uid: &str) {
        let listing = listing.clone();
        self.spawn_to_user(claimant_uid.to_string(), move |_| {
            messages::bid_accepted(&listing)
        }, None);
    }

    /// Tell a claimant their bid was rejected.
    pub fn bid_rejected(&self, listing: &Listing, claimant_uid: &str) {
        let listing = listing.clone();
        self.spawn_to_user(claimant_uid.to_string(), move |_| {
            messages::bid_rejected(&listing)
        }, None);
    }

    /// Send a verification PIN. Synchronous: the caller needs the outcome.
    /// In log-only mode the PIN is traced at debug level and the call
    /// succeeds.
    pub async fn send_verification_pin(
        &self,
        to_email: &str,
        pin: &str,
        expiry_minutes: i64,
    ) -> Result<(), EmailError> {
        let content = messages::verification_pin(pin, expiry_minutes);
        match &self.delivery {
            Some(delivery) => {
                delivery
                    .send(to_email, &content.subject, &content.text, &content.html)
                    .await
            }
            None => {
                tracing::debug!(to = to_email, pin, "SMTP not configured; PIN not emailed");
                Ok(())
            }
        }
    }

    /// Resolve the recipient's email (and optionally the counterparty's
    /// display name), render, and send, all on a detached task.
    fn spawn_to_user<F>(&self, recipient_uid: String, render: F, counterparty_uid: Option<String>)
    where
        F: FnOnce(String) -> EmailContent + Send + 'static,
    {
        let Some(delivery) = self.delivery.clone() else {
            tracing::debug!(recipient = %recipient_uid, "SMTP not configured; notification skipped");
            return;
        };
        let pool = self.pool.clone();
        tokio::spawn(async move {
            let recipient = match UserRepo::find_by_uid(&pool, &recipient_uid).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    tracing::debug!(recipient = %recipient_uid, "No profile row; notification skipped");
                    return;
                }
                Err(err) => {
                    tracing::warn!(recipient = %recipient_uid, error = %err, "Recipient lookup failed");
                    return;
                }
            };
            let counterparty_name = match counterparty_uid {
                Some(uid) => UserRepo::find_by_uid(&pool, &uid)
                    .await
                    .ok()
                    .flatten()
                    .map(|u| u.full_name)
                    .unwrap_or_else(|| ANONYMOUS_NAME.to_string()),
                None => ANONYMOUS_NAME.to_string(),
            };
            let content = render(counterparty_name);
            if let Err(err) = delivery
                .send(&recipient.email, &content.subject, &content.text, &content.html)
                .await
            {
                tracing::warn!(recipient = %recipient.email, error = %err, "Notification email failed");
            }
        });
    }
}
