//! Message templates for business notifications.
//!
//! Each builder returns subject plus plain-text and HTML bodies; the HTML
//! variant is intentionally minimal.

use dormex_db::models::listing::Listing;

/// A rendered email: subject, plain-text body, HTML body.
#[derive(Debug, Clone)]
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

fn listing_label(listing: &Listing) -> String {
    format!(
        "{} (category {:?}, {} to {})",
        listing.room_building, listing.room_category, listing.lease_start_date,
        listing.lease_end_date
    )
}

/// Notify a listing owner that a new bid arrived.
pub fn bid_received(listing: &Listing, claimant_name: &str, message: Option<&str>) -> EmailContent {
    let label = listing_label(listing);
    let note = message
        .map(|m| format!("\nMessage from the bidder:\n{m}\n"))
        .unwrap_or_default();
    EmailContent {
        subject: "New bid on your listing".to_string(),
        text: format!(
            "Hi,\n\n{claimant_name} placed a bid on your listing for {label}.{note}\n\
             Sign in to review and respond.\n"
        ),
        html: format!(
            "<p>Hi,</p>\
             <p><strong>{claimant_name}</strong> placed a bid on your listing for {label}.</p>\
             {}<p>Sign in to review and respond.</p>",
            message
                .map(|m| format!("<p>Message from the bidder:</p><blockquote>{m}</blockquote>"))
                .unwrap_or_default()
        ),
    }
}

/// Notify a swap-listing owner that another resident proposed a swap.
pub fn swap_proposed(listing: &Listing, claimant_name: &str) -> EmailContent {
    let label = listing_label(listing);
    EmailContent {
        subject: "Swap proposal received".to_string(),
        text: format!(
            "Hi,\n\n{claimant_name} proposed a room swap against your listing for {label}.\n\
             Sign in to review the proposal.\n"
        ),
        html: format!(
            "<p>Hi,</p>\
             <p><strong>{claimant_name}</strong> proposed a room swap against your listing \
             for {label}.</p>\
             <p>Sign in to review the proposal.</p>"
        ),
    }
}

/// Notify a claimant that their bid was accepted.
pub fn bid_accepted(listing: &Listing) -> EmailContent {
    let label = listing_label(listing);
    EmailContent {
        subject: "Your bid was accepted".to_string(),
        text: format!(
            "Good news!\n\nYour bid on the listing for {label} was accepted.\n\
             Sign in to confirm the handover and exchange contact details.\n"
        ),
        html: format!(
            "<p>Good news!</p>\
             <p>Your bid on the listing for {label} was <strong>accepted</strong>.</p>\
             <p>Sign in to confirm the handover and exchange contact details.</p>"
        ),
    }
}

/// Notify a claimant that their bid was rejected.
pub fn bid_rejected(listing: &Listing) -> EmailContent {
    let label = listing_label(listing);
    EmailContent {
        subject: "Update on your bid".to_string(),
        text: format!(
            "Hi,\n\nYour bid on the listing for {label} was not accepted this time.\n\
             The listing may still be open for other offers.\n"
        ),
        html: format!(
            "<p>Hi,</p>\
             <p>Your bid on the listing for {label} was not accepted this time.</p>\
             <p>The listing may still be open for other offers.</p>"
        ),
    }
}

/// Verification PIN email.
pub fn verification_pin(pin: &str, expiry_minutes: i64) -> EmailContent {
    EmailContent {
        subject: "Your verification code".to_string(),
        text: format!(
            "Your verification code is {pin}.\n\
             It expires in {expiry_minutes} minutes.\n"
        ),
        html: format!(
            "<p>Your verification code is:</p>\
             <p style=\"font-size:24px\"><strong>{pin}</strong></p>\
             <p>It expires in {expiry_minutes} minutes.</p>"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use dormex_core::status::{ListingStatus, ListingType, RoomCategory};
    use uuid::Uuid;

    fn listing() -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::new_v4(),
            listing_type: ListingType::LeaseTransfer,
            status: ListingStatus::Open,
            version: 1,
            owner_uid: "owner-1".to_string(),
            room_id: Uuid::new_v4(),
            room_category: RoomCategory::A,
            room_building: "North Hall".to_string(),
            lease_start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            lease_end_date: NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(),
            description: None,
            asking_price: None,
            move_in_date: None,
            desired_categories: Vec::new(),
            desired_buildings: Vec::new(),
            desired_min_start: None,
            desired_max_end: None,
            replacement_match_id: None,
            target_match_id: None,
            expires_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn bid_received_includes_claimant_and_message() {
        let content = bid_received(&listing(), "Alex Kim", Some("Still available?"));
        assert_eq!(content.subject, "New bid on your listing");
        assert!(content.text.contains("Alex Kim"));
        assert!(content.text.contains("Still available?"));
        assert!(content.html.contains("North Hall"));
    }

    #[test]
    fn bid_received_without_message_omits_quote() {
        let content = bid_received(&listing(), "Alex Kim", None);
        assert!(!content.text.contains("Message from the bidder"));
        assert!(!content.html.contains("blockquote"));
    }

    #[test]
    fn verification_pin_includes_code_and_expiry() {
        let content = verification_pin("482913", 10);
        assert!(content.text.contains("482913"));
        assert!(content.text.contains("10 minutes"));
        assert!(content.html.contains("482913"));
    }
}
