//! Match (bid) lifecycle: accept, reject, cancel, contact exchange, and the
//! user- and listing-scoped match lists.
//!
//! Accepting a match is the pivot of the whole exchange: it advances the
//! listing(s) to PENDING_APPROVAL, cancels every competing bid, and creates
//! the single PENDING transaction that a party later confirms.

use dormex_core::error::CoreError;
use dormex_core::state_machine;
use dormex_core::status::{ListingStatus, MatchStatus, TransactionType};
use dormex_core::types::DbId;
use dormex_db::models::listing::Listing;
use dormex_db::models::matches::{ContactInfo, Match};
use dormex_db::models::transaction::{NewTransaction, Transaction};
use dormex_db::repositories::{ListingRepo, MatchRepo, TransactionRepo, UserRepo};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::with_tx_retry;
use crate::state::AppState;

pub async fn get_match(state: &AppState, id: DbId, requester_uid: &str) -> AppResult<Match> {
    let found = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    let listing = ListingRepo::find_by_id(&state.pool, found.listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if found.claimant_uid != requester_uid && listing.owner_uid != requester_uid {
        return Err(CoreError::Forbidden("you are not a party to this match".into()).into());
    }
    Ok(found)
}

/// Matches where the user is the claimant or owns the listing.
pub async fn get_user_matches(
    state: &AppState,
    uid: &str,
    status: Option<MatchStatus>,
) -> AppResult<Vec<Match>> {
    Ok(MatchRepo::list_for_user(&state.pool, uid, status).await?)
}

/// Owner-only list of bids on a listing.
pub async fn get_listing_bids(
    state: &AppState,
    listing_id: DbId,
    requester_uid: &str,
) -> AppResult<Vec<Match>> {
    let listing = ListingRepo::find_by_id(&state.pool, listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != requester_uid {
        return Err(CoreError::Forbidden("only the owner may view bids".into()).into());
    }
    Ok(MatchRepo::list_for_listing(&state.pool, listing_id).await?)
}

/// Accept a PROPOSED match: match ACCEPTED, listing PENDING_APPROVAL,
/// sibling bids cancelled, paired swap leg mirrored, one PENDING transaction
/// created.
pub async fn accept_match(state: &AppState, id: DbId, owner_uid: &str) -> AppResult<Transaction> {
    let (transaction, listing, claimant_uid) =
        with_tx_retry(|| try_accept_match(state, id, owner_uid)).await?;
    state.notifier.bid_accepted(&listing, &claimant_uid);
    Ok(transaction)
}

async fn try_accept_match(
    state: &AppState,
    id: DbId,
    owner_uid: &str,
) -> AppResult<(Transaction, Listing, String)> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    // Reads, all of them, before the first write.
    let accepted = MatchRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    let listing = ListingRepo::find_by_id(&mut *tx, accepted.listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != owner_uid {
        return Err(CoreError::Forbidden("only the listing owner may accept".into()).into());
    }
    if accepted.status != MatchStatus::Proposed {
        return Err(CoreError::Conflict("match is not awaiting a response".into()).into());
    }
    let pair = match accepted.paired_match_id {
        Some(pair_id) => {
            let pair = MatchRepo::find_by_id(&mut *tx, pair_id)
                .await?
                .ok_or_else(|| CoreError::NotFound("Match".into()))?;
            let pair_listing = ListingRepo::find_by_id(&mut *tx, pair.listing_id)
                .await?
                .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
            Some((pair, pair_listing))
        }
        None => None,
    };

    state_machine::assert_allowed(
        listing.listing_type,
        listing.status,
        ListingStatus::PendingApproval,
    )?;
    if let Some((_, pair_listing)) = &pair {
        state_machine::assert_allowed(
            pair_listing.listing_type,
            pair_listing.status,
            ListingStatus::PendingApproval,
        )?;
    }

    // Writes.
    MatchRepo::respond(&mut *tx, accepted.id, MatchStatus::Accepted).await?;
    ListingRepo::set_status(&mut *tx, listing.id, ListingStatus::PendingApproval).await?;
    MatchRepo::cancel_proposed_for_listing(&mut *tx, listing.id, Some(accepted.id)).await?;

    if let Some((pair, pair_listing)) = &pair {
        MatchRepo::respond(&mut *tx, pair.id, MatchStatus::Accepted).await?;
        ListingRepo::set_status(&mut *tx, pair_listing.id, ListingStatus::PendingApproval).await?;
        MatchRepo::cancel_proposed_for_listing(&mut *tx, pair_listing.id, Some(pair.id)).await?;
    }

    let new_transaction = match &pair {
        // Swap: both parties, both rooms, both match ids. Party B's room is
        // the one the accepted leg offered, i.e. the paired listing's room.
        Some((pair, pair_listing)) => NewTransaction {
            id: Uuid::new_v4(),
            transaction_type: TransactionType::Swap,
            match_id: None,
            match_ids: vec![accepted.id, pair.id],
            from_uid: None,
            to_uid: None,
            room_id: None,
            party_a_uid: Some(listing.owner_uid.clone()),
            party_b_uid: Some(accepted.claimant_uid.clone()),
            party_a_room_id: Some(listing.room_id),
            party_b_room_id: Some(pair_listing.room_id),
            lease_start_date: Some(listing.lease_start_date),
            lease_end_date: Some(listing.lease_end_date),
        },
        None => NewTransaction {
            id: Uuid::new_v4(),
            transaction_type: TransactionType::LeaseTransfer,
            match_id: Some(accepted.id),
            match_ids: Vec::new(),
            from_uid: Some(listing.owner_uid.clone()),
            to_uid: Some(accepted.claimant_uid.clone()),
            room_id: Some(listing.room_id),
            party_a_uid: None,
            party_b_uid: None,
            party_a_room_id: None,
            party_b_room_id: None,
            lease_start_date: Some(listing.lease_start_date),
            lease_end_date: Some(listing.lease_end_date),
        },
    };
    let transaction = TransactionRepo::create(&mut *tx, &new_transaction).await?;

    tx.commit().await?;
    tracing::info!(
        match_id = %accepted.id,
        transaction_id = %transaction.id,
        "Match accepted"
    );
    Ok((transaction, listing, accepted.claimant_uid))
}

/// Reject a PROPOSED match. Under the bidding model an OPEN listing stays
/// OPEN; a listing in any other status is reopened via a validated
/// transition. A still-PROPOSED paired leg is mirrored.
pub async fn reject_match(state: &AppState, id: DbId, owner_uid: &str) -> AppResult<Match> {
    let (rejected, listing) = with_tx_retry(|| try_reject_match(state, id, owner_uid)).await?;
    state.notifier.bid_rejected(&listing, &rejected.claimant_uid);
    Ok(rejected)
}

async fn try_reject_match(
    state: &AppState,
    id: DbId,
    owner_uid: &str,
) -> AppResult<(Match, Listing)> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let rejected = MatchRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    let listing = ListingRepo::find_by_id(&mut *tx, rejected.listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
    if listing.owner_uid != owner_uid {
        return Err(CoreError::Forbidden("only the listing owner may reject".into()).into());
    }
    if rejected.status != MatchStatus::Proposed {
        return Err(CoreError::Conflict("match is not awaiting a response".into()).into());
    }
    let pair = match rejected.paired_match_id {
        Some(pair_id) => {
            let pair = MatchRepo::find_by_id(&mut *tx, pair_id)
                .await?
                .ok_or_else(|| CoreError::NotFound("Match".into()))?;
            let pair_listing = ListingRepo::find_by_id(&mut *tx, pair.listing_id)
                .await?
                .ok_or_else(|| CoreError::NotFound("Listing".into()))?;
            Some((pair, pair_listing))
        }
        None => None,
    };

    if listing.status != ListingStatus::Open {
        state_machine::assert_allowed(listing.listing_type, listing.status, ListingStatus::Open)?;
    }
    if let Some((pair, pair_listing)) = &pair {
        if pair.status == MatchStatus::Proposed && pair_listing.status != ListingStatus::Open {
            state_machine::assert_allowed(
                pair_listing.listing_type,
                pair_listing.status,
                ListingStatus::Open,
            )?;
        }
    }

    MatchRepo::respond(&mut *tx, rejected.id, MatchStatus::Rejected).await?;
    if listing.status != ListingStatus::Open {
        ListingRepo::set_status(&mut *tx, listing.id, ListingStatus::Open).await?;
    }
    if let Some((pair, pair_listing)) = &pair {
        if pair.status == MatchStatus::Proposed {
            MatchRepo::respond(&mut *tx, pair.id, MatchStatus::Rejected).await?;
            if pair_listing.status != ListingStatus::Open {
                ListingRepo::set_status(&mut *tx, pair_listing.id, ListingStatus::Open).await?;
            }
        }
    }

    tx.commit().await?;
    tracing::info!(match_id = %rejected.id, "Match rejected");
    let refreshed = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    Ok((refreshed, listing))
}

/// Claimant-only withdrawal of a PROPOSED bid; mirrors to a still-PROPOSED
/// paired leg.
pub async fn cancel_match(state: &AppState, id: DbId, claimant_uid: &str) -> AppResult<Match> {
    with_tx_retry(|| try_cancel_match(state, id, claimant_uid)).await
}

async fn try_cancel_match(state: &AppState, id: DbId, claimant_uid: &str) -> AppResult<Match> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let cancelled = MatchRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    if cancelled.claimant_uid != claimant_uid {
        return Err(CoreError::Forbidden("only the claimant may withdraw a bid".into()).into());
    }
    if cancelled.status != MatchStatus::Proposed {
        return Err(CoreError::Conflict("match is not awaiting a response".into()).into());
    }
    let pair = match cancelled.paired_match_id {
        Some(pair_id) => MatchRepo::find_by_id(&mut *tx, pair_id).await?,
        None => None,
    };

    MatchRepo::respond(&mut *tx, cancelled.id, MatchStatus::Cancelled).await?;
    if let Some(pair) = pair {
        if pair.status == MatchStatus::Proposed {
            MatchRepo::set_status(&mut *tx, pair.id, MatchStatus::Cancelled).await?;
        }
    }

    tx.commit().await?;
    tracing::info!(match_id = %cancelled.id, "Match withdrawn");
    let refreshed = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    Ok(refreshed)
}

/// Counterparty contact details, gated to ACCEPTED matches and the two
/// parties.
pub async fn get_match_contact(
    state: &AppState,
    id: DbId,
    requester_uid: &str,
) -> AppResult<ContactInfo> {
    let found = MatchRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Match".into()))?;
    if found.status != MatchStatus::Accepted {
        return Err(
            CoreError::Conflict("contact details are shared once a match is accepted".into())
                .into(),
        );
    }
    let listing = ListingRepo::find_by_id(&state.pool, found.listing_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Listing".into()))?;

    let counterparty_uid = if requester_uid == listing.owner_uid {
        &found.claimant_uid
    } else if requester_uid == found.claimant_uid {
        &listing.owner_uid
    } else {
        return Err(CoreError::Forbidden("you are not a party to this match".into()).into());
    };

    let counterparty = UserRepo::find_by_uid(&state.pool, counterparty_uid)
        .await?
        .ok_or_else(|| CoreError::NotFound("User".into()))?;
    Ok(ContactInfo {
        full_name: counterparty.full_name,
        email: counterparty.email,
        phone: counterparty.phone,
    })
}
