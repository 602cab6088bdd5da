//! Transaction confirmation and cancellation: the only code that moves room
//! occupancy and users' current rooms.

use dormex_core::error::CoreError;
use dormex_core::state_machine;
use dormex_core::status::{ListingStatus, MatchStatus, TransactionStatus, TransactionType};
use dormex_core::types::DbId;
use dormex_db::models::matches::Match;
use dormex_db::models::transaction::Transaction;
use dormex_db::repositories::{ListingRepo, MatchRepo, RoomRepo, TransactionRepo, UserRepo};
use sqlx::{Postgres, Transaction as SqlTx};

use crate::error::AppResult;
use crate::services::with_tx_retry;
use crate::state::AppState;

pub async fn get_transaction(
    state: &AppState,
    id: DbId,
    requester_uid: &str,
) -> AppResult<Transaction> {
    let found = TransactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Transaction".into()))?;
    if !found.involves(requester_uid) {
        return Err(CoreError::Forbidden("you are not a party to this transaction".into()).into());
    }
    Ok(found)
}

pub async fn get_user_transactions(
    state: &AppState,
    uid: &str,
    status: Option<TransactionStatus>,
) -> AppResult<Vec<Transaction>> {
    Ok(TransactionRepo::list_for_user(&state.pool, uid, status).await?)
}

/// Confirm a PENDING transaction, executing the occupancy mutation.
pub async fn confirm_transaction(state: &AppState, id: DbId, uid: &str) -> AppResult<Transaction> {
    with_tx_retry(|| try_confirm_transaction(state, id, uid)).await
}

async fn try_confirm_transaction(state: &AppState, id: DbId, uid: &str) -> AppResult<Transaction> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let record = TransactionRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Transaction".into()))?;
    if record.status != TransactionStatus::Pending {
        return Err(CoreError::Conflict("transaction is not pending".into()).into());
    }
    if !record.involves(uid) {
        return Err(CoreError::Forbidden("you are not a party to this transaction".into()).into());
    }

    match record.transaction_type {
        TransactionType::LeaseTransfer => confirm_lease_transfer(&mut tx, &record).await?,
        TransactionType::Swap => confirm_swap(&mut tx, &record).await?,
    }

    TransactionRepo::complete(&mut *tx, record.id).await?;
    tx.commit().await?;
    tracing::info!(transaction_id = %record.id, "Transaction confirmed");

    let refreshed = TransactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Transaction".into()))?;
    Ok(refreshed)
}

async fn confirm_lease_transfer(
    tx: &mut SqlTx<'static, Postgres>,
    record: &Transaction,
) -> AppResult<()> {
    let (room_id, from_uid, to_uid) = match (&record.room_id, &record.from_uid, &record.to_uid) {
        (Some(room_id), Some(from_uid), Some(to_uid)) => (*room_id, from_uid, to_uid),
        _ => {
            return Err(
                CoreError::Internal("lease-transfer transaction missing parties".into()).into(),
            )
        }
    };

    // Reads.
    let room = RoomRepo::find_by_id(&mut **tx, room_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    let (accepted, listing) = read_match_and_listing(tx, record.match_id).await?;

    // Stale-confirm guard: the room must still belong to the outgoing party.
    if room.occupant_uid.as_deref() != Some(from_uid.as_str()) {
        return Err(CoreError::Conflict("the room's occupant has changed".into()).into());
    }
    if let Some(listing) = &listing {
        state_machine::assert_allowed(
            listing.listing_type,
            listing.status,
            ListingStatus::Completed,
        )?;
    }

    // Writes.
    RoomRepo::set_occupant(&mut **tx, room_id, Some(to_uid)).await?;
    UserRepo::set_current_room(&mut **tx, from_uid, None).await?;
    UserRepo::set_current_room(&mut **tx, to_uid, Some(room_id)).await?;
    if let Some(accepted) = &accepted {
        // Idempotent re-stamp.
        MatchRepo::set_status(&mut **tx, accepted.id, MatchStatus::Accepted).await?;
    }
    if let Some(listing) = &listing {
        ListingRepo::set_status(&mut **tx, listing.id, ListingStatus::Completed).await?;
    }
    TransactionRepo::cancel_pending_for_room(&mut **tx, room_id, record.id).await?;
    Ok(())
}

async fn confirm_swap(tx: &mut SqlTx<'static, Postgres>, record: &Transaction) -> AppResult<()> {
    let (party_a, party_b, room_a_id, room_b_id) = match (
        &record.party_a_uid,
        &record.party_b_uid,
        &record.party_a_room_id,
        &record.party_b_room_id,
    ) {
        (Some(a), Some(b), Some(room_a), Some(room_b)) => (a, b, *room_a, *room_b),
        _ => return Err(CoreError::Internal("swap transaction missing parties".into()).into()),
    };

    // Reads.
    let room_a = RoomRepo::find_by_id(&mut **tx, room_a_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    let room_b = RoomRepo::find_by_id(&mut **tx, room_b_id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Room".into()))?;
    let mut legs = Vec::new();
    for match_id in &record.match_ids {
        let (leg, listing) = read_match_and_listing(tx, Some(*match_id)).await?;
        legs.push((leg, listing));
    }

    // Both occupancies must be unchanged since acceptance.
    if room_a.occupant_uid.as_deref() != Some(party_a.as_str())
        || room_b.occupant_uid.as_deref() != Some(party_b.as_str())
    {
        return Err(CoreError::Conflict("a room's occupant has changed".into()).into());
    }
    for (_, listing) in &legs {
        if let Some(listing) = listing {
            state_machine::assert_allowed(
                listing.listing_type,
                listing.status,
                ListingStatus::Completed,
            )?;
        }
    }

    // Writes: swap both occupancies and both users' current rooms.
    RoomRepo::set_occupant(&mut **tx, room_a_id, Some(party_b)).await?;
    RoomRepo::set_occupant(&mut **tx, room_b_id, Some(party_a)).await?;
    UserRepo::set_current_room(&mut **tx, party_a, Some(room_b_id)).await?;
    UserRepo::set_current_room(&mut **tx, party_b, Some(room_a_id)).await?;
    for (leg, listing) in &legs {
        if let Some(leg) = leg {
            MatchRepo::set_status(&mut **tx, leg.id, MatchStatus::Accepted).await?;
        }
        if let Some(listing) = listing {
            ListingRepo::set_status(&mut **tx, listing.id, ListingStatus::Completed).await?;
        }
    }
    TransactionRepo::cancel_pending_for_room(&mut **tx, room_a_id, record.id).await?;
    TransactionRepo::cancel_pending_for_room(&mut **tx, room_b_id, record.id).await?;
    Ok(())
}

/// Cancel a PENDING transaction. For the single-match (lease) form the
/// associated match is cancelled and its listing reopened.
pub async fn cancel_transaction(state: &AppState, id: DbId, uid: &str) -> AppResult<Transaction> {
    with_tx_retry(|| try_cancel_transaction(state, id, uid)).await
}

async fn try_cancel_transaction(state: &AppState, id: DbId, uid: &str) -> AppResult<Transaction> {
    let mut tx = dormex_db::begin_serializable(&state.pool).await?;

    let record = TransactionRepo::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Transaction".into()))?;
    if record.status != TransactionStatus::Pending {
        return Err(CoreError::Conflict("transaction is not pending".into()).into());
    }
    if !record.involves(uid) {
        return Err(CoreError::Forbidden("you are not a party to this transaction".into()).into());
    }
    let (cancelled_match, listing) = read_match_and_listing(&mut tx, record.match_id).await?;

    TransactionRepo::cancel(&mut *tx, record.id).await?;
    if let Some(cancelled_match) = &cancelled_match {
        MatchRepo::set_status(&mut *tx, cancelled_match.id, MatchStatus::Cancelled).await?;
    }
    if let Some(listing) = &listing {
        // Raw reopen, not a validated transition: the listing sits in
        // PENDING_APPROVAL here, and cancellation puts it back on the market.
        ListingRepo::set_status(&mut *tx, listing.id, ListingStatus::Open).await?;
    }

    tx.commit().await?;
    tracing::info!(transaction_id = %record.id, "Transaction cancelled");

    let refreshed = TransactionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound("Transaction".into()))?;
    Ok(refreshed)
}

async fn read_match_and_listing(
    tx: &mut SqlTx<'static, Postgres>,
    match_id: Option<DbId>,
) -> AppResult<(Option<Match>, Option<dormex_db::models::listing::Listing>)> {
    let Some(match_id) = match_id else {
        return Ok((None, None));
    };
    let Some(found) = MatchRepo::find_by_id(&mut **tx, match_id).await? else {
        return Ok((None, None));
    };
    let listing = ListingRepo::find_by_id(&mut **tx, found.listing_id).await?;
    Ok((Some(found), listing))
}
