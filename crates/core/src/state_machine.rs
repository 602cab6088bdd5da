//! Listing status state machine.
//!
//! Two independent transition graphs, one per listing type. Each graph is a
//! total function from status to its allowed targets: every status has an
//! entry, terminal statuses map to the empty slice, and exhaustive `match`
//! arms make a missing status a compile error.
//!
//! Every listing status write in the services goes through [`assert_allowed`]
//! unless explicitly documented otherwise.

use crate::error::CoreError;
use crate::status::{ListingStatus, ListingType};

use ListingStatus::{
    Cancelled, Completed, Expired, FullyMatched, Matched, Open, PartialMatch, PendingApproval,
};

/// Allowed targets for a lease-transfer listing in the given status.
const fn lease_transfer_targets(current: ListingStatus) -> &'static [ListingStatus] {
    match current {
        // Bidding model: accepting a bid jumps straight to PENDING_APPROVAL.
        Open => &[Matched, PendingApproval, Cancelled, Expired],
        // Reject/expire of the match reopens the listing.
        Matched => &[PendingApproval, Open, Cancelled],
        PendingApproval => &[Completed, Cancelled],
        Completed | Cancelled | Expired => &[],
        // Swap-only statuses are unreachable for transfers.
        PartialMatch | FullyMatched => &[],
    }
}

/// Allowed targets for a swap-request listing in the given status.
const fn swap_request_targets(current: ListingStatus) -> &'static [ListingStatus] {
    match current {
        // A direct swap claim resolves both sides at once.
        Open => &[PartialMatch, FullyMatched, Cancelled, Expired],
        PartialMatch => &[FullyMatched, Open, Cancelled, Expired],
        // One leg failing drops back to PARTIAL_MATCH.
        FullyMatched => &[PendingApproval, PartialMatch, Cancelled],
        PendingApproval => &[Completed, Cancelled],
        Completed | Cancelled | Expired => &[],
        // Transfer-only status is unreachable for swaps.
        Matched => &[],
    }
}

/// Allowed targets for a listing of the given type in the given status.
pub const fn allowed_targets(
    listing_type: ListingType,
    current: ListingStatus,
) -> &'static [ListingStatus] {
    match listing_type {
        ListingType::LeaseTransfer => lease_transfer_targets(current),
        ListingType::SwapRequest => swap_request_targets(current),
    }
}

/// Whether `current -> target` is an allowed transition for this listing type.
pub fn is_allowed(listing_type: ListingType, current: ListingStatus, target: ListingStatus) -> bool {
    allowed_targets(listing_type, current).contains(&target)
}

/// Validate a transition, returning `CoreError::InvalidTransition` when the
/// edge is not in the allowed set.
pub fn assert_allowed(
    listing_type: ListingType,
    current: ListingStatus,
    target: ListingStatus,
) -> Result<(), CoreError> {
    if is_allowed(listing_type, current, target) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition(format!(
            "cannot move {listing_type:?} listing from {current:?} to {target:?}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ListingType::{LeaseTransfer, SwapRequest};

    const ALL_STATUSES: &[ListingStatus] = &[
        Open,
        Matched,
        PartialMatch,
        FullyMatched,
        PendingApproval,
        Completed,
        Cancelled,
        Expired,
    ];

    #[test]
    fn lease_transfer_happy_path() {
        assert!(is_allowed(LeaseTransfer, Open, Matched));
        assert!(is_allowed(LeaseTransfer, Open, PendingApproval));
        assert!(is_allowed(LeaseTransfer, Matched, PendingApproval));
        assert!(is_allowed(LeaseTransfer, PendingApproval, Completed));
    }

    #[test]
    fn lease_transfer_reopen_and_cancel() {
        assert!(is_allowed(LeaseTransfer, Matched, Open));
        assert!(is_allowed(LeaseTransfer, Open, Cancelled));
        assert!(is_allowed(LeaseTransfer, Matched, Cancelled));
        assert!(is_allowed(LeaseTransfer, PendingApproval, Cancelled));
    }

    #[test]
    fn lease_transfer_rejects_swap_statuses() {
        assert!(!is_allowed(LeaseTransfer, Open, PartialMatch));
        assert!(!is_allowed(LeaseTransfer, Open, FullyMatched));
        assert!(allowed_targets(LeaseTransfer, PartialMatch).is_empty());
        assert!(allowed_targets(LeaseTransfer, FullyMatched).is_empty());
    }

    #[test]
    fn swap_request_happy_path() {
        assert!(is_allowed(SwapRequest, Open, PartialMatch));
        assert!(is_allowed(SwapRequest, Open, FullyMatched));
        assert!(is_allowed(SwapRequest, PartialMatch, FullyMatched));
        assert!(is_allowed(SwapRequest, FullyMatched, PendingApproval));
        assert!(is_allowed(SwapRequest, PendingApproval, Completed));
    }

    #[test]
    fn swap_request_leg_failure_paths() {
        assert!(is_allowed(SwapRequest, PartialMatch, Open));
        assert!(is_allowed(SwapRequest, FullyMatched, PartialMatch));
        assert!(!is_allowed(SwapRequest, FullyMatched, Open));
        assert!(!is_allowed(SwapRequest, Open, Matched));
    }

    #[test]
    fn swap_request_partial_match_can_expire() {
        assert!(is_allowed(SwapRequest, PartialMatch, Expired));
        assert!(!is_allowed(SwapRequest, FullyMatched, Expired));
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        for listing_type in [LeaseTransfer, SwapRequest] {
            for terminal in [Completed, Cancelled, Expired] {
                for target in ALL_STATUSES {
                    assert!(
                        !is_allowed(listing_type, terminal, *target),
                        "{listing_type:?}: {terminal:?} -> {target:?} must be denied"
                    );
                    assert!(assert_allowed(listing_type, terminal, *target).is_err());
                }
            }
        }
    }

    #[test]
    fn assert_allowed_reports_invalid_transition() {
        let err = assert_allowed(LeaseTransfer, Completed, Open).unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition(_)));
        assert!(err.to_string().contains("Completed"));
    }

    #[test]
    fn self_transitions_are_denied() {
        for listing_type in [LeaseTransfer, SwapRequest] {
            for status in ALL_STATUSES {
                assert!(!is_allowed(listing_type, *status, *status));
            }
        }
    }
}
