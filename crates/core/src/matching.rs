//! Swap compatibility rules.
//!
//! Pure predicates shared by the matching engine's candidate queries and the
//! claim-swap validation path, so both answer "are these two swap listings
//! compatible" identically.

use chrono::NaiveDate;

use crate::status::RoomCategory;
use crate::types::Uid;

/// Inclusive date-range overlap. Identical single-day ranges overlap, and a
/// shared boundary day counts as a one-day overlap.
pub fn dates_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && b_start <= a_end
}

/// The compatibility-relevant slice of a swap-request listing.
#[derive(Debug, Clone)]
pub struct SwapProfile {
    pub owner_uid: Uid,
    pub room_category: RoomCategory,
    pub room_building: String,
    pub desired_categories: Vec<RoomCategory>,
    /// Empty means any building is acceptable.
    pub desired_buildings: Vec<String>,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
}

impl SwapProfile {
    fn wants_category(&self, category: RoomCategory) -> bool {
        self.desired_categories.contains(&category)
    }

    fn accepts_building(&self, building: &str) -> bool {
        self.desired_buildings.is_empty() || self.desired_buildings.iter().any(|b| b == building)
    }
}

/// Mutual compatibility between two swap requests: different owners, each
/// side's room category is desired by the other (symmetric, never
/// one-directional), each side's building preference is satisfied by the
/// counterpart, and lease date ranges overlap by at least one day.
pub fn swaps_compatible(a: &SwapProfile, b: &SwapProfile) -> bool {
    a.owner_uid != b.owner_uid
        && a.wants_category(b.room_category)
        && b.wants_category(a.room_category)
        && a.accepts_building(&b.room_building)
        && b.accepts_building(&a.room_building)
        && dates_overlap(
            a.lease_start_date,
            a.lease_end_date,
            b.lease_start_date,
            b.lease_end_date,
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile(owner: &str, category: RoomCategory, wants: &[RoomCategory]) -> SwapProfile {
        SwapProfile {
            owner_uid: owner.to_string(),
            room_category: category,
            room_building: "North Hall".to_string(),
            desired_categories: wants.to_vec(),
            desired_buildings: Vec::new(),
            lease_start_date: date(2026, 3, 1),
            lease_end_date: date(2026, 8, 31),
        }
    }

    #[test]
    fn identical_single_day_ranges_overlap() {
        let d = date(2026, 5, 15);
        assert!(dates_overlap(d, d, d, d));
    }

    #[test]
    fn disjoint_months_do_not_overlap() {
        assert!(!dates_overlap(
            date(2026, 1, 1),
            date(2026, 1, 31),
            date(2026, 2, 1),
            date(2026, 2, 28),
        ));
    }

    #[test]
    fn shared_boundary_day_counts_as_overlap() {
        assert!(dates_overlap(
            date(2026, 3, 1),
            date(2026, 6, 1),
            date(2026, 6, 1),
            date(2026, 9, 1),
        ));
    }

    #[test]
    fn mutual_category_desire_is_compatible() {
        let a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let b = profile("user-b", RoomCategory::B, &[RoomCategory::A]);
        assert!(swaps_compatible(&a, &b));
        assert!(swaps_compatible(&b, &a));
    }

    #[test]
    fn one_directional_desire_is_not_compatible() {
        let a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let b = profile("user-b", RoomCategory::B, &[RoomCategory::C]);
        assert!(!swaps_compatible(&a, &b));
    }

    #[test]
    fn same_owner_is_not_compatible() {
        let a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let b = profile("user-a", RoomCategory::B, &[RoomCategory::A]);
        assert!(!swaps_compatible(&a, &b));
    }

    #[test]
    fn building_preference_must_match_counterpart() {
        let mut a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let mut b = profile("user-b", RoomCategory::B, &[RoomCategory::A]);
        a.desired_buildings = vec!["South Hall".to_string()];
        assert!(!swaps_compatible(&a, &b));

        b.room_building = "South Hall".to_string();
        assert!(swaps_compatible(&a, &b));
    }

    #[test]
    fn empty_building_preference_accepts_anything() {
        let a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let mut b = profile("user-b", RoomCategory::B, &[RoomCategory::A]);
        b.room_building = "West Annex".to_string();
        assert!(swaps_compatible(&a, &b));
    }

    #[test]
    fn non_overlapping_leases_are_not_compatible() {
        let a = profile("user-a", RoomCategory::A, &[RoomCategory::B]);
        let mut b = profile("user-b", RoomCategory::B, &[RoomCategory::A]);
        b.lease_start_date = date(2026, 9, 1);
        b.lease_end_date = date(2026, 12, 31);
        assert!(!swaps_compatible(&a, &b));
    }
}
