//! Availability checking for equipment bookings
//!
//! Pure interval-overlap decision over inclusive calendar days, plus the
//! read-only availability service used by the booking API.

use chrono::NaiveDate;

use crate::repository::Repository;

/// True when the existing active interval `[s, e]` overlaps the candidate
/// range `[start, end]`, all bounds inclusive.
///
/// Kept in the original four-case form because it pins the inclusive
/// boundary behavior at single-day granularity. The unit tests verify it is
/// equivalent to the collapsed form `s <= end && e >= start` for every date
/// pair, which is what the repository expresses in SQL.
pub fn ranges_overlap(s: NaiveDate, e: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    // existing start falls inside the candidate
    (s >= start && s <= end)
        // existing end falls inside the candidate
        || (e >= start && e <= end)
        // existing interval encloses the candidate
        || (s <= start && e >= end)
        // existing interval strictly encloses the candidate
        || (s < start && e > end)
}

/// True when a single maintenance day falls inside `[start, end]`
pub fn date_in_range(day: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    ranges_overlap(day, day, start, end)
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Read-only check: can `equipment_id` be booked over `[start, end]`?
    ///
    /// Fail-closed: a lookup failure is reported as unavailable. A false
    /// "available" risks a double booking; a false "unavailable" only
    /// costs the caller a retry.
    pub async fn is_available(
        &self,
        equipment_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> bool {
        let bookings = match self.repository.bookings.active_ranges(equipment_id).await {
            Ok(ranges) => ranges,
            Err(e) => {
                tracing::warn!(equipment_id, "Booking lookup failed, treating as unavailable: {}", e);
                return false;
            }
        };
        if bookings.iter().any(|&(s, e)| ranges_overlap(s, e, start, end)) {
            return false;
        }

        let maintenance = match self.repository.maintenance.active_dates(equipment_id).await {
            Ok(dates) => dates,
            Err(e) => {
                tracing::warn!(equipment_id, "Maintenance lookup failed, treating as unavailable: {}", e);
                return false;
            }
        };
        !maintenance.iter().any(|&day| date_in_range(day, start, end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// Collapsed standard interval-overlap test
    fn collapsed(s: NaiveDate, e: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
        s <= end && e >= start
    }

    #[test]
    fn four_case_form_equals_collapsed_form() {
        // Exhaustive sweep over all well-formed interval pairs in a
        // 12-day window, covering every boundary-adjacent arrangement.
        let base = d("2025-06-10");
        let days: Vec<NaiveDate> = (0..12).map(|i| base + chrono::Days::new(i)).collect();

        for &s in &days {
            for &e in &days {
                if e < s {
                    continue;
                }
                for &start in &days {
                    for &end in &days {
                        if end < start {
                            continue;
                        }
                        assert_eq!(
                            ranges_overlap(s, e, start, end),
                            collapsed(s, e, start, end),
                            "[{s}, {e}] vs [{start}, {end}]"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn shared_boundary_day_conflicts() {
        // Existing [06-10, 06-15] vs candidate [06-15, 06-20]: day 15 is
        // shared, so this must conflict.
        assert!(ranges_overlap(
            d("2025-06-10"),
            d("2025-06-15"),
            d("2025-06-15"),
            d("2025-06-20"),
        ));
        // And symmetrically at the other end.
        assert!(ranges_overlap(
            d("2025-06-15"),
            d("2025-06-20"),
            d("2025-06-10"),
            d("2025-06-15"),
        ));
    }

    #[test]
    fn adjacent_ranges_do_not_conflict() {
        assert!(!ranges_overlap(
            d("2025-07-01"),
            d("2025-07-05"),
            d("2025-07-06"),
            d("2025-07-08"),
        ));
    }

    #[test]
    fn enclosing_interval_conflicts() {
        assert!(ranges_overlap(
            d("2025-07-01"),
            d("2025-07-31"),
            d("2025-07-10"),
            d("2025-07-12"),
        ));
    }

    #[test]
    fn enclosed_interval_conflicts() {
        assert!(ranges_overlap(
            d("2025-07-10"),
            d("2025-07-12"),
            d("2025-07-01"),
            d("2025-07-31"),
        ));
    }

    #[test]
    fn booking_scenario_boundaries() {
        // Approved booking [07-01, 07-05] on resource R:
        let (s, e) = (d("2025-07-01"), d("2025-07-05"));
        // [07-03, 07-06] overlaps
        assert!(ranges_overlap(s, e, d("2025-07-03"), d("2025-07-06")));
        // [07-05, 07-08] shares day 5
        assert!(ranges_overlap(s, e, d("2025-07-05"), d("2025-07-08")));
        // [07-06, 07-08] is free
        assert!(!ranges_overlap(s, e, d("2025-07-06"), d("2025-07-08")));
    }

    #[test]
    fn single_day_maintenance_blocks_range() {
        assert!(date_in_range(d("2025-08-02"), d("2025-08-01"), d("2025-08-03")));
        assert!(date_in_range(d("2025-08-01"), d("2025-08-01"), d("2025-08-03")));
        assert!(!date_in_range(d("2025-08-04"), d("2025-08-01"), d("2025-08-03")));
    }
}
