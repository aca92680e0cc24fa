//! Date range for filtering events.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::error::{EventBoardError, EventBoardResult};
use crate::zone::ZonePolicy;

/// Resolved instant bounds for a pair of inclusive calendar dates.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// A requested bound had no instant in the zone; nothing matches.
    unresolved: bool,
}

impl DateRange {
    /// `from` resolves to the start of that local day and `to` to its last
    /// second, 00:00:00 and 23:59:59 on ordinary days.
    pub fn for_dates(from: Option<NaiveDate>, to: Option<NaiveDate>, zone: &ZonePolicy) -> Self {
        let from_bound = from.map(|d| zone.start_of_day(d));
        let to_bound = to.map(|d| zone.end_of_day(d));

        let unresolved = matches!(from_bound, Some(None)) || matches!(to_bound, Some(None));
        if unresolved {
            warn!(
                "Date bound {:?}..{:?} has no instant in zone {}; matching nothing",
                from, to, zone
            );
        }

        DateRange {
            from: from_bound.flatten(),
            to: to_bound.flatten(),
            unresolved,
        }
    }

    /// Whether `instant` lies within both bounds (inclusive).
    /// A range whose `from` is after its `to` contains nothing.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        !self.unresolved
            && self.from.is_none_or(|from| instant >= from)
            && self.to.is_none_or(|to| instant <= to)
    }
}

/// Parse YYYY-MM-DD into a calendar date.
pub fn parse_date(s: &str) -> EventBoardResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| EventBoardError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bounds_are_inclusive_whole_days() {
        let range = DateRange::for_dates(
            Some(parse_date("2025-03-01").unwrap()),
            Some(parse_date("2025-03-10").unwrap()),
            &ZonePolicy::Utc,
        );

        assert!(range.contains(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2025, 3, 10, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 2, 28, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 3, 11, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let range = DateRange::for_dates(
            Some(parse_date("2025-03-10").unwrap()),
            Some(parse_date("2025-03-01").unwrap()),
            &ZonePolicy::Utc,
        );

        for day in 1..=31 {
            let instant = Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap();
            assert!(!range.contains(instant));
        }
    }

    #[test]
    fn test_unbounded_contains_everything() {
        let range = DateRange::default();
        assert!(range.contains(Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_from_on_a_skipped_day_still_bounds() {
        // 2011-12-30 does not exist in Samoa.
        let zone = ZonePolicy::Named(chrono_tz::Pacific::Apia);
        let range = DateRange::for_dates(Some(parse_date("2011-12-30").unwrap()), None, &zone);

        assert!(!range.contains(Utc.with_ymd_and_hms(2011, 1, 1, 12, 0, 0).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2011, 12, 30, 9, 59, 59).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2011, 12, 30, 10, 0, 0).unwrap()));

        let to = DateRange::for_dates(None, Some(parse_date("2011-12-30").unwrap()), &zone);
        assert!(to.contains(Utc.with_ymd_and_hms(2011, 12, 30, 9, 59, 59).unwrap()));
        assert!(!to.contains(Utc.with_ymd_and_hms(2011, 12, 30, 10, 0, 0).unwrap()));
    }

    #[test]
    fn test_unresolvable_bound_matches_nothing() {
        // Local midnight on the first representable day lies before chrono's
        // range once converted from Tokyo's positive offset.
        let zone = ZonePolicy::Named(chrono_tz::Asia::Tokyo);
        assert_eq!(zone.start_of_day(NaiveDate::MIN), None);

        let range = DateRange::for_dates(Some(NaiveDate::MIN), None, &zone);
        assert!(!range.contains(Utc.with_ymd_and_hms(2025, 3, 5, 12, 0, 0).unwrap()));
        assert!(!range.contains(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(matches!(
            parse_date("03/10/2025"),
            Err(EventBoardError::InvalidDate(_))
        ));
        assert!(parse_date("2025-02-29").is_err());
        assert!(parse_date("2024-02-29").is_ok());
    }
}
