//! Timezone policy for turning instants into calendar dates and back.
//!
//! Every date comparison in the engine goes through a [`ZonePolicy`], so the
//! zone used to decide "which day is this event on" is always explicit.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::EventBoardError;

/// The zone in which calendar dates are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZonePolicy {
    /// The host's local zone.
    #[default]
    Local,
    Utc,
    /// An IANA zone, e.g. `Europe/Copenhagen`.
    Named(Tz),
}

impl ZonePolicy {
    /// Calendar date of `instant` in this zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            ZonePolicy::Local => instant.with_timezone(&Local).date_naive(),
            ZonePolicy::Utc => instant.date_naive(),
            ZonePolicy::Named(tz) => instant.with_timezone(tz).date_naive(),
        }
    }

    /// Wall-clock date and time of `instant` in this zone.
    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ZonePolicy::Local => instant.with_timezone(&Local).naive_local(),
            ZonePolicy::Utc => instant.naive_utc(),
            ZonePolicy::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Today's date in this zone.
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }

    /// Resolve a wall-clock time in this zone to an instant.
    ///
    /// Ambiguous times (DST fold) resolve to the earlier instant. Times that
    /// fall into a DST gap resolve to the first valid time after the gap.
    pub fn resolve(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            ZonePolicy::Local => resolve_in(&Local, naive),
            ZonePolicy::Utc => Some(naive.and_utc()),
            ZonePolicy::Named(tz) => resolve_in(tz, naive),
        }
    }

    /// First instant whose local date is `date` or later.
    ///
    /// Usually 00:00:00 local. When the zone skipped midnight, or the whole
    /// day, this is the instant the clock jumped past it.
    pub fn start_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        self.resolve(date.and_time(NaiveTime::MIN))
    }

    /// Last second whose local date is `date` or earlier, usually 23:59:59.
    pub fn end_of_day(&self, date: NaiveDate) -> Option<DateTime<Utc>> {
        match date.succ_opt().and_then(|next| self.start_of_day(next)) {
            Some(next_start) => next_start.checked_sub_signed(Duration::seconds(1)),
            None => self.resolve(date.and_time(NaiveTime::from_hms_opt(23, 59, 59)?)),
        }
    }
}

/// Bound on how far any zone's offset strays from UTC.
const MAX_OFFSET_HOURS: i64 = 26;

fn resolve_in<Z: TimeZone>(tz: &Z, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    // Gap: binary search for the transition, the first second whose wall
    // clock reads `naive` or later.
    let reached = |secs: i64| {
        DateTime::from_timestamp(secs, 0)
            .map(|instant| instant.with_timezone(tz).naive_local() >= naive)
    };
    let window = Duration::hours(MAX_OFFSET_HOURS);
    let mut lo = naive.checked_sub_signed(window)?.and_utc().timestamp();
    let mut hi = naive.checked_add_signed(window)?.and_utc().timestamp();
    if reached(lo)? || !reached(hi)? {
        return None;
    }

    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if reached(mid)? {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    DateTime::from_timestamp(hi, 0)
}

impl FromStr for ZonePolicy {
    type Err = EventBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "local" => Ok(ZonePolicy::Local),
            "utc" | "z" => Ok(ZonePolicy::Utc),
            _ => s
                .trim()
                .parse::<Tz>()
                .map(ZonePolicy::Named)
                .map_err(|_| EventBoardError::InvalidTimezone(s.to_string())),
        }
    }
}

impl fmt::Display for ZonePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZonePolicy::Local => write!(f, "local"),
            ZonePolicy::Utc => write!(f, "utc"),
            ZonePolicy::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_policies() {
        assert_eq!("local".parse::<ZonePolicy>().unwrap(), ZonePolicy::Local);
        assert_eq!("UTC".parse::<ZonePolicy>().unwrap(), ZonePolicy::Utc);
        assert_eq!(
            "Europe/Copenhagen".parse::<ZonePolicy>().unwrap(),
            ZonePolicy::Named(chrono_tz::Europe::Copenhagen)
        );
        assert!("Mars/Olympus".parse::<ZonePolicy>().is_err());
    }

    #[test]
    fn test_local_date_crosses_midnight_in_named_zone() {
        let zone = ZonePolicy::Named(chrono_tz::Europe::Copenhagen);
        // 23:30 UTC on March 4 is 00:30 on March 5 in Copenhagen (UTC+1).
        let instant = Utc.with_ymd_and_hms(2025, 3, 4, 23, 30, 0).unwrap();
        assert_eq!(zone.local_date(instant), date(2025, 3, 5));
        assert_eq!(ZonePolicy::Utc.local_date(instant), date(2025, 3, 4));
    }

    #[test]
    fn test_day_bounds() {
        let zone = ZonePolicy::Named(chrono_tz::Europe::Copenhagen);
        let start = zone.start_of_day(date(2025, 3, 10)).unwrap();
        let end = zone.end_of_day(date(2025, 3, 10)).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 9, 23, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 3, 10, 22, 59, 59).unwrap());
    }

    #[test]
    fn test_day_bounds_for_a_skipped_day() {
        // Samoa skipped 2011-12-30: 23:59:59 on the 29th (UTC-10) was followed
        // by 00:00 on the 31st (UTC+14).
        let zone = ZonePolicy::Named(chrono_tz::Pacific::Apia);
        let jump = Utc.with_ymd_and_hms(2011, 12, 30, 10, 0, 0).unwrap();

        assert_eq!(zone.start_of_day(date(2011, 12, 30)), Some(jump));
        assert_eq!(zone.start_of_day(date(2011, 12, 31)), Some(jump));
        assert_eq!(
            zone.end_of_day(date(2011, 12, 29)),
            Some(jump - Duration::seconds(1))
        );
        assert_eq!(zone.local_date(jump), date(2011, 12, 31));
    }

    #[test]
    fn test_day_bounds_across_spring_forward() {
        // Clocks jump from 02:00 to 03:00 in Copenhagen on 2025-03-30.
        let zone = ZonePolicy::Named(chrono_tz::Europe::Copenhagen);
        assert_eq!(
            zone.start_of_day(date(2025, 3, 30)),
            Some(Utc.with_ymd_and_hms(2025, 3, 29, 23, 0, 0).unwrap())
        );
        assert_eq!(
            zone.end_of_day(date(2025, 3, 30)),
            Some(Utc.with_ymd_and_hms(2025, 3, 30, 21, 59, 59).unwrap())
        );
    }

    #[test]
    fn test_resolve_dst_gap_moves_forward() {
        // Clocks jump from 02:00 to 03:00 in Copenhagen on 2025-03-30.
        let zone = ZonePolicy::Named(chrono_tz::Europe::Copenhagen);
        let naive = date(2025, 3, 30).and_hms_opt(2, 30, 0).unwrap();
        let resolved = zone.resolve(naive).unwrap();
        assert_eq!(resolved, Utc.with_ymd_and_hms(2025, 3, 30, 1, 0, 0).unwrap());
    }
}
