//! Calendar month arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::EventBoardError;

/// A year and month (1..=12) used as the focus of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Earliest month whose whole 42-day grid window is a valid date range.
    pub const MIN: YearMonth = YearMonth {
        year: -262_143,
        month: 2,
    };
    /// Latest month whose whole 42-day grid window is a valid date range.
    pub const MAX: YearMonth = YearMonth {
        year: 262_142,
        month: 11,
    };

    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) {
            return None;
        }
        let ym = YearMonth { year, month };
        (Self::MIN..=Self::MAX).contains(&ym).then_some(ym)
    }

    /// The month containing `date`, clamped to `MIN..=MAX`.
    pub fn of(date: NaiveDate) -> Self {
        YearMonth::new(date.year(), date.month()).unwrap_or(if date.year() < 0 {
            Self::MIN
        } else {
            Self::MAX
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// 28, 29, 30 or 31.
    pub fn days_in_month(&self) -> u32 {
        match self.month {
            4 | 6 | 9 | 11 => 30,
            2 if NaiveDate::from_ymd_opt(self.year, 2, 29).is_some() => 29,
            2 => 28,
            _ => 31,
        }
    }

    /// The following month; `MAX` stays put.
    pub fn next(&self) -> Self {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        YearMonth::new(year, month).unwrap_or(*self)
    }

    /// The preceding month; `MIN` stays put.
    pub fn prev(&self) -> Self {
        let (year, month) = if self.month == 1 {
            (self.year - 1, 12)
        } else {
            (self.year, self.month - 1)
        };
        YearMonth::new(year, month).unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human-readable label, e.g. "March 2025".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl FromStr for YearMonth {
    type Err = EventBoardError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EventBoardError::InvalidMonth(s.to_string());

        let (year, month) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}", self.year.unsigned_abs(), self.month)
        } else {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }
}

/// Parse a weekday name such as "mon", "Monday" or "sun".
pub fn parse_weekday(s: &str) -> Result<Weekday, EventBoardError> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| EventBoardError::InvalidWeekday(s.to_string()))
}

/// The seven weekdays in column order for a grid starting on `first_day_of_week`.
pub fn weekday_order(first_day_of_week: Weekday) -> [Weekday; 7] {
    let mut order = [first_day_of_week; 7];
    for i in 1..7 {
        order[i] = order[i - 1].succ();
    }
    order
}
