//! Month grid layout.
//!
//! A month is always laid out as 6 weeks of 7 days, starting on the
//! configured first day of the week. Leading and trailing cells come from
//! the neighbouring months, so every month renders as the same fixed-size
//! table regardless of its length or the weekday it starts on.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::event::Event;
use crate::month::{YearMonth, weekday_order};
use crate::zone::ZonePolicy;

pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKS_PER_GRID: usize = 6;
pub const CELLS_PER_GRID: usize = DAYS_PER_WEEK * WEEKS_PER_GRID;

/// One day in a month grid.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarCell<'a> {
    pub date: NaiveDate,
    pub in_focus_month: bool,
    pub is_today: bool,
    /// Events starting on `date` (local), in filtered order.
    pub events: Vec<&'a Event>,
}

impl CalendarCell<'_> {
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}

/// A built month grid: always exactly [`CELLS_PER_GRID`] cells.
#[derive(Debug, Clone, Serialize)]
pub struct MonthGrid<'a> {
    pub focus: YearMonth,
    pub first_day_of_week: Weekday,
    cells: Vec<CalendarCell<'a>>,
    has_events: bool,
}

impl<'a> MonthGrid<'a> {
    pub fn cells(&self) -> &[CalendarCell<'a>] {
        &self.cells
    }

    /// True when any cell, including leading and trailing days, holds an event.
    pub fn has_events(&self) -> bool {
        self.has_events
    }

    /// The grid as six rows of seven cells.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell<'a>]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }

    /// Column headers in display order.
    pub fn weekdays(&self) -> [Weekday; 7] {
        weekday_order(self.first_day_of_week)
    }

    /// First and last date shown.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        (self.cells[0].date, self.cells[CELLS_PER_GRID - 1].date)
    }

    /// The cell for `date`, if it is shown in this grid.
    pub fn cell_for(&self, date: NaiveDate) -> Option<&CalendarCell<'a>> {
        let (first, last) = self.window();
        if date < first || date > last {
            return None;
        }
        let index = (date - first).num_days() as usize;
        self.cells.get(index)
    }
}

/// Number of leading cells taken from the previous month.
pub fn leading_days(focus: YearMonth, first_day_of_week: Weekday) -> u32 {
    let first_weekday = focus.first_day().weekday().num_days_from_monday();
    (first_weekday + 7 - first_day_of_week.num_days_from_monday()) % 7
}

/// Build the 42-cell grid for `focus`, bucketing `events` by local start date.
pub fn build<'a>(
    focus: YearMonth,
    events: &[&'a Event],
    today: NaiveDate,
    first_day_of_week: Weekday,
    zone: &ZonePolicy,
) -> MonthGrid<'a> {
    let offset = i64::from(leading_days(focus, first_day_of_week));
    let days_in_month = i64::from(focus.days_in_month());
    let first_of_month = focus.first_day();

    let mut buckets: HashMap<NaiveDate, Vec<&'a Event>> = HashMap::new();
    for &event in events {
        buckets
            .entry(zone.local_date(event.start))
            .or_default()
            .push(event);
    }

    let cells: Vec<CalendarCell<'a>> = (0..CELLS_PER_GRID as i64)
        .map(|i| {
            let day_index = i - offset + 1;
            let date = first_of_month + Duration::days(day_index - 1);
            CalendarCell {
                date,
                in_focus_month: (1..=days_in_month).contains(&day_index),
                is_today: date == today,
                events: buckets.remove(&date).unwrap_or_default(),
            }
        })
        .collect();

    let has_events = cells.iter().any(CalendarCell::has_events);

    debug!(
        "Built grid for {} (offset {}, {} events outside window)",
        focus,
        offset,
        buckets.values().map(Vec::len).sum::<usize>()
    );

    MonthGrid {
        focus,
        first_day_of_week,
        cells,
        has_events,
    }
}
