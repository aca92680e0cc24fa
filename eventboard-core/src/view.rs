//! Presentation-ready projections of a filtered event sequence.
//!
//! Everything here is a pure function of its inputs; renderers consume the
//! results without re-filtering or re-sorting.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::event::Event;
use crate::grid::{self, MonthGrid};
use crate::month::YearMonth;
use crate::zone::ZonePolicy;

/// Stable style identifier for a category, e.g. "Open Day" -> "open-day".
pub fn category_slug(category: &str) -> String {
    slug::slugify(category)
}

/// An event paired with its category's style identifier.
#[derive(Debug, Clone, Serialize)]
pub struct EventItem<'a> {
    pub event: &'a Event,
    pub category_slug: String,
}

impl<'a> EventItem<'a> {
    pub fn new(event: &'a Event) -> Self {
        EventItem {
            event,
            category_slug: category_slug(&event.category),
        }
    }
}

/// Result of a list or timeline projection.
///
/// `NoResults` is a normal outcome, distinct from "not loaded yet", which
/// the store tracks separately.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Listing<'a> {
    NoResults,
    Events { items: Vec<EventItem<'a>>, count: usize },
}

impl<'a> Listing<'a> {
    fn from_filtered(filtered: &[&'a Event]) -> Self {
        if filtered.is_empty() {
            return Listing::NoResults;
        }

        let items: Vec<_> = filtered.iter().copied().map(EventItem::new).collect();
        Listing::Events {
            count: items.len(),
            items,
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Listing::NoResults => 0,
            Listing::Events { count, .. } => *count,
        }
    }

    pub fn items(&self) -> &[EventItem<'a>] {
        match self {
            Listing::NoResults => &[],
            Listing::Events { items, .. } => items.as_slice(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Listing::NoResults)
    }
}

/// Filtered events in time order, for the card list.
pub fn to_list_view<'a>(filtered: &[&'a Event]) -> Listing<'a> {
    Listing::from_filtered(filtered)
}

/// Filtered events in time order, for the timeline.
pub fn to_timeline_view<'a>(filtered: &[&'a Event]) -> Listing<'a> {
    Listing::from_filtered(filtered)
}

/// Month grid plus the labels a renderer needs around it.
#[derive(Debug, Clone, Serialize)]
pub struct GridView<'a> {
    /// e.g. "March 2025"
    pub label: String,
    pub weekdays: [Weekday; 7],
    pub grid: MonthGrid<'a>,
}

impl GridView<'_> {
    /// Whether to show the "no events this month" note.
    pub fn is_empty_month(&self) -> bool {
        !self.grid.has_events()
    }
}

pub fn to_grid_view<'a>(
    focus: YearMonth,
    filtered: &[&'a Event],
    today: NaiveDate,
    first_day_of_week: Weekday,
    zone: &ZonePolicy,
) -> GridView<'a> {
    let grid = grid::build(focus, filtered, today, first_day_of_week, zone);
    GridView {
        label: focus.label(),
        weekdays: grid.weekdays(),
        grid,
    }
}

/// One entry of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub label: String,
    pub slug: String,
}

/// Distinct categories of `events`, sorted ascending.
pub fn category_options(events: &[Event]) -> Vec<CategoryOption> {
    events
        .iter()
        .map(|e| e.category.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|label| CategoryOption {
            label: label.to_string(),
            slug: category_slug(label),
        })
        .collect()
}
