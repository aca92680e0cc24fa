//! View state owned by the caller.
//!
//! Filter criteria, focus month, week start and zone are all explicit here
//! and passed into each core call; nothing in the crate keeps its own copy.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::event::Event;
use crate::filter::{self, FilterCriteria};
use crate::month::YearMonth;
use crate::store::EventSet;
use crate::view::{self, CategoryOption, GridView, Listing};
use crate::zone::ZonePolicy;

#[derive(Debug, Clone)]
pub struct BoardState {
    pub criteria: FilterCriteria,
    pub focus: YearMonth,
    pub first_day_of_week: Weekday,
    pub zone: ZonePolicy,
    /// Overrides the zone's current date, mainly for tests and fixed renders.
    pub today: Option<NaiveDate>,
}

impl BoardState {
    /// State focused on the current month with open criteria.
    pub fn new(zone: ZonePolicy, first_day_of_week: Weekday) -> Self {
        BoardState {
            criteria: FilterCriteria::default(),
            focus: YearMonth::of(zone.today()),
            first_day_of_week,
            zone,
            today: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| self.zone.today())
    }

    pub fn next_month(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_month(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Jump the focus back to the month containing today.
    pub fn go_to_today(&mut self) {
        self.focus = YearMonth::of(self.today());
    }

    pub fn filter<'a>(&self, set: &'a EventSet) -> Vec<&'a Event> {
        filter::apply(set.events(), &self.criteria, &self.zone)
    }

    /// Every projection of `set` under this state.
    pub fn render_views<'a>(&self, set: &'a EventSet) -> BoardViews<'a> {
        let filtered = self.filter(set);

        BoardViews {
            listing: view::to_list_view(&filtered),
            timeline: view::to_timeline_view(&filtered),
            grid: view::to_grid_view(
                self.focus,
                &filtered,
                self.today(),
                self.first_day_of_week,
                &self.zone,
            ),
            categories: view::category_options(set.events()),
        }
    }
}

/// All presentation structures for one state and snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct BoardViews<'a> {
    pub listing: Listing<'a>,
    pub timeline: Listing<'a>,
    pub grid: GridView<'a>,
    pub categories: Vec<CategoryOption>,
}
