//! Core types for eventboard.
//!
//! This crate turns raw event records into the structures an event board
//! renders:
//! - `normalize` parses raw records into sorted `Event`s
//! - `filter` applies query, category and date-range criteria
//! - `grid` lays a month out as 42 day cells and buckets events into them
//! - `view` produces list, timeline and grid projections
//! - `ics` exports events as iCalendar text

pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod filter;
pub mod grid;
pub mod ics;
pub mod month;
pub mod normalize;
pub mod state;
pub mod store;
pub mod view;
pub mod zone;

pub use error::{EventBoardError, EventBoardResult};
pub use event::{Event, RawEvent};
pub use filter::FilterCriteria;
pub use grid::{CalendarCell, MonthGrid};
pub use month::YearMonth;
pub use state::BoardState;
pub use store::{EventSet, EventStore, LoadState};
pub use zone::ZonePolicy;
