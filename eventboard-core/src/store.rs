//! Ownership of the canonical event set across loads.
//!
//! Loads are one-shot and may overlap. Each call to [`EventStore::begin_load`]
//! hands out a ticket; only the newest ticket may install its result, so a
//! slow, superseded load can never overwrite a newer one.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::EventBoardError;
use crate::event::Event;
use crate::normalize::Normalized;

/// An immutable snapshot of normalized events.
#[derive(Debug, Default)]
pub struct EventSet {
    events: Vec<Event>,
    skipped: usize,
}

impl EventSet {
    pub fn new(events: Vec<Event>, skipped: usize) -> Self {
        EventSet { events, skipped }
    }

    /// Events ascending by start.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Records rejected while normalizing this set.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }
}

impl From<Normalized> for EventSet {
    fn from(normalized: Normalized) -> Self {
        let skipped = normalized.skipped_count();
        EventSet::new(normalized.events, skipped)
    }
}

#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Arc<EventSet>),
    /// The last load failed; "could not load" rather than "no results".
    Failed(String),
}

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

#[derive(Debug, Default)]
pub struct EventStore {
    state: LoadState,
    generation: u64,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The current snapshot, if one is loaded.
    pub fn snapshot(&self) -> Option<Arc<EventSet>> {
        match &self.state {
            LoadState::Loaded(set) => Some(Arc::clone(set)),
            _ => None,
        }
    }

    /// Start a load, superseding any load still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Install the outcome of a load. Returns false if `ticket` was superseded,
    /// in which case the result is dropped.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<EventSet, EventBoardError>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "Ignoring superseded load {} (current is {})",
                ticket.0, self.generation
            );
            return false;
        }

        self.state = match result {
            Ok(set) => {
                info!(
                    "Loaded {} events ({} skipped)",
                    set.events().len(),
                    set.skipped()
                );
                LoadState::Loaded(Arc::new(set))
            }
            Err(e) => LoadState::Failed(e.to_string()),
        };
        true
    }
}
