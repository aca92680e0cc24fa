//! Compound event filtering.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_range::{DateRange, parse_date};
use crate::error::EventBoardResult;
use crate::event::Event;
use crate::zone::ZonePolicy;

/// Filter state for one evaluation. Absent fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring over title, speaker, description and tags.
    pub query: Option<String>,
    /// Exact, case-sensitive category match.
    pub category: Option<String>,
    /// Inclusive first day.
    pub from: Option<NaiveDate>,
    /// Inclusive last day.
    pub to: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Build criteria from user-supplied strings. Empty strings count as absent.
    pub fn from_args(
        query: Option<&str>,
        category: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> EventBoardResult<Self> {
        let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);

        Ok(FilterCriteria {
            query: non_empty(query),
            category: non_empty(category),
            from: non_empty(from).map(|s| parse_date(&s)).transpose()?,
            to: non_empty(to).map(|s| parse_date(&s)).transpose()?,
        })
    }

    /// True when no field constrains the result.
    pub fn is_open(&self) -> bool {
        self.query().is_none() && self.category().is_none() && self.from.is_none() && self.to.is_none()
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

/// Apply `criteria` to `events`, keeping their order.
pub fn apply<'a>(events: &'a [Event], criteria: &FilterCriteria, zone: &ZonePolicy) -> Vec<&'a Event> {
    if criteria.is_open() {
        return events.iter().collect();
    }

    let predicate = Predicate::new(criteria, zone);
    events.iter().filter(|e| predicate.matches(e)).collect()
}

/// Re-filter an already filtered sequence.
pub fn apply_refs<'a>(
    events: &[&'a Event],
    criteria: &FilterCriteria,
    zone: &ZonePolicy,
) -> Vec<&'a Event> {
    let predicate = Predicate::new(criteria, zone);
    events.iter().copied().filter(|e| predicate.matches(e)).collect()
}

/// Criteria resolved once per evaluation.
struct Predicate<'c> {
    range: DateRange,
    query: Option<String>,
    category: Option<&'c str>,
}

impl<'c> Predicate<'c> {
    fn new(criteria: &'c FilterCriteria, zone: &ZonePolicy) -> Self {
        Predicate {
            range: DateRange::for_dates(criteria.from, criteria.to, zone),
            query: criteria.query().map(str::to_lowercase),
            category: criteria.category(),
        }
    }

    fn matches(&self, event: &Event) -> bool {
        if self.category.is_some_and(|c| event.category != c) {
            return false;
        }
        if !self.range.contains(event.start) {
            return false;
        }
        match &self.query {
            Some(q) => event.haystack().contains(q.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_event(id: &str, category: &str, day: u32, hour: u32) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Session {id}"),
            description: String::new(),
            location: String::new(),
            speaker: String::new(),
            category: category.to_string(),
            tags: vec![],
            start: Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, day, hour + 1, 0, 0).unwrap(),
        }
    }

    fn ids(events: &[&Event]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    fn sample() -> Vec<Event> {
        let mut talk = make_event("talk", "Talk", 12, 10);
        talk.speaker = "Ada Lovelace".to_string();
        talk.description = "Analytical engines".to_string();
        talk.tags = vec!["History".to_string(), "computing".to_string()];

        vec![
            make_event("open-day", "Open Day", 5, 9),
            talk,
            make_event("workshop", "Workshop", 20, 14),
        ]
    }

    #[test]
    fn test_open_criteria_is_identity() {
        let events = sample();
        let filtered = apply(&events, &FilterCriteria::default(), &ZonePolicy::Utc);
        assert_eq!(ids(&filtered), vec!["open-day", "talk", "workshop"]);
        assert!(FilterCriteria::default().is_open());
    }

    #[test]
    fn test_category_is_exact_and_case_sensitive() {
        let events = sample();
        let criteria = FilterCriteria {
            category: Some("Workshop".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&events, &criteria, &ZonePolicy::Utc)), vec!["workshop"]);

        let criteria = FilterCriteria {
            category: Some("workshop".to_string()),
            ..Default::default()
        };
        assert!(apply(&events, &criteria, &ZonePolicy::Utc).is_empty());
    }

    #[test]
    fn test_query_matches_speaker_description_and_tags_case_insensitively() {
        let events = sample();
        for q in ["LOVELACE", "analytical", "history", "Computing", "session talk"] {
            let criteria = FilterCriteria {
                query: Some(q.to_string()),
                ..Default::default()
            };
            assert_eq!(
                ids(&apply(&events, &criteria, &ZonePolicy::Utc)),
                vec!["talk"],
                "query {q:?}"
            );
        }
    }

    #[test]
    fn test_query_does_not_match_location() {
        let mut events = sample();
        events[0].location = "Roskilde".to_string();
        let criteria = FilterCriteria {
            query: Some("roskilde".to_string()),
            ..Default::default()
        };
        assert!(apply(&events, &criteria, &ZonePolicy::Utc).is_empty());
    }

    #[test]
    fn test_date_bounds_use_whole_days() {
        let events = sample();
        let criteria = FilterCriteria::from_args(None, None, Some("2025-03-05"), Some("2025-03-12")).unwrap();
        assert_eq!(
            ids(&apply(&events, &criteria, &ZonePolicy::Utc)),
            vec!["open-day", "talk"]
        );
    }

    #[test]
    fn test_from_on_a_day_the_zone_skipped_still_applies() {
        let zone = ZonePolicy::Named(chrono_tz::Pacific::Apia);
        let mut new_year = make_event("new-year", "Talk", 1, 12);
        new_year.start = Utc.with_ymd_and_hms(2011, 1, 1, 12, 0, 0).unwrap();
        new_year.end = new_year.start;
        let mut after = make_event("after", "Talk", 1, 12);
        after.start = Utc.with_ymd_and_hms(2011, 12, 31, 12, 0, 0).unwrap();
        after.end = after.start;
        let events = vec![new_year, after];

        let criteria = FilterCriteria::from_args(None, None, Some("2011-12-30"), None).unwrap();
        assert_eq!(ids(&apply(&events, &criteria, &zone)), vec!["after"]);
    }

    #[test]
    fn test_inverted_range_yields_nothing() {
        let events = sample();
        let criteria = FilterCriteria::from_args(None, None, Some("2025-03-10"), Some("2025-03-01")).unwrap();
        assert!(apply(&events, &criteria, &ZonePolicy::Utc).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let criteria = FilterCriteria::from_args(Some("x"), None, None, None).unwrap();
        assert!(apply(&[], &criteria, &ZonePolicy::Utc).is_empty());
    }

    #[test]
    fn test_from_args_treats_empty_strings_as_absent() {
        let criteria = FilterCriteria::from_args(Some(""), Some(""), Some(""), None).unwrap();
        assert!(criteria.is_open());
        assert!(FilterCriteria::from_args(None, None, Some("tomorrow"), None).is_err());
    }

    #[test]
    fn test_category_filter_is_idempotent() {
        let events = sample();
        let criteria = FilterCriteria {
            category: Some("Talk".to_string()),
            query: Some("ada".to_string()),
            ..Default::default()
        };
        let once = apply(&events, &criteria, &ZonePolicy::Utc);
        let twice = apply_refs(&once, &criteria, &ZonePolicy::Utc);
        assert_eq!(once, twice);
    }
}
