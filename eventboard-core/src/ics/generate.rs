//! ICS export.

use chrono::{DateTime, Utc};
use icalendar::{Calendar, Component, EventLike};

use crate::error::{EventBoardError, EventBoardResult};
use crate::event::Event;
use crate::view::category_slug;

const ICS_TIMESTAMP: &str = "%Y%m%dT%H%M%SZ";

/// Calendar-level settings for an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub prodid: String,
    /// UIDs are `{event id}@{uid_domain}`.
    pub uid_domain: String,
    /// Written as X-WR-CALNAME when set.
    pub calendar_name: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            prodid: "-//eventboard//Event Calendar//EN".to_string(),
            uid_domain: "eventboard".to_string(),
            calendar_name: None,
        }
    }
}

/// Generate one VCALENDAR holding a VEVENT per event.
///
/// `generated_at` becomes every event's DTSTAMP.
pub fn generate_ics<'a, I>(
    events: I,
    options: &ExportOptions,
    generated_at: DateTime<Utc>,
) -> EventBoardResult<String>
where
    I: IntoIterator<Item = &'a Event>,
{
    if options.uid_domain.trim().is_empty() {
        return Err(EventBoardError::IcsGenerate("uid_domain must not be empty".into()));
    }

    let mut cal = Calendar::new();
    let dtstamp = generated_at.format(ICS_TIMESTAMP).to_string();

    for event in events {
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&format!("{}@{}", event.id, options.uid_domain));
        ics_event.add_property("DTSTAMP", &dtstamp);
        ics_event.add_property("DTSTART", event.start.format(ICS_TIMESTAMP).to_string());
        ics_event.add_property("DTEND", event.end.format(ICS_TIMESTAMP).to_string());
        // TEXT values are escaped by icalendar on write.
        ics_event.summary(&event.title);
        ics_event.description(&event.description.replace("\r\n", "\n"));

        if !event.location.is_empty() {
            ics_event.location(&event.location);
        }

        ics_event.add_property("CATEGORIES", event.category.as_str());
        cal.push(ics_event.done());
    }

    let cal = cal.done();
    Ok(finalize_ics(&cal.to_string(), options))
}

/// Suggested file name for an export of `events`.
pub fn export_filename(events: &[&Event]) -> String {
    match events {
        [single] => {
            let slug = category_slug(&single.title);
            if slug.is_empty() {
                "event.ics".to_string()
            } else {
                format!("event-{slug}.ics")
            }
        }
        _ => "events.ics".to_string(),
    }
}

/// RFC 5545 TEXT escaping for header lines written by hand.
fn escape_text(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

/// Rewrite the calendar header from the icalendar crate's output
/// - PRODID comes from the export options
/// - CALSCALE:GREGORIAN is kept and followed by METHOD:PUBLISH
/// - X-WR-CALNAME is added when a calendar name is configured
fn finalize_ics(ics: &str, options: &ExportOptions) -> String {
    let mut result = String::with_capacity(ics.len() + 64);
    let mut header_done = false;

    let mut push_line = |line: &str| {
        result.push_str(line);
        result.push_str("\r\n");
    };

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            push_line(&format!("PRODID:{}", options.prodid));
            continue;
        }

        if line == "CALSCALE:GREGORIAN" || line.starts_with("METHOD:") {
            continue;
        }

        if !header_done && (line == "BEGIN:VEVENT" || line == "END:VCALENDAR") {
            push_line("CALSCALE:GREGORIAN");
            push_line("METHOD:PUBLISH");
            if let Some(ref name) = options.calendar_name {
                push_line(&format!("X-WR-CALNAME:{}", escape_text(name)));
            }
            header_done = true;
        }

        push_line(line);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use icalendar::parser::{read_calendar, unfold};

    fn make_test_event(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: "Robotics Workshop".to_string(),
            description: "Build a line follower".to_string(),
            location: "Lab 2".to_string(),
            speaker: "Grace".to_string(),
            category: "Workshop".to_string(),
            tags: vec!["hands-on".to_string()],
            start: Utc.with_ymd_and_hms(2025, 3, 20, 14, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap(),
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_generate_ics_event_fields() {
        let event = make_test_event("42");
        let ics = generate_ics([&event], &ExportOptions::default(), stamp()).unwrap();

        assert!(ics.contains("UID:42@eventboard"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTAMP:20250301T120000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTSTART:20250320T140000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("DTEND:20250320T150000Z"), "ICS:\n{}", ics);
        assert!(ics.contains("SUMMARY:Robotics Workshop"), "ICS:\n{}", ics);
        assert!(ics.contains("LOCATION:Lab 2"), "ICS:\n{}", ics);
        assert!(ics.contains("CATEGORIES:Workshop"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_generate_ics_header() {
        let event = make_test_event("1");
        let options = ExportOptions {
            calendar_name: Some("Campus".to_string()),
            ..Default::default()
        };
        let ics = generate_ics([&event], &options, stamp()).unwrap();

        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"), "ICS:\n{}", ics);
        assert!(ics.contains("VERSION:2.0\r\n"));
        assert!(ics.contains("PRODID:-//eventboard//Event Calendar//EN\r\n"));
        assert_eq!(ics.matches("CALSCALE:GREGORIAN").count(), 1);
        assert_eq!(ics.matches("METHOD:PUBLISH").count(), 1);
        assert!(ics.contains("X-WR-CALNAME:Campus\r\n"));
        assert!(ics.trim_end().ends_with("END:VCALENDAR"));
        // Header properties come before the first event.
        assert!(ics.find("METHOD:PUBLISH").unwrap() < ics.find("BEGIN:VEVENT").unwrap());
    }

    #[test]
    fn test_generate_ics_omits_empty_location() {
        let mut event = make_test_event("1");
        event.location = String::new();
        let ics = generate_ics([&event], &ExportOptions::default(), stamp()).unwrap();
        assert!(!ics.contains("LOCATION"), "ICS:\n{}", ics);
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("Pizza, drinks; games"), "Pizza\\, drinks\\; games");
        assert_eq!(escape_text("line one\nline two"), "line one\\nline two");
        assert_eq!(escape_text("C:\\temp"), "C:\\\\temp");
    }

    #[test]
    fn test_generate_ics_escapes_text_once() {
        let mut event = make_test_event("1");
        event.title = "Pizza, drinks; games".to_string();
        event.location = "Room 1, B".to_string();
        event.description = "a\nb".to_string();
        event.category = "Food, Social".to_string();
        let options = ExportOptions {
            calendar_name: Some("Clubs, Societies".to_string()),
            ..Default::default()
        };

        let ics = generate_ics([&event], &options, stamp()).unwrap();
        let unfolded = unfold(&ics);

        assert!(unfolded.contains(r"SUMMARY:Pizza\, drinks\; games"), "ICS:\n{}", unfolded);
        assert!(unfolded.contains(r"LOCATION:Room 1\, B"), "ICS:\n{}", unfolded);
        assert!(unfolded.contains(r"DESCRIPTION:a\nb"), "ICS:\n{}", unfolded);
        assert!(unfolded.contains(r"CATEGORIES:Food\, Social"), "ICS:\n{}", unfolded);
        assert!(unfolded.contains(r"X-WR-CALNAME:Clubs\, Societies"), "ICS:\n{}", unfolded);
        assert!(!unfolded.contains(r"\\"), "ICS:\n{}", unfolded);
    }

    #[test]
    fn test_generate_ics_parses_back_with_one_vevent_per_event() {
        let events = [make_test_event("1"), make_test_event("2"), make_test_event("3")];
        let ics = generate_ics(events.iter(), &ExportOptions::default(), stamp()).unwrap();

        let unfolded = unfold(&ics);
        let calendar = read_calendar(&unfolded).unwrap();
        let uids: Vec<String> = calendar
            .components
            .iter()
            .filter(|c| c.name == "VEVENT")
            .filter_map(|c| c.find_prop("UID").map(|p| p.val.to_string()))
            .collect();
        assert_eq!(uids, vec!["1@eventboard", "2@eventboard", "3@eventboard"]);
    }

    #[test]
    fn test_generate_ics_empty_selection_is_valid_calendar() {
        let ics = generate_ics([], &ExportOptions::default(), stamp()).unwrap();
        assert!(ics.contains("BEGIN:VCALENDAR"));
        assert!(ics.contains("METHOD:PUBLISH"));
        assert!(!ics.contains("BEGIN:VEVENT"));
    }

    #[test]
    fn test_export_filename() {
        let event = make_test_event("1");
        let other = make_test_event("2");
        assert_eq!(export_filename(&[&event]), "event-robotics-workshop.ics");
        assert_eq!(export_filename(&[&event, &other]), "events.ics");
        assert_eq!(export_filename(&[]), "events.ics");
    }
}
