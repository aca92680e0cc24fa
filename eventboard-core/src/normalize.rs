//! Raw record normalization.
//!
//! Bad records are skipped rather than failing the batch: each one is logged
//! and reported back in [`Normalized::skipped`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use tracing::warn;

use crate::error::{EventBoardError, EventBoardResult};
use crate::event::{Event, RawEvent};
use crate::zone::ZonePolicy;

/// Offset-less datetime layouts, tried in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Result of normalizing a batch of raw records.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Valid events, ascending by start.
    pub events: Vec<Event>,
    /// One `MalformedRecord` per rejected record, in input order.
    pub skipped: Vec<EventBoardError>,
}

impl Normalized {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Normalize raw records into events sorted by start time.
pub fn normalize(records: Vec<RawEvent>, zone: &ZonePolicy) -> Normalized {
    collect(records.into_iter().map(Ok), zone)
}

/// Validate records in input order; records that already failed to decode
/// are reported at their own position.
fn collect<I>(records: I, zone: &ZonePolicy) -> Normalized
where
    I: IntoIterator<Item = EventBoardResult<RawEvent>>,
{
    let mut normalized = Normalized::default();

    for record in records {
        match record.and_then(|raw| normalize_record(raw, zone)) {
            Ok(event) => normalized.events.push(event),
            Err(err) => {
                warn!("Skipping event record: {}", err);
                normalized.skipped.push(err);
            }
        }
    }

    // Stable sort keeps source order for equal starts.
    normalized.events.sort_by_key(|e| e.start);
    normalized
}

/// Parse a JSON array of raw records and normalize it.
///
/// Fails only when the document itself is not an array of records.
pub fn normalize_json(json: &str, zone: &ZonePolicy) -> EventBoardResult<Normalized> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| EventBoardError::Serialization(format!("Expected a JSON array: {e}")))?;

    let records = values.into_iter().enumerate().map(|(index, value)| {
        let id = record_id(&value).unwrap_or_else(|| format!("#{index}"));
        serde_json::from_value::<RawEvent>(value).map_err(|e| EventBoardError::MalformedRecord {
            id,
            reason: e.to_string(),
        })
    });

    Ok(collect(records, zone))
}

fn record_id(value: &serde_json::Value) -> Option<String> {
    match value.get("id")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_record(raw: RawEvent, zone: &ZonePolicy) -> EventBoardResult<Event> {
    let malformed = |reason: String| EventBoardError::MalformedRecord {
        id: raw.id.clone(),
        reason,
    };

    let start = parse_timestamp(&raw.start, zone)
        .ok_or_else(|| malformed(format!("unparseable start '{}'", raw.start)))?;
    let end = parse_timestamp(&raw.end, zone)
        .ok_or_else(|| malformed(format!("unparseable end '{}'", raw.end)))?;

    if end < start {
        return Err(malformed(format!(
            "end {} is before start {}",
            raw.end, raw.start
        )));
    }

    if raw.category.trim().is_empty() {
        return Err(malformed("empty category".to_string()));
    }

    Ok(Event {
        id: raw.id,
        title: raw.title,
        description: raw.description.unwrap_or_default(),
        location: raw.location.unwrap_or_default(),
        speaker: raw.speaker.unwrap_or_default(),
        category: raw.category,
        tags: raw.tags.unwrap_or_default(),
        start,
        end,
    })
}

/// Parse a timestamp string into an instant.
///
/// RFC 3339 strings carry their own offset. Offset-less datetimes and bare
/// dates are wall-clock times in `zone`; a bare date means local midnight.
pub fn parse_timestamp(s: &str, zone: &ZonePolicy) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return zone.resolve(naive);
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    zone.resolve(date.and_time(NaiveTime::MIN))
}
