//! Event types.
//!
//! [`RawEvent`] is the record shape delivered by an event source. The
//! normalizer turns it into an [`Event`], which the rest of the crate works
//! with exclusively.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A normalized event. Immutable once built; `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub speaker: String,
    pub category: String,
    pub tags: Vec<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Event {
    /// Lowercased text searched by free-text queries.
    pub(crate) fn haystack(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.speaker,
            self.description,
            self.tags.join(" ")
        )
        .to_lowercase()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// An event record as delivered by a source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Sources hand out ids as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
