//! Loading raw event feeds from disk or over HTTP.

use std::time::Duration;

use eventboard_core::config::is_url;
use eventboard_core::normalize::normalize_json;
use eventboard_core::{EventBoardError, EventSet, ZonePolicy};
use tracing::{debug, warn};

/// Fetch and normalize the feed at `source`.
///
/// Transport problems become `EventBoardError::Fetch`; malformed records are
/// skipped and only show up in the set's skipped count.
pub async fn fetch_events(
    source: &str,
    zone: &ZonePolicy,
    timeout: Duration,
) -> Result<EventSet, EventBoardError> {
    let body = tokio::time::timeout(timeout, read_source(source))
        .await
        .map_err(|_| {
            EventBoardError::Fetch(format!(
                "timed out after {}s reading {}",
                timeout.as_secs(),
                source
            ))
        })??;

    let normalized = normalize_json(&body, zone)?;
    if normalized.skipped_count() > 0 {
        warn!(
            "{} of {} records in {} were malformed and skipped",
            normalized.skipped_count(),
            normalized.skipped_count() + normalized.events.len(),
            source
        );
    }

    Ok(normalized.into())
}

async fn read_source(source: &str) -> Result<String, EventBoardError> {
    if is_url(source) {
        debug!("Fetching events from {}", source);
        let response = reqwest::get(source)
            .await
            .map_err(|e| EventBoardError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EventBoardError::Fetch(format!(
                "{} responded with {}",
                source, status
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EventBoardError::Fetch(e.to_string()))
    } else {
        debug!("Reading events from {}", source);
        tokio::fs::read_to_string(source)
            .await
            .map_err(|e| EventBoardError::Fetch(format!("{source}: {e}")))
    }
}
