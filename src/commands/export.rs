use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use eventboard_core::ics::{ExportOptions, export_filename, generate_ics};
use eventboard_core::{BoardState, Event, EventSet};
use owo_colors::OwoColorize;
use tracing::info;

use crate::render::pluralize;

pub fn run(
    state: &BoardState,
    events: &EventSet,
    ids: &[String],
    output: Option<PathBuf>,
    options: &ExportOptions,
) -> Result<()> {
    let selected = select(state, events, ids)?;

    if selected.is_empty() {
        println!("{}", "No events to export. Adjust filters.".dimmed());
        return Ok(());
    }

    let ics = generate_ics(selected.iter().copied(), options, Utc::now())?;
    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(&selected)));

    std::fs::write(&path, ics).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Exported {} events to {}", selected.len(), path.display());

    println!(
        "{} {} {} to {}",
        "Exported".green(),
        selected.len(),
        pluralize("event", selected.len()),
        path.display()
    );
    Ok(())
}

/// Filtered events, narrowed to `ids` when any are given.
fn select<'a>(state: &BoardState, events: &'a EventSet, ids: &[String]) -> Result<Vec<&'a Event>> {
    if let Some(unknown) = ids.iter().find(|id| events.find(id).is_none()) {
        anyhow::bail!("No event with id '{}'", unknown);
    }

    let filtered = state.filter(events);
    if ids.is_empty() {
        return Ok(filtered);
    }

    Ok(filtered
        .into_iter()
        .filter(|e| ids.iter().any(|id| *id == e.id))
        .collect())
}
