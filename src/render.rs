//! Terminal rendering for eventboard views.
//!
//! Renders the core's presentation structures with owo_colors. Times are
//! shown in the board's zone.

use chrono::{Datelike, NaiveDate};
use eventboard_core::grid::CalendarCell;
use eventboard_core::view::{CategoryOption, EventItem, GridView, Listing};
use eventboard_core::{Event, ZonePolicy};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self, zone: &ZonePolicy) -> String;
}

/// Width of one calendar column, including its separator.
const CELL_WIDTH: usize = 5;

/// Colorize text with a color picked from the category slug, so a category
/// keeps its color across runs and views.
pub fn colorize_category(slug: &str, text: &str) -> String {
    let index = slug.bytes().fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
    match index % 6 {
        0 => text.green().to_string(),
        1 => text.cyan().to_string(),
        2 => text.magenta().to_string(),
        3 => text.yellow().to_string(),
        4 => text.blue().to_string(),
        _ => text.red().to_string(),
    }
}

/// e.g. "Wed Mar 5 09:00"
pub fn format_when(event: &Event, zone: &ZonePolicy) -> String {
    zone.local_datetime(event.start)
        .format("%a %b %-d %H:%M")
        .to_string()
}

/// e.g. "09:00 - 10:00"
pub fn format_time_range(event: &Event, zone: &ZonePolicy) -> String {
    format!(
        "{} - {}",
        zone.local_datetime(event.start).format("%H:%M"),
        zone.local_datetime(event.end).format("%H:%M")
    )
}

impl Render for EventItem<'_> {
    fn render(&self, zone: &ZonePolicy) -> String {
        let event = self.event;
        let mut lines = vec![event.title.bold().to_string()];

        let meta: Vec<String> = [format_when(event, zone), event.location.clone(), event.speaker.clone()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        lines.push(format!("   {}", meta.join(" · ").dimmed()));

        if !event.description.is_empty() {
            lines.push(format!("   {}", event.description));
        }

        let mut badges = vec![colorize_category(&self.category_slug, &format!("[{}]", event.category))];
        badges.extend(event.tags.iter().map(|t| format!("#{t}").dimmed().to_string()));
        lines.push(format!("   {}", badges.join(" ")));
        lines.push(format!("   {}", format!("id: {}", event.id).dimmed()));

        lines.join("\n")
    }
}

impl Render for Listing<'_> {
    fn render(&self, zone: &ZonePolicy) -> String {
        match self {
            Listing::NoResults => "No events found. Adjust filters.".dimmed().to_string(),
            Listing::Events { items, count } => {
                let mut blocks: Vec<String> = items.iter().map(|item| item.render(zone)).collect();
                blocks.push(format!("{} {}", count, pluralize("event", *count)).dimmed().to_string());
                blocks.join("\n\n")
            }
        }
    }
}

/// Render a listing grouped under day headings.
pub fn render_timeline(listing: &Listing<'_>, zone: &ZonePolicy) -> String {
    if listing.is_empty() {
        return "No events.".dimmed().to_string();
    }

    let today = zone.today();
    let mut lines = Vec::new();
    let mut current_date = None;

    for item in listing.items() {
        let date = zone.local_date(item.event.start);
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(date, today).bold().to_string());
            current_date = Some(date);
        }

        let time = zone.local_datetime(item.event.start).format("%H:%M").to_string();
        let category = colorize_category(&item.category_slug, &format!("[{}]", item.event.category));
        let mut line = format!("  {:>5}  {} {}", time, item.event.title, category);
        if !item.event.location.is_empty() {
            line.push_str(&format!(" {}", item.event.location.dimmed()));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// "Today", "Tomorrow" or e.g. "Wednesday, March 5 2025"
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%A, %B %-d %Y").to_string(),
    }
}

impl Render for CalendarCell<'_> {
    /// One fixed-width grid cell: day number plus an event marker.
    fn render(&self, _zone: &ZonePolicy) -> String {
        let marker = match self.events.len() {
            0 => " ".to_string(),
            1 => "•".to_string(),
            n if n < 10 => n.to_string(),
            _ => "+".to_string(),
        };
        let text = format!("{:>2}{}", self.date.day(), marker);

        let styled = if self.is_today {
            text.reversed().to_string()
        } else if !self.in_focus_month {
            text.dimmed().to_string()
        } else if self.has_events() {
            text.bold().to_string()
        } else {
            text
        };

        format!("{styled}{}", " ".repeat(CELL_WIDTH - 3))
    }
}

impl Render for GridView<'_> {
    fn render(&self, zone: &ZonePolicy) -> String {
        let width = CELL_WIDTH * 7;
        let mut lines = vec![format!("{:^width$}", self.label).bold().to_string()];

        let header: String = self
            .weekdays
            .iter()
            .map(|d| format!("{:>2}{}", &d.to_string()[..2], " ".repeat(CELL_WIDTH - 2)))
            .collect();
        lines.push(header.trim_end().dimmed().to_string());

        for week in self.grid.weeks() {
            let row: String = week.iter().map(|cell| cell.render(zone)).collect();
            lines.push(row.trim_end().to_string());
        }

        if self.is_empty_month() {
            lines.push(String::new());
            lines.push("No events this month.".dimmed().to_string());
        }

        lines.join("\n")
    }
}

/// Events of a single day, as shown when a calendar day is opened.
pub fn render_day_detail(cell: &CalendarCell<'_>, zone: &ZonePolicy) -> String {
    let mut lines = vec![cell.date.format("%A, %B %-d").to_string().bold().to_string()];

    if cell.events.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
        return lines.join("\n");
    }

    for event in &cell.events {
        let location = if event.location.is_empty() { "TBA" } else { event.location.as_str() };
        lines.push(format!(
            "  {}\n    {} · {}",
            event.title.bold(),
            format_time_range(event, zone),
            location
        ));
        if !event.description.is_empty() {
            lines.push(format!("    {}", event.description.italic()));
        }
    }

    lines.join("\n")
}

pub fn render_category(option: &CategoryOption) -> String {
    format!(
        "{} {}",
        colorize_category(&option.slug, &option.label),
        format!("({})", option.slug).dimmed()
    )
}

/// Simple pluralization helper
pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
