use anyhow::Result;
use chrono::NaiveDate;
use eventboard_core::{BoardState, EventSet};
use owo_colors::OwoColorize;

use crate::render::{Render, render_day_detail};

pub fn run(
    state: &BoardState,
    events: &EventSet,
    day: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let views = state.render_views(events);
    if json {
        return match day {
            Some(day) => super::print_json(&views.grid.grid.cell_for(day)),
            None => super::print_json(&views.grid),
        };
    }

    println!("{}", views.grid.render(&state.zone));

    if let Some(day) = day {
        println!();
        match views.grid.grid.cell_for(day) {
            Some(cell) => println!("{}", render_day_detail(cell, &state.zone)),
            None => println!(
                "{}",
                format!("{} is not shown in {}", day, views.grid.label).dimmed()
            ),
        }
    }

    Ok(())
}
