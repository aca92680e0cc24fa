use anyhow::Result;
use eventboard_core::view::category_options;
use eventboard_core::EventSet;
use owo_colors::OwoColorize;

use crate::render::render_category;

pub fn run(events: &EventSet, json: bool) -> Result<()> {
    let options = category_options(events.events());
    if json {
        return super::print_json(&options);
    }

    if options.is_empty() {
        println!("{}", "No categories".dimmed());
        return Ok(());
    }

    for option in &options {
        println!("{}", render_category(option));
    }

    Ok(())
}
