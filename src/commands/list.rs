use anyhow::Result;
use eventboard_core::{BoardState, EventSet};

use crate::render::Render;

pub fn run(state: &BoardState, events: &EventSet, json: bool) -> Result<()> {
    let views = state.render_views(events);
    if json {
        return super::print_json(&views.listing);
    }
    println!("{}", views.listing.render(&state.zone));
    Ok(())
}
