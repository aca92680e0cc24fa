use anyhow::Result;
use eventboard_core::{BoardState, EventSet};

use crate::render::render_timeline;

pub fn run(state: &BoardState, events: &EventSet, json: bool) -> Result<()> {
    let views = state.render_views(events);
    if json {
        return super::print_json(&views.timeline);
    }
    println!("{}", render_timeline(&views.timeline, &state.zone));
    Ok(())
}
