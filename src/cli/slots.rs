use anyhow::Result;
use itertools::Itertools;

use crate::api::{self, AppState};
use crate::core::AppConfig;
use crate::scheduling::resolve_availability;

pub async fn run(date: &str) -> Result<()> {
    api::init_tracing();

    let state = AppState::from_config(AppConfig::default())?;
    let result = resolve_availability(
        state.calendar.as_ref(),
        &state.grid,
        state.config.timezone,
        state.clock.now(),
        date,
    )
    .await?;

    println!("{}", result.date.format("%A, %B %-d, %Y"));
    if result.slots.is_empty() {
        println!("No open slots");
    } else {
        println!("{}", result.display_times().iter().join("\n"));
    }
    if result.degraded {
        println!("(calendar unavailable, showing every slot on the grid)");
    }
    Ok(())
}
