//! Timer background task, the single consumer of tick events

use std::sync::Arc;
use tracing::{error, info};

use super::TickReceiver;
use crate::state::{AppState, TickOutcome};

/// Background task that re-evaluates the countdown for every tick it receives
pub async fn timer_task(state: Arc<AppState>, mut ticks: TickReceiver) {
    info!("Starting timer task");

    while let Some(source) = ticks.recv().await {
        match state.tick(source) {
            Ok(TickOutcome::Completed) => {
                info!("Countdown finished ({} tick)", source);
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to evaluate {} tick: {}", source, e);
            }
        }
    }

    info!("Tick channel closed, timer task exiting");
}
