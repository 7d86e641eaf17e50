//! Countdown display task

use std::{
    io::{self, Write},
    sync::Arc,
};

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::state::{AppState, TimerState};

/// One display line: the countdown and the label of the start/pause button
pub fn render(state: &TimerState) -> String {
    format!("{}  [{}]", state.display(), state.button_label())
}

fn redraw(line: &str) {
    let mut stdout = io::stdout().lock();
    // Clear the line and return the cursor so the countdown updates in place
    if let Err(e) = write!(stdout, "\r\x1b[2K{}", line).and_then(|_| stdout.flush()) {
        debug!("Failed to redraw display: {}", e);
    }
}

/// Background task that redraws the countdown whenever the timer changes
pub async fn display_task(state: Arc<AppState>) {
    let mut updates = state.timer_update_tx.subscribe();
    let mut completions = state.completion_tx.subscribe();
    let mut last = String::new();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = render(&updates.borrow_and_update());
                if line != last {
                    redraw(&line);
                    last = line;
                }
            }
            completed = completions.recv() => {
                match completed {
                    Ok(at) => {
                        println!("\r\x1b[2KSession complete at {}", at.format("%H:%M:%S"));
                        redraw(&last);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Display missed {} completion notices", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }
}
