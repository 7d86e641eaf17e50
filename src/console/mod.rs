//! Interactive console module
//!
//! The terminal stands in for the timer's buttons and display: each input
//! line is one button press, and the display task redraws the countdown.

pub mod commands;
pub mod display;
pub mod responses;

use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};

pub use commands::{ConsoleCommand, HELP};
pub use display::display_task;
pub use responses::StatusResponse;

use crate::state::AppState;

/// Whether the console should keep reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Apply one console command to the application state
pub fn handle_command(state: &AppState, command: ConsoleCommand) -> Flow {
    let result = match command {
        ConsoleCommand::Toggle => state.toggle(),
        ConsoleCommand::Start => state.start(),
        ConsoleCommand::Pause => state.pause(),
        ConsoleCommand::Reset => state.reset(),
        ConsoleCommand::Adjust(unit, delta) => state.adjust(unit, delta),
        ConsoleCommand::Status => {
            match StatusResponse::collect(state)
                .and_then(|status| serde_json::to_string_pretty(&status).map_err(|e| e.to_string()))
            {
                Ok(json) => println!("\r\x1b[2K{}", json),
                Err(e) => error!("Failed to collect status: {}", e),
            }
            return Flow::Continue;
        }
        ConsoleCommand::Help => {
            println!("\r\x1b[2K{}", HELP);
            return Flow::Continue;
        }
        ConsoleCommand::Quit => return Flow::Quit,
    };

    match result {
        Ok(true) => {}
        Ok(false) => debug!("{:?} had no effect in the current state", command),
        Err(e) => error!("Failed to apply {:?}: {}", command, e),
    }
    Flow::Continue
}

/// Read commands from stdin until `quit` or end of input
pub async fn console_task(state: Arc<AppState>) {
    info!("Console ready, type 'help' for commands");
    let mut lines = BufReader::new(io::stdin()).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match line.parse::<ConsoleCommand>() {
                Ok(command) => {
                    if handle_command(&state, command) == Flow::Quit {
                        break;
                    }
                }
                Err(e) => warn!("{}", e),
            },
            Ok(None) => {
                debug!("Console input closed");
                break;
            }
            Err(e) => {
                error!("Failed to read console input: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        audio::ToneConfig,
        signal::{testing::RecordingOutput, ToneSignal},
        state::{DurationUnit, ManualClock, NoHeartbeat, TimerController},
    };

    fn app_state() -> AppState {
        let controller = TimerController::new(
            58,
            Arc::new(ManualClock::default()),
            Box::new(ToneSignal::new(RecordingOutput::new(), ToneConfig::default())),
            Box::new(NoHeartbeat),
        );
        AppState::new(controller)
    }

    #[test]
    fn buttons_drive_the_timer() {
        let state = app_state();

        handle_command(&state, ConsoleCommand::Adjust(DurationUnit::Seconds, 5));
        assert_eq!(state.get_timer_state().unwrap().display(), "01:03");

        handle_command(&state, ConsoleCommand::Toggle);
        assert!(state.is_running().unwrap());
        handle_command(&state, ConsoleCommand::Toggle);
        assert!(!state.is_running().unwrap());
    }

    #[test]
    fn quit_ends_the_console() {
        let state = app_state();
        assert_eq!(handle_command(&state, ConsoleCommand::Status), Flow::Continue);
        assert_eq!(handle_command(&state, ConsoleCommand::Quit), Flow::Quit);
    }
}
