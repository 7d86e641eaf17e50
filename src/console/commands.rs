//! Console command parsing

use std::str::FromStr;

use crate::state::DurationUnit;

/// Step applied by the seconds buttons
pub const SECONDS_STEP: i32 = 5;
/// Step applied by the minutes buttons
pub const MINUTES_STEP: i32 = 1;

/// One line of console input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start/pause button
    Toggle,
    Start,
    Pause,
    Reset,
    Adjust(DurationUnit, i32),
    Status,
    Help,
    Quit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let command = match line.trim().to_lowercase().as_str() {
            "" | "t" | "toggle" => ConsoleCommand::Toggle,
            "start" => ConsoleCommand::Start,
            "pause" | "stop" => ConsoleCommand::Pause,
            "r" | "reset" => ConsoleCommand::Reset,
            "m+" | "+m" => ConsoleCommand::Adjust(DurationUnit::Minutes, MINUTES_STEP),
            "m-" | "-m" => ConsoleCommand::Adjust(DurationUnit::Minutes, -MINUTES_STEP),
            "s+" | "+s" => ConsoleCommand::Adjust(DurationUnit::Seconds, SECONDS_STEP),
            "s-" | "-s" => ConsoleCommand::Adjust(DurationUnit::Seconds, -SECONDS_STEP),
            "status" => ConsoleCommand::Status,
            "h" | "help" | "?" => ConsoleCommand::Help,
            "q" | "quit" | "exit" => ConsoleCommand::Quit,
            other => return Err(format!("Unknown command: {}", other)),
        };
        Ok(command)
    }
}

/// Console usage text
pub const HELP: &str = "\
Commands:
  <enter>, t, toggle   Start or pause the countdown
  start / pause        Start or pause explicitly
  r, reset             Restore the full duration (while paused)
  m+ / m-              Add or remove a minute (while idle)
  s+ / s-              Add or remove five seconds (while idle)
  status               Print the timer state as JSON
  h, help              Show this help
  q, quit              Exit";
