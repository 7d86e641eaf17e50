//! Console output structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, TimerState};

/// Status snapshot printed by the `status` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub display: String,
    pub button: String,
    pub signal: String,
    pub completions: u64,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
    pub version: String,
}

impl StatusResponse {
    /// Gather a status snapshot from the application state
    pub fn collect(state: &AppState) -> Result<Self, String> {
        let timer = state.get_timer_state()?;
        let (last_action, last_action_time) = state.get_last_action();

        Ok(Self {
            display: timer.display(),
            button: timer.button_label().to_string(),
            timer,
            signal: state.signal_name()?,
            completions: state.completions()?,
            uptime: state.get_uptime(),
            last_action,
            last_action_time,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
