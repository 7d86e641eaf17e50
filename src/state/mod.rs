//! State management module
//!
//! This module contains the timer state, the state machine that drives it and
//! the shared application state around it.

pub mod app_state;
pub mod clock;
pub mod controller;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Heartbeat, NoHeartbeat, TickOutcome, TimerController};
pub use timer_state::{DurationUnit, TimerState};
