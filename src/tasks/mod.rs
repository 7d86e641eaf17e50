//! Background tasks module
//!
//! Several independent producers (the heartbeat, wake-up detection, resume
//! signals, keep-alive playback progress) push [`TickSource`] values into one
//! channel; the timer task is the only consumer and re-evaluates the
//! countdown once per value, in order.

pub mod heartbeat;
pub mod timer_task;
pub mod wake_up_recovery;

use std::fmt;

use tokio::sync::mpsc;

// Re-export main functions
pub use heartbeat::IntervalHeartbeat;
pub use timer_task::timer_task;
pub use wake_up_recovery::{resume_signal_task, wake_up_recovery_task, WakeDetector};

/// Why the countdown is being re-evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSource {
    /// Regular once-a-second heartbeat
    Heartbeat,
    /// The process just got to run again after the host held it back
    Resume,
    /// Keep-alive playback reported progress
    MediaProgress,
}

impl fmt::Display for TickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TickSource::Heartbeat => "heartbeat",
            TickSource::Resume => "resume",
            TickSource::MediaProgress => "media-progress",
        };
        f.write_str(name)
    }
}

pub type TickSender = mpsc::UnboundedSender<TickSource>;
pub type TickReceiver = mpsc::UnboundedReceiver<TickSource>;

/// Create the channel every tick producer feeds
pub fn tick_channel() -> (TickSender, TickReceiver) {
    mpsc::unbounded_channel()
}
