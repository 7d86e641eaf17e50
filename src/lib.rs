//! Meditation Timer - a countdown whose completion chime survives host suspension
//!
//! The host may stop running this process for most of a countdown (system
//! suspend, a stopped terminal job). The countdown is therefore derived from
//! an absolute end timestamp, re-evaluated from several independent tick
//! sources, and the chime is delivered through a pluggable completion signal.

pub mod audio;
pub mod config;
pub mod console;
pub mod signal;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use signal::{CompletionSignal, SignalKind};
pub use state::{AppState, TimerController, TimerState};
pub use utils::signals::shutdown_signal;
