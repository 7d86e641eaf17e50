//! Process-level helpers
//!
//! Currently just graceful shutdown on termination signals.

pub mod signals;

pub use signals::shutdown_signal;
