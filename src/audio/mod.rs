//! Audio output module
//!
//! The completion signal strategies never talk to a sound device directly;
//! they go through an [`AudioOutput`], which may be a real speaker or just
//! the terminal bell.

pub mod bell;
pub mod playback;
#[cfg(feature = "audio")]
pub mod rodio_output;
pub mod tone;

use std::{sync::Arc, time::Duration};

pub use bell::TerminalBell;
pub use playback::{Playback, PlaybackReport};
#[cfg(feature = "audio")]
pub use rodio_output::RodioOutput;
pub use tone::ToneConfig;

/// Host audio subsystem as seen by the completion signals.
///
/// Every method returns immediately; playback happens elsewhere.
pub trait AudioOutput: Send + Sync {
    fn name(&self) -> &'static str;

    /// Play the chime now
    fn chime(&self, tone: &ToneConfig) -> Result<(), String>;

    /// Queue a chime preceded by `delay` of silence and leave it playing
    /// unattended
    fn chime_after(&self, delay: Duration, tone: &ToneConfig) -> Result<Playback, String>;

    /// Start an inaudible loop that runs until stopped
    fn silent_loop(&self) -> Result<Playback, String>;
}

/// Pick the best output compiled into this build
#[cfg(feature = "audio")]
pub fn default_output() -> Arc<dyn AudioOutput> {
    Arc::new(RodioOutput::new())
}

/// Pick the best output compiled into this build
#[cfg(not(feature = "audio"))]
pub fn default_output() -> Arc<dyn AudioOutput> {
    Arc::new(TerminalBell::new())
}
