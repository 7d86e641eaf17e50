//! Completion signal module
//!
//! A completion signal is whatever makes the chime happen when a countdown
//! runs out. The host may stop running our code for most of a countdown, so
//! no single approach is reliable everywhere; each strategy here trades a
//! different host capability for that reliability, and [`FallbackSignal`]
//! pairs a preferred one with a backup.

pub mod fallback;
pub mod keep_alive;
pub mod prerendered;
pub mod scheduled;
pub mod tone;
pub mod wake_lock;

use std::{fmt, sync::Arc, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    audio::{AudioOutput, ToneConfig},
    tasks::TickSender,
};

pub use fallback::FallbackSignal;
pub use keep_alive::KeepAliveSignal;
pub use prerendered::PrerenderedSignal;
pub use scheduled::ScheduledSignal;
pub use tone::ToneSignal;
pub use wake_lock::WakeLockSignal;

/// Mechanism that produces the chime for one countdown run.
///
/// `arm` must return without blocking. `disarm` must be safe whether or not
/// the signal was armed or already fired. `fire` sounds at most one chime
/// per arming and never reports audio failures to the caller.
pub trait CompletionSignal: Send {
    fn name(&self) -> String;

    /// Prepare to chime `remaining` from now
    fn arm(&mut self, remaining: Duration) -> Result<(), String>;

    /// Cancel the pending chime and release any resources
    fn disarm(&mut self);

    /// The countdown has run out
    fn fire(&mut self);
}

/// Available completion strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    /// Synthesize the chime when the heartbeat notices expiry
    Tone,
    /// Queue a silence-padded chime on the audio device at start
    Prerendered,
    /// Keep an inaudible loop playing and use its progress as a heartbeat
    KeepAlive,
    /// Schedule the chime on the runtime's monotonic clock at start
    Scheduled,
    /// Ask the host not to sleep while the countdown runs
    WakeLock,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::Tone => "tone",
            SignalKind::Prerendered => "prerendered",
            SignalKind::KeepAlive => "keep-alive",
            SignalKind::Scheduled => "scheduled",
            SignalKind::WakeLock => "wake-lock",
        };
        f.write_str(name)
    }
}

/// Everything a strategy may need to build itself
#[derive(Clone)]
pub struct SignalContext {
    pub output: Arc<dyn AudioOutput>,
    pub tone: ToneConfig,
    /// Where keep-alive progress ticks go
    pub ticks: TickSender,
    pub progress_interval: Duration,
}

/// Build a single strategy
pub fn build_signal(kind: SignalKind, ctx: &SignalContext) -> Box<dyn CompletionSignal> {
    let output = Arc::clone(&ctx.output);
    let tone = ctx.tone.clone();
    match kind {
        SignalKind::Tone => Box::new(ToneSignal::new(output, tone)),
        SignalKind::Prerendered => Box::new(PrerenderedSignal::new(output, tone)),
        SignalKind::KeepAlive => Box::new(KeepAliveSignal::new(
            output,
            tone,
            ctx.ticks.clone(),
            ctx.progress_interval,
        )),
        SignalKind::Scheduled => Box::new(ScheduledSignal::new(output, tone)),
        SignalKind::WakeLock => Box::new(WakeLockSignal::new(output, tone)),
    }
}

/// Build a primary strategy backed by a fallback.
///
/// Asking for the same strategy twice yields just that strategy.
pub fn build_with_fallback(
    primary: SignalKind,
    fallback: SignalKind,
    ctx: &SignalContext,
) -> Box<dyn CompletionSignal> {
    if primary == fallback {
        return build_signal(primary, ctx);
    }
    Box::new(FallbackSignal::new(
        build_signal(primary, ctx),
        build_signal(fallback, ctx),
    ))
}

#[cfg(test)]
pub(crate) mod testing {
    //! Recording audio output shared by the strategy tests

    use std::{
        sync::{mpsc, Arc, Mutex},
        time::Duration,
    };

    use crate::audio::{AudioOutput, Playback, PlaybackReport, ToneConfig};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Chime,
        ChimeAfter(Duration),
        SilentLoop,
    }

    /// Audio output that records calls instead of making sound
    #[derive(Default)]
    pub struct RecordingOutput {
        pub calls: Mutex<Vec<Call>>,
        /// Stop receivers for every playback handed out
        pub stops: Mutex<Vec<mpsc::Receiver<()>>>,
        pub reports: Mutex<Vec<PlaybackReport>>,
        /// Make `chime_after` and `silent_loop` fail
        pub unsupported: bool,
    }

    impl RecordingOutput {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn unsupported() -> Arc<Self> {
            Arc::new(Self {
                unsupported: true,
                ..Self::default()
            })
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn chimes(&self) -> usize {
            self.calls().iter().filter(|c| **c == Call::Chime).count()
        }

        /// Whether playback `index` was told to stop
        pub fn stopped(&self, index: usize) -> bool {
            self.stops.lock().unwrap()[index].try_recv().is_ok()
        }

        /// Pretend playback `index` reached the device and ran out on its own
        pub fn play_out(&self, index: usize) {
            let report = self.reports.lock().unwrap()[index].clone();
            report.started();
            report.finished();
        }

        /// Pretend the audio thread behind playback `index` died before
        /// anything reached the device
        pub fn fail(&self, index: usize) {
            self.reports.lock().unwrap()[index].finished();
        }

        fn playback(&self, call: Call) -> Result<Playback, String> {
            if self.unsupported {
                return Err("unsupported".to_string());
            }
            self.calls.lock().unwrap().push(call);
            let (playback, stop_rx, report) = Playback::channel();
            self.stops.lock().unwrap().push(stop_rx);
            self.reports.lock().unwrap().push(report);
            Ok(playback)
        }
    }

    impl AudioOutput for RecordingOutput {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn chime(&self, _tone: &ToneConfig) -> Result<(), String> {
            self.calls.lock().unwrap().push(Call::Chime);
            Ok(())
        }

        fn chime_after(&self, delay: Duration, _tone: &ToneConfig) -> Result<Playback, String> {
            self.playback(Call::ChimeAfter(delay))
        }

        fn silent_loop(&self) -> Result<Playback, String> {
            self.playback(Call::SilentLoop)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::testing::RecordingOutput;
    use tokio::sync::mpsc;

    fn context() -> SignalContext {
        let (ticks, _rx) = mpsc::unbounded_channel();
        SignalContext {
            output: RecordingOutput::new(),
            tone: ToneConfig::default(),
            ticks,
            progress_interval: Duration::from_millis(500),
        }
    }

    #[test]
    fn same_primary_and_fallback_builds_one_strategy() {
        let signal = build_with_fallback(SignalKind::Tone, SignalKind::Tone, &context());
        assert_eq!(signal.name(), "tone");
    }

    #[test]
    fn fallback_name_lists_both_strategies() {
        let signal = build_with_fallback(SignalKind::Prerendered, SignalKind::Tone, &context());
        assert_eq!(signal.name(), "prerendered (fallback: tone)");
    }

    #[test]
    fn kinds_display_like_their_cli_names() {
        for kind in SignalKind::value_variants() {
            let cli_name = kind.to_possible_value().unwrap();
            assert_eq!(kind.to_string(), cli_name.get_name());
        }
    }
}
