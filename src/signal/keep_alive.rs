//! Inaudible playback loop that doubles as a heartbeat

use std::{sync::Arc, time::Duration};

use tokio::{runtime::Handle, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, warn};

use super::CompletionSignal;
use crate::{
    audio::{AudioOutput, Playback, ToneConfig},
    tasks::{TickSender, TickSource},
};

/// Keeps a silent loop playing for the whole countdown and pushes a
/// `MediaProgress` tick every `interval`, giving the countdown a second
/// heartbeat that does not depend on the main one.
pub struct KeepAliveSignal {
    output: Arc<dyn AudioOutput>,
    tone: ToneConfig,
    ticks: TickSender,
    interval: Duration,
    silent_loop: Option<Playback>,
    progress: Option<JoinHandle<()>>,
    fired: bool,
}

impl KeepAliveSignal {
    pub fn new(
        output: Arc<dyn AudioOutput>,
        tone: ToneConfig,
        ticks: TickSender,
        interval: Duration,
    ) -> Self {
        Self {
            output,
            tone,
            ticks,
            interval,
            silent_loop: None,
            progress: None,
            fired: false,
        }
    }

    fn spawn_progress(&self) -> Result<JoinHandle<()>, String> {
        let handle = Handle::try_current()
            .map_err(|_| "no async runtime for progress events".to_string())?;
        let ticks = self.ticks.clone();
        let period = self.interval;

        Ok(handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if ticks.send(TickSource::MediaProgress).is_err() {
                    break;
                }
            }
        }))
    }

    fn release(&mut self) {
        if let Some(mut playback) = self.silent_loop.take() {
            playback.stop();
        }
        if let Some(task) = self.progress.take() {
            task.abort();
        }
    }
}

impl CompletionSignal for KeepAliveSignal {
    fn name(&self) -> String {
        "keep-alive".to_string()
    }

    fn arm(&mut self, _remaining: Duration) -> Result<(), String> {
        self.release();
        self.fired = false;

        let loop_err = match self.output.silent_loop() {
            Ok(playback) => {
                self.silent_loop = Some(playback);
                None
            }
            Err(e) => {
                warn!("Keep-alive loop unavailable: {}", e);
                Some(e)
            }
        };

        match self.spawn_progress() {
            Ok(task) => self.progress = Some(task),
            Err(e) => {
                warn!("Keep-alive progress events unavailable: {}", e);
                if let Some(loop_err) = loop_err {
                    return Err(format!("{}; {}", loop_err, e));
                }
            }
        }

        debug!("Keep-alive armed");
        Ok(())
    }

    fn disarm(&mut self) {
        self.release();
    }

    fn fire(&mut self) {
        self.release();
        if self.fired {
            return;
        }
        self.fired = true;

        info!("Playing completion chime on {}", self.output.name());
        if let Err(e) = self.output.chime(&self.tone) {
            warn!("Completion chime failed: {}", e);
        }
    }
}
