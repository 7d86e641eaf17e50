//! Silence-padded chime handed to the audio device up front

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use super::CompletionSignal;
use crate::audio::{AudioOutput, Playback, ToneConfig};

/// Queues `remaining` seconds of silence followed by the chime as soon as
/// the countdown starts.
///
/// From then on the audio thread alone is responsible for sounding at the
/// right offset, whether or not the heartbeat keeps running.
pub struct PrerenderedSignal {
    output: Arc<dyn AudioOutput>,
    tone: ToneConfig,
    pending: Option<Playback>,
}

impl PrerenderedSignal {
    pub fn new(output: Arc<dyn AudioOutput>, tone: ToneConfig) -> Self {
        Self {
            output,
            tone,
            pending: None,
        }
    }
}

impl CompletionSignal for PrerenderedSignal {
    fn name(&self) -> String {
        "prerendered".to_string()
    }

    fn arm(&mut self, remaining: Duration) -> Result<(), String> {
        self.disarm();
        let playback = self.output.chime_after(remaining, &self.tone)?;
        debug!("Queued chime {:?} ahead on {}", remaining, self.output.name());
        self.pending = Some(playback);
        Ok(())
    }

    fn disarm(&mut self) {
        if let Some(mut playback) = self.pending.take() {
            debug!("Cancelling queued chime");
            playback.stop();
        }
    }

    fn fire(&mut self) {
        // The queued audio is the chime; only play again if it never sounded
        let Some(playback) = self.pending.take() else {
            return;
        };
        if playback.failed() {
            warn!("Queued chime never reached {}, chiming now", self.output.name());
            if let Err(e) = self.output.chime(&self.tone) {
                warn!("Chime failed: {}", e);
            }
        } else if playback.is_finished() {
            debug!("Queued chime already played");
        } else {
            info!("Letting queued chime ring out");
        }
        playback.detach();
    }
}
