//! Chime synthesized at the moment of expiry

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use super::CompletionSignal;
use crate::audio::{AudioOutput, ToneConfig};

/// Plays the chime when `fire` is called.
///
/// Nothing is prepared in advance, so it only sounds once the heartbeat gets
/// to run again after expiry.
pub struct ToneSignal {
    output: Arc<dyn AudioOutput>,
    tone: ToneConfig,
    fired: bool,
}

impl ToneSignal {
    pub fn new(output: Arc<dyn AudioOutput>, tone: ToneConfig) -> Self {
        Self {
            output,
            tone,
            fired: false,
        }
    }
}

impl CompletionSignal for ToneSignal {
    fn name(&self) -> String {
        "tone".to_string()
    }

    fn arm(&mut self, _remaining: Duration) -> Result<(), String> {
        self.fired = false;
        Ok(())
    }

    fn disarm(&mut self) {}

    fn fire(&mut self) {
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
