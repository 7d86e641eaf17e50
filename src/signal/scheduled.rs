//! Chime scheduled on the runtime's monotonic clock

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, warn};

use super::CompletionSignal;
use crate::audio::{AudioOutput, ToneConfig};

/// Schedules the chime on the async runtime's timer when the countdown
/// starts, independent of the heartbeat.
///
/// The scheduled task and `fire` race for one shared latch, so whichever
/// gets there first plays the only chime of the run.
pub struct ScheduledSignal {
    output: Arc<dyn AudioOutput>,
    tone: ToneConfig,
    task: Option<JoinHandle<()>>,
    sounded: Arc<AtomicBool>,
}

impl ScheduledSignal {
    pub fn new(output: Arc<dyn AudioOutput>, tone: ToneConfig) -> Self {
        Self {
            output,
            tone,
            task: None,
            sounded: Arc::new(AtomicBool::new(false)),
        }
    }

    fn cancel_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

fn chime_once(sounded: &AtomicBool, output: &dyn AudioOutput, tone: &ToneConfig) {
    if sounded.swap(true, Ordering::SeqCst) {
        return;
    }
    info!("Playing completion chime on {}", output.name());
    if let Err(e) = output.chime(tone) {
        warn!("Completion chime failed: {}", e);
    }
}

impl CompletionSignal for ScheduledSignal {
    fn name(&self) -> String {
        "scheduled".to_string()
    }

    fn arm(&mut self, remaining: Duration) -> Result<(), String> {
        self.cancel_task();
        let handle =
            Handle::try_current().map_err(|_| "no async runtime to schedule on".to_string())?;

        let sounded = Arc::new(AtomicBool::new(false));
        self.sounded = Arc::clone(&sounded);
        let output = Arc::clone(&self.output);
        let tone = self.tone.clone();

        self.task = Some(handle.spawn(async move {
            tokio::time::sleep(remaining).await;
            debug!("Scheduled chime is due");
            chime_once(&sounded, output.as_ref(), &tone);
        }));
        debug!("Chime scheduled {:?} ahead", remaining);
        Ok(())
    }

    fn disarm(&mut self) {
        self.cancel_task();
    }

    fn fire(&mut self) {
        self.cancel_task();
        chime_once(&self.sounded, self.output.as_ref(), &self.tone);
    }
}
