//! Handle to audio left playing on another thread

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};

/// Handle to a playback running on an audio thread.
///
/// Dropping the handle stops the playback unless it was detached first.
#[derive(Debug)]
pub struct Playback {
    stop_tx: Option<mpsc::Sender<()>>,
    report: PlaybackReport,
}

/// Progress flags the audio thread sets and the handle reads
#[derive(Debug, Clone, Default)]
pub struct PlaybackReport {
    started: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

impl PlaybackReport {
    /// The audio reached the device
    pub fn started(&self) {
        self.started.store(true, Ordering::SeqCst);
    }

    /// The audio thread is done, whether or not anything played
    pub fn finished(&self) {
        self.finished.store(true, Ordering::SeqCst);
    }
}

impl Playback {
    /// Create a handle plus the pieces the audio thread works with: a stop
    /// receiver and the report it fills in as playback progresses.
    pub fn channel() -> (Self, mpsc::Receiver<()>, PlaybackReport) {
        let (stop_tx, stop_rx) = mpsc::channel();
        let report = PlaybackReport::default();
        let playback = Self {
            stop_tx: Some(stop_tx),
            report: report.clone(),
        };
        (playback, stop_rx, report)
    }

    /// Check if the audio thread has finished
    pub fn is_finished(&self) -> bool {
        self.report.finished.load(Ordering::SeqCst)
    }

    /// Check if the audio thread ended without ever reaching the device
    pub fn failed(&self) -> bool {
        self.is_finished() && !self.report.started.load(Ordering::SeqCst)
    }

    /// Ask the audio thread to stop now
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may already be gone, which is fine
            let _ = tx.send(());
        }
    }

    /// Let the playback run to its natural end
    pub fn detach(mut self) {
        // Dropping the sender disconnects the channel without a stop message
        self.stop_tx = None;
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        self.stop();
    }
}
