//! Speaker output through rodio
//!
//! Each playback gets its own thread holding the output stream, since the
//! stream handle cannot move between threads.

use std::{
    sync::mpsc,
    thread,
    time::Duration,
};

use rodio::{buffer::SamplesBuffer, OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::{
    tone::{render_chime, SAMPLE_RATE},
    AudioOutput, Playback, PlaybackReport, ToneConfig,
};

/// How often a playback thread checks for a stop request
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Plays through the default output device
#[derive(Debug, Clone, Copy, Default)]
pub struct RodioOutput;

impl RodioOutput {
    pub fn new() -> Self {
        Self
    }

    fn spawn<S>(&self, label: &'static str, source: S) -> Result<Playback, String>
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let (playback, stop_rx, report) = Playback::channel();

        thread::Builder::new()
            .name(format!("audio-{}", label))
            .spawn(move || {
                play_until_done(label, source, stop_rx, &report);
                report.finished();
            })
            .map_err(|e| format!("Failed to spawn audio thread: {}", e))?;

        Ok(playback)
    }
}

fn play_until_done<S>(label: &str, source: S, stop_rx: mpsc::Receiver<()>, report: &PlaybackReport)
where
    S: Source<Item = f32> + Send + 'static,
{
    let Ok((_stream, handle)) = OutputStream::try_default() else {
        warn!("No audio output device available for {}", label);
        return;
    };
    let sink = match Sink::try_new(&handle) {
        Ok(sink) => sink,
        Err(e) => {
            warn!("Failed to open audio sink for {}: {}", label, e);
            return;
        }
    };

    sink.append(source);
    report.started();

    while !sink.empty() {
        match stop_rx.recv_timeout(POLL_INTERVAL) {
            Ok(()) => {
                debug!("Stopping {} playback", label);
                sink.stop();
                return;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                // Detached: nobody can stop us any more
                sink.sleep_until_end();
                return;
            }
        }
    }
}

fn chime_source(tone: &ToneConfig) -> SamplesBuffer<f32> {
    SamplesBuffer::new(1, SAMPLE_RATE, render_chime(tone, SAMPLE_RATE))
}

impl AudioOutput for RodioOutput {
    fn name(&self) -> &'static str {
        "rodio"
    }

    fn chime(&self, tone: &ToneConfig) -> Result<(), String> {
        self.spawn("chime", chime_source(tone)).map(Playback::detach)
    }

    fn chime_after(&self, delay: Duration, tone: &ToneConfig) -> Result<Playback, String> {
        self.spawn("prerendered", chime_source(tone).delay(delay))
    }

    fn silent_loop(&self) -> Result<Playback, String> {
        // A quarter second of silence, looped
        let silence = SamplesBuffer::new(1, SAMPLE_RATE, vec![0.0f32; SAMPLE_RATE as usize / 4]);
        self.spawn("keep-alive", silence.repeat_infinite())
    }
}
