//! Terminal bell output, available everywhere

use std::{
    io::{self, Write},
    time::Duration,
};

use tracing::debug;

use super::{AudioOutput, Playback, ToneConfig};

/// Rings the terminal's bell character on stderr.
///
/// It can only sound immediately; it has no way to queue audio or keep a
/// device busy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl TerminalBell {
    pub fn new() -> Self {
        Self
    }
}

impl AudioOutput for TerminalBell {
    fn name(&self) -> &'static str {
        "terminal-bell"
    }

    fn chime(&self, _tone: &ToneConfig) -> Result<(), String> {
        debug!("Ringing terminal bell");
        let mut stderr = io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| format!("Failed to ring terminal bell: {}", e))
    }

    fn chime_after(&self, _delay: Duration, _tone: &ToneConfig) -> Result<Playback, String> {
        Err("terminal bell cannot queue delayed playback".to_string())
    }

    fn silent_loop(&self) -> Result<Playback, String> {
        Err("terminal bell cannot hold a playback loop".to_string())
    }
}
