//! Host inhibitor that keeps the machine awake for the countdown

use std::{process::Stdio, sync::Arc, time::Duration};

use tokio::{
    process::{Child, Command},
    runtime::Handle,
};
use tracing::{debug, info, warn};

use super::CompletionSignal;
use crate::audio::{AudioOutput, ToneConfig};

/// Holds a `systemd-inhibit` lock for as long as the countdown runs, so the
/// host never suspends us in the first place. The chime itself is played on
/// `fire`.
pub struct WakeLockSignal {
    output: Arc<dyn AudioOutput>,
    tone: ToneConfig,
    program: String,
    inhibitor: Option<Child>,
    fired: bool,
}

impl WakeLockSignal {
    pub fn new(output: Arc<dyn AudioOutput>, tone: ToneConfig) -> Self {
        Self::with_program(output, tone, "systemd-inhibit")
    }

    /// Use a different inhibitor binary with the same command-line interface
    pub fn with_program(
        output: Arc<dyn AudioOutput>,
        tone: ToneConfig,
        program: impl Into<String>,
    ) -> Self {
        Self {
            output,
            tone,
            program: program.into(),
            inhibitor: None,
            fired: false,
        }
    }

    /// Check if an inhibitor process is currently held
    pub fn is_held(&self) -> bool {
        self.inhibitor.is_some()
    }

    fn release(&mut self) {
        if let Some(mut child) = self.inhibitor.take() {
            debug!("Releasing wake lock");
            if let Err(e) = child.start_kill() {
                warn!("Failed to release wake lock: {}", e);
            }
        }
    }
}

impl CompletionSignal for WakeLockSignal {
    fn name(&self) -> String {
        "wake-lock".to_string()
    }

    fn arm(&mut self, remaining: Duration) -> Result<(), String> {
        self.release();
        self.fired = false;

        // Spawning a tokio child needs the runtime's reactor
        Handle::try_current().map_err(|_| "no async runtime to hold a wake lock".to_string())?;

        let child = Command::new(&self.program)
            .args([
                "--what=idle:sleep",
                "--who=meditation-timer",
                "--why=Meditation countdown running",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to acquire wake lock via {}: {}", self.program, e))?;

        info!("Wake lock held for the next {:?}", remaining);
        self.inhibitor = Some(child);
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
