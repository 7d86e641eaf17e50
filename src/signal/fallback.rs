//! Primary strategy with a backup

use std::time::Duration;

use tracing::{debug, warn};

use super::CompletionSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Primary,
    Fallback,
}

/// Arms the primary strategy, or the fallback when the primary cannot be
/// prepared on this host. Fires whichever one was armed.
pub struct FallbackSignal {
    primary: Box<dyn CompletionSignal>,
    fallback: Box<dyn CompletionSignal>,
    active: Option<Active>,
}

impl FallbackSignal {
    pub fn new(primary: Box<dyn CompletionSignal>, fallback: Box<dyn CompletionSignal>) -> Self {
        Self {
            primary,
            fallback,
            active: None,
        }
    }

    /// Name of the strategy armed for the current run, if any
    pub fn active_name(&self) -> Option<String> {
        match self.active? {
            Active::Primary => Some(self.primary.name()),
            Active::Fallback => Some(self.fallback.name()),
        }
    }
}

impl CompletionSignal for FallbackSignal {
    fn name(&self) -> String {
        format!("{} (fallback: {})", self.primary.name(), self.fallback.name())
    }

    fn arm(&mut self, remaining: Duration) -> Result<(), String> {
        self.disarm();

        let primary_err = match self.primary.arm(remaining) {
            Ok(()) => {
                self.active = Some(Active::Primary);
                return Ok(());
            }
            Err(e) => e,
        };
        warn!(
            "{} signal unavailable ({}), falling back to {}",
            self.primary.name(),
            primary_err,
            self.fallback.name()
        );

        match self.fallback.arm(remaining) {
            Ok(()) => {
                self.active = Some(Active::Fallback);
                Ok(())
            }
            Err(e) => Err(format!("{}; fallback: {}", primary_err, e)),
        }
    }

    fn disarm(&mut self) {
        self.primary.disarm();
        self.fallback.disarm();
        self.active = None;
    }

    fn fire(&mut self) {
        match self.active.take() {
            Some(Active::Primary) => self.primary.fire(),
            Some(Active::Fallback) => self.fallback.fire(),
            None => {
                debug!("Firing unarmed signal through {}", self.fallback.name());
                self.fallback.fire();
            }
        }
    }
}
