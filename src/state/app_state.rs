//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, warn};

use super::{controller::TickOutcome, DurationUnit, TimerController, TimerState};
use crate::tasks::TickSource;

/// Main application state shared between the console and background tasks
pub struct AppState {
    /// The one timer this process runs
    controller: Mutex<TimerController>,
    /// Server metadata
    pub start_time: Instant,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for completion notifications
    pub completion_tx: broadcast::Sender<DateTime<Utc>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState around a controller
    pub fn new(controller: TimerController) -> Self {
        let (completion_tx, _) = broadcast::channel(16);
        let (timer_update_tx, timer_update_rx) = watch::channel(controller.snapshot());

        Self {
            controller: Mutex::new(controller),
            start_time: Instant::now(),
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            completion_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimerController>, String> {
        self.controller
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Apply a user action to the controller and publish the new state
    pub fn update_timer<F>(&self, action: &str, updater: F) -> Result<bool, String>
    where
        F: FnOnce(&mut TimerController) -> bool,
    {
        let mut controller = self.lock()?;
        let completions = controller.completions();
        let changed = updater(&mut controller);
        let completed = controller.completions() > completions;
        let snapshot = controller.snapshot();
        drop(controller); // Release the lock early

        if completed {
            debug!("Countdown completed on {}", action);
            let _ = self.completion_tx.send(Utc::now());
        }

        if changed {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        self.publish(snapshot);
        Ok(changed)
    }

    /// Start/pause toggle
    pub fn toggle(&self) -> Result<bool, String> {
        let running = self.is_running()?;
        self.update_timer(if running { "pause" } else { "start" }, |c| c.toggle())
    }

    pub fn start(&self) -> Result<bool, String> {
        self.update_timer("start", |c| c.start())
    }

    pub fn pause(&self) -> Result<bool, String> {
        self.update_timer("pause", |c| c.stop())
    }

    pub fn reset(&self) -> Result<bool, String> {
        self.update_timer("reset", |c| c.reset())
    }

    pub fn adjust(&self, unit: DurationUnit, delta: i32) -> Result<bool, String> {
        let action = match unit {
            DurationUnit::Minutes => "adjust-minutes",
            DurationUnit::Seconds => "adjust-seconds",
        };
        self.update_timer(action, |c| c.adjust_duration(unit, delta))
    }

    /// Re-evaluate the countdown on behalf of `source`
    pub fn tick(&self, source: TickSource) -> Result<TickOutcome, String> {
        let mut controller = self.lock()?;
        let outcome = controller.tick();
        let snapshot = controller.snapshot();
        drop(controller);

        match outcome {
            TickOutcome::Idle => return Ok(outcome),
            TickOutcome::Completed => {
                debug!("Countdown completed on {} tick", source);
                // Nobody listening is fine
                let _ = self.completion_tx.send(Utc::now());
            }
            TickOutcome::Running { .. } => {}
        }

        self.publish(snapshot);
        Ok(outcome)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, String> {
        self.lock().map(|controller| controller.snapshot())
    }

    pub fn is_running(&self) -> Result<bool, String> {
        self.lock().map(|controller| controller.is_running())
    }

    pub fn completions(&self) -> Result<u64, String> {
        self.lock().map(|controller| controller.completions())
    }

    pub fn signal_name(&self) -> Result<String, String> {
        self.lock().map(|controller| controller.signal_name())
    }

    /// Stop any running countdown so its signal resources are released
    pub fn shutdown(&self) -> Result<(), String> {
        self.update_timer("shutdown", |c| c.stop()).map(|_| ())
    }

    fn publish(&self, snapshot: TimerState) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    /// Calculate uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
