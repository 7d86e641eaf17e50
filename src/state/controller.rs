//! Countdown state machine
//!
//! ```text
//! Idle --start--> Running --stop / expiry--> Idle
//! ```
//!
//! While running, the end timestamp is the only source of truth. Every
//! observation recomputes `remaining` from it, so however long the host
//! kept us from ticking, the next tick lands on the right value.

use std::{sync::Arc, time::Duration};

use tracing::{debug, info, warn};

use super::{
    clock::Clock,
    timer_state::{adjusted_duration, DurationUnit, TimerState},
};
use crate::signal::CompletionSignal;

/// Periodic re-evaluation source, started and cancelled with each run
pub trait Heartbeat: Send {
    fn begin(&mut self);
    fn cancel(&mut self);
}

/// Heartbeat that does nothing, for callers that drive `tick` themselves
#[derive(Debug, Default)]
pub struct NoHeartbeat;

impl Heartbeat for NoHeartbeat {
    fn begin(&mut self) {}
    fn cancel(&mut self) {}
}

/// What a `tick` observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer was not running
    Idle,
    /// Still counting down
    Running { remaining: u32 },
    /// This tick ended the run and fired the completion signal
    Completed,
}

/// Owns one timer's state and drives its completion signal
pub struct TimerController {
    state: TimerState,
    clock: Arc<dyn Clock>,
    signal: Box<dyn CompletionSignal>,
    heartbeat: Box<dyn Heartbeat>,
    completions: u64,
}

impl TimerController {
    pub fn new(
        duration: u32,
        clock: Arc<dyn Clock>,
        signal: Box<dyn CompletionSignal>,
        heartbeat: Box<dyn Heartbeat>,
    ) -> Self {
        Self {
            state: TimerState::new(duration),
            clock,
            signal,
            heartbeat,
            completions: 0,
        }
    }

    /// Current state, with `remaining` recomputed against the clock
    pub fn snapshot(&self) -> TimerState {
        let mut state = self.state.clone();
        state.refresh(self.clock.now());
        state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Number of runs that reached expiry
    pub fn completions(&self) -> u64 {
        self.completions
    }

    pub fn signal_name(&self) -> String {
        self.signal.name()
    }

    /// Begin counting down from `remaining`. Returns false if already running.
    pub fn start(&mut self) -> bool {
        if self.state.running {
            debug!("Ignoring start: timer already running");
            return false;
        }

        let now = self.clock.now();
        let remaining = self.state.remaining;
        self.state.end_timestamp = Some(now + chrono::Duration::seconds(i64::from(remaining)));
        self.state.running = true;

        self.state.signal_armed = match self.signal.arm(Duration::from_secs(u64::from(remaining))) {
            Ok(()) => true,
            Err(e) => {
                warn!("Completion signal could not be armed: {}", e);
                false
            }
        };
        self.heartbeat.begin();

        info!("Timer started: {}s remaining", remaining);
        true
    }

    /// Pause the countdown. Returns false if it was not running.
    ///
    /// A run whose end already passed without a tick completes instead of
    /// pausing at zero.
    pub fn stop(&mut self) -> bool {
        if self.tick() == TickOutcome::Completed {
            return true;
        }
        if !self.enter_idle() {
            debug!("Ignoring stop: timer not running");
            return false;
        }
        self.signal.disarm();
        info!("Timer paused: {}s remaining", self.state.remaining);
        true
    }

    /// Start when idle, pause when running
    pub fn toggle(&mut self) -> bool {
        if self.state.running {
            self.stop()
        } else {
            self.start()
        }
    }

    /// Re-evaluate the countdown against the clock.
    ///
    /// Safe to call from any number of sources; the signal fires only on the
    /// tick that moves the timer out of running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Idle;
        }

        self.state.refresh(self.clock.now());
        if self.state.remaining > 0 {
            return TickOutcome::Running {
                remaining: self.state.remaining,
            };
        }

        self.enter_idle();
        info!("Timer complete");
        self.signal.fire();
        self.state.remaining = self.state.duration;
        self.completions += 1;
        TickOutcome::Completed
    }

    /// Change the configured duration. Ignored while running or when the
    /// result would leave the accepted range.
    pub fn adjust_duration(&mut self, unit: DurationUnit, delta: i32) -> bool {
        if self.state.running {
            debug!("Ignoring adjustment while running");
            return false;
        }
        match adjusted_duration(self.state.duration, unit, delta) {
            Some(duration) => {
                self.state.duration = duration;
                self.state.remaining = duration;
                debug!("Duration set to {}s", duration);
                true
            }
            None => {
                debug!(
                    "Rejected {:?} adjustment of {} from {}s",
                    unit, delta, self.state.duration
                );
                false
            }
        }
    }

    /// Restore a paused countdown to the full duration. Ignored while running.
    pub fn reset(&mut self) -> bool {
        if self.state.running {
            debug!("Ignoring reset while running");
            return false;
        }
        self.state.remaining = self.state.duration;
        info!("Timer reset to {}s", self.state.duration);
        true
    }

    /// Leave the running state, keeping the final remaining value. Returns
    /// false if the timer was already idle.
    fn enter_idle(&mut self) -> bool {
        if !self.state.running {
            return false;
        }
        self.state.refresh(self.clock.now());
        self.state.end_timestamp = None;
        self.state.running = false;
        self.state.signal_armed = false;
        self.heartbeat.cancel();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock::ManualClock;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Counts {
        arms: Vec<Duration>,
        disarms: usize,
        fires: usize,
        beats_begun: usize,
        beats_cancelled: usize,
    }

    struct CountingSignal(Arc<Mutex<Counts>>, bool);

    impl CompletionSignal for CountingSignal {
        fn name(&self) -> String {
            "counting".to_string()
        }
        fn arm(&mut self, remaining: Duration) -> Result<(), String> {
            self.0.lock().unwrap().arms.push(remaining);
            if self.1 {
                Err("refused".to_string())
            } else {
                Ok(())
            }
        }
        fn disarm(&mut self) {
            self.0.lock().unwrap().disarms += 1;
        }
        fn fire(&mut self) {
            self.0.lock().unwrap().fires += 1;
        }
    }

    struct CountingHeartbeat(Arc<Mutex<Counts>>);

    impl Heartbeat for CountingHeartbeat {
        fn begin(&mut self) {
            self.0.lock().unwrap().beats_begun += 1;
        }
        fn cancel(&mut self) {
            self.0.lock().unwrap().beats_cancelled += 1;
        }
    }

    fn controller(duration: u32, refuse_arm: bool) -> (TimerController, ManualClock, Arc<Mutex<Counts>>) {
        let clock = ManualClock::default();
        let counts = Arc::new(Mutex::new(Counts::default()));
        let controller = TimerController::new(
            duration,
            Arc::new(clock.clone()),
            Box::new(CountingSignal(Arc::clone(&counts), refuse_arm)),
            Box::new(CountingHeartbeat(Arc::clone(&counts))),
        );
        (controller, clock, counts)
    }

    #[test]
    fn start_arms_signal_and_heartbeat() {
        let (mut timer, clock, counts) = controller(90, false);

        assert!(timer.start());

        let state = timer.snapshot();
        assert!(state.running);
        assert!(state.signal_armed);
        assert_eq!(state.end_timestamp, Some(clock.now() + chrono::Duration::seconds(90)));
        let counts = counts.lock().unwrap();
        assert_eq!(counts.arms, vec![Duration::from_secs(90)]);
        assert_eq!(counts.beats_begun, 1);
    }

    #[test]
    fn start_while_running_is_ignored() {
        let (mut timer, _clock, counts) = controller(90, false);
        timer.start();
        assert!(!timer.start());
        assert_eq!(counts.lock().unwrap().arms.len(), 1);
    }

    #[test]
    fn refused_arm_still_counts_down() {
        let (mut timer, clock, counts) = controller(10, true);
        timer.start();
        assert!(!timer.snapshot().signal_armed);

        clock.advance(chrono::Duration::seconds(10));
        assert_eq!(timer.tick(), TickOutcome::Completed);
        assert_eq!(counts.lock().unwrap().fires, 1);
    }

    #[test]
    fn pause_keeps_partial_remaining_and_resume_continues() {
        let (mut timer, clock, counts) = controller(60, false);
        timer.start();
        clock.advance(chrono::Duration::milliseconds(20_500));

        assert!(timer.stop());
        let state = timer.snapshot();
        assert!(!state.running);
        assert_eq!(state.end_timestamp, None);
        assert_eq!(state.remaining, 40);

        timer.start();
        assert_eq!(counts.lock().unwrap().arms[1], Duration::from_secs(40));
    }

    #[test]
    fn stop_twice_equals_stop_once() {
        let (mut timer, clock, counts) = controller(60, false);
        timer.start();
        clock.advance(chrono::Duration::seconds(5));

        timer.stop();
        let once = timer.snapshot();
        assert!(!timer.stop());

        assert_eq!(timer.snapshot(), once);
        let counts = counts.lock().unwrap();
        assert_eq!(counts.disarms, 1);
        assert_eq!(counts.beats_cancelled, 1);
    }

    #[test]
    fn stop_after_unticked_expiry_completes_the_run() {
        let (mut timer, clock, counts) = controller(30, false);
        timer.start();
        clock.advance(chrono::Duration::seconds(45));

        assert!(timer.stop());

        let state = timer.snapshot();
        assert!(!state.running);
        assert_eq!(state.remaining, 30);
        assert_eq!(timer.completions(), 1);
        let counts = counts.lock().unwrap();
        assert_eq!(counts.fires, 1);
        assert_eq!(counts.disarms, 0);
    }

    #[test]
    fn tick_tracks_wall_clock_not_tick_count() {
        let (mut timer, clock, _counts) = controller(600, false);
        timer.start();

        clock.advance(chrono::Duration::seconds(250));
        assert_eq!(timer.tick(), TickOutcome::Running { remaining: 350 });
        assert_eq!(timer.tick(), TickOutcome::Running { remaining: 350 });
    }

    #[test]
    fn expiry_fires_once_and_resets() {
        let (mut timer, clock, counts) = controller(30, false);
        timer.start();
        clock.advance(chrono::Duration::seconds(45));

        assert_eq!(timer.tick(), TickOutcome::Completed);
        assert_eq!(timer.tick(), TickOutcome::Idle);

        let state = timer.snapshot();
        assert!(!state.running);
        assert!(!state.signal_armed);
        assert_eq!(state.remaining, 30);
        assert_eq!(timer.completions(), 1);
        let counts = counts.lock().unwrap();
        assert_eq!(counts.fires, 1);
        assert_eq!(counts.disarms, 0);
        assert_eq!(counts.beats_cancelled, 1);
    }

    #[test]
    fn adjust_and_reset_ignored_while_running() {
        let (mut timer, clock, _counts) = controller(120, false);
        timer.start();
        clock.advance(chrono::Duration::seconds(3));
        let before = timer.snapshot();

        assert!(!timer.adjust_duration(DurationUnit::Minutes, 1));
        assert!(!timer.reset());

        assert_eq!(timer.snapshot(), before);
    }

    #[test]
    fn adjust_updates_duration_and_remaining() {
        let (mut timer, _clock, _counts) = controller(58, false);
        assert!(timer.adjust_duration(DurationUnit::Seconds, 5));
        let state = timer.snapshot();
        assert_eq!((state.minutes(), state.seconds()), (1, 3));
        assert_eq!(state.duration, 63);
    }

    #[test]
    fn reset_after_pause_restores_duration() {
        let (mut timer, clock, counts) = controller(60, false);
        timer.start();
        clock.advance(chrono::Duration::seconds(15));
        timer.stop();

        assert!(timer.reset());
        assert_eq!(timer.snapshot().remaining, 60);
        assert_eq!(counts.lock().unwrap().disarms, 1);
    }

    #[test]
    fn reset_from_idle_leaves_signal_alone() {
        let (mut timer, _clock, counts) = controller(60, false);

        assert!(timer.reset());

        let counts = counts.lock().unwrap();
        assert_eq!(counts.disarms, 0);
        assert_eq!(counts.beats_cancelled, 0);
    }
}
