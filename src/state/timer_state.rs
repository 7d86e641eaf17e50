//! Timer state structure and duration arithmetic

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shortest countdown the timer accepts, in seconds
pub const MIN_DURATION_SECS: u32 = 5;
/// Longest countdown the timer accepts, in seconds
pub const MAX_DURATION_SECS: u32 = 3600;
/// Countdown used when nothing else is configured
pub const DEFAULT_DURATION_SECS: u32 = 600;

/// Which display field an adjustment applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Minutes,
    Seconds,
}

impl DurationUnit {
    fn seconds_per_step(self) -> i64 {
        match self {
            DurationUnit::Minutes => 60,
            DurationUnit::Seconds => 1,
        }
    }
}

/// Apply `delta` units to `duration`, returning `None` when the result
/// leaves the accepted range.
///
/// The adjustment is applied to the total, so seconds naturally carry into
/// and borrow from minutes.
pub fn adjusted_duration(duration: u32, unit: DurationUnit, delta: i32) -> Option<u32> {
    let total = i64::from(duration) + i64::from(delta) * unit.seconds_per_step();
    if (i64::from(MIN_DURATION_SECS)..=i64::from(MAX_DURATION_SECS)).contains(&total) {
        u32::try_from(total).ok()
    } else {
        None
    }
}

/// Whole seconds left until `end`, rounded up and never negative
pub fn remaining_until(end: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    let secs = (millis + 999) / 1000;
    u32::try_from(secs).unwrap_or(u32::MAX)
}

/// Countdown state for one timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Configured total seconds
    pub duration: u32,
    /// Seconds left; a display value, refreshed from `end_timestamp` while running
    pub remaining: u32,
    /// When the current run ends. Only set while running.
    pub end_timestamp: Option<DateTime<Utc>>,
    pub running: bool,
    /// Whether a completion signal is prepared for the current run
    pub signal_armed: bool,
}

impl TimerState {
    /// Create an idle timer state, clamping `duration` into the accepted range
    pub fn new(duration: u32) -> Self {
        let duration = duration.clamp(MIN_DURATION_SECS, MAX_DURATION_SECS);
        Self {
            duration,
            remaining: duration,
            end_timestamp: None,
            running: false,
            signal_armed: false,
        }
    }

    /// Check if the timer is counting down
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Minutes component of the remaining time
    pub fn minutes(&self) -> u32 {
        self.remaining / 60
    }

    /// Seconds component of the remaining time
    pub fn seconds(&self) -> u32 {
        self.remaining % 60
    }

    /// Remaining time formatted as `MM:SS`
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes(), self.seconds())
    }

    /// Label for the start/pause toggle
    pub fn button_label(&self) -> &'static str {
        if self.running {
            "Pause"
        } else {
            "Start"
        }
    }

    /// Recompute `remaining` from `end_timestamp`. No-op when idle.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        if let (true, Some(end)) = (self.running, self.end_timestamp) {
            self.remaining = remaining_until(end, now);
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn seconds_carry_into_minutes() {
        assert_eq!(adjusted_duration(58, DurationUnit::Seconds, 5), Some(63));
    }

    #[test]
    fn seconds_borrow_from_minutes() {
        assert_eq!(adjusted_duration(62, DurationUnit::Seconds, -5), Some(57));
    }

    #[test]
    fn adjustments_below_minimum_are_rejected() {
        assert_eq!(adjusted_duration(2, DurationUnit::Seconds, -5), None);
        assert_eq!(adjusted_duration(7, DurationUnit::Seconds, -5), None);
        assert_eq!(adjusted_duration(30, DurationUnit::Minutes, -1), None);
    }

    #[test]
    fn boundaries_are_reachable_and_stable() {
        assert_eq!(adjusted_duration(10, DurationUnit::Seconds, -5), Some(5));
        assert_eq!(adjusted_duration(5, DurationUnit::Seconds, -5), None);
        assert_eq!(adjusted_duration(3540, DurationUnit::Minutes, 1), Some(3600));
        assert_eq!(adjusted_duration(3600, DurationUnit::Seconds, 5), None);
        assert_eq!(adjusted_duration(3600, DurationUnit::Minutes, 1), None);
    }

    #[test]
    fn remaining_rounds_partial_seconds_up() {
        let now = Utc::now();
        assert_eq!(remaining_until(now + Duration::milliseconds(1), now), 1);
        assert_eq!(remaining_until(now + Duration::milliseconds(1000), now), 1);
        assert_eq!(remaining_until(now + Duration::milliseconds(1001), now), 2);
        assert_eq!(remaining_until(now, now), 0);
        assert_eq!(remaining_until(now - Duration::seconds(30), now), 0);
    }

    #[test]
    fn new_state_is_idle_at_full_duration() {
        let state = TimerState::new(90);
        assert!(!state.is_running());
        assert_eq!(state.remaining, 90);
        assert_eq!(state.display(), "01:30");
        assert_eq!(state.button_label(), "Start");
    }

    #[test]
    fn new_state_clamps_out_of_range_duration() {
        assert_eq!(TimerState::new(1).duration, MIN_DURATION_SECS);
        assert_eq!(TimerState::new(10_000).duration, MAX_DURATION_SECS);
    }

    #[test]
    fn refresh_ignores_idle_state() {
        let mut state = TimerState::new(60);
        state.end_timestamp = Some(Utc::now());
        state.refresh(Utc::now() + Duration::seconds(10));
        assert_eq!(state.remaining, 60);
    }
}
