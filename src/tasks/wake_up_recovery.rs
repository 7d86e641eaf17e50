//! Wake-up recovery background tasks
//!
//! Two ways of noticing that the host held the process back: the wall clock
//! running ahead of the monotonic clock (the machine was suspended), and
//! `SIGCONT` (the process was stopped and continued).

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::StreamExt;
use signal_hook_tokio::Signals;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::{TickSender, TickSource};

/// Wall-clock time may run ahead of monotonic time by this much before we
/// call it a suspension
const DEFAULT_TOLERANCE_SECS: i64 = 2;

/// Detects host suspension by comparing elapsed wall-clock time against
/// elapsed monotonic time, which stands still while the machine sleeps.
#[derive(Debug, Clone)]
pub struct WakeDetector {
    last_mono: Instant,
    last_wall: DateTime<Utc>,
    tolerance: chrono::Duration,
}

impl WakeDetector {
    pub fn new(mono: Instant, wall: DateTime<Utc>) -> Self {
        Self {
            last_mono: mono,
            last_wall: wall,
            tolerance: chrono::Duration::seconds(DEFAULT_TOLERANCE_SECS),
        }
    }

    pub fn with_tolerance(mut self, tolerance: chrono::Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Record an observation and return how long the host was away, if the
    /// wall clock jumped since the previous one
    pub fn observe(&mut self, mono: Instant, wall: DateTime<Utc>) -> Option<chrono::Duration> {
        let mono_elapsed = chrono::Duration::from_std(mono.saturating_duration_since(self.last_mono))
            .unwrap_or_else(|_| chrono::Duration::zero());
        let wall_elapsed = wall - self.last_wall;
        self.last_mono = mono;
        self.last_wall = wall;

        let gap = wall_elapsed - mono_elapsed;
        (gap > self.tolerance).then_some(gap)
    }
}

/// Background task that checks for host wake-up and asks for a re-evaluation
pub async fn wake_up_recovery_task(ticks: TickSender, period: Duration) {
    info!("Starting wake-up recovery task");

    let mut detector = WakeDetector::new(Instant::now(), Utc::now());
    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if let Some(gap) = detector.observe(Instant::now(), Utc::now()) {
            info!("Wake-up detected after {}s away, re-checking timer", gap.num_seconds());
            if ticks.send(TickSource::Resume).is_err() {
                debug!("Tick channel closed, wake-up recovery task exiting");
                break;
            }
        }
    }
}

/// Background task that asks for a re-evaluation whenever the process is
/// continued after being stopped
pub async fn resume_signal_task(ticks: TickSender) {
    let mut signals = match Signals::new([signal_hook::consts::SIGCONT]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Cannot listen for SIGCONT: {}", e);
            return;
        }
    };

    while let Some(signal) = signals.next().await {
        info!("Received signal: {}, re-checking timer", signal);
        if ticks.send(TickSource::Resume).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_clocks_report_nothing() {
        let mono = Instant::now();
        let wall = Utc::now();
        let mut detector = WakeDetector::new(mono, wall);

        let gap = detector.observe(mono + Duration::from_secs(5), wall + chrono::Duration::seconds(5));
        assert_eq!(gap, None);
    }

    #[test]
    fn wall_clock_jump_reports_suspension() {
        let mono = Instant::now();
        let wall = Utc::now();
        let mut detector = WakeDetector::new(mono, wall);

        let gap = detector.observe(
            mono + Duration::from_secs(5),
            wall + chrono::Duration::seconds(605),
        );
        assert_eq!(gap, Some(chrono::Duration::seconds(600)));

        // The next observation starts from the jump, not the old baseline
        let gap = detector.observe(
            mono + Duration::from_secs(10),
            wall + chrono::Duration::seconds(610),
        );
        assert_eq!(gap, None);
    }

    #[test]
    fn default_tolerance_is_two_seconds() {
        let mono = Instant::now();
        let wall = Utc::now();
        let mut detector = WakeDetector::new(mono, wall);

        let gap = detector.observe(mono + Duration::from_secs(5), wall + chrono::Duration::seconds(7));
        assert_eq!(gap, None);

        let gap = detector.observe(mono + Duration::from_secs(10), wall + chrono::Duration::seconds(15));
        assert_eq!(gap, Some(chrono::Duration::seconds(3)));
    }

    #[test]
    fn tolerance_absorbs_small_drift() {
        let mono = Instant::now();
        let wall = Utc::now();
        let mut detector =
            WakeDetector::new(mono, wall).with_tolerance(chrono::Duration::seconds(10));

        let gap = detector.observe(mono + Duration::from_secs(5), wall + chrono::Duration::seconds(12));
        assert_eq!(gap, None);
    }
}
