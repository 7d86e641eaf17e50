//! Periodic heartbeat task

use std::time::Duration;

use tokio::{runtime::Handle, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, warn};

use super::{TickSender, TickSource};
use crate::state::Heartbeat;

/// Heartbeat that pushes a tick every `period` from a spawned task while a
/// countdown runs
pub struct IntervalHeartbeat {
    ticks: TickSender,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl IntervalHeartbeat {
    pub fn new(ticks: TickSender, period: Duration) -> Self {
        Self {
            ticks,
            period,
            task: None,
        }
    }

    /// Check if the heartbeat task is alive
    pub fn is_beating(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Heartbeat for IntervalHeartbeat {
    fn begin(&mut self) {
        self.cancel();

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!("No async runtime, heartbeat not started");
                return;
            }
        };
        let ticks = self.ticks.clone();
        let period = self.period;

        debug!("Starting heartbeat every {:?}", period);
        self.task = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(period);
            // After a long stall one tick is enough; the countdown catches up
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if ticks.send(TickSource::Heartbeat).is_err() {
                    break;
                }
            }
        }));
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Stopping heartbeat");
            task.abort();
        }
    }
}

impl Drop for IntervalHeartbeat {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::tick_channel;

    #[tokio::test(start_paused = true)]
    async fn beats_until_cancelled() {
        let (tx, mut rx) = tick_channel();
        let mut heartbeat = IntervalHeartbeat::new(tx, Duration::from_secs(1));

        heartbeat.begin();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        heartbeat.cancel();
        tokio::task::yield_now().await;

        let mut beats = 0;
        while let Ok(source) = rx.try_recv() {
            assert_eq!(source, TickSource::Heartbeat);
            beats += 1;
        }
        assert_eq!(beats, 3);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!heartbeat.is_beating());
    }

    #[test]
    fn begin_without_runtime_is_harmless() {
        let (tx, _rx) = tick_channel();
        let mut heartbeat = IntervalHeartbeat::new(tx, Duration::from_secs(1));
        heartbeat.begin();
        assert!(!heartbeat.is_beating());
        heartbeat.cancel();
    }
}
