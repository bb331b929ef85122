use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{interval_at, sleep, timeout, Instant, MissedTickBehavior};

pub const TIMEOUT: Duration = Duration::from_millis(5_000);
pub const INTERVAL: Duration = Duration::from_millis(500);

/// Result of a bounded wait. Every wait either produces a value or runs into
/// its single terminal timeout; the caller decides whether a timeout is an
/// error or an acceptable "not there".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome<T> {
    Found(T),
    TimedOut,
}

impl<T> WaitOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            WaitOutcome::Found(value) => Some(value),
            WaitOutcome::TimedOut => None,
        }
    }
}

/// Probe immediately, then at a fixed interval, until the probe produces a
/// value or the timeout elapses.
pub async fn poll_until<T>(
    poll_interval: Duration,
    poll_timeout: Duration,
    label: &str,
    mut probe: impl FnMut() -> Option<T>,
) -> WaitOutcome<T> {
    let started = Instant::now();
    let result = timeout(poll_timeout, async {
        let mut ticks = interval_at(started + poll_interval, poll_interval);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            if let Some(value) = probe() {
                return value;
            }
            ticks.tick().await;
            tracing::trace!(label, elapsed_ms = started.elapsed().as_millis() as u64, "polling");
        }
    })
    .await;

    match result {
        Ok(value) => WaitOutcome::Found(value),
        Err(_) => {
            tracing::warn!(label, "timed out");
            WaitOutcome::TimedOut
        }
    }
}

/// Wait for the first broadcast message the predicate accepts, bounded by a
/// timeout. Lagged receivers skip ahead and keep listening.
pub async fn first_event<M: Clone, T>(
    mut events: broadcast::Receiver<M>,
    wait_timeout: Duration,
    label: &str,
    mut predicate: impl FnMut(M) -> Option<T>,
) -> WaitOutcome<T> {
    let result = timeout(wait_timeout, async {
        loop {
            match events.recv().await {
                Ok(message) => {
                    if let Some(value) = predicate(message) {
                        return Some(value);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await;

    match result {
        Ok(Some(value)) => WaitOutcome::Found(value),
        Ok(None) => {
            tracing::warn!(label, "event source closed");
            WaitOutcome::TimedOut
        }
        Err(_) => {
            tracing::warn!(label, "timed out");
            WaitOutcome::TimedOut
        }
    }
}

/// Fixed settle delay, used to let the host page's own asynchronous UI
/// catch up between steps.
pub async fn sleep_for(duration: Duration) {
    sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_poll_finds_immediately_without_waiting() {
        let outcome = poll_until(INTERVAL, TIMEOUT, "instant", || Some(7)).await;
        assert_eq!(outcome, WaitOutcome::Found(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_retries_until_found() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(INTERVAL, TIMEOUT, "third-try", || {
            if calls.fetch_add(1, Ordering::SeqCst) == 2 {
                Some("there")
            } else {
                None
            }
        })
        .await;
        assert_eq!(outcome, WaitOutcome::Found("there"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_times_out() {
        let outcome = poll_until(INTERVAL, TIMEOUT, "never", || None::<u32>).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_event_filters() {
        let (tx, rx) = broadcast::channel(8);
        tokio::spawn(async move {
            tx.send("a").unwrap();
            tx.send("b").unwrap();
        });
        let outcome = first_event(rx, TIMEOUT, "b-only", |m| (m == "b").then_some(m)).await;
        assert_eq!(outcome, WaitOutcome::Found("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_event_times_out_when_silent() {
        let (_tx, rx) = broadcast::channel::<&str>(8);
        let outcome = first_event(rx, TIMEOUT, "silent", |_| Some(())).await;
        assert_eq!(outcome, WaitOutcome::TimedOut);
    }
}
