use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::timeout;

use super::service::{recompute, PayrollService, ReportSet};
use super::AppError;

/// How long a burst of change notifications may keep growing before one
/// recomputation is triggered for all of it.
pub const RECOMPUTE_DELAY: Duration = Duration::from_millis(10);

/// Collapses bursts of triggers into single ticks: each quiet period of
/// `delay` after one or more triggers yields exactly one tick on the
/// returned receiver. Dropping the debouncer ends the tick stream.
pub struct Debouncer {
    trigger_tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (trigger_tx, mut trigger_rx) = mpsc::unbounded_channel();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while trigger_rx.recv().await.is_some() {
                // coalesce everything that arrives within the quiet window
                loop {
                    match timeout(delay, trigger_rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) | Err(_) => break,
                    }
                }
                if tick_tx.send(()).is_err() {
                    return;
                }
            }
        });
        (Self { trigger_tx }, tick_rx)
    }

    pub fn trigger(&self) {
        let _ = self.trigger_tx.send(());
    }
}

/// Keep a live view of the computed reports: recompute once up front, then
/// again after every (debounced) storage change. The returned watch channel
/// always holds the latest generation; dropping it tears the watcher down.
pub async fn spawn_report_watcher(
    service: PayrollService,
    delay: Duration,
) -> Result<watch::Receiver<ReportSet>, AppError> {
    let initial = recompute(&service.load_state().await?)?;
    let (set_tx, set_rx) = watch::channel(initial);

    let mut changes = service.subscribe();
    let (debouncer, mut ticks) = Debouncer::new(delay);

    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => debouncer.trigger(),
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    tokio::spawn(async move {
        while ticks.recv().await.is_some() {
            match service.load_state().await.and_then(|state| recompute(&state)) {
                Ok(set) => {
                    if set_tx.send(set).is_err() {
                        break;
                    }
                }
                Err(error) => tracing::error!(%error, "report recomputation failed"),
            }
        }
    });

    Ok(set_rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_tick() {
        let (debouncer, mut ticks) = Debouncer::new(Duration::from_millis(10));
        for _ in 0..5 {
            debouncer.trigger();
        }
        assert!(ticks.recv().await.is_some());
        // no second tick for the same burst
        assert!(timeout(Duration::from_millis(50), ticks.recv())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_tick_separately() {
        let (debouncer, mut ticks) = Debouncer::new(Duration::from_millis(10));
        debouncer.trigger();
        assert!(ticks.recv().await.is_some());
        debouncer.trigger();
        debouncer.trigger();
        assert!(ticks.recv().await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_debouncer_ends_the_stream() {
        let (debouncer, mut ticks) = Debouncer::new(Duration::from_millis(10));
        drop(debouncer);
        assert!(ticks.recv().await.is_none());
    }
}
