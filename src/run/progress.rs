use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

use crate::metrics::StatsAggregator;
use crate::shutdown::ShutdownReceiver;

/// Logs live counters at `info` until the run is told to stop.
pub(super) fn spawn_progress_logger(
    stats: &Arc<StatsAggregator>,
    every: Duration,
    planned: Duration,
    mut shutdown_rx: ShutdownReceiver,
) -> JoinHandle<()> {
    let stats = Arc::clone(stats);
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    let snapshot = stats.progress();
                    let elapsed_ms = snapshot.elapsed.as_millis().max(1);
                    let rate = u128::from(snapshot.total_requests)
                        .saturating_mul(1000)
                        .checked_div(elapsed_ms)
                        .unwrap_or(0);
                    info!(
                        "{}s/{}s: {} requests, {} errors, {} req/s",
                        snapshot.elapsed.as_secs(),
                        planned.as_secs(),
                        snapshot.total_requests,
                        snapshot.error_count,
                        rate
                    );
                }
            }
        }
    })
}
