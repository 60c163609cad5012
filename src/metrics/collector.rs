use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use super::{RequestOutcome, StatsAggregator};

/// Drains worker outcomes into the aggregator.
///
/// The task ends once every sender has been dropped and the channel is
/// empty, so awaiting it after the workers exit observes every outcome.
/// Resolves to the number of outcomes recorded.
#[must_use]
pub fn spawn_collector(
    stats: &Arc<StatsAggregator>,
    mut outcome_rx: mpsc::Receiver<RequestOutcome>,
) -> JoinHandle<u64> {
    let stats = Arc::clone(stats);
    tokio::spawn(async move {
        let mut recorded: u64 = 0;
        while let Some(outcome) = outcome_rx.recv().await {
            stats.record(&outcome);
            recorded = recorded.saturating_add(1);
        }
        debug!("Outcome collector drained {} outcomes.", recorded);
        recorded
    })
}
