use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::metrics::{RunSummary, StatsAggregator};
use crate::pool::WorkerPool;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};

/// Everything the supervisor tears down at the end of a run.
pub(super) struct RunTasks {
    pub(super) run_id: u64,
    pub(super) pool: WorkerPool,
    pub(super) collector: JoinHandle<u64>,
    pub(super) progress: Option<JoinHandle<()>>,
}

/// Owns the duration timer and finalizes the run.
///
/// The timer fires at most once; an earlier stop (caller, budget or drop)
/// cancels it. The summary is published only after every worker exited and
/// the collector recorded every outcome.
pub(super) async fn supervise(
    tasks: RunTasks,
    stats: Arc<StatsAggregator>,
    duration: Duration,
    shutdown_tx: ShutdownSender,
    mut shutdown_rx: ShutdownReceiver,
    done_tx: watch::Sender<Option<RunSummary>>,
) {
    tokio::select! {
        () = sleep(duration) => {
            info!("Run {} reached its duration of {:?}; stopping.", tasks.run_id, duration);
            drop(shutdown_tx.send(()));
        }
        _ = shutdown_rx.recv() => {
            info!("Run {} received a stop signal.", tasks.run_id);
        }
    }

    if !tasks.pool.is_finished() {
        debug!(
            "Run {} waiting for {} workers to finish in-flight requests.",
            tasks.run_id,
            tasks.pool.size()
        );
    }
    let report = tasks.pool.drain().await;
    if report.panicked > 0 {
        warn!(
            "{} of {} workers of run {} did not exit cleanly.",
            report.panicked, report.workers, tasks.run_id
        );
    }
    let recorded = match tasks.collector.await {
        Ok(recorded) => recorded,
        Err(err) => {
            warn!("Outcome collector failed: {}", err);
            0
        }
    };
    if let Some(progress) = tasks.progress {
        progress.abort();
    }

    stats.finish(Instant::now());
    let summary = stats.summary();
    info!(
        "Run {} finished: {} requests ({} recorded, {} iterations) from {} workers in {:?}.",
        tasks.run_id,
        summary.total_requests,
        recorded,
        report.iterations,
        report.workers,
        summary.elapsed
    );
    done_tx.send_replace(Some(summary));
}
