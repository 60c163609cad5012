use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::mpsc, time::sleep};
use tracing::{debug, warn};
use url::Url;

use crate::http::RequestExecutor;
use crate::metrics::RequestOutcome;
use crate::shutdown::{ShutdownReceiver, ShutdownSender, stop_requested};

use super::budget::IterationBudget;

pub(super) struct WorkerContext {
    pub(super) index: usize,
    pub(super) target: Arc<Url>,
    pub(super) executor: Arc<dyn RequestExecutor>,
    pub(super) outcome_tx: mpsc::Sender<RequestOutcome>,
    pub(super) shutdown_tx: ShutdownSender,
    pub(super) budget: Option<Arc<IterationBudget>>,
    pub(super) think_time: Option<Duration>,
}

/// One virtual user. Returns the number of completed requests.
pub(super) async fn run_worker(context: WorkerContext, mut shutdown_rx: ShutdownReceiver) -> u64 {
    let mut iterations: u64 = 0;
    debug!("Worker {} started.", context.index);

    loop {
        if stop_requested(&mut shutdown_rx) {
            break;
        }
        if let Some(budget) = context.budget.as_ref()
            && !budget.try_reserve(&context.shutdown_tx)
        {
            break;
        }

        // The request is never raced against the stop signal.
        let outcome = context.executor.execute(&context.target).await;
        iterations = iterations.saturating_add(1);
        if context.outcome_tx.send(outcome).await.is_err() {
            warn!(
                "Worker {} lost its outcome channel; stopping.",
                context.index
            );
            break;
        }

        if let Some(think_time) = context.think_time {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                () = sleep(think_time) => {}
            }
        }
    }

    debug!(
        "Worker {} exited after {} requests.",
        context.index, iterations
    );
    iterations
}
