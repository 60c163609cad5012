//! Fixed-size pool of virtual-user workers.
mod budget;
mod worker;


use std::sync::Arc;
use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, warn};
use url::Url;

use crate::http::RequestExecutor;
use crate::metrics::RequestOutcome;
use crate::shutdown::ShutdownSender;

pub use budget::IterationBudget;
use worker::{WorkerContext, run_worker};

/// Read-only parameters shared by every worker of one run.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub target: Url,
    pub virtual_users: usize,
    pub think_time: Option<Duration>,
    pub iterations: Option<u64>,
}

/// Totals reported once every worker has exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    pub workers: usize,
    pub iterations: u64,
    pub panicked: usize,
}

pub struct WorkerPool {
    handles: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Spawns `virtual_users` workers.
    ///
    /// Every worker subscribes to `shutdown_tx` before it is spawned, so a
    /// stop sent right after this returns is never missed. Workers hold the
    /// only clones of `outcome_tx`; the channel closes when the last one
    /// exits.
    #[must_use]
    pub fn spawn(
        settings: &PoolSettings,
        executor: &Arc<dyn RequestExecutor>,
        outcome_tx: mpsc::Sender<RequestOutcome>,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        let target = Arc::new(settings.target.clone());
        let budget = IterationBudget::new(settings.iterations).map(Arc::new);
        let mut handles = Vec::with_capacity(settings.virtual_users);

        for index in 0..settings.virtual_users {
            let context = WorkerContext {
                index,
                target: Arc::clone(&target),
                executor: Arc::clone(executor),
                outcome_tx: outcome_tx.clone(),
                shutdown_tx: shutdown_tx.clone(),
                budget: budget.clone(),
                think_time: settings.think_time,
            };
            let shutdown_rx = shutdown_tx.subscribe();
            handles.push(tokio::spawn(run_worker(context, shutdown_rx)));
        }
        drop(outcome_tx);

        debug!("Spawned {} workers against {}.", handles.len(), target);
        Self { handles }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(JoinHandle::is_finished)
    }

    /// Waits for every worker to exit. In-flight requests are not aborted.
    pub async fn drain(self) -> DrainReport {
        let mut report = DrainReport {
            workers: self.handles.len(),
            ..DrainReport::default()
        };
        for handle in self.handles {
            match handle.await {
                Ok(iterations) => {
                    report.iterations = report.iterations.saturating_add(iterations);
                }
                Err(err) => {
                    warn!("Worker exited abnormally: {}", err);
                    report.panicked = report.panicked.saturating_add(1);
                }
            }
        }
        report
    }
}
