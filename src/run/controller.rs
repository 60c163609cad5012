use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, mpsc, watch};
use tokio::time::Instant;
use tracing::info;

use crate::error::{ConfigError, RunError};
use crate::http::RequestExecutor;
use crate::metrics::{RunSummary, StatsAggregator, StatsSettings, spawn_collector};
use crate::pool::{PoolSettings, WorkerPool};
use crate::shutdown::{ShutdownSender, shutdown_channel};

use super::config::RunConfig;
use super::progress::spawn_progress_logger;
use super::supervisor::{RunTasks, supervise};

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(1);
/// Outcomes buffered between the workers and the collector.
const OUTCOME_CHANNEL_CAPACITY: usize = 1024;

/// Lifecycle state reported by [`RunController::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Stopping,
}

struct ActiveRun {
    id: u64,
    shutdown_tx: ShutdownSender,
    done_rx: watch::Receiver<Option<RunSummary>>,
}

impl ActiveRun {
    fn is_finished(&self) -> bool {
        self.done_rx.borrow().is_some()
    }
}

enum ControllerState {
    Idle,
    Running(ActiveRun),
    Stopping(ActiveRun),
}

impl ControllerState {
    const fn run(&self) -> Option<&ActiveRun> {
        match self {
            ControllerState::Idle => None,
            ControllerState::Running(run) | ControllerState::Stopping(run) => Some(run),
        }
    }
}

/// Starts, stops and finalizes load runs, one at a time.
///
/// A run ends when its duration elapses, its iteration budget is spent, or
/// [`stop`](Self::stop) is called. Its summary is handed to the next
/// [`wait`](Self::wait) or `stop` caller, after which the controller is idle
/// and can start again.
pub struct RunController {
    executor: Arc<dyn RequestExecutor>,
    stats: Arc<StatsAggregator>,
    progress_interval: Option<Duration>,
    next_run_id: AtomicU64,
    state: Mutex<ControllerState>,
}

impl RunController {
    #[must_use]
    pub fn new(executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            executor,
            stats: Arc::new(StatsAggregator::default()),
            progress_interval: Some(DEFAULT_PROGRESS_INTERVAL),
            next_run_id: AtomicU64::new(1),
            state: Mutex::new(ControllerState::Idle),
        }
    }

    /// Replaces the aggregator with one using `settings`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercentile` when a percentile is outside `1..=100`.
    pub fn with_stats(mut self, settings: &StatsSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        self.stats = Arc::new(StatsAggregator::new(settings));
        Ok(self)
    }

    /// `None` or a zero interval disables the live progress log.
    #[must_use]
    pub fn with_progress_interval(mut self, every: Option<Duration>) -> Self {
        self.progress_interval = every.filter(|every| !every.is_zero());
        self
    }

    /// Aggregator of the current (or last) run, for live snapshots.
    #[must_use]
    pub fn stats(&self) -> &Arc<StatsAggregator> {
        &self.stats
    }

    /// A run that ended on its own reports `Idle` even before its summary
    /// is collected.
    pub async fn state(&self) -> RunState {
        match &*self.state.lock().await {
            ControllerState::Idle => RunState::Idle,
            ControllerState::Running(run) | ControllerState::Stopping(run)
                if run.is_finished() =>
            {
                RunState::Idle
            }
            ControllerState::Running(_) => RunState::Running,
            ControllerState::Stopping(_) => RunState::Stopping,
        }
    }

    /// Launches the workers and the duration timer, then returns.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRunning` while a run is active and `Config` when the
    /// config is invalid. Neither touches the aggregator.
    pub async fn start(&self, config: &RunConfig) -> Result<(), RunError> {
        let mut state = self.state.lock().await;
        if state.run().is_some_and(|run| !run.is_finished()) {
            return Err(RunError::AlreadyRunning);
        }
        let target = config.validate()?;

        let run_id = self.next_run_id.fetch_add(1, Ordering::Relaxed);
        self.stats.reset(Instant::now());
        let (shutdown_tx, shutdown_rx) = shutdown_channel();
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);
        let collector = spawn_collector(&self.stats, outcome_rx);
        let pool = WorkerPool::spawn(
            &PoolSettings {
                target,
                virtual_users: config.virtual_users,
                think_time: config.think_time,
                iterations: config.iterations,
            },
            &self.executor,
            outcome_tx,
            &shutdown_tx,
        );
        let progress = self.progress_interval.map(|every| {
            spawn_progress_logger(&self.stats, every, config.duration, shutdown_tx.subscribe())
        });
        let (done_tx, done_rx) = watch::channel(None);

        info!(
            "Run {} started: {} virtual users against {} for {:?}.",
            run_id,
            config.virtual_users,
            config.target_url.trim(),
            config.duration
        );
        tokio::spawn(supervise(
            RunTasks {
                run_id,
                pool,
                collector,
                progress,
            },
            Arc::clone(&self.stats),
            config.duration,
            shutdown_tx.clone(),
            shutdown_rx,
            done_tx,
        ));

        *state = ControllerState::Running(ActiveRun {
            id: run_id,
            shutdown_tx,
            done_rx,
        });
        Ok(())
    }

    /// Signals the workers to stop, waits for them to drain and returns the
    /// final summary.
    ///
    /// # Errors
    ///
    /// Returns `NotRunning` when there is no run to stop.
    pub async fn stop(&self) -> Result<RunSummary, RunError> {
        self.finish(true).await
    }

    /// Waits for the run to end on its own and returns the final summary.
    ///
    /// Dropping the returned future leaves the run untouched, so it can be
    /// raced against an interrupt and followed by [`stop`](Self::stop).
    ///
    /// # Errors
    ///
    /// Returns `NotRunning` when there is no run to wait for.
    pub async fn wait(&self) -> Result<RunSummary, RunError> {
        self.finish(false).await
    }

    async fn finish(&self, send_stop: bool) -> Result<RunSummary, RunError> {
        let (run_id, mut done_rx) = {
            let mut state = self.state.lock().await;
            let (run, stopping) = match std::mem::replace(&mut *state, ControllerState::Idle) {
                ControllerState::Idle => return Err(RunError::NotRunning),
                ControllerState::Running(run) => (run, false),
                ControllerState::Stopping(run) => (run, true),
            };
            if send_stop && !run.is_finished() {
                drop(run.shutdown_tx.send(()));
            }
            let handle = (run.id, run.done_rx.clone());
            *state = if send_stop || stopping {
                ControllerState::Stopping(run)
            } else {
                ControllerState::Running(run)
            };
            handle
        };

        let summary = match done_rx.wait_for(Option::is_some).await {
            Ok(published) => (*published).clone(),
            Err(_) => None,
        };

        let mut state = self.state.lock().await;
        if state.run().is_some_and(|run| run.id == run_id) {
            *state = ControllerState::Idle;
        }
        summary.ok_or(RunError::SupervisorLost)
    }
}

impl Drop for RunController {
    fn drop(&mut self) {
        if let Some(run) = self.state.get_mut().run() {
            drop(run.shutdown_tx.send(()));
        }
    }
}
