use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::warn;

use crate::error::ConfigError;

use super::histogram::LatencyHistogram;
use super::percentiles::{DEFAULT_PERCENTILES, PercentileMethod, nearest_rank};
use super::types::{
    ErrorKind, LatencyStats, PercentileValue, ProgressSnapshot, RequestOutcome, RunSummary,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSettings {
    pub percentiles: Vec<u8>,
    pub method: PercentileMethod,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            percentiles: DEFAULT_PERCENTILES.to_vec(),
            method: PercentileMethod::default(),
        }
    }
}

impl StatsSettings {
    /// Checks that every percentile is within `1..=100`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPercentile` for the first out-of-range entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self
            .percentiles
            .iter()
            .find(|percentile| !(1..=100).contains(*percentile))
        {
            Some(value) => Err(ConfigError::InvalidPercentile { value: *value }),
            None => Ok(()),
        }
    }
}

#[derive(Debug)]
enum LatencySamples {
    Exact(Vec<u64>),
    Histogram(LatencyHistogram),
}

impl LatencySamples {
    fn for_method(method: PercentileMethod) -> Self {
        match method {
            PercentileMethod::NearestRank => LatencySamples::Exact(Vec::new()),
            PercentileMethod::Histogram => match LatencyHistogram::new() {
                Ok(histogram) => LatencySamples::Histogram(histogram),
                Err(err) => {
                    warn!("{}; falling back to exact percentiles.", err);
                    LatencySamples::Exact(Vec::new())
                }
            },
        }
    }

    const fn method(&self) -> PercentileMethod {
        match self {
            LatencySamples::Exact(_) => PercentileMethod::NearestRank,
            LatencySamples::Histogram(_) => PercentileMethod::Histogram,
        }
    }

    fn record(&mut self, latency_us: u64) {
        match self {
            LatencySamples::Exact(samples) => samples.push(latency_us),
            LatencySamples::Histogram(histogram) => {
                if let Err(err) = histogram.record(latency_us) {
                    warn!("{}", err);
                }
            }
        }
    }

    fn clear(&mut self) {
        match self {
            LatencySamples::Exact(samples) => samples.clear(),
            LatencySamples::Histogram(histogram) => histogram.clear(),
        }
    }

    fn percentiles(&self, requested: &[u8]) -> Vec<PercentileValue> {
        let values: Vec<u64> = match self {
            LatencySamples::Exact(samples) => {
                let mut sorted = samples.clone();
                sorted.sort_unstable();
                requested
                    .iter()
                    .map(|percentile| nearest_rank(&sorted, *percentile))
                    .collect()
            }
            LatencySamples::Histogram(histogram) => requested
                .iter()
                .map(|percentile| histogram.value_at_percentile(*percentile))
                .collect(),
        };
        requested
            .iter()
            .zip(values)
            .map(|(percentile, latency_us)| PercentileValue {
                percentile: *percentile,
                latency: Duration::from_micros(latency_us),
            })
            .collect()
    }
}

#[derive(Debug)]
struct AggregateState {
    started_at: Option<Instant>,
    finished_at: Option<Instant>,
    total_requests: u64,
    successful_requests: u64,
    timeout_errors: u64,
    connection_errors: u64,
    status_errors: u64,
    body_errors: u64,
    status_counts: BTreeMap<u16, u64>,
    response_bytes: u64,
    min_latency_us: u64,
    max_latency_us: u64,
    latency_sum_us: u128,
    samples: LatencySamples,
}

impl AggregateState {
    fn new(method: PercentileMethod) -> Self {
        Self {
            started_at: None,
            finished_at: None,
            total_requests: 0,
            successful_requests: 0,
            timeout_errors: 0,
            connection_errors: 0,
            status_errors: 0,
            body_errors: 0,
            status_counts: BTreeMap::new(),
            response_bytes: 0,
            min_latency_us: u64::MAX,
            max_latency_us: 0,
            latency_sum_us: 0,
            samples: LatencySamples::for_method(method),
        }
    }

    fn clear(&mut self) {
        let mut samples = std::mem::replace(&mut self.samples, LatencySamples::Exact(Vec::new()));
        samples.clear();
        *self = AggregateState {
            samples,
            ..AggregateState::new(PercentileMethod::NearestRank)
        };
    }

    fn record(&mut self, outcome: &RequestOutcome) {
        let latency_us = u64::try_from(outcome.latency.as_micros()).unwrap_or(u64::MAX);

        self.total_requests = self.total_requests.saturating_add(1);
        match outcome.error {
            None => {
                self.successful_requests = self.successful_requests.saturating_add(1);
            }
            Some(ErrorKind::Timeout) => {
                self.timeout_errors = self.timeout_errors.saturating_add(1);
            }
            Some(ErrorKind::Connection) => {
                self.connection_errors = self.connection_errors.saturating_add(1);
            }
            Some(ErrorKind::NonSuccessStatus) => {
                self.status_errors = self.status_errors.saturating_add(1);
            }
            Some(ErrorKind::Body) => {
                self.body_errors = self.body_errors.saturating_add(1);
            }
        }
        if let Some(status) = outcome.status {
            let count = self.status_counts.entry(status).or_insert(0);
            *count = count.saturating_add(1);
        }
        self.response_bytes = self.response_bytes.saturating_add(outcome.response_bytes);
        self.min_latency_us = self.min_latency_us.min(latency_us);
        self.max_latency_us = self.max_latency_us.max(latency_us);
        self.latency_sum_us = self.latency_sum_us.saturating_add(u128::from(latency_us));
        self.samples.record(latency_us);
    }

    fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .finished_at
                .unwrap_or(now)
                .saturating_duration_since(started_at),
            None => Duration::ZERO,
        }
    }
}

/// Thread-safe sink for request outcomes.
///
/// Each `record` call is applied atomically under one lock, so concurrent
/// producers never lose or duplicate an outcome. `summary` sorts a copy of
/// the samples, which makes the result independent of arrival order.
#[derive(Debug)]
pub struct StatsAggregator {
    percentiles: Vec<u8>,
    state: Mutex<AggregateState>,
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new(&StatsSettings::default())
    }
}

impl StatsAggregator {
    #[must_use]
    pub fn new(settings: &StatsSettings) -> Self {
        Self {
            percentiles: settings.percentiles.clone(),
            state: Mutex::new(AggregateState::new(settings.method)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AggregateState> {
        // A panic elsewhere cannot leave a half-applied record behind.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record(&self, outcome: &RequestOutcome) {
        self.lock().record(outcome);
    }

    /// Clears every counter and marks the start of a new run.
    pub fn reset(&self, started_at: Instant) {
        let mut state = self.lock();
        state.clear();
        state.started_at = Some(started_at);
    }

    /// Freezes the elapsed time reported by later summaries.
    pub fn finish(&self, finished_at: Instant) {
        let mut state = self.lock();
        if state.finished_at.is_none() {
            state.finished_at = Some(finished_at);
        }
    }

    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.lock().total_requests
    }

    /// Counters only; skips the percentile computation of `summary`.
    #[must_use]
    pub fn progress(&self) -> ProgressSnapshot {
        let state = self.lock();
        ProgressSnapshot {
            elapsed: state.elapsed(Instant::now()),
            total_requests: state.total_requests,
            error_count: state
                .total_requests
                .saturating_sub(state.successful_requests),
        }
    }

    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let state = self.lock();
        let total = state.total_requests;
        let (min_us, max_us, mean_us) = if total > 0 {
            let mean = state
                .latency_sum_us
                .checked_div(u128::from(total))
                .unwrap_or(0);
            (
                state.min_latency_us,
                state.max_latency_us,
                u64::try_from(mean).map_or(u64::MAX, |value| value),
            )
        } else {
            (0, 0, 0)
        };
        let error_count = total.saturating_sub(state.successful_requests);

        RunSummary {
            elapsed: state.elapsed(Instant::now()),
            total_requests: total,
            successful_requests: state.successful_requests,
            error_count,
            timeout_errors: state.timeout_errors,
            connection_errors: state.connection_errors,
            status_errors: state.status_errors,
            body_errors: state.body_errors,
            status_counts: state.status_counts.clone(),
            response_bytes: state.response_bytes,
            latency: LatencyStats {
                method: state.samples.method(),
                min: Duration::from_micros(min_us),
                max: Duration::from_micros(max_us),
                mean: Duration::from_micros(mean_us),
                percentiles: state.samples.percentiles(&self.percentiles),
            },
        }
    }
}
