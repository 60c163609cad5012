use std::collections::BTreeMap;
use std::time::Duration;

use tokio::time::Instant;

use super::PercentileMethod;

/// Why a request attempt did not count as a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The connection could not be established or broke before a response.
    Connection,
    /// The request or the body read exceeded its deadline.
    Timeout,
    /// A response arrived with a status outside the accepted set, or the
    /// server kept redirecting past the limit.
    NonSuccessStatus,
    /// Headers arrived but streaming the body failed.
    Body,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Timeout => "timeout",
            ErrorKind::NonSuccessStatus => "non_success_status",
            ErrorKind::Body => "body",
        }
    }
}

/// Result of one completed request attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    pub started_at: Instant,
    pub latency: Duration,
    pub status: Option<u16>,
    pub error: Option<ErrorKind>,
    pub attempts: u32,
    pub response_bytes: u64,
}

impl RequestOutcome {
    /// Successful outcome; latency is measured from `started_at` to now.
    #[must_use]
    pub fn succeeded(started_at: Instant, status: u16, response_bytes: u64) -> Self {
        Self {
            started_at,
            latency: started_at.elapsed(),
            status: Some(status),
            error: None,
            attempts: 1,
            response_bytes,
        }
    }

    /// Failed outcome; `status` is set when a response was received.
    #[must_use]
    pub fn failed(started_at: Instant, status: Option<u16>, kind: ErrorKind) -> Self {
        Self {
            started_at,
            latency: started_at.elapsed(),
            status,
            error: Some(kind),
            attempts: 1,
            response_bytes: 0,
        }
    }

    #[must_use]
    pub const fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    #[must_use]
    pub const fn with_response_bytes(mut self, response_bytes: u64) -> Self {
        self.response_bytes = response_bytes;
        self
    }

    #[must_use]
    pub const fn success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentileValue {
    pub percentile: u8,
    pub latency: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyStats {
    pub method: PercentileMethod,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
    pub percentiles: Vec<PercentileValue>,
}

impl LatencyStats {
    #[must_use]
    pub fn percentile(&self, percentile: u8) -> Option<Duration> {
        self.percentiles
            .iter()
            .find(|value| value.percentile == percentile)
            .map(|value| value.latency)
    }
}

/// Live counters, cheap enough to read on every progress tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub elapsed: Duration,
    pub total_requests: u64,
    pub error_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub elapsed: Duration,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub error_count: u64,
    pub timeout_errors: u64,
    pub connection_errors: u64,
    pub status_errors: u64,
    pub body_errors: u64,
    pub status_counts: BTreeMap<u16, u64>,
    pub response_bytes: u64,
    pub latency: LatencyStats,
}

impl RunSummary {
    /// Error rate in hundredths of a percent (`1234` = 12.34%).
    #[must_use]
    pub fn error_rate_x100(&self) -> u64 {
        scaled_ratio(self.error_count, self.total_requests, 10_000)
    }

    /// Success rate in hundredths of a percent.
    #[must_use]
    pub fn success_rate_x100(&self) -> u64 {
        scaled_ratio(self.successful_requests, self.total_requests, 10_000)
    }

    /// Average requests per second, multiplied by 100.
    #[must_use]
    pub fn requests_per_second_x100(&self) -> u64 {
        let elapsed_ms = self.elapsed.as_millis().max(1);
        let scaled = u128::from(self.total_requests)
            .saturating_mul(100_000)
            .checked_div(elapsed_ms)
            .unwrap_or(0);
        u64::try_from(scaled).map_or(u64::MAX, |value| value)
    }
}

fn scaled_ratio(part: u64, total: u64, scale: u128) -> u64 {
    if total == 0 {
        return 0;
    }
    let scaled = u128::from(part)
        .saturating_mul(scale)
        .checked_div(u128::from(total))
        .unwrap_or(0);
    u64::try_from(scaled).map_or(u64::MAX, |value| value)
}
