use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, sleep};
use url::Url;

use crate::metrics::{ErrorKind, RequestOutcome};

use super::RequestExecutor;

/// Executor that sleeps for a fixed latency and returns a canned result.
///
/// Sleeping (rather than returning immediately) lets paused-clock tests
/// advance virtual time through each request.
pub(crate) struct StubExecutor {
    latency: Duration,
    failure: Option<ErrorKind>,
    calls: AtomicU64,
}

impl StubExecutor {
    pub(crate) const fn succeeding(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) const fn failing(latency: Duration, kind: ErrorKind) -> Self {
        Self {
            latency,
            failure: Some(kind),
            calls: AtomicU64::new(0),
        }
    }

    pub(crate) fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestExecutor for StubExecutor {
    async fn execute(&self, _target: &Url) -> RequestOutcome {
        let started_at = Instant::now();
        sleep(self.latency).await;
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failure {
            None => RequestOutcome::succeeded(started_at, 200, 2),
            Some(ErrorKind::NonSuccessStatus) => {
                RequestOutcome::failed(started_at, Some(500), ErrorKind::NonSuccessStatus)
            }
            Some(kind) => RequestOutcome::failed(started_at, None, kind),
        }
    }
}

pub(crate) fn stub_target() -> Result<Url, String> {
    Url::parse("http://127.0.0.1:8000/products")
        .map_err(|err| format!("stub url failed: {}", err))
}
