use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use tokio::time::{Instant, sleep};
use tracing::debug;
use url::Url;

use crate::error::HttpError;
use crate::metrics::{ErrorKind, RequestOutcome};

use super::client::{ExecutorSettings, build_client, build_headers};
use super::execution::{Attempt, send_once};

/// Pause between a failed attempt and its retry.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Performs one request per call and always reports an outcome.
///
/// Implementations must capture every failure in the returned
/// [`RequestOutcome`]; a worker loop never sees an error from here.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, target: &Url) -> RequestOutcome;
}

/// reqwest-backed GET executor.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
    headers: HeaderMap,
    retries: u32,
    expected_status: Option<u16>,
}

impl HttpExecutor {
    /// Builds the shared HTTP client and header set.
    ///
    /// # Errors
    ///
    /// Returns an error when a header is invalid or the client cannot be
    /// built.
    pub fn new(settings: &ExecutorSettings) -> Result<Self, HttpError> {
        Ok(Self {
            client: build_client(settings)?,
            headers: build_headers(&settings.headers)?,
            retries: settings.retries,
            expected_status: settings.expected_status,
        })
    }

    fn accepts(&self, status: u16) -> bool {
        match self.expected_status {
            Some(expected) => status == expected,
            None => (200..300).contains(&status),
        }
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, target: &Url) -> RequestOutcome {
        let started_at = Instant::now();
        let mut attempts: u32 = 0;
        loop {
            attempts = attempts.saturating_add(1);
            let attempt = send_once(&self.client, &self.headers, target).await;
            if attempt.retryable() && attempts <= self.retries {
                debug!(
                    "Retrying {} after attempt {} of {}.",
                    target,
                    attempts,
                    self.retries.saturating_add(1)
                );
                sleep(RETRY_BACKOFF).await;
                continue;
            }

            let outcome = match attempt {
                Attempt::Response {
                    status,
                    response_bytes,
                } if self.accepts(status) => {
                    RequestOutcome::succeeded(started_at, status, response_bytes)
                }
                Attempt::Response {
                    status,
                    response_bytes,
                } => RequestOutcome::failed(started_at, Some(status), ErrorKind::NonSuccessStatus)
                    .with_response_bytes(response_bytes),
                Attempt::Failed { status, kind } => {
                    RequestOutcome::failed(started_at, status, kind)
                }
            };
            return outcome.with_attempts(attempts);
        }
    }
}
