use futures_util::StreamExt;
use reqwest::{Client, header::HeaderMap};
use tracing::debug;
use url::Url;

use crate::metrics::ErrorKind;

#[derive(Debug)]
pub(super) enum Attempt {
    Response { status: u16, response_bytes: u64 },
    Failed { status: Option<u16>, kind: ErrorKind },
}

impl Attempt {
    /// Only failures that never produced a usable response are retried.
    pub(super) const fn retryable(&self) -> bool {
        matches!(
            self,
            Attempt::Failed {
                kind: ErrorKind::Connection | ErrorKind::Timeout,
                ..
            }
        )
    }
}

pub(super) async fn send_once(client: &Client, headers: &HeaderMap, target: &Url) -> Attempt {
    let request = client.get(target.clone()).headers(headers.clone());
    match request.send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            match drain_response_body(response).await {
                Ok(response_bytes) => Attempt::Response {
                    status,
                    response_bytes,
                },
                Err(err) => {
                    debug!("Failed to read response body from {}: {}", target, err);
                    let kind = if err.is_timeout() {
                        ErrorKind::Timeout
                    } else {
                        ErrorKind::Body
                    };
                    Attempt::Failed {
                        status: Some(status),
                        kind,
                    }
                }
            }
        }
        Err(err) => {
            debug!("Request to {} failed: {}", target, err);
            Attempt::Failed {
                status: None,
                kind: classify_send_error(&err),
            }
        }
    }
}

/// A redirect loop or an unusable status line still means the server
/// answered, so it counts against the status rule and is never retried.
fn classify_send_error(err: &reqwest::Error) -> ErrorKind {
    if err.is_timeout() {
        ErrorKind::Timeout
    } else if err.is_redirect() || err.is_status() || err.is_decode() {
        ErrorKind::NonSuccessStatus
    } else {
        ErrorKind::Connection
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
