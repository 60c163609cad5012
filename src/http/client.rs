use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderName, HeaderValue},
    redirect,
};

use crate::error::HttpError;

pub const DEFAULT_USER_AGENT: &str = concat!("vuload/", env!("CARGO_PKG_VERSION"));

/// Fallback redirect limit when the configured one does not fit `usize`.
const DEFAULT_REDIRECT_LIMIT: usize = 10;

/// Knobs for the HTTP client behind [`super::HttpExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Extra attempts after a connection error or timeout, each after
    /// [`super::RETRY_BACKOFF`].
    pub retries: u32,
    pub headers: Vec<(String, String)>,
    /// Only this status counts as success; any 2xx when unset.
    pub expected_status: Option<u16>,
    /// 0 disables redirects.
    pub redirect_limit: u32,
    pub keepalive: bool,
    pub user_agent: bool,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            retries: 0,
            headers: Vec::new(),
            expected_status: None,
            redirect_limit: 10,
            keepalive: true,
            user_agent: true,
        }
    }
}

pub(super) fn build_client(settings: &ExecutorSettings) -> Result<Client, HttpError> {
    let mut client_builder = Client::builder()
        .timeout(settings.request_timeout)
        .connect_timeout(settings.connect_timeout);

    if settings.user_agent {
        client_builder = client_builder.user_agent(DEFAULT_USER_AGENT);
    }

    if settings.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(settings.redirect_limit).unwrap_or(DEFAULT_REDIRECT_LIMIT),
        ));
    }

    if !settings.keepalive {
        client_builder = client_builder
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Some(Duration::from_secs(0)));
    }

    client_builder
        .build()
        .map_err(|err| HttpError::BuildClientFailed { source: err })
}

pub(super) fn build_headers(headers: &[(String, String)]) -> Result<HeaderMap, HttpError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name =
            HeaderName::from_bytes(key.as_bytes()).map_err(|err| HttpError::InvalidHeaderName {
                header: key.clone(),
                source: err,
            })?;
        let val = HeaderValue::from_str(value).map_err(|err| HttpError::InvalidHeaderValue {
            header: key.clone(),
            source: err,
        })?;
        map.append(name, val);
    }
    Ok(map)
}
