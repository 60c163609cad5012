//! Single-request execution against the load target.
mod client;
mod execution;
mod executor;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{DEFAULT_USER_AGENT, ExecutorSettings};
pub use executor::{HttpExecutor, RETRY_BACKOFF, RequestExecutor};
