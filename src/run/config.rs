use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_VIRTUAL_USERS: usize = 5;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

/// Parameters of one load run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub target_url: String,
    pub virtual_users: usize,
    pub duration: Duration,
    /// Total request budget across all workers.
    pub iterations: Option<u64>,
    /// Pause between two requests of the same worker.
    pub think_time: Option<Duration>,
}

impl RunConfig {
    #[must_use]
    pub fn new(target_url: impl Into<String>, virtual_users: usize, duration: Duration) -> Self {
        Self {
            target_url: target_url.into(),
            virtual_users,
            duration,
            iterations: None,
            think_time: None,
        }
    }

    #[must_use]
    pub const fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = Some(iterations);
        self
    }

    #[must_use]
    pub const fn with_think_time(mut self, think_time: Duration) -> Self {
        self.think_time = Some(think_time);
        self
    }

    /// Checks the config and returns the parsed target.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no virtual users, an empty or
    /// unparsable URL, a non-HTTP scheme, a zero duration or a zero
    /// iteration budget.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.virtual_users == 0 {
            return Err(ConfigError::NoVirtualUsers);
        }
        let raw = self.target_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        let target = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            url: raw.to_owned(),
            source,
        })?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                scheme: target.scheme().to_owned(),
            });
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if self.iterations == Some(0) {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(target)
    }
}
