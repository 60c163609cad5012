use std::time::Duration;

use crate::http::ExecutorSettings;
use crate::metrics::StatsSettings;
use crate::run::RunConfig;

use super::LoadArgs;

impl LoadArgs {
    /// A missing URL becomes an empty one, which `start` rejects.
    #[must_use]
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            target_url: self.url.clone().unwrap_or_default(),
            virtual_users: self.virtual_users,
            duration: self.duration,
            iterations: self.iterations.map(u64::from),
            think_time: self.think_time,
        }
    }

    #[must_use]
    pub fn executor_settings(&self) -> ExecutorSettings {
        ExecutorSettings {
            request_timeout: self.request_timeout,
            connect_timeout: self.connect_timeout,
            retries: self.retries,
            headers: self.headers.clone(),
            expected_status: self.expected_status,
            redirect_limit: self.redirect_limit,
            keepalive: !self.disable_keepalive,
            user_agent: !self.no_ua,
        }
    }

    #[must_use]
    pub fn stats_settings(&self) -> StatsSettings {
        StatsSettings {
            percentiles: self.percentiles.clone(),
            method: self.percentile_method.into(),
        }
    }

    #[must_use]
    pub fn progress_interval(&self) -> Option<Duration> {
        Some(self.progress_interval).filter(|every| !every.is_zero())
    }
}
