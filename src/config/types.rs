use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::{parse_duration_arg, parse_interval_arg};
use crate::args::{OutputFormat, PercentileMode};
use crate::error::ValidationError;

/// Every field mirrors the long CLI flag of the same name.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub url: Option<String>,
    pub headers: Option<Vec<String>>,
    pub status: Option<u16>,
    #[serde(alias = "virtual_users")]
    pub vus: Option<usize>,
    pub duration: Option<DurationValue>,
    pub iterations: Option<u64>,
    pub think_time: Option<DurationValue>,
    pub timeout: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub retries: Option<u32>,
    pub redirect: Option<u32>,
    pub disable_keepalive: Option<bool>,
    pub no_ua: Option<bool>,
    pub percentiles: Option<Vec<u8>>,
    pub percentile_method: Option<PercentileMode>,
    pub progress_interval: Option<DurationValue>,
    pub output_format: Option<OutputFormat>,
}

/// Either whole seconds or a string with a unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(0) => Err(ValidationError::DurationZero),
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }

    /// Zero is accepted and disables the interval.
    pub(crate) fn to_interval(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_interval_arg(text),
        }
    }
}
