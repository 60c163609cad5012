use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{LoadArgs, PositiveU64, parse_header};
use crate::error::{ConfigError, ValidationError};

use super::types::ConfigFile;

/// Fills every argument not given on the command line from `config`.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut LoadArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> Result<(), ConfigError> {
    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_cli(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        let mut parsed = Vec::with_capacity(headers.len());
        for header in headers {
            parsed.push(parse_header(header).map_err(|err| field("headers", err))?);
        }
        args.headers = parsed;
    }

    if !is_cli(matches, "expected_status")
        && let Some(status) = config.status
    {
        args.expected_status = Some(status);
    }

    if !is_cli(matches, "virtual_users")
        && let Some(vus) = config.vus
    {
        args.virtual_users = vus;
    }

    if !is_cli(matches, "duration")
        && let Some(duration) = config.duration.as_ref()
    {
        args.duration = duration
            .to_duration()
            .map_err(|err| field("duration", err))?;
    }

    if !is_cli(matches, "iterations")
        && let Some(iterations) = config.iterations
    {
        args.iterations =
            Some(PositiveU64::try_from(iterations).map_err(|err| field("iterations", err))?);
    }

    if !is_cli(matches, "think_time")
        && let Some(think_time) = config.think_time.as_ref()
    {
        args.think_time = Some(
            think_time
                .to_duration()
                .map_err(|err| field("think_time", err))?,
        );
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = timeout.to_duration().map_err(|err| field("timeout", err))?;
    }

    if !is_cli(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = timeout
            .to_duration()
            .map_err(|err| field("connect_timeout", err))?;
    }

    if !is_cli(matches, "retries")
        && let Some(retries) = config.retries
    {
        args.retries = retries;
    }

    if !is_cli(matches, "redirect_limit")
        && let Some(redirect) = config.redirect
    {
        args.redirect_limit = redirect;
    }

    if !is_cli(matches, "disable_keepalive")
        && let Some(disable_keepalive) = config.disable_keepalive
    {
        args.disable_keepalive = disable_keepalive;
    }

    if !is_cli(matches, "no_ua")
        && let Some(no_ua) = config.no_ua
    {
        args.no_ua = no_ua;
    }

    if !is_cli(matches, "percentiles")
        && let Some(percentiles) = config.percentiles.as_ref()
    {
        if let Some(value) = percentiles
            .iter()
            .find(|percentile| !(1..=100).contains(*percentile))
        {
            return Err(ConfigError::InvalidPercentile { value: *value });
        }
        args.percentiles.clone_from(percentiles);
    }

    if !is_cli(matches, "percentile_method")
        && let Some(method) = config.percentile_method
    {
        args.percentile_method = method;
    }

    if !is_cli(matches, "progress_interval")
        && let Some(interval) = config.progress_interval.as_ref()
    {
        args.progress_interval = interval
            .to_interval()
            .map_err(|err| field("progress_interval", err))?;
    }

    if !is_cli(matches, "output_format")
        && let Some(format) = config.output_format
    {
        args.output_format = format;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

const fn field(field: &'static str, source: ValidationError) -> ConfigError {
    ConfigError::InvalidField { field, source }
}
