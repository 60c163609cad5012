use super::*;
use crate::metrics::PercentileMethod;

#[test]
fn parse_args_defaults() -> Result<(), String> {
    let args = parse_test_args(["vuload", "-u", "http://localhost:8000/products"])
        .map_err(|err| format!("parse failed: {}", err))?;

    let expected_no_color = std::env::var("NO_COLOR")
        .ok()
        .and_then(|value| parse_bool_env(&value).ok())
        .unwrap_or(false);

    let checks = [
        (
            args.url.as_deref() == Some("http://localhost:8000/products"),
            "Unexpected url",
        ),
        (args.virtual_users == 5, "Unexpected virtual_users"),
        (args.duration == Duration::from_secs(5), "Unexpected duration"),
        (args.iterations.is_none(), "Expected iterations to be None"),
        (args.think_time.is_none(), "Expected think_time to be None"),
        (
            args.request_timeout == Duration::from_secs(10),
            "Unexpected request_timeout",
        ),
        (
            args.connect_timeout == Duration::from_secs(5),
            "Unexpected connect_timeout",
        ),
        (args.retries == 0, "Unexpected retries"),
        (args.headers.is_empty(), "Expected no headers"),
        (
            args.expected_status.is_none(),
            "Expected expected_status to be None",
        ),
        (args.redirect_limit == 10, "Unexpected redirect_limit"),
        (
            !args.disable_keepalive,
            "Expected disable_keepalive to be false",
        ),
        (!args.no_ua, "Expected no_ua to be false"),
        (args.percentiles == [50, 90, 95, 99], "Unexpected percentiles"),
        (
            args.percentile_method == PercentileMode::NearestRank,
            "Unexpected percentile_method",
        ),
        (
            args.progress_interval == Duration::from_secs(1),
            "Unexpected progress_interval",
        ),
        (
            args.output_format == OutputFormat::Text,
            "Unexpected output_format",
        ),
        (args.config.is_none(), "Expected config to be None"),
        (!args.verbose, "Expected verbose to be false"),
        (args.no_color == expected_no_color, "Unexpected no_color"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(message.to_owned());
        }
    }

    let stats = args.stats_settings();
    if stats.method != PercentileMethod::NearestRank || stats.percentiles != [50, 90, 95, 99] {
        return Err(format!("Unexpected stats settings: {:?}", stats));
    }
    Ok(())
}

#[test]
fn url_is_optional_on_the_command_line() -> Result<(), String> {
    let args = parse_test_args(["vuload"]).map_err(|err| format!("parse failed: {}", err))?;
    let config = args.run_config();
    if !config.target_url.is_empty() {
        return Err(format!("Expected empty url, got {}", config.target_url));
    }
    match config.validate() {
        Err(crate::error::ConfigError::EmptyUrl) => Ok(()),
        other => Err(format!("Expected EmptyUrl, got {:?}", other)),
    }
}
