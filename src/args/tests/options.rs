use super::*;
use crate::metrics::PercentileMethod;

#[test]
fn load_options_map_to_run_config() -> Result<(), String> {
    let args = parse_test_args([
        "vuload",
        "--url",
        "http://127.0.0.1:8000/products",
        "--virtual-users",
        "12",
        "-t",
        "2m",
        "-n",
        "500",
        "--think-time",
        "250ms",
    ])
    .map_err(|err| format!("parse failed: {}", err))?;

    let config = args.run_config();
    if config.virtual_users != 12
        || config.duration != Duration::from_secs(120)
        || config.iterations != Some(500)
        || config.think_time != Some(Duration::from_millis(250))
    {
        return Err(format!("Unexpected run config: {:?}", config));
    }
    Ok(())
}

#[test]
fn zero_virtual_users_parse_and_fail_at_validation() -> Result<(), String> {
    let args = parse_test_args(["vuload", "-u", "http://localhost", "-c", "0"])
        .map_err(|err| format!("parse failed: {}", err))?;
    match args.run_config().validate() {
        Err(crate::error::ConfigError::NoVirtualUsers) => Ok(()),
        other => Err(format!("Expected NoVirtualUsers, got {:?}", other)),
    }
}

#[test]
fn zero_iterations_are_rejected_by_the_parser() -> Result<(), String> {
    match parse_test_args(["vuload", "-u", "http://localhost", "-n", "0"]) {
        Err(AppError::Clap { .. }) => Ok(()),
        Err(err) => Err(format!("Unexpected error: {}", err)),
        Ok(_) => Err("Expected -n 0 to fail".to_owned()),
    }
}

#[test]
fn connection_options_map_to_executor_settings() -> Result<(), String> {
    let args = parse_test_args([
        "vuload",
        "-u",
        "https://example.com",
        "--timeout",
        "750ms",
        "--connect-timeout",
        "2s",
        "--retries",
        "2",
        "-H",
        "Authorization: Bearer token",
        "-H",
        "X-Trace:abc",
        "--status",
        "204",
        "--redirect",
        "0",
        "--disable-keepalive",
        "--no-ua",
    ])
    .map_err(|err| format!("parse failed: {}", err))?;

    let settings = args.executor_settings();
    let expected_headers = vec![
        ("Authorization".to_owned(), "Bearer token".to_owned()),
        ("X-Trace".to_owned(), "abc".to_owned()),
    ];
    if settings.request_timeout != Duration::from_millis(750)
        || settings.connect_timeout != Duration::from_secs(2)
        || settings.retries != 2
        || settings.headers != expected_headers
        || settings.expected_status != Some(204)
        || settings.redirect_limit != 0
        || settings.keepalive
        || settings.user_agent
    {
        return Err(format!("Unexpected executor settings: {:?}", settings));
    }
    Ok(())
}

#[test]
fn output_options_are_parsed() -> Result<(), String> {
    let args = parse_test_args([
        "vuload",
        "-u",
        "http://localhost",
        "--percentiles",
        "75,99,100",
        "--percentile-method",
        "histogram",
        "--progress-interval",
        "0",
        "-o",
        "json",
    ])
    .map_err(|err| format!("parse failed: {}", err))?;

    if args.percentiles != [75, 99, 100] {
        return Err(format!("Unexpected percentiles: {:?}", args.percentiles));
    }
    if args.stats_settings().method != PercentileMethod::Histogram {
        return Err("Expected histogram method".to_owned());
    }
    if args.progress_interval().is_some() {
        return Err("Zero progress interval should disable progress".to_owned());
    }
    if args.output_format != OutputFormat::Json {
        return Err("Expected json output".to_owned());
    }
    Ok(())
}

#[test]
fn invalid_header_and_percentile_are_rejected() -> Result<(), String> {
    for bad in [
        ["vuload", "-H", "no-colon-here"],
        ["vuload", "--percentiles", "0"],
        ["vuload", "--percentiles", "abc"],
        ["vuload", "--percentile-method", "median"],
    ] {
        if parse_test_args(bad).is_ok() {
            return Err(format!("Expected {:?} to be rejected", bad));
        }
    }
    Ok(())
}
