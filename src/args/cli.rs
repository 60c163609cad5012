use clap::Parser;
use std::time::Duration;

use crate::run::DEFAULT_VIRTUAL_USERS;

use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_interval_arg, parse_percentile,
    parse_positive_u64,
};
use super::types::{OutputFormat, PercentileMode, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async HTTP load generator - a fixed pool of virtual users sends GET requests to one target for a bounded time and reports throughput, errors and latency percentiles."
)]
pub struct LoadArgs {
    /// Target URL to load (http or https)
    #[arg(long, short, help_heading = "Target")]
    pub url: Option<String>,

    /// HTTP headers in 'Key: Value' format (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header, help_heading = "Target")]
    pub headers: Vec<(String, String)>,

    /// Expected HTTP status code (any 2xx counts as success when unset)
    #[arg(long = "status", help_heading = "Target")]
    pub expected_status: Option<u16>,

    /// Number of concurrent virtual users
    #[arg(
        long = "vus",
        short = 'c',
        visible_alias = "virtual-users",
        default_value_t = DEFAULT_VIRTUAL_USERS,
        help_heading = "Load"
    )]
    pub virtual_users: usize,

    /// Run length (supports ms/s/m/h, bare numbers are seconds)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "5s",
        value_parser = parse_duration_arg,
        help_heading = "Load"
    )]
    pub duration: Duration,

    /// Stop after N total requests across all virtual users
    #[arg(long = "iterations", short = 'n', value_parser = parse_positive_u64, help_heading = "Load")]
    pub iterations: Option<PositiveU64>,

    /// Pause between two requests of the same virtual user (supports ms/s/m/h)
    #[arg(long = "think-time", value_parser = parse_duration_arg, help_heading = "Load")]
    pub think_time: Option<Duration>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg,
        help_heading = "Connection"
    )]
    pub request_timeout: Duration,

    /// Timeout for establishing a new connection (supports ms/s/m/h)
    #[arg(
        long = "connect-timeout",
        default_value = "5s",
        value_parser = parse_duration_arg,
        help_heading = "Connection"
    )]
    pub connect_timeout: Duration,

    /// Extra attempts after a connection error or timeout
    #[arg(long = "retries", default_value_t = 0, help_heading = "Connection")]
    pub retries: u32,

    /// Follow up to N redirects (0 disables redirects)
    #[arg(long = "redirect", default_value_t = 10, help_heading = "Connection")]
    pub redirect_limit: u32,

    /// Open a new connection for every request
    #[arg(long = "disable-keepalive", help_heading = "Connection")]
    pub disable_keepalive: bool,

    /// Do not send the default User-Agent header
    #[arg(long = "no-ua", help_heading = "Connection")]
    pub no_ua: bool,

    /// Latency percentiles to report, comma separated whole percents
    #[arg(
        long = "percentiles",
        value_delimiter = ',',
        default_value = "50,90,95,99",
        value_parser = parse_percentile,
        help_heading = "Output"
    )]
    pub percentiles: Vec<u8>,

    /// Percentile method: exact nearest-rank or HDR histogram
    #[arg(
        long = "percentile-method",
        value_enum,
        default_value_t = PercentileMode::NearestRank,
        help_heading = "Output"
    )]
    pub percentile_method: PercentileMode,

    /// Interval of the live progress log (0 disables it)
    #[arg(
        long = "progress-interval",
        default_value = "1s",
        value_parser = parse_interval_arg,
        help_heading = "Output"
    )]
    pub progress_interval: Duration,

    /// Summary format
    #[arg(
        long = "output-format",
        short = 'o',
        value_enum,
        default_value_t = OutputFormat::Text,
        help_heading = "Output"
    )]
    pub output_format: OutputFormat,

    /// Path to config file (TOML/JSON). Defaults to ./vuload.toml or ./vuload.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by VULOAD_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable color output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
