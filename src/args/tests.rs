use super::*;
use crate::args::parsers::{
    parse_bool_env, parse_duration_arg, parse_interval_arg, parse_percentile,
};
use crate::args::test_support::parse_test_args;
use crate::error::{AppError, ValidationError};
use std::time::Duration;

mod defaults;
mod options;
