//! Core library for the `vuload` CLI.
//!
//! A [`run::RunController`] drives a fixed pool of virtual users, each
//! sending requests through a [`http::RequestExecutor`] until the run's
//! duration elapses or it is stopped. Every outcome lands in a shared
//! [`metrics::StatsAggregator`], whose summary the [`report`] module renders.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod report;
pub mod run;
pub mod shutdown;
