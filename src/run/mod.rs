//! Run lifecycle: configuration, the controller, and its background tasks.
mod config;
mod controller;
mod progress;
mod supervisor;


pub use config::{DEFAULT_DURATION, DEFAULT_VIRTUAL_USERS, RunConfig};
pub use controller::{DEFAULT_PROGRESS_INTERVAL, RunController, RunState};
