//! Rendering of a finished run for the terminal or for machines.
mod json;
mod text;

#[cfg(test)]
mod tests;

use std::time::Duration;

use chrono::{DateTime, Utc};

pub use json::render_json;
pub use text::render_text;

/// Run parameters printed next to the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportContext {
    pub target: String,
    pub virtual_users: usize,
    pub planned_duration: Duration,
    pub started_at: DateTime<Utc>,
}

/// `12.345ms` style rendering with microsecond precision.
pub(crate) fn format_ms(value: Duration) -> String {
    let micros = value.as_micros();
    format!("{}.{:03}ms", micros / 1000, micros % 1000)
}

/// Renders a value scaled by 100 as `12.34`.
pub(crate) fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}
