use std::fmt::Write;

use crate::metrics::RunSummary;

use super::{ReportContext, format_ms, format_x100};

/// Human-readable, multi-line summary.
///
/// # Errors
///
/// Only fails if formatting into the buffer fails.
pub fn render_text(summary: &RunSummary, context: &ReportContext) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Target: {}", context.target)?;
    writeln!(
        out,
        "Started: {}",
        context.started_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
    )?;
    writeln!(out, "Virtual Users: {}", context.virtual_users)?;
    writeln!(
        out,
        "Duration: {}s (planned {}s)",
        format_x100(duration_x100(summary)),
        context.planned_duration.as_secs()
    )?;
    writeln!(out, "Total Requests: {}", summary.total_requests)?;
    writeln!(
        out,
        "Successful: {} ({}%)",
        summary.successful_requests,
        format_x100(summary.success_rate_x100())
    )?;
    writeln!(
        out,
        "Errors: {} ({}%)",
        summary.error_count,
        format_x100(summary.error_rate_x100())
    )?;
    if summary.error_count > 0 {
        writeln!(out, "  Timeouts: {}", summary.timeout_errors)?;
        writeln!(out, "  Connection Errors: {}", summary.connection_errors)?;
        writeln!(out, "  Non-Success Status: {}", summary.status_errors)?;
        writeln!(out, "  Body Errors: {}", summary.body_errors)?;
    }
    if !summary.status_counts.is_empty() {
        let statuses: Vec<String> = summary
            .status_counts
            .iter()
            .map(|(status, count)| format!("{}={}", status, count))
            .collect();
        writeln!(out, "Status Codes: {}", statuses.join(", "))?;
    }
    writeln!(out, "Received: {} bytes", summary.response_bytes)?;

    let latency = &summary.latency;
    writeln!(
        out,
        "Latency min/mean/max: {} / {} / {}",
        format_ms(latency.min),
        format_ms(latency.mean),
        format_ms(latency.max)
    )?;
    for value in &latency.percentiles {
        writeln!(
            out,
            "  P{}: {}",
            value.percentile,
            format_ms(value.latency)
        )?;
    }
    writeln!(out, "Percentile Method: {}", latency.method.as_str())?;
    writeln!(
        out,
        "Avg RPS: {}",
        format_x100(summary.requests_per_second_x100())
    )?;
    Ok(out)
}

fn duration_x100(summary: &RunSummary) -> u64 {
    let centis = summary.elapsed.as_millis() / 10;
    u64::try_from(centis).map_or(u64::MAX, |value| value)
}
