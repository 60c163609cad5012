use chrono::SecondsFormat;
use serde_json::{Value, json};

use crate::metrics::RunSummary;

use super::ReportContext;

fn micros(value: std::time::Duration) -> u64 {
    u64::try_from(value.as_micros()).map_or(u64::MAX, |micros| micros)
}

/// Builds the machine-readable summary object.
#[must_use]
pub(crate) fn summary_json(summary: &RunSummary, context: &ReportContext) -> Value {
    let latency = &summary.latency;
    let percentiles: Vec<Value> = latency
        .percentiles
        .iter()
        .map(|value| {
            json!({
                "percentile": value.percentile,
                "latency_us": micros(value.latency),
            })
        })
        .collect();
    let status_counts: serde_json::Map<String, Value> = summary
        .status_counts
        .iter()
        .map(|(status, count)| (status.to_string(), json!(count)))
        .collect();

    json!({
        "target": context.target,
        "started_at": context.started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        "virtual_users": context.virtual_users,
        "planned_duration_ms": u64::try_from(context.planned_duration.as_millis()).map_or(u64::MAX, |ms| ms),
        "elapsed_ms": u64::try_from(summary.elapsed.as_millis()).map_or(u64::MAX, |ms| ms),
        "total_requests": summary.total_requests,
        "successful_requests": summary.successful_requests,
        "error_count": summary.error_count,
        "timeout_errors": summary.timeout_errors,
        "connection_errors": summary.connection_errors,
        "status_errors": summary.status_errors,
        "body_errors": summary.body_errors,
        "success_rate_x100": summary.success_rate_x100(),
        "requests_per_second_x100": summary.requests_per_second_x100(),
        "response_bytes": summary.response_bytes,
        "status_counts": status_counts,
        "percentile_method": latency.method.as_str(),
        "latency_min_us": micros(latency.min),
        "latency_mean_us": micros(latency.mean),
        "latency_max_us": micros(latency.max),
        "percentiles": percentiles,
    })
}

/// Pretty-printed JSON summary.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(summary: &RunSummary, context: &ReportContext) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&summary_json(summary, context))
}
