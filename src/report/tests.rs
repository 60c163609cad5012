use super::*;
use crate::metrics::{ErrorKind, RequestOutcome, RunSummary, StatsAggregator};
use chrono::TimeZone;
use serde_json::Value;
use tokio::time::Instant;

fn context() -> Result<ReportContext, String> {
    let started_at = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
        .single()
        .ok_or_else(|| "Invalid test timestamp".to_owned())?;
    Ok(ReportContext {
        target: "http://host.docker.internal:8000/products".to_owned(),
        virtual_users: 5,
        planned_duration: Duration::from_secs(5),
        started_at,
    })
}

fn sample_summary() -> RunSummary {
    let stats = StatsAggregator::default();
    let now = Instant::now();
    for latency_us in [1_500, 2_250, 12_345] {
        stats.record(
            &RequestOutcome::succeeded(now, 200, 100)
                .with_latency(Duration::from_micros(latency_us)),
        );
    }
    stats.record(
        &RequestOutcome::failed(now, Some(503), ErrorKind::NonSuccessStatus)
            .with_latency(Duration::from_micros(900)),
    );
    let mut summary = stats.summary();
    summary.elapsed = Duration::from_millis(2_000);
    summary
}

#[test]
fn format_ms_keeps_microseconds() -> Result<(), String> {
    let cases = [
        (Duration::from_micros(12_345), "12.345ms"),
        (Duration::from_micros(7), "0.007ms"),
        (Duration::ZERO, "0.000ms"),
    ];
    for (value, expected) in cases {
        let actual = format_ms(value);
        if actual != expected {
            return Err(format!("Expected {}, got {}", expected, actual));
        }
    }
    if format_x100(12_345) != "123.45" || format_x100(7) != "0.07" {
        return Err("Unexpected x100 formatting".to_owned());
    }
    Ok(())
}

#[test]
fn text_report_lists_totals_errors_and_percentiles() -> Result<(), String> {
    let text = render_text(&sample_summary(), &context()?)
        .map_err(|err| format!("render failed: {}", err))?;
    let expected_lines = [
        "Target: http://host.docker.internal:8000/products",
        "Started: 2024-05-01T12:30:00Z",
        "Virtual Users: 5",
        "Duration: 2.00s (planned 5s)",
        "Total Requests: 4",
        "Successful: 3 (75.00%)",
        "Errors: 1 (25.00%)",
        "  Non-Success Status: 1",
        "Status Codes: 200=3, 503=1",
        "Latency min/mean/max: 0.900ms / 4.248ms / 12.345ms",
        "  P50: 1.500ms",
        "  P99: 12.345ms",
        "Percentile Method: nearest-rank",
        "Avg RPS: 2.00",
    ];
    for line in expected_lines {
        if !text.lines().any(|candidate| candidate == line) {
            return Err(format!("Missing line '{}' in:\n{}", line, text));
        }
    }
    Ok(())
}

#[test]
fn text_report_skips_error_breakdown_without_errors() -> Result<(), String> {
    let stats = StatsAggregator::default();
    stats.record(&RequestOutcome::succeeded(Instant::now(), 200, 1));
    let text = render_text(&stats.summary(), &context()?)
        .map_err(|err| format!("render failed: {}", err))?;
    if text.contains("Timeouts:") {
        return Err(format!("Unexpected error breakdown in:\n{}", text));
    }
    Ok(())
}

#[test]
fn json_report_is_flat_and_parsable() -> Result<(), String> {
    let rendered = render_json(&sample_summary(), &context()?)
        .map_err(|err| format!("render failed: {}", err))?;
    let value: Value =
        serde_json::from_str(&rendered).map_err(|err| format!("parse failed: {}", err))?;

    let checks = [
        ("total_requests", Value::from(4)),
        ("error_count", Value::from(1)),
        ("status_errors", Value::from(1)),
        ("elapsed_ms", Value::from(2_000)),
        ("latency_max_us", Value::from(12_345)),
        ("success_rate_x100", Value::from(7_500)),
        ("percentile_method", Value::from("nearest-rank")),
        ("started_at", Value::from("2024-05-01T12:30:00.000Z")),
    ];
    for (key, expected) in checks {
        if value.get(key) != Some(&expected) {
            return Err(format!(
                "Field {} expected {}, got {:?}",
                key,
                expected,
                value.get(key)
            ));
        }
    }
    if value.pointer("/status_counts/503") != Some(&Value::from(1)) {
        return Err(format!("Missing status count in {}", rendered));
    }
    let percentiles = value
        .get("percentiles")
        .and_then(Value::as_array)
        .ok_or_else(|| "Missing percentiles array".to_owned())?;
    if percentiles.len() != 4 {
        return Err(format!("Expected 4 percentiles, got {}", percentiles.len()));
    }
    Ok(())
}
