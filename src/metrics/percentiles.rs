/// Percentiles reported when none are configured.
pub const DEFAULT_PERCENTILES: [u8; 4] = [50, 90, 95, 99];

/// How latency percentiles are derived from recorded samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PercentileMethod {
    /// Exact nearest-rank over every recorded latency.
    #[default]
    NearestRank,
    /// HDR histogram with three significant digits; memory stays bounded.
    Histogram,
}

impl PercentileMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PercentileMethod::NearestRank => "nearest-rank",
            PercentileMethod::Histogram => "histogram",
        }
    }
}

/// Nearest-rank percentile: the value at rank `ceil(p * n / 100)` of the
/// ascending `sorted` slice. Returns 0 for an empty slice.
pub(super) fn nearest_rank(sorted: &[u64], percentile: u8) -> u64 {
    let len = u64::try_from(sorted.len()).unwrap_or(u64::MAX);
    if len == 0 {
        return 0;
    }
    let rank = u64::from(percentile)
        .saturating_mul(len)
        .saturating_add(99)
        .checked_div(100)
        .unwrap_or(0)
        .clamp(1, len);
    let index = usize::try_from(rank.saturating_sub(1)).unwrap_or(usize::MAX);
    sorted.get(index).copied().unwrap_or(0)
}
