use serde::Serialize;

/// Request duration histogram over fixed millisecond bounds.
///
/// Bucket `i` counts durations `<= bounds[i]`; one extra overflow bucket
/// catches everything above the last bound.
#[derive(Debug, Clone)]
pub struct LatencyHistogram {
    bounds: &'static [u64],
    counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyBucket {
    pub label: String,
    /// Inclusive upper bound in ms, `None` for the overflow bucket.
    pub upper_ms: Option<u64>,
    pub count: u64,
}

impl LatencyHistogram {
    pub fn new(bounds: &'static [u64]) -> Self {
        Self {
            bounds,
            counts: vec![0; bounds.len() + 1],
        }
    }

    pub fn record(&mut self, value_ms: u64) {
        let idx = self
            .bounds
            .iter()
            .position(|bound| value_ms <= *bound)
            .unwrap_or(self.bounds.len());
        self.counts[idx] += 1;
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
    }

    pub fn buckets(&self) -> Vec<LatencyBucket> {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| LatencyBucket {
                label: self.label(i),
                upper_ms: self.bounds.get(i).copied(),
                count: *count,
            })
            .collect()
    }

    /// Approximate percentile (`pct` in 0.0..=1.0), reported as the upper bound
    /// of the bucket that contains it.
    pub fn percentile(&self, pct: f64) -> u64 {
        let numeric: Vec<(u64, u64)> = self
            .counts
            .iter()
            .enumerate()
            .map(|(i, count)| (self.bounds.get(i).copied().unwrap_or(u64::MAX), *count))
            .collect();
        percentile_from_histogram(&numeric, self.total(), pct)
    }

    fn label(&self, i: usize) -> String {
        match (i.checked_sub(1).and_then(|p| self.bounds.get(p)), self.bounds.get(i)) {
            (None, Some(upper)) => format!("0–{upper}ms"),
            (Some(lower), Some(upper)) => format!("{}–{upper}ms", lower + 1),
            (Some(last), None) => format!(">{last}ms"),
            (None, None) => "all".to_string(),
        }
    }
}

/// Walk `(upper_bound, count)` pairs until `pct` of `total` is covered.
///
/// An overflow bucket (`u64::MAX`) reports one past the last finite bound.
pub fn percentile_from_histogram(buckets: &[(u64, u64)], total: u64, pct: f64) -> u64 {
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * pct).ceil() as u64;
    let mut running = 0;

    for (upper, count) in buckets {
        running += *count;
        if running >= target {
            if *upper == u64::MAX {
                return buckets
                    .iter()
                    .rev()
                    .find(|(u, _)| *u != u64::MAX)
                    .map(|(u, _)| u.saturating_add(1))
                    .unwrap_or(0);
            }
            return *upper;
        }
    }

    0
}
