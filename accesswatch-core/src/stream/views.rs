use crate::event::AccessEvent;
use crate::stream::histogram::LatencyBucket;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Per-class status counters (2xx/3xx/4xx/5xx).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusClassTotals {
    #[serde(rename = "count2xx")]
    pub count_2xx: u64,
    #[serde(rename = "count3xx")]
    pub count_3xx: u64,
    #[serde(rename = "count4xx")]
    pub count_4xx: u64,
    #[serde(rename = "count5xx")]
    pub count_5xx: u64,
}

impl StatusClassTotals {
    /// Count `status` in its class. Returns `false` for codes outside 200..=599,
    /// which belong to no class.
    pub fn record(&mut self, status: u16) -> bool {
        match status / 100 {
            2 => self.count_2xx += 1,
            3 => self.count_3xx += 1,
            4 => self.count_4xx += 1,
            5 => self.count_5xx += 1,
            _ => return false,
        }
        true
    }

    pub fn add(&mut self, other: &StatusClassTotals) {
        self.count_2xx += other.count_2xx;
        self.count_3xx += other.count_3xx;
        self.count_4xx += other.count_4xx;
        self.count_5xx += other.count_5xx;
    }

    pub fn sum(&self) -> u64 {
        self.count_2xx + self.count_3xx + self.count_4xx + self.count_5xx
    }
}

/// One chart bucket, closed at the end of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Local wall-clock label, `HH:MM:SS`.
    pub time: String,
    pub closed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub counts: StatusClassTotals,
}

impl ChartPoint {
    pub fn new(closed_at: DateTime<Utc>, counts: StatusClassTotals) -> Self {
        Self {
            time: closed_at.with_timezone(&Local).format("%H:%M:%S").to_string(),
            closed_at,
            counts,
        }
    }
}

/// Totals accumulated since the current filter epoch began.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTotals {
    pub count: u64,
    pub sum_duration_ms: f64,
    /// Events with status >= 500.
    pub error_count: u64,
}

impl RunningTotals {
    pub fn record(&mut self, event: &AccessEvent) {
        self.count += 1;
        self.sum_duration_ms += event.duration_ms();
        if event.is_server_error() {
            self.error_count += 1;
        }
    }

    pub fn avg_duration_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_duration_ms / self.count as f64
    }

    /// Share of server errors as a percentage.
    pub fn error_rate(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.error_count as f64 / self.count as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencySummary {
    pub buckets: Vec<LatencyBucket>,
    pub p95_ms: u64,
    pub p99_ms: u64,
}

/// Immutable snapshot of every aggregate, published after each tick and each
/// filter reset. Readers get their own copy; nothing here aliases aggregator
/// state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamViews {
    /// Filter epoch the aggregates belong to.
    pub epoch: u64,
    /// Ticks aggregated within this epoch.
    pub ticks: u64,
    /// Oldest bucket first.
    pub chart: Vec<ChartPoint>,
    /// Newest event first.
    pub recent: Vec<Arc<AccessEvent>>,
    pub totals: RunningTotals,
    pub status_totals: StatusClassTotals,
    pub latency: LatencySummary,
}
