use crate::conf::StreamSettings;
use crate::event::AccessEvent;
use crate::filter::StreamFilter;
use crate::stream::constants::{LATENCY_BUCKETS_MS, MAX_CHART_POINTS, MAX_RECENT_EVENTS};
use crate::stream::histogram::LatencyHistogram;
use crate::stream::intake::IntakeBuffer;
use crate::stream::ring::BoundedRing;
use crate::stream::views::{
    ChartPoint, LatencySummary, RunningTotals, StatusClassTotals, StreamViews,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What a single tick did, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub drained: usize,
    pub retained: usize,
    /// Retained events whose status falls outside 2xx..5xx.
    pub unclassified: usize,
    pub evicted_points: usize,
    pub evicted_events: usize,
}

/// Owns every derived view and folds drained events into them on tick.
///
/// Invariants:
/// - chart length <= chart capacity, recent length <= log capacity
/// - `totals.count` == `status_totals.sum()` + unclassified events, per epoch
#[derive(Debug, Clone)]
pub struct WindowAggregator {
    chart: BoundedRing<ChartPoint>,
    recent: BoundedRing<Arc<AccessEvent>>,
    totals: RunningTotals,
    status_totals: StatusClassTotals,
    latency: LatencyHistogram,
    epoch: u64,
    ticks: u64,
}

impl Default for WindowAggregator {
    fn default() -> Self {
        Self::new(MAX_CHART_POINTS, MAX_RECENT_EVENTS)
    }
}

impl WindowAggregator {
    pub fn new(chart_capacity: usize, log_capacity: usize) -> Self {
        Self {
            chart: BoundedRing::with_capacity(chart_capacity),
            recent: BoundedRing::with_capacity(log_capacity),
            totals: RunningTotals::default(),
            status_totals: StatusClassTotals::default(),
            latency: LatencyHistogram::new(LATENCY_BUCKETS_MS),
            epoch: 0,
            ticks: 0,
        }
    }

    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self::new(settings.chart_capacity, settings.log_capacity)
    }

    /// Drain `intake` and fold every event matching `filter` into the views.
    ///
    /// Exactly one chart point is appended, even when nothing matched, so the
    /// time axis stays continuous.
    pub fn tick(
        &mut self,
        intake: &IntakeBuffer,
        filter: &StreamFilter,
        closed_at: DateTime<Utc>,
    ) -> TickReport {
        let drained = intake.drain();
        let mut report = TickReport {
            drained: drained.len(),
            ..TickReport::default()
        };

        let mut bucket = StatusClassTotals::default();
        for event in drained.into_iter().filter(|e| filter.matches(e)) {
            report.retained += 1;
            if !bucket.record(event.status_code) {
                report.unclassified += 1;
            }
            self.totals.record(&event);
            // Round up so a bucket never holds durations above its bound.
            self.latency.record(event.duration_ns.div_ceil(1_000_000));

            // Arrival order in, newest ends up first.
            if self.recent.push_front(Arc::new(event)).is_some() {
                report.evicted_events += 1;
            }
        }

        self.status_totals.add(&bucket);
        if self.chart.push_back(ChartPoint::new(closed_at, bucket)).is_some() {
            report.evicted_points += 1;
        }
        self.ticks += 1;

        report
    }

    /// Zero every aggregate and start a new epoch.
    pub fn reset(&mut self) {
        self.chart.clear();
        self.recent.clear();
        self.totals = RunningTotals::default();
        self.status_totals = StatusClassTotals::default();
        self.latency.reset();
        self.ticks = 0;
        self.epoch += 1;
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn totals(&self) -> &RunningTotals {
        &self.totals
    }

    pub fn status_totals(&self) -> &StatusClassTotals {
        &self.status_totals
    }

    pub fn snapshot(&self) -> StreamViews {
        StreamViews {
            epoch: self.epoch,
            ticks: self.ticks,
            chart: self.chart.to_vec(),
            recent: self.recent.to_vec(),
            totals: self.totals,
            status_totals: self.status_totals,
            latency: LatencySummary {
                buckets: self.latency.buckets(),
                p95_ms: self.latency.percentile(0.95),
                p99_ms: self.latency.percentile(0.99),
            },
        }
    }
}
