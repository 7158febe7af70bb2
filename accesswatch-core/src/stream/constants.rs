use std::time::Duration;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_CHART_POINTS: usize = 60;
pub const MAX_RECENT_EVENTS: usize = 100;
pub const LATENCY_BUCKETS_MS: &[u64] = &[1, 5, 10, 25, 50, 100, 250, 500, 1000];
