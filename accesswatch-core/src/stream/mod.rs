//! Bounded streaming aggregation.
//!
//! Events pushed by a transport wait in the [`IntakeBuffer`] until the next
//! tick. On every tick the [`WindowAggregator`] drains the buffer, keeps the
//! events that match the filter in effect at that moment, and folds them into
//! a handful of fixed-size views:
//!
//! ```text
//! transport --push--> IntakeBuffer --(tick) drain + filter--> WindowAggregator
//!                                                                  |
//!                                          renderer <-- StreamViews
//! ```
//!
//! Nothing here retains the full event history; memory is bounded by the
//! chart and log capacities plus whatever arrives within one tick.

mod aggregator;
pub mod constants;
mod histogram;
mod intake;
mod ring;
mod views;

#[cfg(test)]
mod tests;

pub use aggregator::{TickReport, WindowAggregator};
pub use histogram::{LatencyBucket, LatencyHistogram, percentile_from_histogram};
pub use intake::IntakeBuffer;
pub use ring::BoundedRing;
pub use views::{ChartPoint, LatencySummary, RunningTotals, StatusClassTotals, StreamViews};
