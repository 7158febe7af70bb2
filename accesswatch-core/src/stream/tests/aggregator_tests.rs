use crate::event::AccessEvent;
use crate::filter::StreamFilter;
use crate::stream::{IntakeBuffer, StatusClassTotals, WindowAggregator};
use chrono::Utc;
use pretty_assertions::assert_eq;

fn event(method: &str, status: u16) -> AccessEvent {
    AccessEvent {
        host: "ik.am".into(),
        path: "/entries".into(),
        method: method.into(),
        status_code: status,
        duration_ns: 2_000_000,
        ..Default::default()
    }
}

fn tick(agg: &mut WindowAggregator, intake: &IntakeBuffer, filter: &StreamFilter) {
    agg.tick(intake, filter, Utc::now());
}

#[test]
fn classifies_statuses_and_counts_errors() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    intake.push(event("GET", 200));
    intake.push(event("GET", 404));
    intake.push(event("GET", 500));

    // Act
    let report = agg.tick(&intake, &StreamFilter::default(), Utc::now());

    // Assert
    let expected = StatusClassTotals {
        count_2xx: 1,
        count_3xx: 0,
        count_4xx: 1,
        count_5xx: 1,
    };
    let views = agg.snapshot();
    assert_eq!(report.drained, 3);
    assert_eq!(report.retained, 3);
    assert_eq!(views.status_totals, expected);
    assert_eq!(views.totals.count, 3);
    assert_eq!(views.totals.error_count, 1);
    assert_eq!(views.totals.sum_duration_ms, 6.0);
    assert_eq!(views.chart.len(), 1);
    assert_eq!(views.chart[0].counts, expected);
}

#[test]
fn only_matching_events_are_counted() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    let filter = StreamFilter::new("", "", "POST");
    intake.push(event("GET", 200));
    intake.push(event("POST", 200));

    // Act
    tick(&mut agg, &intake, &filter);

    // Assert
    let views = agg.snapshot();
    assert_eq!(views.totals.count, 1);
    assert_eq!(views.chart[0].counts.count_2xx, 1);
    assert_eq!(views.recent.len(), 1);
    assert_eq!(views.recent[0].method, "POST");
}

#[test]
fn total_count_equals_matching_events_for_any_filter() {
    let filters = [
        StreamFilter::default(),
        StreamFilter::new("IK", "", ""),
        StreamFilter::new("", "/entries", "GET"),
        StreamFilter::new("nope", "", ""),
    ];
    let events: Vec<AccessEvent> = (0..50)
        .map(|i| {
            let method = if i % 3 == 0 { "POST" } else { "GET" };
            let mut e = event(method, 200 + (i % 4) * 100);
            if i % 5 == 0 {
                e.host = "example.com".into();
            }
            e
        })
        .collect();

    for filter in filters {
        let intake = IntakeBuffer::new();
        let mut agg = WindowAggregator::default();
        for e in &events {
            intake.push(e.clone());
        }

        tick(&mut agg, &intake, &filter);

        let expected = events.iter().filter(|e| filter.matches(e)).count() as u64;
        assert_eq!(agg.totals().count, expected, "filter {filter:?}");
    }
}

#[test]
fn out_of_class_statuses_count_toward_totals_only() {
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    intake.push(event("GET", 101));
    intake.push(event("GET", 204));
    intake.push(event("GET", 600));
    intake.push(event("GET", 0));

    let report = agg.tick(&intake, &StreamFilter::default(), Utc::now());

    assert_eq!(report.unclassified, 3);
    assert_eq!(agg.totals().count, 4);
    assert_eq!(agg.status_totals().sum(), 1);
    assert_eq!(
        agg.totals().count,
        agg.status_totals().sum() + report.unclassified as u64
    );
    // 600 is still a server error for the error counter.
    assert_eq!(agg.totals().error_count, 1);
}

#[test]
fn empty_tick_appends_one_zero_point_and_changes_nothing_else() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    intake.push(event("GET", 200));
    tick(&mut agg, &intake, &StreamFilter::default());
    let before = agg.snapshot();

    // Act
    tick(&mut agg, &intake, &StreamFilter::default());

    // Assert
    let after = agg.snapshot();
    assert_eq!(after.chart.len(), before.chart.len() + 1);
    assert_eq!(after.chart.last().unwrap().counts, StatusClassTotals::default());
    assert_eq!(after.totals, before.totals);
    assert_eq!(after.status_totals, before.status_totals);
    assert_eq!(after.recent, before.recent);
    assert_eq!(after.latency, before.latency);
}

#[test]
fn chart_is_bounded_and_evicts_oldest_bucket() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();

    // Tick 1 is the only one with a 5xx, so it is recognizable.
    intake.push(event("GET", 503));
    tick(&mut agg, &intake, &StreamFilter::default());

    // Act
    for _ in 0..59 {
        tick(&mut agg, &intake, &StreamFilter::default());
        assert!(agg.snapshot().chart.len() <= 60);
    }
    assert_eq!(agg.snapshot().chart[0].counts.count_5xx, 1);
    let report = agg.tick(&intake, &StreamFilter::default(), Utc::now());

    // Assert
    let views = agg.snapshot();
    assert_eq!(report.evicted_points, 1);
    assert_eq!(views.chart.len(), 60);
    assert!(views.chart.iter().all(|p| p.counts.count_5xx == 0));
    assert_eq!(views.ticks, 61);
}

#[test]
fn recent_log_is_bounded_and_newest_first() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    for i in 0..101 {
        let mut e = event("GET", 200);
        e.trace_id = format!("trace-{i}");
        intake.push(e);
    }

    // Act
    let report = agg.tick(&intake, &StreamFilter::default(), Utc::now());

    // Assert
    let views = agg.snapshot();
    assert_eq!(report.evicted_events, 1);
    assert_eq!(views.recent.len(), 100);
    assert_eq!(views.recent[0].trace_id, "trace-100");
    assert_eq!(views.recent[99].trace_id, "trace-1");
    assert!(views.recent.iter().all(|e| e.trace_id != "trace-0"));
}

#[test]
fn later_ticks_are_prepended_to_the_log() {
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    let mut first = event("GET", 200);
    first.trace_id = "first".into();
    let mut second = event("GET", 200);
    second.trace_id = "second".into();

    intake.push(first);
    tick(&mut agg, &intake, &StreamFilter::default());
    intake.push(second);
    tick(&mut agg, &intake, &StreamFilter::default());

    let ids: Vec<_> = agg
        .snapshot()
        .recent
        .iter()
        .map(|e| e.trace_id.clone())
        .collect();
    assert_eq!(ids, vec!["second", "first"]);
}

#[test]
fn reset_zeroes_everything_and_starts_new_epoch() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    intake.push(event("GET", 500));
    tick(&mut agg, &intake, &StreamFilter::default());

    // Act
    agg.reset();

    // Assert
    let views = agg.snapshot();
    assert_eq!(views.epoch, 1);
    assert_eq!(views.ticks, 0);
    assert!(views.chart.is_empty());
    assert!(views.recent.is_empty());
    assert_eq!(views.totals.count, 0);
    assert_eq!(views.totals.error_count, 0);
    assert_eq!(views.status_totals, StatusClassTotals::default());
    assert_eq!(views.latency.p99_ms, 0);
}

#[test]
fn filter_is_read_at_tick_time() {
    // Events arrive under one filter but are judged by the one in effect
    // when the tick drains them.
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    intake.push(event("GET", 200));
    intake.push(event("POST", 201));

    tick(&mut agg, &intake, &StreamFilter::new("", "", "POST"));

    assert_eq!(agg.totals().count, 1);
}

#[test]
fn custom_capacities_are_honored() {
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::new(2, 3);
    for _ in 0..5 {
        intake.push(event("GET", 200));
        tick(&mut agg, &intake, &StreamFilter::default());
    }

    let views = agg.snapshot();
    assert_eq!(views.chart.len(), 2);
    assert_eq!(views.recent.len(), 3);
    assert_eq!(views.totals.count, 5);
}

#[test]
fn fractional_durations_round_up_into_their_bucket() {
    // Arrange
    let intake = IntakeBuffer::new();
    let mut agg = WindowAggregator::default();
    for duration_ns in [1_900_000, 1_000_000, 5_000_001] {
        intake.push(AccessEvent {
            duration_ns,
            ..event("GET", 200)
        });
    }

    // Act
    tick(&mut agg, &intake, &StreamFilter::default());

    // Assert
    let latency = agg.snapshot().latency;
    let counts: Vec<_> = latency
        .buckets
        .iter()
        .filter(|b| b.count > 0)
        .map(|b| (b.upper_ms, b.count))
        .collect();
    assert_eq!(counts, vec![(Some(1), 1), (Some(5), 1), (Some(10), 1)]);
    assert_eq!(latency.p99_ms, 10);
}
