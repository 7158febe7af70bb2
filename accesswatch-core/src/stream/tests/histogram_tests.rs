use crate::stream::constants::LATENCY_BUCKETS_MS;
use crate::stream::{LatencyHistogram, percentile_from_histogram};

#[test]
fn records_into_inclusive_upper_bounds() {
    let mut h = LatencyHistogram::new(&[10, 100]);

    h.record(0);
    h.record(10);
    h.record(11);
    h.record(100);
    h.record(101);

    let counts: Vec<u64> = h.buckets().iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![2, 2, 1]);
    assert_eq!(h.total(), 5);
}

#[test]
fn bucket_labels_describe_ranges() {
    let h = LatencyHistogram::new(&[1, 5]);

    let labels: Vec<String> = h.buckets().into_iter().map(|b| b.label).collect();
    assert_eq!(labels, vec!["0–1ms", "2–5ms", ">5ms"]);
}

#[test]
fn percentiles_report_bucket_upper_bound() {
    let mut h = LatencyHistogram::new(LATENCY_BUCKETS_MS);
    for _ in 0..90 {
        h.record(3);
    }
    for _ in 0..9 {
        h.record(40);
    }
    h.record(400);

    assert_eq!(h.percentile(0.5), 5);
    assert_eq!(h.percentile(0.95), 50);
    assert_eq!(h.percentile(0.99), 50);
    assert_eq!(h.percentile(1.0), 500);
}

#[test]
fn overflow_percentile_is_one_past_last_bound() {
    let buckets = [(10, 0), (100, 0), (u64::MAX, 4)];

    assert_eq!(percentile_from_histogram(&buckets, 4, 0.99), 101);
}

#[test]
fn empty_histogram_reports_zero() {
    let h = LatencyHistogram::new(LATENCY_BUCKETS_MS);

    assert_eq!(h.percentile(0.95), 0);
}

#[test]
fn reset_zeroes_counts() {
    let mut h = LatencyHistogram::new(LATENCY_BUCKETS_MS);
    h.record(7);

    h.reset();

    assert_eq!(h.total(), 0);
    assert_eq!(h.buckets().len(), LATENCY_BUCKETS_MS.len() + 1);
}
